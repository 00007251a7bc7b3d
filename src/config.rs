use std::{env, net::SocketAddr, path::PathBuf, str::FromStr};
use thiserror::Error;

use crate::models::ContactInfo;

pub const DEFAULT_CAPACITY: usize = 50;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment variable format for {0}: {1}")]
    InvalidVar(String, String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub uploads_dir: PathBuf,
    // Prefix for image URLs; relative storage refs are returned when unset
    pub public_base_url: Option<String>,
    pub store_capacity: usize,
    pub max_upload_bytes: usize,
    pub allowed_content_types: Vec<String>,
    pub votes_case_insensitive: bool,
    pub contacts: ContactInfo,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            uploads_dir: PathBuf::from("wwwroot/uploads"),
            public_base_url: None,
            store_capacity: DEFAULT_CAPACITY,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_content_types: DEFAULT_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
            votes_case_insensitive: true,
            contacts: ContactInfo::default(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors, relies on env vars otherwise)
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source, falling back
    /// to defaults for anything unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let bind_address = parse_or("BIND_ADDRESS", &lookup, defaults.bind_address)?;
        let uploads_dir = lookup("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.uploads_dir);
        let public_base_url = lookup("PUBLIC_BASE_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let store_capacity: usize = parse_or("STORE_CAPACITY", &lookup, defaults.store_capacity)?;
        if store_capacity == 0 {
            return Err(ConfigError::InvalidVar(
                "STORE_CAPACITY".into(),
                "capacity must be at least 1".into(),
            ));
        }

        let max_upload_bytes = parse_or("MAX_UPLOAD_BYTES", &lookup, defaults.max_upload_bytes)?;

        let allowed_content_types = match lookup("ALLOWED_CONTENT_TYPES") {
            Some(raw) => {
                let types: Vec<String> = raw
                    .split(',')
                    .map(|s| s.trim().to_ascii_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect();
                if types.is_empty() {
                    return Err(ConfigError::InvalidVar(
                        "ALLOWED_CONTENT_TYPES".into(),
                        "at least one content type is required".into(),
                    ));
                }
                types
            }
            None => defaults.allowed_content_types,
        };

        let votes_case_insensitive =
            parse_or("VOTES_CASE_INSENSITIVE", &lookup, defaults.votes_case_insensitive)?;

        let text_or = |key: &str, default: String| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(default)
        };
        let contacts = ContactInfo {
            company: text_or("CONTACT_COMPANY", defaults.contacts.company),
            address: text_or("CONTACT_ADDRESS", defaults.contacts.address),
            phone: text_or("CONTACT_PHONE", defaults.contacts.phone),
            email: text_or("CONTACT_EMAIL", defaults.contacts.email),
        };

        Ok(Config {
            bind_address,
            uploads_dir,
            public_base_url,
            store_capacity,
            max_upload_bytes,
            allowed_content_types,
            votes_case_insensitive,
            contacts,
        })
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => T::from_str(raw.trim()).map_err(|e| ConfigError::InvalidVar(key.into(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.store_capacity, 50);
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.allowed_content_types.len(), 3);
        assert!(config.votes_case_insensitive);
        assert!(config.public_base_url.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("STORE_CAPACITY", "2"),
            ("ALLOWED_CONTENT_TYPES", "image/PNG, image/gif"),
            ("VOTES_CASE_INSENSITIVE", "false"),
            ("PUBLIC_BASE_URL", "http://img.local/"),
            ("CONTACT_EMAIL", " hello@img.local "),
            ("CONTACT_PHONE", "  "),
        ]))
        .unwrap();
        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.store_capacity, 2);
        assert_eq!(config.allowed_content_types, vec!["image/png", "image/gif"]);
        assert!(!config.votes_case_insensitive);
        assert_eq!(config.public_base_url.as_deref(), Some("http://img.local/"));
        assert_eq!(config.contacts.email, "hello@img.local");
        assert_eq!(config.contacts.phone, ContactInfo::default().phone);
    }

    #[test]
    fn invalid_values_are_reported_by_name() {
        let err = Config::from_lookup(lookup_from(&[("STORE_CAPACITY", "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar(ref name, _) if name == "STORE_CAPACITY"));

        let err = Config::from_lookup(lookup_from(&[("STORE_CAPACITY", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar(ref name, _) if name == "STORE_CAPACITY"));
    }
}
