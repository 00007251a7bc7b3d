use crate::{domain::FileStorage, errors::StorageError, models::StoredContent};
use anyhow::Context;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// URL prefix under which stored files are served.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Stores uploads as flat files in one directory.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
    max_bytes: usize,
    allowed_content_types: Vec<String>,
}

impl LocalFileStorage {
    pub fn new(root: PathBuf, max_bytes: usize, allowed_content_types: Vec<String>) -> Self {
        let allowed_content_types = allowed_content_types
            .into_iter()
            .map(|ct| ct.trim().to_ascii_lowercase())
            .collect();
        Self {
            root,
            max_bytes,
            allowed_content_types,
        }
    }

    fn validate(&self, len: usize, content_type: &str) -> Result<(), StorageError> {
        let normalized = content_type.trim().to_ascii_lowercase();
        if !self.allowed_content_types.contains(&normalized) {
            return Err(StorageError::RejectedContent(format!(
                "Content type '{}' is not allowed",
                content_type
            )));
        }
        if len > self.max_bytes {
            return Err(StorageError::RejectedContent(format!(
                "File too large: {} bytes (limit {} bytes)",
                len, self.max_bytes
            )));
        }
        Ok(())
    }

    /// Maps a storage reference to a file inside `root`, using only its last segment.
    fn resolve(&self, storage_ref: &str) -> Option<PathBuf> {
        let file_name = storage_ref.replace('\\', "/");
        let file_name = file_name.rsplit('/').next()?.trim();
        if file_name.is_empty() || file_name == "." || file_name == ".." {
            return None;
        }
        Some(self.root.join(file_name))
    }
}

/// Extension (with leading dot) for a new file. The suggested name's own
/// extension is kept only when it is a known extension of the validated
/// content type, so the name can never change how the file is served.
fn extension_for(suggested_name: &str, content_type: &str) -> String {
    let content_type = content_type.trim().to_ascii_lowercase();
    let known = mime_guess::get_mime_extensions_str(&content_type).unwrap_or(&[]);

    let from_name = Path::new(suggested_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| known.contains(&ext.as_str()));

    if let Some(ext) = from_name {
        return format!(".{}", ext);
    }

    match content_type.as_str() {
        "image/jpeg" => ".jpg".to_string(),
        "image/png" => ".png".to_string(),
        "image/webp" => ".webp".to_string(),
        _ => match known.first() {
            Some(ext) => format!(".{}", ext),
            None => ".bin".to_string(),
        },
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn persist(
        &self,
        data: Vec<u8>,
        suggested_name: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        if let Err(e) = self.validate(data.len(), content_type) {
            tracing::warn!(%content_type, size = data.len(), error = %e, "Upload rejected");
            return Err(e);
        }

        let file_name = format!(
            "{}{}",
            Uuid::new_v4().simple(),
            extension_for(suggested_name, content_type)
        );
        let path = self.root.join(&file_name);
        tracing::debug!(path = %path.display(), size = data.len(), %content_type, "Writing upload");

        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create uploads directory '{}'", self.root.display()))?;
        fs::write(&path, &data)
            .await
            .with_context(|| format!("Failed to write upload '{}'", path.display()))?;

        Ok(format!("{}/{}", UPLOADS_PREFIX, file_name))
    }

    async fn download(&self, storage_ref: &str) -> Result<Option<StoredContent>, StorageError> {
        let Some(path) = self.resolve(storage_ref) else {
            return Ok(None);
        };

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Stored file missing");
                return Ok(None);
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to read upload '{}'", path.display()))
                    .into())
            }
        };

        // The extension was chosen from the validated content type on persist
        let content_type = mime_guess::from_path(&path).first_or_octet_stream().to_string();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();

        Ok(Some(StoredContent {
            data,
            content_type,
            file_name,
        }))
    }

    async fn release(&self, storage_ref: &str) -> bool {
        let Some(path) = self.resolve(storage_ref) else {
            tracing::debug!(%storage_ref, "Ignoring release of empty storage reference");
            return false;
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Stored file deleted");
                true
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Stored file already gone");
                false
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to delete stored file");
                false
            }
        }
    }
}
