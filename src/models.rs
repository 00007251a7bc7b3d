use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for one uploaded image. Never mutated after creation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: Uuid,
    pub title: String,
    /// Opaque reference returned by the content storage backend.
    pub storage_ref: String,
    pub created_at: DateTime<Utc>,
}

/// Like/dislike tallies for a single image.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteCounts {
    pub likes: usize,
    pub dislikes: usize,
    pub score: i64,
}

impl VoteCounts {
    pub fn new(likes: usize, dislikes: usize) -> Self {
        Self {
            likes,
            dislikes,
            score: likes as i64 - dislikes as i64,
        }
    }
}

/// An image record joined with its vote counts at the moment of a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredImage {
    pub record: ImageRecord,
    pub counts: VoteCounts,
}

/// One page of a newest-first listing. `page` and `page_size` are the
/// effective values after clamping.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
}

/// Bytes read back from content storage, with the type they are served as.
#[derive(Debug, Clone)]
pub struct StoredContent {
    pub data: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}

// --- Response DTOs ---

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ImageDto {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub created_at_utc: DateTime<Utc>,
    pub likes: usize,
    pub dislikes: usize,
    pub score: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RatingItemDto {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub likes: usize,
    pub dislikes: usize,
    pub score: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub company: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl Default for ContactInfo {
    fn default() -> Self {
        Self {
            company: "Example LLC".to_string(),
            address: "1 Example Street, Nizhny Novgorod".to_string(),
            phone: "+7 (999) 000-00-00".to_string(),
            email: "info@example.com".to_string(),
        }
    }
}

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub user_name: String,
    pub is_like: bool,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UnvoteQuery {
    #[serde(default)]
    pub user_name: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct TopQuery {
    pub top: Option<i64>,
}
