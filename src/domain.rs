use crate::errors::{StorageError, StoreError};
use crate::models::{ImageRecord, Page, ScoredImage, StoredContent, VoteCounts};
use async_trait::async_trait;
use uuid::Uuid;

/// Storage and ranking of image metadata together with per-user votes.
///
/// Every method is synchronous and non-blocking; implementations must be safe
/// to share across threads behind an `Arc<dyn ImageRepository>`.
pub trait ImageRepository: Send + Sync + 'static {
    /// Number of records currently held.
    fn count(&self) -> usize;

    /// Maximum number of records the repository will hold at once.
    fn capacity(&self) -> usize;

    /// Creates a record with a fresh id and an empty vote set.
    /// Fails with `CapacityExceeded` when full, `InvalidInput` for a blank title.
    fn add(&self, title: &str, storage_ref: &str) -> Result<ImageRecord, StoreError>;

    /// Record plus vote counts, read together.
    fn get_scored(&self, id: Uuid) -> Option<ScoredImage>;

    fn get(&self, id: Uuid) -> Option<ImageRecord> {
        self.get_scored(id).map(|scored| scored.record)
    }

    /// Removes a record and its votes as one unit, returning the removed record.
    fn remove(&self, id: Uuid) -> Option<ImageRecord>;

    fn delete(&self, id: Uuid) -> bool {
        self.remove(id).is_some()
    }

    /// Newest-first page. `page` is floored to 1, `page_size` clamped to [1, 50].
    fn get_page(&self, page: i64, page_size: i64) -> Page<ScoredImage>;

    /// Highest ranked images. `n` is clamped to [1, 50].
    fn get_rating_top(&self, n: i64) -> Vec<ScoredImage>;

    fn set_vote(&self, image_id: Uuid, user_id: &str, is_like: bool) -> Result<(), StoreError>;

    /// Returns whether a vote was removed. Removing an absent vote is not an error.
    fn remove_vote(&self, image_id: Uuid, user_id: &str) -> Result<bool, StoreError>;

    fn counts(&self, image_id: Uuid) -> Result<VoteCounts, StoreError>;
}

/// Persistence of raw image bytes.
#[async_trait]
pub trait FileStorage: Send + Sync + 'static {
    /// Stores content and returns an opaque reference for later retrieval/release.
    /// Fails with `RejectedContent` for disallowed types or oversized payloads.
    async fn persist(
        &self,
        data: Vec<u8>,
        suggested_name: &str,
        content_type: &str,
    ) -> Result<String, StorageError>;

    /// Reads stored content back. `Ok(None)` when nothing is stored under the reference.
    async fn download(&self, storage_ref: &str) -> Result<Option<StoredContent>, StorageError>;

    /// Best-effort deletion. Returns whether anything was deleted; a missing
    /// reference yields `false`.
    async fn release(&self, storage_ref: &str) -> bool;
}
