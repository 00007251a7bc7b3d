//! Upload, listing, voting and rating use cases.
//!
//! Content I/O is awaited here, at the boundary, never inside the store's
//! critical sections.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{FileStorage, ImageRepository};
use crate::errors::AppError;
use crate::models::{ImageDto, PagedResult, RatingItemDto, ScoredImage, StoredContent};

#[derive(Clone)]
pub struct ImageService {
    repo: Arc<dyn ImageRepository>,
    files: Arc<dyn FileStorage>,
    public_base_url: Option<String>,
}

impl ImageService {
    pub fn new(
        repo: Arc<dyn ImageRepository>,
        files: Arc<dyn FileStorage>,
        public_base_url: Option<String>,
    ) -> Self {
        Self {
            repo,
            files,
            public_base_url,
        }
    }

    /// Persists content, then creates the record. If the record cannot be
    /// created the content is released again. A store that is already full
    /// fails before any content is written; `add` still makes the final
    /// capacity check.
    pub async fn upload(
        &self,
        title: &str,
        data: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<ImageDto, AppError> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput("title is required".into()));
        }
        if data.is_empty() {
            return Err(AppError::InvalidInput("file is required".into()));
        }
        if self.repo.count() >= self.repo.capacity() {
            return Err(AppError::CapacityExceeded(self.repo.capacity()));
        }

        let storage_ref = self.files.persist(data, file_name, content_type).await?;

        match self.repo.add(title, &storage_ref) {
            Ok(record) => {
                tracing::info!(image_id = %record.id, %storage_ref, "Image uploaded");
                Ok(self.to_image_dto(ScoredImage {
                    record,
                    counts: Default::default(),
                }))
            }
            Err(e) => {
                tracing::warn!(%storage_ref, error = %e, "Record not created, releasing stored content");
                self.files.release(&storage_ref).await;
                Err(e.into())
            }
        }
    }

    pub fn get(&self, id: Uuid) -> Option<ImageDto> {
        self.repo.get_scored(id).map(|scored| self.to_image_dto(scored))
    }

    /// Stored bytes of an image, served with the type they were stored as.
    pub async fn download(&self, id: Uuid) -> Result<StoredContent, AppError> {
        let record = self.repo.get(id).ok_or(AppError::ImageNotFound(id))?;
        self.files
            .download(&record.storage_ref)
            .await?
            .ok_or(AppError::ContentMissing(id))
    }

    /// Removes the record first, then releases its content. Returns whether
    /// the record existed.
    pub async fn delete(&self, id: Uuid) -> bool {
        let Some(record) = self.repo.remove(id) else {
            return false;
        };

        if !self.files.release(&record.storage_ref).await {
            tracing::warn!(image_id = %id, storage_ref = %record.storage_ref, "No stored content released for deleted image");
        }
        true
    }

    pub fn page(&self, page: i64, page_size: i64) -> PagedResult<ImageDto> {
        let result = self.repo.get_page(page, page_size);
        PagedResult {
            items: result
                .items
                .into_iter()
                .map(|scored| self.to_image_dto(scored))
                .collect(),
            page: result.page,
            page_size: result.page_size,
            total_count: result.total_count,
        }
    }

    pub fn rating_top(&self, top: i64) -> Vec<RatingItemDto> {
        self.repo
            .get_rating_top(top)
            .into_iter()
            .map(|scored| RatingItemDto {
                id: scored.record.id,
                url: self.build_url(&scored.record.storage_ref),
                title: scored.record.title,
                likes: scored.counts.likes,
                dislikes: scored.counts.dislikes,
                score: scored.counts.score,
            })
            .collect()
    }

    pub fn vote(&self, id: Uuid, user_name: &str, is_like: bool) -> Result<(), AppError> {
        self.repo.set_vote(id, user_name, is_like)?;
        Ok(())
    }

    pub fn unvote(&self, id: Uuid, user_name: &str) -> Result<(), AppError> {
        self.repo.remove_vote(id, user_name)?;
        Ok(())
    }

    fn to_image_dto(&self, scored: ScoredImage) -> ImageDto {
        ImageDto {
            id: scored.record.id,
            url: self.build_url(&scored.record.storage_ref),
            title: scored.record.title,
            created_at_utc: scored.record.created_at,
            likes: scored.counts.likes,
            dislikes: scored.counts.dislikes,
            score: scored.counts.score,
        }
    }

    fn build_url(&self, storage_ref: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                storage_ref.trim_start_matches('/')
            ),
            None => storage_ref.to_string(),
        }
    }
}
