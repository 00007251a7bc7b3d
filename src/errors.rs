use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

// --- Core Store Errors ---

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Image not found with ID: {0}")]
    NotFound(Uuid),

    #[error("Image store is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },
}

// --- Content Storage Errors ---

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Content rejected: {0}")]
    RejectedContent(String),

    #[error("Storage backend error: {0}")]
    BackendError(#[from] anyhow::Error), // Wrap Anyhow errors from Storage layer
}

// --- Web Layer Error ---

#[derive(Error, Debug)]
pub enum AppError {
    // Input validation / request parsing errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Missing form field: {0}")]
    MissingFormField(String),
    #[error("Error processing multipart form data: {0}")]
    MultipartError(#[from] axum::extract::multipart::MultipartError),
    #[error("Invalid image ID format: {0}")]
    InvalidUuid(#[from] uuid::Error),

    // Domain/Service level errors (mapped from StoreError/StorageError)
    #[error("Image not found with ID: {0}")]
    ImageNotFound(Uuid),
    #[error("Stored content missing for image: {0}")]
    ContentMissing(Uuid),
    #[error("Image store is full (capacity {0})")]
    CapacityExceeded(usize),
    #[error("Content rejected: {0}")]
    RejectedContent(String),
    #[error("Could not perform file storage operation")]
    StorageError(#[source] StorageError),

    // Startup errors
    #[error("Initialization error: {0}")]
    InitError(String),
}

// --- Conversions from Domain Errors to AppError ---

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidInput(msg) => AppError::InvalidInput(msg),
            StoreError::NotFound(id) => AppError::ImageNotFound(id),
            StoreError::CapacityExceeded { capacity } => AppError::CapacityExceeded(capacity),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::RejectedContent(reason) => AppError::RejectedContent(reason),
            e @ StorageError::BackendError(_) => AppError::StorageError(e),
        }
    }
}

// --- Conversions from Axum Extractor Rejections ---

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

// --- Axum Response Implementation ---

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            // 4xx Client Errors
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::MissingFormField(field) => (StatusCode::BAD_REQUEST, format!("Missing form field: {}", field)),
            AppError::MultipartError(e) => (StatusCode::BAD_REQUEST, format!("Invalid multipart form data: {}", e)),
            AppError::InvalidUuid(e) => (StatusCode::BAD_REQUEST, format!("Invalid ID format: {}", e)),
            AppError::ImageNotFound(id) => (StatusCode::NOT_FOUND, format!("Image not found with ID: {}", id)),
            AppError::ContentMissing(id) => {
                tracing::warn!(image_id = %id, "Record exists but its stored content is gone");
                (StatusCode::NOT_FOUND, "File missing on disk".to_string())
            }
            AppError::CapacityExceeded(capacity) => (
                StatusCode::CONFLICT,
                format!("Image store is full (capacity {})", capacity),
            ),
            AppError::RejectedContent(reason) => (StatusCode::BAD_REQUEST, reason.clone()),

            // 5xx Server Errors
            AppError::StorageError(e) => {
                tracing::error!(error.source = ?e, "Storage error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "File storage operation failed".to_string())
            }
            AppError::InitError(msg) => {
                tracing::error!("Initialization error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server initialization error".to_string())
            }
        };

        if status.is_server_error() {
            tracing::error!(error.message = %error_message, error.detail = %self, "Responding with error");
        } else {
            tracing::debug!(error.message = %error_message, error.status = %status, "Responding with client error");
        }

        let body = Json(serde_json::json!({ "error": error_message }));
        (status, body).into_response()
    }
}
