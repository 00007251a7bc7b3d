use crate::{
    config::Config,
    errors::AppError,
    repositories::InMemoryImageRepository,
    service::ImageService,
    storage::LocalFileStorage,
    AppState,
};
use std::sync::Arc;

/// Ensures the uploads directory exists and builds the shared application state.
pub async fn init_resources(config: &Config) -> Result<Arc<AppState>, AppError> {
    tracing::info!("Startup: Initializing resources...");

    tokio::fs::create_dir_all(&config.uploads_dir).await.map_err(|e| {
        let context = format!(
            "Startup: Failed to create uploads directory '{}'",
            config.uploads_dir.display()
        );
        tracing::error!("{}: {}", context, e);
        AppError::InitError(format!("{}: {}", context, e))
    })?;
    tracing::info!(uploads_dir = %config.uploads_dir.display(), "Startup: Uploads directory ready.");

    let repo = Arc::new(InMemoryImageRepository::new(
        config.store_capacity,
        config.votes_case_insensitive,
    ));
    let files = Arc::new(LocalFileStorage::new(
        config.uploads_dir.clone(),
        config.max_upload_bytes,
        config.allowed_content_types.clone(),
    ));
    let service = ImageService::new(repo, files, config.public_base_url.clone());

    tracing::info!("Startup: Resource initialization complete.");
    Ok(Arc::new(AppState {
        service,
        uploads_dir: config.uploads_dir.clone(),
        contacts: config.contacts.clone(),
    }))
}
