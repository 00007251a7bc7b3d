use crate::{
    errors::AppError,
    models::{PageQuery, TopQuery, UnvoteQuery, VoteRequest},
    AppState,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Multipart, Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: i64 = 10;
const DEFAULT_TOP: i64 = 50;

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut title = None;
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut file_content_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = match field.name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        match field_name.as_str() {
            "title" => title = Some(field.text().await.map_err(|e| AppError::InvalidInput(format!("Failed to read title: {}", e)))?),
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                file_content_type = field.content_type().map(|m| m.to_string());
                file_data = Some(field.bytes().await?.to_vec());
            }
            _ => tracing::debug!("Ignoring unknown multipart field: {}", field_name),
        }
    }

    let title = title.ok_or_else(|| AppError::MissingFormField("title".to_string()))?;
    let file_data = file_data.ok_or_else(|| AppError::MissingFormField("file".to_string()))?;
    let file_name = file_name.unwrap_or_default();

    // Guess content type from the file name if the client did not send one
    let content_type = file_content_type
        .or_else(|| mime_guess::from_path(&file_name).first_raw().map(|s| s.to_string()))
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let created = state
        .service
        .upload(&title, file_data, &file_name, &content_type)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_images(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query?;
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    tracing::debug!(page, page_size, "Listing images via handler");
    Ok(Json(state.service.page(page, page_size)))
}

pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let image_id = Uuid::parse_str(&id_str)?;
    tracing::debug!(%image_id, "Fetching image details via handler");
    match state.service.get(image_id) {
        Some(image) => Ok(Json(image)),
        None => Err(AppError::ImageNotFound(image_id)),
    }
}

/// Sends the stored file as an attachment.
pub async fn download_image(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let image_id = Uuid::parse_str(&id_str)?;
    tracing::debug!(%image_id, "Downloading image via handler");
    let content = state.service.download(image_id).await?;

    let disposition = format!("attachment; filename=\"{}\"", content.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, content.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content.data,
    ))
}

/// Deletes the image record, its votes and its stored content.
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<StatusCode, AppError> {
    let image_id = Uuid::parse_str(&id_str)?;
    tracing::debug!(%image_id, "Deleting image via handler");

    if state.service.delete(image_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::ImageNotFound(image_id))
    }
}

pub async fn vote(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    request: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(request) = request?;
    let image_id = Uuid::parse_str(&id_str)?;
    state
        .service
        .vote(image_id, &request.user_name, request.is_like)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unvote(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    query: Result<Query<UnvoteQuery>, QueryRejection>,
) -> Result<StatusCode, AppError> {
    let Query(query) = query?;
    let image_id = Uuid::parse_str(&id_str)?;
    state.service.unvote(image_id, &query.user_name)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn contacts(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.contacts.clone())
}

pub async fn rating(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TopQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query?;
    let top = query.top.unwrap_or(DEFAULT_TOP);
    Ok(Json(state.service.rating_top(top)))
}
