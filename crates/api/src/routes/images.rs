//! Blog image routes.
//!
//! Thin HTTP surface over the upload gateway: upload by multipart form,
//! list a folder, delete by public address.

use axum::{
    Json, Router,
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::AppState;
use quill_core::media::{Folder, ImageFile, StoredImage, UploadResult};
use quill_shared::AppError;

/// Creates the image routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/images",
        get(list_images).post(upload_image).delete(delete_image),
    )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing images.
#[derive(Debug, Deserialize)]
pub struct ListImagesQuery {
    /// Folder to list; defaults to `content`.
    #[serde(default)]
    pub folder: Option<String>,
}

/// Response for an image listing.
#[derive(Debug, Serialize)]
pub struct ListImagesResponse {
    /// Newest images first.
    pub images: Vec<StoredImage>,
}

/// Request body for deleting an image.
#[derive(Debug, Deserialize)]
pub struct DeleteImageRequest {
    /// Public address previously returned by an upload.
    pub url: String,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse folder from an optional form or query value.
fn parse_folder(s: Option<&str>) -> Result<Folder, String> {
    match s.map(str::trim) {
        None | Some("") => Ok(Folder::default()),
        Some(value) => Folder::parse(value).ok_or_else(|| format!("Carpeta desconocida: {value}")),
    }
}

/// HTTP status for an application error.
fn status_of(err: &AppError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Failed upload answered with the upload result shape.
fn upload_failure(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(UploadResult::failed(message))).into_response()
}

/// Error body used by non-upload routes.
fn error_response(err: &AppError) -> Response {
    (
        status_of(err),
        Json(json!({
            "error": err.error_code(),
            "message": err.message()
        })),
    )
        .into_response()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/images`
/// Upload an image from a multipart form with `file` and optional `folder` parts.
async fn upload_image(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut file: Option<ImageFile> = None;
    let mut folder = Folder::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Malformed multipart body");
                return upload_failure(e.status(), e.body_text());
            }
        };

        let part = field.name().map(str::to_owned);
        match part.as_deref() {
            Some("file") => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                match field.bytes().await {
                    Ok(data) => file = Some(ImageFile::new(name, content_type, data)),
                    Err(e) => {
                        warn!(error = %e, "Failed to read uploaded file");
                        return upload_failure(e.status(), e.body_text());
                    }
                }
            }
            Some("folder") => {
                let value = match field.text().await {
                    Ok(value) => value,
                    Err(e) => return upload_failure(e.status(), e.body_text()),
                };
                folder = match parse_folder(Some(&value)) {
                    Ok(folder) => folder,
                    Err(message) => return upload_failure(StatusCode::BAD_REQUEST, message),
                };
            }
            _ => {}
        }
    }

    let Some(file) = file else {
        return upload_failure(StatusCode::BAD_REQUEST, "No se recibió ningún archivo");
    };

    match state.gateway.store(file, folder).await {
        Ok(image) => {
            info!(folder = %folder, key = %image.key, "Image uploaded");
            (StatusCode::CREATED, Json(UploadResult::ok(image.url))).into_response()
        }
        Err(e) => {
            let message = e.to_string();
            let app_error = AppError::from(e);
            upload_failure(status_of(&app_error), message)
        }
    }
}

/// GET `/images?folder=covers`
/// List the newest images in a folder.
async fn list_images(
    State(state): State<AppState>,
    Query(query): Query<ListImagesQuery>,
) -> Response {
    let folder = match parse_folder(query.folder.as_deref()) {
        Ok(folder) => folder,
        Err(message) => return error_response(&AppError::Validation(message)),
    };

    match state.gateway.list(folder).await {
        Ok(images) => (StatusCode::OK, Json(ListImagesResponse { images })).into_response(),
        Err(e) => {
            error!(folder = %folder, error = %e, "Image listing unavailable");
            error_response(&AppError::from(e))
        }
    }
}

/// DELETE `/images`
/// Delete an image by its public address.
async fn delete_image(
    State(state): State<AppState>,
    Json(payload): Json<DeleteImageRequest>,
) -> Response {
    match state.gateway.try_remove(&payload.url).await {
        Ok(key) => (
            StatusCode::OK,
            Json(json!({
                "deleted": true,
                "key": key
            })),
        )
            .into_response(),
        Err(e) => {
            if !e.is_local() {
                error!(url = %payload.url, error = %e, "Image deletion failed");
            }
            error_response(&AppError::from(e))
        }
    }
}
