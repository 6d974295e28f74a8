use super::types::{EditImageResponse, ErrorResponse, HealthResponse};
use crate::image::{ImageEditRequest, ImageEditor};
use axum::{
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
pub struct AppState {
    pub editor: Arc<dyn ImageEditor>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn edit_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<EditImageResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let request = read_edit_request(multipart).await.inspect_err(|(status, body)| {
        warn!("Rejected edit request {}: {} {}", request_id, status, body.error);
    })?;

    info!(
        "Received edit request {}: file '{}' ({} bytes), prompt of {} chars",
        request_id,
        request.filename,
        request.image.len(),
        request.prompt.chars().count()
    );

    match state.editor.edit_image(&request).await {
        Ok(result) => {
            info!("Edit request {} completed", request_id);
            Ok(Json(EditImageResponse {
                image_base64: result.image_base64,
            }))
        }
        Err(e) => {
            error!("Edit request {} failed: {}", request_id, e);
            Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Image edit error: {}", e),
            ))
        }
    }
}

/// Collects the `prompt` and `image` parts, rejecting the request before any
/// outbound call when either is absent or empty.
async fn read_edit_request(mut multipart: Multipart) -> Result<ImageEditRequest, ApiError> {
    let mut prompt: Option<String> = None;
    let mut image: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("prompt") => {
                prompt = Some(field.text().await.map_err(multipart_error)?);
            }
            Some("image") => {
                let Some(filename) = field.file_name().map(str::to_string) else {
                    return Err(unprocessable("field 'image' must be a file upload"));
                };
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                image = Some((filename, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let prompt = prompt.ok_or_else(|| unprocessable("missing required field 'prompt'"))?;
    if prompt.trim().is_empty() {
        return Err(unprocessable("field 'prompt' must not be empty"));
    }

    let (filename, content_type, image) =
        image.ok_or_else(|| unprocessable("missing required field 'image'"))?;
    if image.is_empty() {
        return Err(unprocessable("field 'image' must not be empty"));
    }

    Ok(ImageEditRequest {
        prompt,
        image,
        filename,
        content_type,
    })
}

fn reject(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

fn unprocessable(error: &str) -> ApiError {
    reject(StatusCode::UNPROCESSABLE_ENTITY, error)
}

fn multipart_error(e: MultipartError) -> ApiError {
    reject(e.status(), e.body_text())
}
