use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use image_edit_relay::{
    config::{ImageApiConfig, ServerConfig},
    server::{self, handlers::AppState},
};
use serde_json::Value;
use std::sync::Arc;

use super::MockImageEditor;

pub const BOUNDARY: &str = "relay-test-boundary";

/// Smallest byte sequence that starts and ends like a JPEG
pub const TINY_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0xFF, 0xD9];

/// Create a router backed by the given mock editor
pub fn create_test_app(editor: MockImageEditor) -> Router {
    create_test_app_with_config(editor, &ServerConfig::default())
}

pub fn create_test_app_with_config(editor: MockImageEditor, config: &ServerConfig) -> Router {
    let state = AppState {
        editor: Arc::new(editor),
    };
    server::router(state, config)
}

/// Image API config pointing at a local mock server
pub fn create_test_image_api_config(base_url: &str) -> ImageApiConfig {
    ImageApiConfig {
        base_url: base_url.to_string(),
        api_key: "test-api-key".to_string(),
        request_timeout_secs: Some(5),
        ..ImageApiConfig::default()
    }
}

/// Encode a multipart/form-data body by hand
pub fn multipart_body(prompt: Option<&str>, image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut parts = Vec::new();
    if let Some(prompt) = prompt {
        parts.push(text_part("prompt", prompt));
    }
    if let Some((filename, bytes)) = image {
        parts.push(file_part("image", filename, bytes));
    }
    close_multipart(parts)
}

pub fn text_part(name: &str, value: &str) -> Vec<u8> {
    let mut part = Vec::new();
    part.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    part.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
    );
    part.extend_from_slice(value.as_bytes());
    part.extend_from_slice(b"\r\n");
    part
}

pub fn file_part(name: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut part = Vec::new();
    part.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    part.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    part.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
    part.extend_from_slice(bytes);
    part.extend_from_slice(b"\r\n");
    part
}

/// Join parts and append the closing boundary
pub fn close_multipart(parts: Vec<Vec<u8>>) -> Vec<u8> {
    let mut body = parts.concat();
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn edit_request(body: Vec<u8>) -> Request<Body> {
    edit_request_to("/edit-image/", body)
}

pub fn edit_request_to(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
