use super::types::*;
use crate::{Error, Result, config::ImageApiConfig};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;

const MAX_ERROR_MESSAGE_LEN: usize = 500;

#[async_trait]
pub trait ImageEditor: Send + Sync {
    async fn edit_image(&self, request: &ImageEditRequest) -> Result<ImageEditResult>;
}

/// Client for the OpenAI `images/edits` endpoint.
pub struct OpenAiImageClient {
    client: reqwest::Client,
    edits_url: String,
    api_key: String,
    model: String,
    options: EditOptions,
}

impl OpenAiImageClient {
    pub fn new(config: ImageApiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            edits_url: format!("{}/images/edits", config.base_url.trim_end_matches('/')),
            api_key: config.api_key,
            model: config.model,
            options: config.options,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn options(&self) -> EditOptions {
        self.options
    }

    fn build_form(&self, request: &ImageEditRequest) -> Result<Form> {
        let mut image_part = Part::bytes(request.image.clone()).file_name(request.filename.clone());
        if let Some(content_type) = &request.content_type {
            image_part = image_part
                .mime_str(content_type)
                .map_err(|e| Error::invalid_request(format!("bad image content type: {e}")))?;
        }

        Ok(Form::new()
            .text("model", self.model.clone())
            .text("prompt", request.prompt.clone())
            .text("input_fidelity", self.options.input_fidelity.as_str())
            .text("quality", self.options.quality.as_str())
            .text("output_format", self.options.output_format.as_str())
            .part("image", image_part))
    }
}

#[async_trait]
impl ImageEditor for OpenAiImageClient {
    async fn edit_image(&self, request: &ImageEditRequest) -> Result<ImageEditResult> {
        debug!(
            "Sending image edit to {} ({} bytes, model {})",
            self.edits_url,
            request.image.len(),
            self.model
        );

        let form = self.build_form(request)?;

        let response = self
            .client
            .post(&self.edits_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(parse_error(status.as_u16(), &text));
        }

        let body: ImagesResponse = response.json().await?;
        debug!("Received image edit response with {} images", body.data.len());

        let image_base64 = body
            .data
            .into_iter()
            .next()
            .and_then(|image| image.b64_json)
            .ok_or_else(|| Error::unexpected_response("image API returned no b64_json data"))?;

        Ok(ImageEditResult { image_base64 })
    }
}

fn parse_error(status: u16, text: &str) -> Error {
    let message = match serde_json::from_str::<ApiErrorEnvelope>(text) {
        Ok(envelope) => envelope.error.message,
        Err(_) => text.chars().take(MAX_ERROR_MESSAGE_LEN).collect(),
    };

    match status {
        401 | 403 => Error::Auth(message),
        _ => Error::ImageApi { status, message },
    }
}
