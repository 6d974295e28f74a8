use async_trait::async_trait;
use image_edit_relay::{
    Error, Result,
    image::{ImageEditRequest, ImageEditResult, ImageEditor},
};
use std::sync::{Arc, Mutex};

/// Mock image editor that records every request it receives
#[derive(Debug, Clone)]
pub struct MockImageEditor {
    pub requests: Arc<Mutex<Vec<ImageEditRequest>>>,
    pub image_base64: String,
    pub error: Option<String>,
}

impl MockImageEditor {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            image_base64: "bW9ja2VkLWltYWdl".to_string(),
            error: None,
        }
    }

    pub fn with_image(mut self, image_base64: impl Into<String>) -> Self {
        self.image_base64 = image_base64.into();
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn get_requests(&self) -> Vec<ImageEditRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageEditor for MockImageEditor {
    async fn edit_image(&self, request: &ImageEditRequest) -> Result<ImageEditResult> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(ref error) = self.error {
            return Err(Error::ImageApi {
                status: 400,
                message: error.clone(),
            });
        }

        Ok(ImageEditResult {
            image_base64: self.image_base64.clone(),
        })
    }
}

impl Default for MockImageEditor {
    fn default() -> Self {
        Self::new()
    }
}
