//! Scripted provider for pipeline tests.
//!
//! Replies are keyed on the image payload, so a test can name the outcome for
//! each file without depending on directory listing order.

use super::provider::{LlmProvider, LlmRequest, LlmResponse};
use crate::error::PipelineError;
use async_trait::async_trait;
use base64::Engine;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the mock answers for one image.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Fail { status_code: Option<u16>, message: String },
}

pub struct MockProvider {
    replies: HashMap<String, MockReply>,
    /// Every request received, shared for post-hoc assertions.
    seen: Arc<Mutex<Vec<LlmRequest>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer `text` when the image bytes equal `image_bytes`.
    pub fn reply(mut self, image_bytes: &[u8], text: &str) -> Self {
        self.replies
            .insert(encode(image_bytes), MockReply::Text(text.to_string()));
        self
    }

    /// Fail the call when the image bytes equal `image_bytes`.
    pub fn fail(mut self, image_bytes: &[u8], status_code: Option<u16>, message: &str) -> Self {
        self.replies.insert(
            encode(image_bytes),
            MockReply::Fail {
                status_code,
                message: message.to_string(),
            },
        );
        self
    }

    pub fn seen_handle(&self) -> Arc<Mutex<Vec<LlmRequest>>> {
        self.seen.clone()
    }
}

fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, PipelineError> {
        self.seen.lock().unwrap().push(request.clone());
        match self.replies.get(&request.image.data) {
            Some(MockReply::Text(text)) => Ok(LlmResponse {
                text: text.clone(),
                model: "mock-v1".to_string(),
                tokens_used: Some(42),
                latency_ms: 1,
            }),
            Some(MockReply::Fail {
                status_code,
                message,
            }) => Err(PipelineError::Llm {
                message: message.clone(),
                status_code: *status_code,
            }),
            None => Err(PipelineError::Llm {
                message: "mock has no reply for this image".to_string(),
                status_code: None,
            }),
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(1)
    }
}
