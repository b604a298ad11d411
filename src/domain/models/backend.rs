use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::Message;

pub struct BackendPrompt {
    pub request_id: String,
    pub text: String,
}

impl BackendPrompt {
    pub fn new(request_id: &str, text: &str) -> BackendPrompt {
        return BackendPrompt {
            request_id: request_id.to_string(),
            text: text.to_string(),
        };
    }
}

#[derive(Debug)]
pub struct BackendResponse {
    pub request_id: String,
    pub message: Message,
}

#[async_trait]
pub trait Backend {
    /// Verifies all configuration required to make a request is available.
    /// No network calls are made.
    async fn health_check(&self) -> Result<()>;

    /// Requests a single completion for the prompt, returning the generated
    /// text. Transport failures and non-2xx responses are errors.
    async fn get_completion(&self, prompt: &BackendPrompt) -> Result<String>;
}

pub type BackendRef = Arc<dyn Backend + Send + Sync>;
