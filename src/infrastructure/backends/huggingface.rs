#[cfg(test)]
#[path = "huggingface_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Backend;
use crate::domain::models::BackendPrompt;

pub const NO_RESPONSE: &str = "No response";

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CompletionRequest {
    inputs: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Generation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    generated_text: Option<String>,
}

/// Hosted text generation replies with a list of generations, though some
/// deployments answer with a single object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum CompletionResponse {
    Many(Vec<Generation>),
    One(Generation),
}

impl CompletionResponse {
    fn into_text(self) -> Option<String> {
        match self {
            CompletionResponse::Many(generations) => {
                return generations.into_iter().next()?.generated_text;
            }
            CompletionResponse::One(generation) => return generation.generated_text,
        }
    }
}

pub struct HuggingFace {
    url: String,
    token: String,
    model: String,
    timeout: String,
}

impl Default for HuggingFace {
    fn default() -> HuggingFace {
        return HuggingFace {
            url: Config::get(ConfigKey::ApiURL),
            token: Config::get(ConfigKey::ApiKey),
            model: Config::get(ConfigKey::Model),
            timeout: Config::get(ConfigKey::RequestTimeout),
        };
    }
}

#[async_trait]
impl Backend for HuggingFace {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if self.token.is_empty() {
            bail!("API key is missing");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn get_completion(&self, prompt: &BackendPrompt) -> Result<String> {
        if self.url.is_empty() {
            bail!("API URL is not defined");
        }
        if self.model.is_empty() {
            bail!("Model is not defined");
        }

        let req = CompletionRequest {
            inputs: prompt.text.to_string(),
        };

        let res = reqwest::Client::new()
            .post(format!(
                "{url}/models/{model}",
                url = self.url.trim_end_matches('/'),
                model = self.model
            ))
            .bearer_auth(&self.token)
            .timeout(Duration::from_millis(self.timeout.parse::<u64>()?))
            .json(&req)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Failed to make completion request"
            );
            bail!("Failed to make completion request");
        }

        let body = res.text().await?;
        let text = serde_json::from_str::<CompletionResponse>(&body)?
            .into_text()
            .unwrap_or_else(|| return NO_RESPONSE.to_string());

        return Ok(text);
    }
}
