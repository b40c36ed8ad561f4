use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use assortment_core::config::{LlmConfig, LlmProvider};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::{debug, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 2048;
const RETRY_BACKOFF: Duration = Duration::from_millis(250);

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Chat completion over HTTP. OpenAI and Ollama share the OpenAI-compatible
/// `/v1/chat/completions` route; Anthropic uses `/v1/messages`.
pub struct HttpLlmClient {
    client: reqwest::Client,
    provider: LlmProvider,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
    temperature: f64,
    max_retries: u32,
}

impl HttpLlmClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        config.ensure_ready()?;
        let client = reqwest::Client::builder()
            .build()
            .context("failed to build llm http client")?;
        Ok(Self {
            client,
            provider: config.provider,
            base_url: config.effective_base_url().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_retries: config.max_retries,
        })
    }

    fn endpoint(&self) -> String {
        match self.provider {
            LlmProvider::OpenAi | LlmProvider::Ollama => {
                format!("{}/v1/chat/completions", self.base_url)
            }
            LlmProvider::Anthropic => format!("{}/v1/messages", self.base_url),
        }
    }

    async fn send_once(&self, prompt: &str) -> Result<String, SendError> {
        let mut request = self.client.post(self.endpoint());
        request = match self.provider {
            LlmProvider::OpenAi | LlmProvider::Ollama => {
                let request = request.json(&chat_completion_body(&self.model, self.temperature, prompt));
                match &self.api_key {
                    Some(key) => request.bearer_auth(key.expose_secret()),
                    None => request,
                }
            }
            LlmProvider::Anthropic => {
                let request = request
                    .json(&anthropic_messages_body(&self.model, self.temperature, prompt))
                    .header("anthropic-version", ANTHROPIC_VERSION);
                match &self.api_key {
                    Some(key) => request.header("x-api-key", key.expose_secret()),
                    None => request,
                }
            }
        };

        let response = request.send().await.map_err(|error| SendError::Retryable(error.into()))?;
        let status = response.status();
        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SendError::Retryable(anyhow!("llm endpoint returned {status}")));
        }
        if !status.is_success() {
            return Err(SendError::Fatal(anyhow!("llm endpoint returned {status}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|error| SendError::Fatal(anyhow!("llm response body is not JSON: {error}")))?;
        let content = match self.provider {
            LlmProvider::OpenAi | LlmProvider::Ollama => chat_completion_content(&body),
            LlmProvider::Anthropic => anthropic_content(&body),
        };
        content.map_err(SendError::Fatal)
    }
}

enum SendError {
    Retryable(anyhow::Error),
    Fatal(anyhow::Error),
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            debug!(
                event_name = "llm.request",
                provider = self.provider.as_str(),
                model = %self.model,
                attempt,
                "sending llm completion request"
            );
            match self.send_once(prompt).await {
                Ok(content) => return Ok(content),
                Err(SendError::Fatal(error)) => return Err(error),
                Err(SendError::Retryable(error)) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        event_name = "llm.retry",
                        provider = self.provider.as_str(),
                        attempt,
                        max_retries = self.max_retries,
                        error = %error,
                        "llm request failed, retrying"
                    );
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                Err(SendError::Retryable(error)) => {
                    return Err(error.context(format!(
                        "llm request failed after {} attempt(s)",
                        attempt + 1
                    )))
                }
            }
        }
    }
}

fn chat_completion_body(model: &str, temperature: f64, prompt: &str) -> Value {
    json!({
        "model": model,
        "messages": [{ "role": "user", "content": prompt }],
        "temperature": temperature,
    })
}

fn anthropic_messages_body(model: &str, temperature: f64, prompt: &str) -> Value {
    json!({
        "model": model,
        "max_tokens": ANTHROPIC_MAX_TOKENS,
        "messages": [{ "role": "user", "content": prompt }],
        "temperature": temperature,
    })
}

fn chat_completion_content(body: &Value) -> Result<String> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .context("chat completion response has no message content")
}

fn anthropic_content(body: &Value) -> Result<String> {
    let blocks = body["content"].as_array().context("messages response has no content blocks")?;
    let text: String = blocks
        .iter()
        .filter(|block| block["type"] == "text")
        .filter_map(|block| block["text"].as_str())
        .collect();
    if text.is_empty() {
        return Err(anyhow!("messages response has no text content"));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn config(provider: LlmProvider, base_url: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider,
            api_key: Some("sk-test".to_string().into()),
            base_url: base_url.map(str::to_string),
            model: "test-model".to_string(),
            timeout_secs: 30,
            max_retries: 1,
            temperature: 0.4,
        }
    }

    #[test]
    fn endpoints_follow_provider_routes() {
        let openai = HttpLlmClient::from_config(&config(LlmProvider::OpenAi, None)).expect("client");
        let ollama = HttpLlmClient::from_config(&config(LlmProvider::Ollama, Some("http://localhost:11434/")))
            .expect("client");
        let anthropic =
            HttpLlmClient::from_config(&config(LlmProvider::Anthropic, None)).expect("client");

        assert_eq!(openai.endpoint(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(ollama.endpoint(), "http://localhost:11434/v1/chat/completions");
        assert_eq!(anthropic.endpoint(), "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn hosted_provider_without_key_is_refused() {
        let mut anthropic = config(LlmProvider::Anthropic, None);
        anthropic.api_key = None;

        let error = HttpLlmClient::from_config(&anthropic).err().expect("missing key");

        assert!(format!("{error:#}").contains("llm.api_key"));
    }

    #[test]
    fn request_bodies_carry_model_prompt_and_temperature() {
        let chat = chat_completion_body("gpt-4o-mini", 0.5, "hello");
        assert_eq!(chat["model"], "gpt-4o-mini");
        assert_eq!(chat["messages"][0]["content"], "hello");
        assert_eq!(chat["temperature"], 0.5);

        let messages = anthropic_messages_body("claude", 0.5, "hello");
        assert_eq!(messages["max_tokens"], ANTHROPIC_MAX_TOKENS);
        assert_eq!(messages["messages"][0]["role"], "user");
    }

    #[test]
    fn content_is_extracted_from_both_response_shapes() {
        let chat = json!({"choices": [{"message": {"role": "assistant", "content": "{}"}}]});
        let messages = json!({"content": [{"type": "text", "text": "{\"a\":"}, {"type": "text", "text": "1}"}]});

        assert_eq!(chat_completion_content(&chat).expect("chat"), "{}");
        assert_eq!(anthropic_content(&messages).expect("messages"), "{\"a\":1}");
        assert!(chat_completion_content(&json!({"choices": []})).is_err());
        assert!(anthropic_content(&json!({"content": []})).is_err());
    }
}
