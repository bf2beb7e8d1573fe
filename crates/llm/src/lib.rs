//! Language-model verdicts for claimlens.
//!
//! This crate talks to an OpenAI-compatible chat-completions API and returns
//! the model's raw verdict text. Parsing of that text into a decision lives
//! in the engine crate; here the model is a text-in/text-out service behind
//! the [`VerdictProvider`] trait so evaluation logic can be tested without a
//! network.

pub mod prompts;

pub use prompts::build_evaluation_prompt;

use async_trait::async_trait;
use claimlens_core::config::ModelConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

/// Errors from the verdict call
#[derive(Debug, Error)]
pub enum LlmError {
  #[error("API key not set: export {0}")]
  MissingApiKey(String),

  #[error("Request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Request timed out after {0} seconds")]
  Timeout(u64),

  #[error("API returned status {status}: {body}")]
  Api { status: u16, body: String },

  #[error("No completion in response")]
  NoResponse,
}

pub type Result<T> = std::result::Result<T, LlmError>;

/// Source of verdict text for a claim evaluation prompt.
///
/// The engine depends on this trait rather than on a concrete client, so
/// tests substitute canned responses and failures.
#[async_trait]
pub trait VerdictProvider: Send + Sync {
  async fn verdict(&self, prompt: &str) -> Result<String>;
}

// Wire types for the chat-completions API

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  messages: Vec<ChatMessage<'a>>,
  max_tokens: u32,
  temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
  role: &'a str,
  content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
  message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
  content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions endpoint
#[derive(Debug, Clone)]
pub struct ChatClient {
  client: reqwest::Client,
  base_url: String,
  model: String,
  api_key: String,
  timeout_secs: u64,
  temperature: f32,
}

impl ChatClient {
  /// Build a client from config. The API key is read from the environment
  /// variable named in the config; a missing key fails here rather than on
  /// the first request.
  pub fn from_config(config: &ModelConfig) -> Result<Self> {
    let api_key = std::env::var(&config.api_key_env).map_err(|_| LlmError::MissingApiKey(config.api_key_env.clone()))?;

    Ok(Self {
      client: reqwest::Client::new(),
      base_url: config.base_url.trim_end_matches('/').to_string(),
      model: config.model.clone(),
      api_key,
      timeout_secs: config.timeout_secs,
      temperature: config.temperature,
    })
  }

  async fn complete(&self, prompt: &str) -> Result<String> {
    let request = ChatRequest {
      model: &self.model,
      messages: vec![ChatMessage {
        role: "user",
        content: prompt,
      }],
      max_tokens: 1500,
      temperature: self.temperature,
    };

    tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Requesting verdict");

    let send = self
      .client
      .post(format!("{}/chat/completions", self.base_url))
      .bearer_auth(&self.api_key)
      .json(&request)
      .send();

    let response = timeout(Duration::from_secs(self.timeout_secs), send)
      .await
      .map_err(|_| LlmError::Timeout(self.timeout_secs))??;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(LlmError::Api {
        status: status.as_u16(),
        body,
      });
    }

    let parsed: ChatResponse = response.json().await?;
    let text = parsed
      .choices
      .into_iter()
      .next()
      .and_then(|c| c.message.content)
      .filter(|t| !t.is_empty())
      .ok_or(LlmError::NoResponse)?;

    tracing::debug!(response_len = text.len(), "Verdict received");
    Ok(text)
  }
}

#[async_trait]
impl VerdictProvider for ChatClient {
  async fn verdict(&self, prompt: &str) -> Result<String> {
    self.complete(prompt).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_missing_api_key_fails_at_construction() {
    let config = ModelConfig {
      api_key_env: "CLAIMLENS_TEST_KEY_THAT_IS_NOT_SET".to_string(),
      ..ModelConfig::default()
    };
    assert!(matches!(ChatClient::from_config(&config), Err(LlmError::MissingApiKey(_))));
  }

  #[test]
  fn test_base_url_trailing_slash_trimmed() {
    unsafe { std::env::set_var("CLAIMLENS_TEST_KEY_TRIM", "sk-test") };
    let config = ModelConfig {
      base_url: "https://example.test/v1/".to_string(),
      api_key_env: "CLAIMLENS_TEST_KEY_TRIM".to_string(),
      ..ModelConfig::default()
    };
    let client = ChatClient::from_config(&config).unwrap();
    assert_eq!(client.base_url, "https://example.test/v1");
  }

  #[test]
  fn test_chat_response_parsing() {
    let json = r#"{"choices":[{"message":{"role":"assistant","content":"DECISION: APPROVED"}}]}"#;
    let parsed: ChatResponse = serde_json::from_str(json).unwrap();
    assert_eq!(parsed.choices[0].message.content.as_deref(), Some("DECISION: APPROVED"));
  }
}
