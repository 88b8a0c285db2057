//! Chat-completions client.
//!
//! Every use case asks for a strict JSON object reply, so the seam is a
//! single JSON-mode call behind the `ChatApi` trait (tests script it with a
//! fake). Calls are instrumented and log model names and token usage, never
//! payload contents.
//!
//! NOTE: We never log the API key.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::AppError;

/// Which of the two configured models a call should use.
/// Fast is the cheap model for matching and hints; strong is the default
/// generator for challenges and curricula.
#[derive(Clone, Copy, Debug)]
pub enum ModelTier {
  Fast,
  Strong,
}

/// Reply of a completion call: the raw JSON text plus usage metadata needed
/// for cost logging.
#[derive(Clone, Debug)]
pub struct ChatOutcome {
  pub content: String,
  pub model: String,
  pub total_tokens: u32,
}

#[async_trait]
pub trait ChatApi: Send + Sync {
  /// JSON-mode chat completion: system + user message, sampling temperature,
  /// `response_format: json_object`.
  async fn chat_json(
    &self,
    tier: ModelTier,
    system: &str,
    user: &str,
    temperature: f32,
  ) -> Result<ChatOutcome, AppError>;
}

/// Parse completion content into a typed payload, or surface the explicit
/// invalid-payload variant.
pub fn decode_json<T: DeserializeOwned>(content: &str) -> Result<T, AppError> {
  serde_json::from_str::<T>(content).map_err(|e| AppError::ModelPayload(e.to_string()))
}

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub fast_model: String,
  pub strong_model: String,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok()?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let fast_model =
      std::env::var("OPENAI_FAST_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".into());
    let strong_model =
      std::env::var("OPENAI_STRONG_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, fast_model, strong_model })
  }

  fn resolve(&self, tier: ModelTier) -> &str {
    match tier {
      ModelTier::Fast => &self.fast_model,
      ModelTier::Strong => &self.strong_model,
    }
  }
}

#[async_trait]
impl ChatApi for OpenAI {
  #[instrument(level = "info", skip(self, system, user), fields(tier = ?tier, model = %self.resolve(tier)))]
  async fn chat_json(
    &self,
    tier: ModelTier,
    system: &str,
    user: &str,
    temperature: f32,
  ) -> Result<ChatOutcome, AppError> {
    let model = self.resolve(tier).to_string();
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      response_format: Some(ResponseFormat { r#type: "json_object".into() }),
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "mathquest-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await.map_err(|e| AppError::Api(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_openai_error(&body).unwrap_or(body);
      return Err(AppError::Api(format!("OpenAI HTTP {}: {}", status, msg)));
    }

    let body: ChatCompletionResponse =
      res.json().await.map_err(|e| AppError::Api(e.to_string()))?;
    let total_tokens = body.usage.as_ref().and_then(|u| u.total_tokens).unwrap_or(0);
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let content = body.choices.first()
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default().trim().to_string();

    Ok(ChatOutcome { content, model, total_tokens })
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }
#[derive(Serialize)]
struct ResponseFormat { #[serde(rename = "type")] r#type: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::HintData;

  #[test]
  fn decode_json_surfaces_payload_errors() {
    let ok: Result<HintData, _> = decode_json(r#"{"hint": "try dividing"}"#);
    assert_eq!(ok.unwrap().hint, "try dividing");

    let bad: Result<HintData, _> = decode_json("here is your hint!");
    assert!(matches!(bad.unwrap_err(), AppError::ModelPayload(_)));
  }

  #[test]
  fn extract_openai_error_reads_message() {
    let body = r#"{"error": {"message": "Rate limit reached", "type": "requests"}}"#;
    assert_eq!(extract_openai_error(body).as_deref(), Some("Rate limit reached"));
    assert!(extract_openai_error("plain text").is_none());
  }
}
