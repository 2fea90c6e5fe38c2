// SPDX-License-Identifier: MIT

//! OpenAI Model - chat-completions API implementation
//!
//! Groq exposes the same wire format, so [`OpenAIModel::groq`] reuses this
//! client with a different endpoint and key.

use super::{Content, GenerationConfig, Model, Part};
use crate::adk::error::{ModelError, QuillError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::env;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// OpenAI-compatible chat model
pub struct OpenAIModel {
    client: Client,
    api_key: String,
    model_name: String,
    base_url: String,
    provider: String,
}

impl OpenAIModel {
    /// Create a new OpenAIModel
    ///
    /// Requires `OPENAI_API_KEY` environment variable to be set.
    /// Optionally uses `OPENAI_BASE_URL` for custom endpoints.
    pub fn new(model_name: String) -> Result<Self, QuillError> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| ModelError::ApiKeyMissing("OPENAI_API_KEY".to_string()))?;
        let base_url = env::var("OPENAI_BASE_URL").unwrap_or_else(|_| OPENAI_BASE_URL.to_string());

        Ok(Self::with_credentials("openai", model_name, api_key, base_url))
    }

    /// Create a model against Groq's OpenAI-compatible endpoint
    ///
    /// Requires `GROQ_API_KEY`; `GROQ_BASE_URL` overrides the endpoint.
    pub fn groq(model_name: String) -> Result<Self, QuillError> {
        let api_key = env::var("GROQ_API_KEY")
            .map_err(|_| ModelError::ApiKeyMissing("GROQ_API_KEY".to_string()))?;
        let base_url = env::var("GROQ_BASE_URL").unwrap_or_else(|_| GROQ_BASE_URL.to_string());

        Ok(Self::with_credentials("groq", model_name, api_key, base_url))
    }

    /// Create a model from injected credentials
    pub fn with_credentials(
        provider: impl Into<String>,
        model_name: String,
        api_key: String,
        base_url: String,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model_name,
            base_url,
            provider: provider.into(),
        }
    }

    /// Convert internal Content to OpenAI message format
    fn content_to_openai_message(content: &Content) -> serde_json::Value {
        let role = match content.role.as_str() {
            "model" => "assistant",
            other => other,
        };

        let mut text_content = String::new();
        for part in &content.parts {
            match part {
                Part::Text(t) => text_content.push_str(t),
                Part::Thinking(t) => text_content.push_str(t),
            }
        }

        json!({
            "role": role,
            "content": text_content
        })
    }

    /// Parse OpenAI response into Content
    fn parse_openai_response(
        provider: &str,
        response: &serde_json::Value,
    ) -> Result<Content, QuillError> {
        let choice = response["choices"]
            .as_array()
            .and_then(|c| c.first())
            .ok_or_else(|| QuillError::unavailable(provider, "no choices in response"))?;

        let mut parts = Vec::new();
        if let Some(content) = choice["message"]["content"].as_str() {
            if !content.is_empty() {
                parts.push(Part::Text(content.to_string()));
            }
        }

        Ok(Content {
            role: "model".to_string(),
            parts,
        })
    }
}

#[async_trait]
impl Model for OpenAIModel {
    fn provider(&self) -> &str {
        &self.provider
    }

    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
    ) -> Result<Content, QuillError> {
        let url = format!("{}/chat/completions", self.base_url);

        let messages: Vec<serde_json::Value> = history
            .iter()
            .map(Self::content_to_openai_message)
            .collect();

        let mut body = json!({
            "model": self.model_name,
            "messages": messages
        });

        if let Some(cfg) = config {
            if let Some(temp) = cfg.temperature {
                body["temperature"] = json!(temp);
            }
            if let Some(max_tokens) = cfg.max_output_tokens {
                body["max_tokens"] = json!(max_tokens);
            }
            if let Some(top_p) = cfg.top_p {
                body["top_p"] = json!(top_p);
            }
        }

        log::debug!(
            "{} request body: {}",
            self.provider,
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| QuillError::unavailable(&self.provider, e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(QuillError::unavailable(
                &self.provider,
                format!("HTTP {}: {}", status, text),
            ));
        }

        let resp_json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| QuillError::unavailable(&self.provider, e.to_string()))?;
        log::debug!("{} response: {}", self.provider, resp_json);

        Self::parse_openai_response(&self.provider, &resp_json)
    }
}
