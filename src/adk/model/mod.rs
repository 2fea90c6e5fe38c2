// SPDX-License-Identifier: MIT

//! Model module - defines LLM model trait and implementations
//!
//! This module provides the core Model trait and shared types.
//! Model implementations are in their own submodules:
//! - [anthropic] - Anthropic's Claude API
//! - [openai] - OpenAI's chat-completions API (and compatible endpoints such as Groq)

pub mod anthropic;
pub mod openai;

use crate::adk::error::{ModelError, QuillError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Configuration for model generation
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationConfig {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub top_p: Option<f32>,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }

    /// Concatenated text parts, thinking excluded
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::Thinking(_) => None,
            })
            .collect()
    }
}

/// Parts of a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Part {
    /// Regular text output from the model
    Text(String),
    /// Thinking/reasoning content from thinking models
    Thinking(String),
}

/// Core trait for LLM model implementations
#[async_trait]
pub trait Model: Send + Sync {
    /// Short provider label used in logs and errors
    fn provider(&self) -> &str;

    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
    ) -> Result<Content, QuillError>;
}

/// Supported model providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    Groq,
    Anthropic,
}

impl Provider {
    /// Infer a provider from a model name prefix
    pub fn infer(model_name: &str) -> Self {
        if model_name.starts_with("gpt") || model_name.starts_with("o1") {
            Provider::OpenAI
        } else if model_name.starts_with("claude") {
            Provider::Anthropic
        } else {
            Provider::Groq
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenAI => write!(f, "openai"),
            Provider::Groq => write!(f, "groq"),
            Provider::Anthropic => write!(f, "anthropic"),
        }
    }
}

impl FromStr for Provider {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAI),
            "groq" => Ok(Provider::Groq),
            "anthropic" => Ok(Provider::Anthropic),
            other => Err(ModelError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Build a model for `provider`, reading its credentials from the environment
pub fn from_env(provider: Provider, model_name: String) -> Result<Arc<dyn Model>, QuillError> {
    let model: Arc<dyn Model> = match provider {
        Provider::OpenAI => Arc::new(openai::OpenAIModel::new(model_name)?),
        Provider::Groq => Arc::new(openai::OpenAIModel::groq(model_name)?),
        Provider::Anthropic => Arc::new(anthropic::AnthropicModel::new(model_name)?),
    };
    Ok(model)
}
