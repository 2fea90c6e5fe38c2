// SPDX-License-Identifier: MIT

//! Content service boundary
//!
//! Workflow steps only ever see [`ContentService`]: a prompt goes in, text
//! comes out. [`ModelService`] adapts any [`Model`] to that shape.

use crate::adk::error::QuillError;
use crate::adk::model::{Content, GenerationConfig, Model};
use async_trait::async_trait;
use std::sync::Arc;

/// The external text-generation capability invoked by workflow steps
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Generate text for a prompt. Faults propagate; no retry is attempted.
    async fn generate(&self, prompt: &str) -> Result<String, QuillError>;
}

/// [`ContentService`] backed by an LLM model
pub struct ModelService {
    model: Arc<dyn Model>,
    instruction: Option<String>,
    config: Option<GenerationConfig>,
}

impl ModelService {
    pub fn new(model: Arc<dyn Model>) -> Self {
        Self {
            model,
            instruction: None,
            config: None,
        }
    }

    /// Prepend a system instruction to every request
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = Some(config);
        self
    }

    fn history(&self, prompt: &str) -> Vec<Content> {
        let mut history = Vec::with_capacity(2);
        if let Some(instruction) = &self.instruction {
            history.push(Content::system(instruction.clone()));
        }
        history.push(Content::user(prompt));
        history
    }
}

#[async_trait]
impl ContentService for ModelService {
    async fn generate(&self, prompt: &str) -> Result<String, QuillError> {
        let history = self.history(prompt);
        let response = self
            .model
            .generate_content(&history, self.config.as_ref())
            .await?;

        let text = response.text();
        log::info!(
            "{} returned {} chars",
            self.model.provider(),
            text.chars().count()
        );
        Ok(text)
    }
}
