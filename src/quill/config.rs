// SPDX-License-Identifier: MIT

//! Configuration loading
//!
//! Defaults, then an optional YAML file, then environment overrides. The
//! library never reads `.env`; the binary does that before calling in here.

use crate::adk::error::QuillError;
use crate::adk::model::{self, GenerationConfig, Model, Provider};
use crate::adk::service::ModelService;
use crate::quill::workflow::graph::{PipelineOptions, DEFAULT_MAX_REVISIONS};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "qwen-2.5-32b";
pub const DEFAULT_PORT: u16 = 3000;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct QuillConfig {
    /// Provider; inferred from `model` when absent
    pub provider: Option<Provider>,
    pub model: String,
    /// Revision cap. `null` lets the loop run until a pass.
    pub max_revisions: Option<u32>,
    /// Feed the latest critique into regeneration prompts
    pub incorporate_feedback: bool,
    pub step_timeout_secs: Option<u64>,
    /// System instruction sent ahead of every step prompt
    pub instruction: Option<String>,
    pub generation: GenerationConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

impl Default for QuillConfig {
    fn default() -> Self {
        Self {
            provider: None,
            model: DEFAULT_MODEL.to_string(),
            max_revisions: Some(DEFAULT_MAX_REVISIONS),
            incorporate_feedback: false,
            step_timeout_secs: None,
            instruction: None,
            generation: GenerationConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl QuillConfig {
    /// Load from a YAML file (when given) and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, QuillError> {
        let mut config = match path {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, QuillError> {
        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    pub fn parse_yaml(content: &str) -> Result<Self, QuillError> {
        let config: QuillConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// `MODEL_PROVIDER`, `MODEL_NAME` and `QUILL_MAX_REVISIONS` override
    /// whatever the file said
    pub fn apply_env(&mut self) -> Result<(), QuillError> {
        self.apply_overrides(
            env::var("MODEL_PROVIDER").ok(),
            env::var("MODEL_NAME").ok(),
            env::var("QUILL_MAX_REVISIONS").ok(),
        )
    }

    fn apply_overrides(
        &mut self,
        provider: Option<String>,
        model: Option<String>,
        max_revisions: Option<String>,
    ) -> Result<(), QuillError> {
        if let Some(provider) = provider {
            self.provider = Some(provider.parse()?);
        }
        if let Some(model) = model {
            self.model = model;
        }
        if let Some(raw) = max_revisions {
            self.max_revisions = match raw.trim() {
                "" | "none" | "unbounded" => None,
                n => Some(n.parse().map_err(|_| {
                    QuillError::config(format!("QUILL_MAX_REVISIONS is not a number: {}", n))
                })?),
            };
        }
        Ok(())
    }

    /// Explicit provider, or the one implied by the model name
    pub fn resolved_provider(&self) -> Provider {
        self.provider
            .unwrap_or_else(|| Provider::infer(&self.model))
    }

    /// Model client for the configured provider, credentials from env
    pub fn build_model(&self) -> Result<Arc<dyn Model>, QuillError> {
        let provider = self.resolved_provider();
        log::info!("Using provider: {} with model: {}", provider, self.model);
        model::from_env(provider, self.model.clone())
    }

    /// Content service over `model` with the configured instruction and
    /// generation settings
    pub fn content_service(&self, model: Arc<dyn Model>) -> ModelService {
        let service = ModelService::new(model).with_config(self.generation.clone());
        match &self.instruction {
            Some(instruction) => service.with_instruction(instruction.clone()),
            None => service,
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            max_revisions: self.max_revisions,
            incorporate_feedback: self.incorporate_feedback,
            step_timeout: self.step_timeout_secs.map(Duration::from_secs),
        }
    }
}
