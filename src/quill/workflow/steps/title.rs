// SPDX-License-Identifier: MIT

use super::Step;
use crate::adk::error::QuillError;
use crate::adk::service::ContentService;
use crate::quill::workflow::prompts;
use crate::quill::workflow::state::WorkflowState;
use async_trait::async_trait;
use std::sync::Arc;

const QUOTES: &[char] = &['"', '\u{201C}', '\u{201D}'];

/// Generates the post title from the topic
pub struct GenerateTitle {
    service: Arc<dyn ContentService>,
}

impl GenerateTitle {
    pub fn new(service: Arc<dyn ContentService>) -> Self {
        Self { service }
    }

    /// First line of the response, without surrounding quotes
    fn extract_title(response: &str) -> Option<String> {
        let first = response.lines().next()?;
        let title = first.trim().trim_matches(QUOTES).trim();
        if title.is_empty() {
            None
        } else {
            Some(title.to_string())
        }
    }
}

#[async_trait]
impl Step for GenerateTitle {
    fn name(&self) -> &str {
        "title"
    }

    async fn run(&self, state: &mut WorkflowState) -> Result<(), QuillError> {
        let response = self.service.generate(&prompts::title(state.topic())).await?;

        let title = Self::extract_title(&response)
            .ok_or_else(|| QuillError::malformed(self.name(), "empty title line"))?;

        log::info!("Selected title: {}", title);
        state.title = title;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quill::workflow::steps::testing::ScriptedService;

    #[test]
    fn test_extract_title_first_line_unquoted() {
        let title = GenerateTitle::extract_title("\"Title One\"\n\"Title Two\"");
        assert_eq!(title.as_deref(), Some("Title One"));
    }

    #[test]
    fn test_extract_title_curly_quotes() {
        let title = GenerateTitle::extract_title("\u{201C}Rust at Scale\u{201D}");
        assert_eq!(title.as_deref(), Some("Rust at Scale"));
    }

    #[test]
    fn test_extract_title_empty() {
        assert_eq!(GenerateTitle::extract_title(""), None);
        assert_eq!(GenerateTitle::extract_title("\"\"\nsecond line"), None);
    }

    #[test]
    fn test_extract_title_blank_first_line() {
        assert_eq!(GenerateTitle::extract_title("\nReal Title"), None);
        assert_eq!(GenerateTitle::extract_title("   \nReal Title"), None);
        assert_eq!(
            GenerateTitle::extract_title("  Padded Title  \nnext").as_deref(),
            Some("Padded Title")
        );
    }

    #[tokio::test]
    async fn test_run_blank_first_line_is_malformed() {
        let service = Arc::new(ScriptedService::texts(&["\nSecond Line Title"]));
        let step = GenerateTitle::new(service);
        let mut state = WorkflowState::new("Testing");

        let err = step.run(&mut state).await.unwrap_err();
        assert!(matches!(err, QuillError::MalformedResponse { .. }));
        assert!(state.title.is_empty());
    }

    #[tokio::test]
    async fn test_run_sets_title_from_topic_prompt() {
        let service = Arc::new(ScriptedService::texts(&["Title One\nignored"]));
        let step = GenerateTitle::new(service.clone());
        let mut state = WorkflowState::new("Testing");

        step.run(&mut state).await.unwrap();

        assert_eq!(state.title, "Title One");
        assert!(service.prompts.lock().unwrap()[0].contains("about Testing"));
    }

    #[tokio::test]
    async fn test_run_empty_response_is_malformed() {
        let service = Arc::new(ScriptedService::texts(&["   "]));
        let step = GenerateTitle::new(service);
        let mut state = WorkflowState::new("Testing");

        let err = step.run(&mut state).await.unwrap_err();
        assert!(matches!(err, QuillError::MalformedResponse { .. }));
        assert!(state.title.is_empty());
    }

    #[tokio::test]
    async fn test_run_propagates_service_fault() {
        let service = Arc::new(ScriptedService::new(vec![Err(QuillError::unavailable(
            "groq", "503",
        ))]));
        let step = GenerateTitle::new(service.clone());
        let mut state = WorkflowState::new("Testing");

        let err = step.run(&mut state).await.unwrap_err();
        assert!(err.is_service_fault());
        assert_eq!(service.calls(), 1);
    }
}
