// SPDX-License-Identifier: MIT

use super::Step;
use crate::adk::error::QuillError;
use crate::adk::service::ContentService;
use crate::quill::workflow::prompts;
use crate::quill::workflow::state::{ContentItem, WorkflowState};
use async_trait::async_trait;
use std::sync::Arc;

/// Drafts the post for the current title and appends it to the draft history
pub struct GenerateContent {
    service: Arc<dyn ContentService>,
    incorporate_feedback: bool,
}

impl GenerateContent {
    pub fn new(service: Arc<dyn ContentService>) -> Self {
        Self {
            service,
            incorporate_feedback: false,
        }
    }

    /// Feed the latest critique into regeneration prompts
    pub fn with_feedback(mut self, enabled: bool) -> Self {
        self.incorporate_feedback = enabled;
        self
    }
}

#[async_trait]
impl Step for GenerateContent {
    fn name(&self) -> &str {
        "content"
    }

    async fn run(&self, state: &mut WorkflowState) -> Result<(), QuillError> {
        let feedback = if self.incorporate_feedback {
            state.last_critique().map(|c| c.text.as_str())
        } else {
            None
        };
        let prompt = prompts::content(&state.title, feedback);

        let draft = self.service.generate(&prompt).await?;
        if draft.trim().is_empty() {
            return Err(QuillError::malformed(self.name(), "empty draft"));
        }

        log::info!(
            "Draft {} generated ({} chars)",
            state.cycles() + 1,
            draft.chars().count()
        );
        state.push_draft(ContentItem::generated(draft));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quill::workflow::state::Role;
    use crate::quill::workflow::steps::testing::ScriptedService;

    fn titled_state() -> WorkflowState {
        let mut state = WorkflowState::new("Testing");
        state.title = "Title One".to_string();
        state
    }

    #[tokio::test]
    async fn test_run_appends_generated_draft() {
        let service = Arc::new(ScriptedService::texts(&["Draft body", "Revised body"]));
        let step = GenerateContent::new(service);
        let mut state = titled_state();

        step.run(&mut state).await.unwrap();
        step.run(&mut state).await.unwrap();

        assert_eq!(state.draft_history().len(), 2);
        assert_eq!(state.draft_history()[0].text, "Draft body");
        assert_eq!(state.last_draft().unwrap().role, Role::Generated);
        assert_eq!(state.last_draft().unwrap().text, "Revised body");
    }

    #[tokio::test]
    async fn test_regeneration_ignores_feedback_by_default() {
        let service = Arc::new(ScriptedService::texts(&["Revised body"]));
        let step = GenerateContent::new(service.clone());
        let mut state = titled_state();
        state.push_review(ContentItem::reviewed("needs more examples"));

        step.run(&mut state).await.unwrap();

        let prompt = service.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("titled \"Title One\""));
        assert!(!prompt.contains("needs more examples"));
    }

    #[tokio::test]
    async fn test_regeneration_with_feedback_uses_last_critique() {
        let service = Arc::new(ScriptedService::texts(&["Revised body"]));
        let step = GenerateContent::new(service.clone()).with_feedback(true);
        let mut state = titled_state();
        state.push_review(ContentItem::reviewed("needs more examples"));
        state.push_review(ContentItem::generated("Verdict: FAIL"));

        step.run(&mut state).await.unwrap();

        let prompt = service.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("needs more examples"));
        assert!(!prompt.contains("Verdict: FAIL"));
    }

    #[tokio::test]
    async fn test_empty_draft_is_malformed() {
        let service = Arc::new(ScriptedService::texts(&["\n"]));
        let step = GenerateContent::new(service);
        let mut state = titled_state();

        let err = step.run(&mut state).await.unwrap_err();
        assert!(matches!(err, QuillError::MalformedResponse { .. }));
        assert!(state.draft_history().is_empty());
    }
}
