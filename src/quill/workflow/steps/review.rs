// SPDX-License-Identifier: MIT

use super::Step;
use crate::adk::error::QuillError;
use crate::adk::service::ContentService;
use crate::quill::workflow::prompts;
use crate::quill::workflow::state::{ContentItem, WorkflowState};
use async_trait::async_trait;
use std::sync::Arc;

/// Critiques the latest draft and appends the critique to the review history
pub struct ReviewContent {
    service: Arc<dyn ContentService>,
}

impl ReviewContent {
    pub fn new(service: Arc<dyn ContentService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Step for ReviewContent {
    fn name(&self) -> &str {
        "review"
    }

    async fn run(&self, state: &mut WorkflowState) -> Result<(), QuillError> {
        let draft = state
            .last_draft()
            .ok_or_else(|| QuillError::other("review reached with no draft"))?;
        let prompt = prompts::review(&draft.text);

        let feedback = self.service.generate(&prompt).await?;

        log::info!("Review {} recorded", state.cycles());
        state.push_review(ContentItem::reviewed(feedback));
        Ok(())
    }
}
