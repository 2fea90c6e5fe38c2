// SPDX-License-Identifier: MIT

use super::Step;
use crate::adk::error::QuillError;
use crate::adk::service::ContentService;
use crate::quill::workflow::prompts;
use crate::quill::workflow::state::{ContentItem, Verdict, WorkflowState};
use async_trait::async_trait;
use std::sync::Arc;

/// Case-insensitive search for the pass token. Anything without it,
/// including an empty or garbled reply, fails closed.
pub fn parse_verdict(response: &str) -> Verdict {
    let upper = response.to_uppercase();
    if upper.contains("PASS") {
        Verdict::Pass
    } else {
        if !upper.contains("FAIL") {
            log::warn!("Ambiguous verdict {:?}, treating as Fail", response);
        }
        Verdict::Fail
    }
}

/// Judges the latest draft against the latest critique
pub struct EvaluateContent {
    service: Arc<dyn ContentService>,
}

impl EvaluateContent {
    pub fn new(service: Arc<dyn ContentService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Step for EvaluateContent {
    fn name(&self) -> &str {
        "evaluate"
    }

    async fn run(&self, state: &mut WorkflowState) -> Result<(), QuillError> {
        let (draft, feedback) = match (state.last_draft(), state.last_review()) {
            (Some(d), Some(r)) => (d, r),
            _ => return Err(QuillError::other("evaluation needs a draft and a review")),
        };
        let prompt = prompts::evaluate(&draft.text, &feedback.text);

        let response = self.service.generate(&prompt).await?;

        state.verdict = parse_verdict(&response);
        log::info!("Verdict: {}", state.verdict);
        state.push_review(ContentItem::generated(format!("Verdict: {}", response)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quill::workflow::state::Role;
    use crate::quill::workflow::steps::testing::ScriptedService;

    #[test]
    fn test_parse_verdict_pass_any_case() {
        for reply in ["PASS", "pass", "Pass.", "Verdict: pAsS", "I'd say it should pass"] {
            assert_eq!(parse_verdict(reply), Verdict::Pass, "reply: {reply}");
        }
    }

    #[test]
    fn test_parse_verdict_fail_closed() {
        for reply in ["Fail", "FAIL", "", "   ", "maybe?", "reject"] {
            assert_eq!(parse_verdict(reply), Verdict::Fail, "reply: {reply:?}");
        }
    }

    fn reviewed_state() -> WorkflowState {
        let mut state = WorkflowState::new("Testing");
        state.push_draft(ContentItem::generated("Draft body"));
        state.push_review(ContentItem::reviewed("looks good"));
        state
    }

    #[tokio::test]
    async fn test_run_sets_verdict_and_appends_summary() {
        let service = Arc::new(ScriptedService::texts(&["PASS"]));
        let step = EvaluateContent::new(service.clone());
        let mut state = reviewed_state();

        step.run(&mut state).await.unwrap();

        assert_eq!(state.verdict, Verdict::Pass);
        assert_eq!(state.review_history().len(), 2);
        let summary = state.last_review().unwrap();
        assert_eq!(summary.role, Role::Generated);
        assert_eq!(summary.text, "Verdict: PASS");

        let prompt = service.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("Content: Draft body"));
        assert!(prompt.contains("Feedback: looks good"));
    }

    #[tokio::test]
    async fn test_run_empty_reply_is_fail() {
        let service = Arc::new(ScriptedService::texts(&[""]));
        let step = EvaluateContent::new(service);
        let mut state = reviewed_state();

        step.run(&mut state).await.unwrap();
        assert_eq!(state.verdict, Verdict::Fail);
    }

    #[tokio::test]
    async fn test_run_fault_leaves_verdict_untouched() {
        let service = Arc::new(ScriptedService::new(vec![Err(QuillError::unavailable(
            "groq", "reset",
        ))]));
        let step = EvaluateContent::new(service);
        let mut state = reviewed_state();

        assert!(step.run(&mut state).await.is_err());
        assert_eq!(state.verdict, Verdict::Unset);
        assert_eq!(state.review_history().len(), 1);
    }
}
