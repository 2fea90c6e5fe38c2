// SPDX-License-Identifier: MIT

//! Runtime state threaded through a workflow run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who produced a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Generated,
    Reviewed,
}

/// One immutable entry in a history log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub role: Role,
    pub text: String,
}

impl ContentItem {
    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            role: Role::Generated,
            text: text.into(),
        }
    }

    pub fn reviewed(text: impl Into<String>) -> Self {
        Self {
            role: Role::Reviewed,
            text: text.into(),
        }
    }
}

/// Outcome of the evaluation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    #[default]
    Unset,
    Pass,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Unset => write!(f, "Unset"),
            Verdict::Pass => write!(f, "Pass"),
            Verdict::Fail => write!(f, "Fail"),
        }
    }
}

/// The record every step reads and extends.
///
/// One instance per run. Histories are append-only: entries are pushed,
/// never removed or reordered, so retries leave a full audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    topic: String,
    pub title: String,
    draft_history: Vec<ContentItem>,
    review_history: Vec<ContentItem>,
    pub verdict: Verdict,
}

impl WorkflowState {
    /// Fresh state for a run: topic set, everything else empty
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            title: String::new(),
            draft_history: Vec::new(),
            review_history: Vec::new(),
            verdict: Verdict::Unset,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn draft_history(&self) -> &[ContentItem] {
        &self.draft_history
    }

    pub fn review_history(&self) -> &[ContentItem] {
        &self.review_history
    }

    pub fn push_draft(&mut self, item: ContentItem) {
        self.draft_history.push(item);
    }

    pub fn push_review(&mut self, item: ContentItem) {
        self.review_history.push(item);
    }

    /// The accepted or most recently attempted draft
    pub fn last_draft(&self) -> Option<&ContentItem> {
        self.draft_history.last()
    }

    pub fn last_review(&self) -> Option<&ContentItem> {
        self.review_history.last()
    }

    /// Latest critique, skipping verdict summaries
    pub fn last_critique(&self) -> Option<&ContentItem> {
        self.review_history
            .iter()
            .rev()
            .find(|item| item.role == Role::Reviewed)
    }

    /// Number of drafts produced so far
    pub fn cycles(&self) -> usize {
        self.draft_history.len()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            topic: self.topic.clone(),
            title: self.title.clone(),
            final_draft: self.last_draft().map(|d| d.text.clone()),
            final_review: self.last_review().map(|r| r.text.clone()),
            verdict: self.verdict,
            status: RunStatus::from(self.verdict),
            cycles: self.cycles(),
            finished_at: Utc::now(),
        }
    }
}

/// Presentation status of a finished or aborted run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Approved,
    NeedsRevision,
}

impl From<Verdict> for RunStatus {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Pass => RunStatus::Approved,
            Verdict::Unset | Verdict::Fail => RunStatus::NeedsRevision,
        }
    }
}

/// What the surrounding application shows for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub topic: String,
    pub title: String,
    pub final_draft: Option<String>,
    pub final_review: Option<String>,
    pub verdict: Verdict,
    pub status: RunStatus,
    pub cycles: usize,
    pub finished_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let state = WorkflowState::new("Testing");
        assert_eq!(state.topic(), "Testing");
        assert!(state.title.is_empty());
        assert!(state.draft_history().is_empty());
        assert!(state.review_history().is_empty());
        assert_eq!(state.verdict, Verdict::Unset);
    }

    #[test]
    fn test_histories_append_in_order() {
        let mut state = WorkflowState::new("Testing");
        state.push_draft(ContentItem::generated("first"));
        state.push_draft(ContentItem::generated("second"));

        let texts: Vec<_> = state.draft_history().iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(state.last_draft().unwrap().text, "second");
        assert_eq!(state.cycles(), 2);
    }

    #[test]
    fn test_last_critique_skips_verdict_summary() {
        let mut state = WorkflowState::new("Testing");
        state.push_review(ContentItem::reviewed("tighten the intro"));
        state.push_review(ContentItem::generated("Verdict: FAIL"));

        assert_eq!(state.last_review().unwrap().text, "Verdict: FAIL");
        assert_eq!(state.last_critique().unwrap().text, "tighten the intro");
    }

    #[test]
    fn test_summary_status_follows_verdict() {
        let mut state = WorkflowState::new("Testing");
        assert_eq!(state.summary().status, RunStatus::NeedsRevision);

        state.verdict = Verdict::Pass;
        let summary = state.summary();
        assert_eq!(summary.status, RunStatus::Approved);
        assert_eq!(summary.final_draft, None);
    }

    #[test]
    fn test_state_serializes_histories() {
        let mut state = WorkflowState::new("Testing");
        state.push_draft(ContentItem::generated("body"));

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["topic"], "Testing");
        assert_eq!(json["draft_history"][0]["role"], "generated");
        assert_eq!(json["verdict"], "unset");
    }
}
