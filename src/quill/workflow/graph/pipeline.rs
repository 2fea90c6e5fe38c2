// SPDX-License-Identifier: MIT

//! The blog pipeline: Title -> Content -> Review -> Evaluate, looping back to
//! Content until the evaluation passes.

use super::builder::GraphBuilder;
use super::executor::{CompiledGraph, RunLimits};
use super::types::NodeId;
use crate::adk::error::GraphError;
use crate::adk::service::ContentService;
use crate::quill::workflow::router::route_on_verdict;
use crate::quill::workflow::steps::{EvaluateContent, GenerateContent, GenerateTitle, ReviewContent};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_MAX_REVISIONS: u32 = 3;

/// Knobs for [`blog_pipeline`]
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub max_revisions: Option<u32>,
    pub incorporate_feedback: bool,
    pub step_timeout: Option<Duration>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_revisions: Some(DEFAULT_MAX_REVISIONS),
            incorporate_feedback: false,
            step_timeout: None,
        }
    }
}

impl PipelineOptions {
    /// No revision cap: keep regenerating until the evaluation passes
    pub fn unbounded() -> Self {
        Self {
            max_revisions: None,
            ..Self::default()
        }
    }
}

/// Build the blog pipeline over a content service
pub fn blog_pipeline(
    service: Arc<dyn ContentService>,
    options: &PipelineOptions,
) -> Result<CompiledGraph, GraphError> {
    let content = GenerateContent::new(service.clone()).with_feedback(options.incorporate_feedback);

    let graph = GraphBuilder::new()
        .add_step(NodeId::Title, Arc::new(GenerateTitle::new(service.clone())))
        .add_step(NodeId::Content, Arc::new(content))
        .add_step(NodeId::Review, Arc::new(ReviewContent::new(service.clone())))
        .add_step(NodeId::Evaluate, Arc::new(EvaluateContent::new(service)))
        .add_edge(NodeId::Start, NodeId::Title)
        .add_edge(NodeId::Title, NodeId::Content)
        .add_edge(NodeId::Content, NodeId::Review)
        .add_edge(NodeId::Review, NodeId::Evaluate)
        .add_conditional_edges(
            NodeId::Evaluate,
            route_on_verdict,
            NodeId::End,
            NodeId::Content,
        )
        .compile()?;

    Ok(graph.with_limits(RunLimits {
        max_revisions: options.max_revisions,
        step_timeout: options.step_timeout,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adk::error::QuillError;
    use crate::quill::workflow::state::{Role, Verdict};
    use crate::quill::workflow::steps::testing::ScriptedService;

    #[tokio::test]
    async fn test_fail_then_pass_scenario() {
        let service = Arc::new(ScriptedService::texts(&[
            "Title One",
            "Draft body",
            "needs work",
            "FAIL",
            "Revised body",
            "looks good",
            "PASS",
        ]));
        let graph = blog_pipeline(service.clone(), &PipelineOptions::unbounded()).unwrap();

        let state = graph.run("Testing").await.unwrap();

        assert_eq!(state.title, "Title One");
        assert_eq!(state.draft_history().len(), 2);
        assert_eq!(state.review_history().len(), 4);
        assert_eq!(state.verdict, Verdict::Pass);
        assert_eq!(state.last_draft().unwrap().text, "Revised body");
        assert_eq!(state.last_review().unwrap().text, "Verdict: PASS");
        assert_eq!(state.review_history()[0].role, Role::Reviewed);
        assert_eq!(state.review_history()[1].role, Role::Generated);
        assert_eq!(service.calls(), 7);
    }

    #[tokio::test]
    async fn test_content_fault_surfaces_partial_state() {
        let service = Arc::new(ScriptedService::new(vec![
            Ok("Title One".to_string()),
            Err(QuillError::unavailable("groq", "connection reset")),
        ]));
        let graph = blog_pipeline(service, &PipelineOptions::default()).unwrap();

        let failure = graph.run("Testing").await.unwrap_err();

        assert_eq!(failure.step, NodeId::Content);
        assert!(failure.source.is_service_fault());
        assert_eq!(failure.state.title, "Title One");
        assert!(failure.state.draft_history().is_empty());
    }

    #[tokio::test]
    async fn test_feedback_option_reaches_regeneration_prompt() {
        let service = Arc::new(ScriptedService::texts(&[
            "Title One",
            "Draft body",
            "add statistics",
            "Fail",
            "Revised body",
            "fine",
            "pass",
        ]));
        let options = PipelineOptions {
            incorporate_feedback: true,
            ..PipelineOptions::default()
        };
        let graph = blog_pipeline(service.clone(), &options).unwrap();

        graph.run("Testing").await.unwrap();

        let prompts = service.prompts.lock().unwrap();
        assert!(!prompts[1].contains("add statistics"));
        assert!(prompts[4].contains("add statistics"));
    }
}
