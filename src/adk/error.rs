// SPDX-License-Identifier: MIT

//! Typed error handling for quill-rs
//!
//! Content-service faults, step-local parse failures and graph construction
//! problems all funnel into [`QuillError`]. An aborted run is reported as a
//! [`RunFailure`], which keeps the partially built state alongside the cause.

use crate::quill::workflow::graph::NodeId;
use crate::quill::workflow::state::WorkflowState;
use std::time::Duration;
use thiserror::Error;

/// Top-level error type for quill-rs
#[derive(Debug, Error)]
pub enum QuillError {
    /// The content service call could not complete (network, auth, provider)
    #[error("Content service unavailable ({provider}): {message}")]
    ServiceUnavailable { provider: String, message: String },

    /// The content service answered, but not with something the step can use
    #[error("Malformed response in {step}: {reason}")]
    MalformedResponse { step: String, reason: String },

    /// The revision cap was reached without a passing verdict
    #[error("Gave up after {limit} revision(s) without a passing verdict")]
    RetriesExhausted { limit: u32 },

    /// A step did not finish within the configured timeout
    #[error("Step '{step}' timed out after {elapsed:?}")]
    StepTimeout { step: String, elapsed: Duration },

    /// Caller supplied input the workflow cannot start from
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Graph construction errors
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Model/provider setup errors
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Configuration errors (missing env vars, invalid config)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error wrapper
    #[error("{0}")]
    Other(String),
}

/// Errors raised while assembling a workflow graph
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A node that can be reached has no outgoing edge
    #[error("Node '{0}' has no outgoing edge")]
    MissingEdge(NodeId),

    /// A node was given a second outgoing edge
    #[error("Node '{0}' already has an outgoing edge")]
    DuplicateEdge(NodeId),

    /// An edge targets a work node with no step registered
    #[error("No step registered for node '{0}'")]
    MissingStep(NodeId),

    /// Start and End cannot run steps
    #[error("Node '{0}' is a marker and cannot run a step")]
    MarkerStep(NodeId),

    /// End is terminal
    #[error("End cannot have outgoing edges")]
    EdgeFromEnd,

    /// Start is only an entry point
    #[error("Start cannot be the target of an edge")]
    EdgeIntoStart,

    /// Following edges from Start never arrives at End
    #[error("End is not reachable from Start")]
    EndUnreachable,
}

/// Model/LLM-specific errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// API key not configured
    #[error("API key not configured for provider: {0}")]
    ApiKeyMissing(String),

    /// Provider not supported
    #[error("Provider not supported: {0}")]
    UnsupportedProvider(String),
}

impl QuillError {
    /// Create a service-unavailable error
    pub fn unavailable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a malformed-response error for a step
    pub fn malformed(step: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            step: step.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create from a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// True for faults of the content service itself, as opposed to
    /// something the workflow decided
    pub fn is_service_fault(&self) -> bool {
        matches!(
            self,
            Self::ServiceUnavailable { .. } | Self::StepTimeout { .. }
        )
    }
}

/// An aborted run: the node that failed, why, and everything accumulated
/// before the failure. Prior history entries are never rolled back.
#[derive(Debug, Error)]
#[error("Run aborted at '{step}': {source}")]
pub struct RunFailure {
    pub step: NodeId,
    #[source]
    pub source: QuillError,
    pub state: Box<WorkflowState>,
}

impl RunFailure {
    pub fn new(step: NodeId, source: QuillError, state: WorkflowState) -> Self {
        Self {
            step,
            source,
            state: Box::new(state),
        }
    }

    /// True when the run stopped because the revision cap was hit
    pub fn gave_up(&self) -> bool {
        matches!(self.source, QuillError::RetriesExhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_unavailable_display() {
        let err = QuillError::unavailable("groq", "connection refused");
        assert_eq!(
            err.to_string(),
            "Content service unavailable (groq): connection refused"
        );
        assert!(err.is_service_fault());
    }

    #[test]
    fn test_malformed_is_not_service_fault() {
        let err = QuillError::malformed("title", "empty title line");
        assert!(!err.is_service_fault());
        assert!(err.to_string().contains("empty title line"));
    }

    #[test]
    fn test_service_faults_are_provider_side_only() {
        let timeout = QuillError::StepTimeout {
            step: "review".to_string(),
            elapsed: Duration::from_secs(30),
        };
        assert!(timeout.is_service_fault());
        assert!(!QuillError::RetriesExhausted { limit: 3 }.is_service_fault());
        assert!(!QuillError::config("bad").is_service_fault());
        assert!(!QuillError::other("no draft").is_service_fault());
    }

    #[test]
    fn test_graph_error_converts() {
        let err: QuillError = GraphError::MissingEdge(NodeId::Review).into();
        assert!(matches!(err, QuillError::Graph(GraphError::MissingEdge(_))));
    }

    #[test]
    fn test_run_failure_keeps_state() {
        let mut state = WorkflowState::new("Rust");
        state.title = "Why Rust".to_string();

        let failure = RunFailure::new(
            NodeId::Content,
            QuillError::unavailable("openai", "timeout"),
            state,
        );

        assert_eq!(failure.state.title, "Why Rust");
        assert!(!failure.gave_up());
        assert!(failure.to_string().contains("content"));
    }
}
