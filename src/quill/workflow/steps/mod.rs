// SPDX-License-Identifier: MIT

//! Step functions for the blog pipeline
//!
//! Each step reads what it needs from [`WorkflowState`], makes exactly one
//! content-service call, and records the result back into the state:
//! - [`GenerateTitle`] - picks a title for the topic
//! - [`GenerateContent`] - drafts (or redrafts) the post
//! - [`ReviewContent`] - critiques the latest draft
//! - [`EvaluateContent`] - turns draft + critique into a Pass/Fail verdict

mod content;
mod evaluate;
mod review;
mod title;

pub use content::GenerateContent;
pub use evaluate::{parse_verdict, EvaluateContent};
pub use review::ReviewContent;
pub use title::GenerateTitle;

use super::state::WorkflowState;
use crate::adk::error::QuillError;
use async_trait::async_trait;

/// A single named unit of work in the graph
#[async_trait]
pub trait Step: Send + Sync {
    /// Returns the step name
    fn name(&self) -> &str;

    /// Run the step against the run's state. The content-service call is the
    /// only await point; its failure is returned untouched.
    async fn run(&self, state: &mut WorkflowState) -> Result<(), QuillError>;
}
