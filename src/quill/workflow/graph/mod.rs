// SPDX-License-Identifier: MIT

//! Graph-based workflow execution
//!
//! This module provides the graph builder, the executor that walks nodes
//! from Start to End, and the prebuilt blog pipeline.

mod builder;
pub mod executor;
mod pipeline;
pub mod types;

pub use builder::GraphBuilder;
pub use executor::{CompiledGraph, RunLimits};
pub use pipeline::{blog_pipeline, PipelineOptions, DEFAULT_MAX_REVISIONS};
pub use types::{Edge, NodeId};
