// SPDX-License-Identifier: MIT

//! Graph type definitions
//!
//! Nodes are a closed set; edges are either fixed or chosen by a router.

use crate::quill::workflow::router::{Route, Router};
use crate::quill::workflow::state::WorkflowState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node in the workflow graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeId {
    /// Entry marker, runs nothing
    Start,
    Title,
    Content,
    Review,
    Evaluate,
    /// Terminal marker, runs nothing
    End,
}

impl NodeId {
    /// Start and End carry no step
    pub fn is_marker(&self) -> bool {
        matches!(self, NodeId::Start | NodeId::End)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeId::Start => "start",
            NodeId::Title => "title",
            NodeId::Content => "content",
            NodeId::Review => "review",
            NodeId::Evaluate => "evaluate",
            NodeId::End => "end",
        };
        f.write_str(name)
    }
}

/// Outgoing transition of a node
#[derive(Clone, Copy)]
pub enum Edge {
    /// Unconditional
    Fixed(NodeId),
    /// Router-selected
    Conditional {
        router: Router,
        on_pass: NodeId,
        on_fail: NodeId,
    },
}

impl Edge {
    /// Every node this edge may lead to
    pub fn targets(&self) -> Vec<NodeId> {
        match self {
            Edge::Fixed(to) => vec![*to],
            Edge::Conditional {
                on_pass, on_fail, ..
            } => vec![*on_pass, *on_fail],
        }
    }

    /// Next node, plus the route taken when the edge is conditional
    pub fn resolve(&self, state: &WorkflowState) -> (NodeId, Option<Route>) {
        match self {
            Edge::Fixed(to) => (*to, None),
            Edge::Conditional {
                router,
                on_pass,
                on_fail,
            } => match router(state) {
                Route::Pass => (*on_pass, Some(Route::Pass)),
                Route::Fail => (*on_fail, Some(Route::Fail)),
            },
        }
    }
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Fixed(to) => f.debug_tuple("Fixed").field(to).finish(),
            Edge::Conditional {
                on_pass, on_fail, ..
            } => f
                .debug_struct("Conditional")
                .field("on_pass", on_pass)
                .field("on_fail", on_fail)
                .finish_non_exhaustive(),
        }
    }
}
