// SPDX-License-Identifier: MIT

//! Graph builder - registers steps and edges, then validates the topology

use super::executor::{CompiledGraph, RunLimits};
use super::types::{Edge, NodeId};
use crate::adk::error::GraphError;
use crate::quill::workflow::router::Router;
use crate::quill::workflow::steps::Step;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// Assembles a graph. Errors from individual calls are held until
/// [`GraphBuilder::compile`], which reports the first one.
#[derive(Default)]
pub struct GraphBuilder {
    steps: HashMap<NodeId, Arc<dyn Step>>,
    edges: HashMap<NodeId, Edge>,
    error: Option<GraphError>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(mut self, node: NodeId, step: Arc<dyn Step>) -> Self {
        if node.is_marker() {
            self.record(GraphError::MarkerStep(node));
        } else {
            self.steps.insert(node, step);
        }
        self
    }

    pub fn add_edge(self, from: NodeId, to: NodeId) -> Self {
        self.insert_edge(from, Edge::Fixed(to))
    }

    pub fn add_conditional_edges(
        self,
        from: NodeId,
        router: Router,
        on_pass: NodeId,
        on_fail: NodeId,
    ) -> Self {
        self.insert_edge(
            from,
            Edge::Conditional {
                router,
                on_pass,
                on_fail,
            },
        )
    }

    fn insert_edge(mut self, from: NodeId, edge: Edge) -> Self {
        if from == NodeId::End {
            self.record(GraphError::EdgeFromEnd);
        } else if edge.targets().contains(&NodeId::Start) {
            self.record(GraphError::EdgeIntoStart);
        } else if self.edges.contains_key(&from) {
            self.record(GraphError::DuplicateEdge(from));
        } else {
            self.edges.insert(from, edge);
        }
        self
    }

    fn record(&mut self, error: GraphError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Validate and freeze the graph.
    ///
    /// Every node reachable from Start must have an outgoing edge, every
    /// reachable work node must have a step, and End must be reachable.
    pub fn compile(self) -> Result<CompiledGraph, GraphError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([NodeId::Start]);
        while let Some(node) = queue.pop_front() {
            if !seen.insert(node) || node == NodeId::End {
                continue;
            }
            if !node.is_marker() && !self.steps.contains_key(&node) {
                return Err(GraphError::MissingStep(node));
            }
            let edge = self.edges.get(&node).ok_or(GraphError::MissingEdge(node))?;
            queue.extend(edge.targets());
        }

        if !seen.contains(&NodeId::End) {
            return Err(GraphError::EndUnreachable);
        }

        Ok(CompiledGraph::new(
            self.steps,
            self.edges,
            RunLimits::default(),
        ))
    }
}
