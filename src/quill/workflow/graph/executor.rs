// SPDX-License-Identifier: MIT

//! Graph workflow executor

use super::types::{Edge, NodeId};
use crate::adk::error::{GraphError, QuillError, RunFailure};
use crate::quill::workflow::events::WorkflowEvent;
use crate::quill::workflow::router::Route;
use crate::quill::workflow::state::WorkflowState;
use crate::quill::workflow::steps::Step;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Bounds applied to a single run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunLimits {
    /// How many times a Fail route may be followed. `None` never gives up.
    pub max_revisions: Option<u32>,
    /// Upper bound on each step, content-service call included
    pub step_timeout: Option<Duration>,
}

/// A validated, immutable graph. Shareable across concurrent runs; each run
/// owns its own [`WorkflowState`].
pub struct CompiledGraph {
    steps: HashMap<NodeId, Arc<dyn Step>>,
    edges: HashMap<NodeId, Edge>,
    limits: RunLimits,
}

impl CompiledGraph {
    pub(super) fn new(
        steps: HashMap<NodeId, Arc<dyn Step>>,
        edges: HashMap<NodeId, Edge>,
        limits: RunLimits,
    ) -> Self {
        Self {
            steps,
            edges,
            limits,
        }
    }

    pub fn with_limits(mut self, limits: RunLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> RunLimits {
        self.limits
    }

    /// Run the graph for `topic` from Start until End
    pub async fn run(&self, topic: &str) -> Result<WorkflowState, RunFailure> {
        self.run_with_events(topic, None).await
    }

    /// Same as [`CompiledGraph::run`], reporting progress on `events`.
    /// A dropped receiver does not affect the run.
    pub async fn run_with_events(
        &self,
        topic: &str,
        events: Option<mpsc::Sender<WorkflowEvent>>,
    ) -> Result<WorkflowState, RunFailure> {
        let run_id = Uuid::new_v4();
        let mut state = WorkflowState::new(topic);

        log::info!("Run {} started for topic: {}", run_id, topic);
        emit(
            &events,
            WorkflowEvent::RunStarted {
                run_id,
                topic: topic.to_string(),
                started_at: Utc::now(),
            },
        )
        .await;

        let mut current = NodeId::Start;
        let mut revisions: u32 = 0;

        while current != NodeId::End {
            let cycle = revisions as usize + 1;

            if let Some(step) = self.steps.get(&current) {
                log::info!("Executing step: {} (cycle {})", current, cycle);
                emit(
                    &events,
                    WorkflowEvent::StepStarted {
                        step: current,
                        cycle,
                    },
                )
                .await;

                if let Err(e) = self.execute_step(current, step.as_ref(), &mut state).await {
                    return Err(fail(&events, run_id, current, e, state).await);
                }

                emit(
                    &events,
                    WorkflowEvent::StepCompleted {
                        step: current,
                        cycle,
                        output: step_output(current, &state),
                    },
                )
                .await;
            }

            let edge = match self.edges.get(&current) {
                Some(edge) => edge,
                None => {
                    let e = QuillError::Graph(GraphError::MissingEdge(current));
                    return Err(fail(&events, run_id, current, e, state).await);
                }
            };

            let (next, route) = edge.resolve(&state);
            if let Some(route) = route {
                log::info!("Route from {}: {} -> {}", current, route, next);
                emit(
                    &events,
                    WorkflowEvent::VerdictReached {
                        cycle,
                        verdict: state.verdict,
                        route,
                    },
                )
                .await;
            }

            if route == Some(Route::Fail) {
                if let Some(limit) = self.limits.max_revisions {
                    if revisions >= limit {
                        log::warn!("Giving up after {} revision(s)", revisions);
                        let e = QuillError::RetriesExhausted { limit };
                        return Err(fail(&events, run_id, current, e, state).await);
                    }
                }
                revisions += 1;
                log::info!("Revision {} requested", revisions);
                emit(&events, WorkflowEvent::Revising { revision: revisions }).await;
            }

            current = next;
        }

        log::info!(
            "Run {} completed: verdict {} after {} draft(s)",
            run_id,
            state.verdict,
            state.cycles()
        );
        emit(
            &events,
            WorkflowEvent::RunCompleted {
                run_id,
                summary: state.summary(),
            },
        )
        .await;

        Ok(state)
    }

    async fn execute_step(
        &self,
        node: NodeId,
        step: &dyn Step,
        state: &mut WorkflowState,
    ) -> Result<(), QuillError> {
        match self.limits.step_timeout {
            Some(limit) => match tokio::time::timeout(limit, step.run(state)).await {
                Ok(result) => result,
                Err(_) => Err(QuillError::StepTimeout {
                    step: node.to_string(),
                    elapsed: limit,
                }),
            },
            None => step.run(state).await,
        }
    }
}

async fn emit(events: &Option<mpsc::Sender<WorkflowEvent>>, event: WorkflowEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event).await;
    }
}

async fn fail(
    events: &Option<mpsc::Sender<WorkflowEvent>>,
    run_id: Uuid,
    step: NodeId,
    error: QuillError,
    state: WorkflowState,
) -> RunFailure {
    log::error!("Run {} aborted at {}: {}", run_id, step, error);
    emit(
        events,
        WorkflowEvent::RunFailed {
            run_id,
            step,
            error: error.to_string(),
        },
    )
    .await;
    RunFailure::new(step, error, state)
}

/// What a step just recorded into the state
fn step_output(node: NodeId, state: &WorkflowState) -> String {
    let item = match node {
        NodeId::Title => return state.title.clone(),
        NodeId::Content => state.last_draft(),
        NodeId::Review | NodeId::Evaluate => state.last_review(),
        NodeId::Start | NodeId::End => None,
    };
    item.map(|i| i.text.clone()).unwrap_or_default()
}
