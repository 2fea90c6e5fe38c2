// SPDX-License-Identifier: MIT

//! Progress events emitted while a run executes

use super::graph::NodeId;
use super::router::Route;
use super::state::{RunSummary, Verdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowEvent {
    RunStarted {
        run_id: Uuid,
        topic: String,
        started_at: DateTime<Utc>,
    },
    StepStarted {
        step: NodeId,
        cycle: usize,
    },
    /// `output` is what the step recorded: the title, the new draft, or
    /// the new review entry
    StepCompleted {
        step: NodeId,
        cycle: usize,
        output: String,
    },
    VerdictReached {
        cycle: usize,
        verdict: Verdict,
        route: Route,
    },
    Revising {
        revision: u32,
    },
    RunCompleted {
        run_id: Uuid,
        summary: RunSummary,
    },
    RunFailed {
        run_id: Uuid,
        step: NodeId,
        error: String,
    },
}
