// SPDX-License-Identifier: MIT

//! Verdict routing for the conditional edge

use super::state::{Verdict, WorkflowState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named outcomes of a conditional edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Pass,
    Fail,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Pass => write!(f, "Pass"),
            Route::Fail => write!(f, "Fail"),
        }
    }
}

/// A pure function of state selecting the next outcome
pub type Router = fn(&WorkflowState) -> Route;

/// `Pass` only for a passing verdict; anything else, including an unset
/// verdict, routes to `Fail`.
pub fn route_on_verdict(state: &WorkflowState) -> Route {
    match state.verdict {
        Verdict::Pass => Route::Pass,
        Verdict::Fail | Verdict::Unset => Route::Fail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_routes_pass() {
        let mut state = WorkflowState::new("Testing");
        state.verdict = Verdict::Pass;
        assert_eq!(route_on_verdict(&state), Route::Pass);
    }

    #[test]
    fn test_fail_and_unset_route_fail() {
        let mut state = WorkflowState::new("Testing");
        assert_eq!(route_on_verdict(&state), Route::Fail);

        state.verdict = Verdict::Fail;
        assert_eq!(route_on_verdict(&state), Route::Fail);
    }

    #[test]
    fn test_routing_is_repeatable() {
        let mut state = WorkflowState::new("Testing");
        state.verdict = Verdict::Pass;
        let before = state.clone();

        assert_eq!(route_on_verdict(&state), route_on_verdict(&state));
        assert_eq!(state.verdict, before.verdict);
        assert_eq!(state.review_history(), before.review_history());
    }
}
