//! Actions run on confirmed transitions.
//!
//! # Data Flow
//! ```text
//! Monitor receives Transition from the engine
//!     → ActionDispatcher::dispatch(transition)
//!     → scripts.rs: list the transition's directory, run each script
//!     → DispatchReport (attempted / succeeded / failures)
//! ```
//!
//! # Design Decisions
//! - One directory per transition target (`reachable`, `not_reachable`)
//! - A failing script never stops the rest of the batch
//! - Dispatch results never feed back into the engine

use std::future::Future;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::health::Transition;

pub mod scripts;

pub use scripts::ScriptDispatcher;

/// Errors from running a single action.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("failed to list {}: {source}", .dir.display())]
    ReadDir {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to start {}: {source}", .script.display())]
    Spawn {
        script: PathBuf,
        source: std::io::Error,
    },

    #[error("failed waiting for {}: {source}", .script.display())]
    Wait {
        script: PathBuf,
        source: std::io::Error,
    },

    #[error("{} exited with {status}", .script.display())]
    Failed { script: PathBuf, status: ExitStatus },

    #[error("{} timed out after {secs} seconds", .script.display())]
    Timeout { script: PathBuf, secs: u64 },
}

/// Outcome of one dispatched action batch.
#[derive(Debug)]
pub struct DispatchReport {
    pub transition: Transition,
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<ActionError>,
}

impl DispatchReport {
    /// Empty report for `transition`.
    pub fn new(transition: Transition) -> Self {
        Self {
            transition,
            attempted: 0,
            succeeded: 0,
            failures: Vec::new(),
        }
    }

    /// True when no action failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs the external action set bound to a transition.
pub trait ActionDispatcher: Send + Sync {
    fn dispatch(&self, transition: Transition) -> impl Future<Output = DispatchReport> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_success() {
        let report = DispatchReport::new(Transition::ToReachable);
        assert!(report.is_success());
        assert_eq!(report.attempted, 0);
    }

    #[test]
    fn test_error_display() {
        let err = ActionError::Timeout {
            script: PathBuf::from("reachable/up.sh"),
            secs: 5,
        };
        assert_eq!(err.to_string(), "reachable/up.sh timed out after 5 seconds");
    }
}
