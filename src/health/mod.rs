//! Reachability monitoring.
//!
//! # Data Flow
//! ```text
//! monitor.rs:
//!     Sleep interval
//!     → Probe target
//!     → state.rs observe(result)
//!     → On transition: dispatch actions
//!
//! State machine (state.rs):
//!     Unknown → Reachable ←→ Unreachable
//!     With a consecutive-count threshold to prevent flapping
//! ```
//!
//! # Design Decisions
//! - State transitions require consecutive successes/failures
//! - The engine decides; the monitor performs side effects
//! - One target per process

pub mod monitor;
pub mod state;

pub use monitor::Monitor;
pub use state::{
    DebounceEngine, EngineError, EngineSnapshot, ReachabilityState, Threshold, Transition,
};
