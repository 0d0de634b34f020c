//! Ping Starter library.
//!
//! Watches one host and runs scripts when its reachability changes,
//! debounced by a consecutive-result threshold.

pub mod actions;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod probe;

pub use config::schema::PingStarterConfig;
pub use health::{DebounceEngine, Monitor, ReachabilityState, Transition};
pub use lifecycle::Shutdown;
