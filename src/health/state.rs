//! Reachability state machine.
//!
//! # States
//! - Unknown: process start, no threshold met yet (never re-entered)
//! - Reachable: host confirmed up
//! - Unreachable: host confirmed down
//!
//! # State Transitions
//! ```text
//! Unknown     → Reachable:   consecutive successes >= threshold
//! Unknown     → Unreachable: consecutive failures  >= threshold
//! Unreachable → Reachable:   consecutive successes >= threshold
//! Reachable   → Unreachable: consecutive failures  >= threshold
//! ```
//!
//! # Design Decisions
//! - Hysteresis prevents flapping
//! - Counters are NOT reset on transition; the dominant counter stays at
//!   or above the threshold until the opposite result arrives
//! - `observe` only mutates state; running actions is the caller's job

use std::fmt;
use std::num::NonZeroU32;

use thiserror::Error;

/// Errors raised while building a [`DebounceEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("threshold must be a positive integer, got {0}")]
    InvalidThreshold(i64),
}

/// Confirmed reachability verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReachabilityState {
    Unknown,
    Reachable,
    Unreachable,
}

impl ReachabilityState {
    /// Gauge value: 1 reachable, 0 unreachable, -1 unknown.
    pub fn as_gauge(self) -> f64 {
        match self {
            ReachabilityState::Unknown => -1.0,
            ReachabilityState::Reachable => 1.0,
            ReachabilityState::Unreachable => 0.0,
        }
    }
}

impl fmt::Display for ReachabilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReachabilityState::Unknown => "UNKNOWN",
            ReachabilityState::Reachable => "REACHABLE",
            ReachabilityState::Unreachable => "NOT REACHABLE",
        };
        f.write_str(s)
    }
}

/// A confirmed change of [`ReachabilityState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    ToReachable,
    ToUnreachable,
}

impl Transition {
    /// The state this transition leads to.
    pub fn target_state(self) -> ReachabilityState {
        match self {
            Transition::ToReachable => ReachabilityState::Reachable,
            Transition::ToUnreachable => ReachabilityState::Unreachable,
        }
    }

    /// Name of the action set bound to this transition.
    pub fn action_name(self) -> &'static str {
        match self {
            Transition::ToReachable => "reachable",
            Transition::ToUnreachable => "not_reachable",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_name())
    }
}

/// Number of consecutive identical probe results needed for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold(NonZeroU32);

impl Threshold {
    /// The threshold as a plain integer.
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<i64> for Threshold {
    type Error = EngineError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Threshold)
            .ok_or(EngineError::InvalidThreshold(value))
    }
}

impl TryFrom<u32> for Threshold {
    type Error = EngineError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        NonZeroU32::new(value)
            .map(Threshold)
            .ok_or(EngineError::InvalidThreshold(i64::from(value)))
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Point-in-time view of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSnapshot {
    pub state: ReachabilityState,
    pub consecutive_successes: u32,
    pub consecutive_failures: u32,
    pub threshold: u32,
}

/// Debounces raw probe results into confirmed reachability transitions.
#[derive(Debug, Clone)]
pub struct DebounceEngine {
    state: ReachabilityState,
    consecutive_successes: u32,
    consecutive_failures: u32,
    threshold: Threshold,
}

impl DebounceEngine {
    /// Create an engine in the `Unknown` state.
    pub fn new(threshold: Threshold) -> Self {
        Self {
            state: ReachabilityState::Unknown,
            consecutive_successes: 0,
            consecutive_failures: 0,
            threshold,
        }
    }

    /// Create an engine from a raw threshold, rejecting zero and negatives.
    pub fn with_threshold(threshold: i64) -> Result<Self, EngineError> {
        Ok(Self::new(Threshold::try_from(threshold)?))
    }

    /// Feed one probe result.
    ///
    /// Returns the transition confirmed by this result, if any. At most
    /// one transition fires per call, and only when the confirmed state
    /// actually changes.
    pub fn observe(&mut self, reachable: bool) -> Option<Transition> {
        if reachable {
            self.consecutive_successes = self.consecutive_successes.saturating_add(1);
            self.consecutive_failures = 0;
        } else {
            self.consecutive_failures = self.consecutive_failures.saturating_add(1);
            self.consecutive_successes = 0;
        }

        let limit = self.threshold.get();
        let transition = if self.consecutive_successes >= limit
            && self.state != ReachabilityState::Reachable
        {
            Transition::ToReachable
        } else if self.consecutive_failures >= limit
            && self.state != ReachabilityState::Unreachable
        {
            Transition::ToUnreachable
        } else {
            return None;
        };

        self.state = transition.target_state();
        Some(transition)
    }

    /// Current confirmed state.
    pub fn state(&self) -> ReachabilityState {
        self.state
    }

    /// Successful probes since the last failure.
    pub fn consecutive_successes(&self) -> u32 {
        self.consecutive_successes
    }

    /// Failed probes since the last success.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Threshold fixed at construction.
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Copy of the state, counters and threshold.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            state: self.state,
            consecutive_successes: self.consecutive_successes,
            consecutive_failures: self.consecutive_failures,
            threshold: self.threshold.get(),
        }
    }
}
