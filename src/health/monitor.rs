//! Probe loop driving the debounce engine.
//!
//! # Responsibilities
//! - Probe the target once per tick
//! - Feed the result to the engine exactly once
//! - Dispatch actions for every confirmed transition
//! - Sleep `interval` after each tick completes

use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::time;

use crate::actions::ActionDispatcher;
use crate::health::state::{DebounceEngine, ReachabilityState, Transition};
use crate::observability::metrics;
use crate::probe::Prober;

/// Single-target monitor. Owns the engine; ticks are strictly sequential.
pub struct Monitor<P, D> {
    target: String,
    interval: Duration,
    engine: DebounceEngine,
    prober: P,
    dispatcher: D,
}

impl<P, D> Monitor<P, D>
where
    P: Prober,
    D: ActionDispatcher,
{
    /// Create a monitor for `target`, probing every `interval`.
    pub fn new(
        target: impl Into<String>,
        interval: Duration,
        engine: DebounceEngine,
        prober: P,
        dispatcher: D,
    ) -> Self {
        Self {
            target: target.into(),
            interval,
            engine,
            prober,
            dispatcher,
        }
    }

    /// Host being probed.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Pause between the end of one tick and the next probe.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The debounce engine fed by this monitor.
    pub fn engine(&self) -> &DebounceEngine {
        &self.engine
    }

    /// The prober used for each tick.
    pub fn prober(&self) -> &P {
        &self.prober
    }

    /// The dispatcher invoked on transitions.
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Run one probe, observe it, and dispatch if the state changed.
    pub async fn tick(&mut self) -> Option<Transition> {
        let reachable = self.probe().await;
        self.apply(reachable).await
    }

    async fn probe(&self) -> bool {
        let start = Instant::now();
        let reachable = self.prober.probe(&self.target).await;
        metrics::record_probe(reachable, start.elapsed());
        reachable
    }

    async fn apply(&mut self, reachable: bool) -> Option<Transition> {
        let transition = self.engine.observe(reachable);
        let threshold = self.engine.threshold().get();

        if reachable {
            tracing::info!(
                successes = self.engine.consecutive_successes(),
                threshold,
                "Ping successful"
            );
        } else {
            tracing::info!(
                failures = self.engine.consecutive_failures(),
                threshold,
                "Ping failed"
            );
        }

        let transition = transition?;
        tracing::info!(host = %self.target, state = %transition.target_state(), "State changed");
        metrics::record_transition(transition);

        // The engine has already committed; dispatch failures are only reported.
        let report = self.dispatcher.dispatch(transition).await;
        if !report.is_success() {
            tracing::warn!(
                transition = %transition,
                attempted = report.attempted,
                failed = report.failures.len(),
                "Some actions failed"
            );
        }

        Some(transition)
    }

    /// Tick until `shutdown` fires, then hand the monitor back.
    ///
    /// Shutdown may interrupt a probe or the sleep between ticks, never the
    /// observe-and-dispatch step.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> Self {
        tracing::info!(
            host = %self.target,
            interval_secs = self.interval.as_secs_f64(),
            threshold = self.engine.threshold().get(),
            "Monitor starting"
        );
        metrics::record_state(ReachabilityState::Unknown);

        loop {
            let reachable = tokio::select! {
                reachable = self.probe() => reachable,
                _ = shutdown.recv() => break,
            };

            self.apply(reachable).await;

            tokio::select! {
                _ = time::sleep(self.interval) => {}
                _ = shutdown.recv() => break,
            }
        }

        tracing::info!(state = %self.engine.state(), "Monitor received shutdown signal, exiting loop");
        self
    }
}
