//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ping_starter_probes_total` (counter): probes by result
//! - `ping_starter_probe_duration_seconds` (histogram): probe latency
//! - `ping_starter_reachable` (gauge): 1=reachable, 0=unreachable, -1=unknown
//! - `ping_starter_transitions_total` (counter): confirmed transitions by target state
//! - `ping_starter_actions_total` (counter): scripts run by result
//!
//! # Design Decisions
//! - Recording is a no-op until `init_metrics` installs the exporter
//! - Labels are static strings; there is only one target

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::health::{ReachabilityState, Transition};

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!("ping_starter_probes_total", "Probes sent, by result");
    describe_histogram!("ping_starter_probe_duration_seconds", "Probe latency");
    describe_gauge!("ping_starter_reachable", "Confirmed reachability of the target");
    describe_counter!("ping_starter_transitions_total", "Confirmed state transitions");
    describe_counter!("ping_starter_actions_total", "Action scripts run, by result");

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_probe(reachable: bool, elapsed: Duration) {
    let result = if reachable { "success" } else { "failure" };
    counter!("ping_starter_probes_total", "result" => result).increment(1);
    histogram!("ping_starter_probe_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_state(state: ReachabilityState) {
    gauge!("ping_starter_reachable").set(state.as_gauge());
}

pub fn record_transition(transition: Transition) {
    counter!("ping_starter_transitions_total", "to" => transition.action_name()).increment(1);
    record_state(transition.target_state());
}

pub fn record_action(success: bool) {
    let result = if success { "success" } else { "failure" };
    counter!("ping_starter_actions_total", "result" => result).increment(1);
}
