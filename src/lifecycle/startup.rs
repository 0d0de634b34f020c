//! Startup orchestration.
//!
//! # Responsibilities
//! - Build engine, prober and dispatcher from validated config
//! - Start the metrics exporter when enabled
//! - Run the monitor until a shutdown signal arrives
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The engine refuses to be built with a non-positive threshold even if
//!   validation was bypassed

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use thiserror::Error;

use crate::actions::ScriptDispatcher;
use crate::config::PingStarterConfig;
use crate::health::{DebounceEngine, EngineError, Monitor};
use crate::lifecycle::signals::{wait_for_signal, ShutdownSignal};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::probe::HostProber;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("monitor.target must not be empty")]
    MissingTarget,

    #[error("interval must be positive, got {0}")]
    InvalidInterval(i64),

    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("monitor task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// The monitor type the binary runs.
pub type HostMonitor = Monitor<HostProber, ScriptDispatcher>;

/// Build the monitor described by `config`.
pub fn build_monitor(config: &PingStarterConfig) -> Result<HostMonitor, StartupError> {
    let target = config.monitor.target.trim();
    if target.is_empty() {
        return Err(StartupError::MissingTarget);
    }

    let interval = u64::try_from(config.monitor.interval_secs)
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or(StartupError::InvalidInterval(config.monitor.interval_secs))?;

    let engine = DebounceEngine::with_threshold(config.monitor.threshold)?;

    Ok(Monitor::new(
        target,
        interval,
        engine,
        HostProber::from_config(&config.probe),
        ScriptDispatcher::from_config(&config.actions),
    ))
}

/// Run until SIGINT or SIGTERM.
pub async fn run(config: PingStarterConfig) -> Result<(), StartupError> {
    tracing::info!(
        host = %config.monitor.target,
        interval_secs = config.monitor.interval_secs,
        threshold = config.monitor.threshold,
        probe = ?config.probe.kind,
        "Starting Ping Starter"
    );

    let monitor = build_monitor(&config)?;

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let shutdown = Shutdown::new();
    let task = tokio::spawn(monitor.run(shutdown.subscribe()));

    match wait_for_signal().await {
        ShutdownSignal::Interrupt => tracing::info!("Ping Starter terminated by user"),
        ShutdownSignal::Terminate => tracing::info!("Ping Starter received SIGTERM"),
    }
    shutdown.trigger();

    let monitor = task.await?;
    tracing::info!(state = %monitor.engine().state(), "Shutdown complete");
    Ok(())
}
