//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for ping-starter.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PingStarterConfig {
    /// Target host, interval and threshold.
    #[serde(alias = "Settings")]
    pub monitor: MonitorConfig,

    /// Probe mechanism settings.
    pub probe: ProbeConfig,

    /// Script directories run on transitions.
    pub actions: ActionsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Monitored host and debounce settings.
///
/// Integers are signed so that negative values reach validation
/// instead of failing as a parse error.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Host name or IP address to probe.
    #[serde(alias = "ip_address")]
    pub target: String,

    /// Seconds to wait between the end of one probe and the next.
    #[serde(alias = "ping_interval")]
    pub interval_secs: i64,

    /// Consecutive identical probe results required for a transition.
    #[serde(alias = "ping_limit")]
    pub threshold: i64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            interval_secs: 5,
            threshold: 3,
        }
    }
}

/// Which probe mechanism to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbeKind {
    /// One ICMP echo request via the system `ping` utility.
    #[default]
    Icmp,
    /// A TCP connect to `target:port`.
    Tcp,
}

/// Probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub kind: ProbeKind,

    /// Per-probe timeout in seconds.
    pub timeout_secs: i64,

    /// Port for TCP probes.
    pub port: u16,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            kind: ProbeKind::Icmp,
            timeout_secs: 1,
            port: 80,
        }
    }
}

/// Action (script directory) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ActionsConfig {
    /// Scripts run when the host becomes reachable.
    pub reachable_dir: String,

    /// Scripts run when the host becomes unreachable.
    pub not_reachable_dir: String,

    /// File extensions (without the dot) treated as scripts.
    pub extensions: Vec<String>,

    /// Per-script timeout in seconds, 0 disables it.
    pub timeout_secs: i64,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            reachable_dir: "reachable".to_string(),
            not_reachable_dir: "not_reachable".to_string(),
            extensions: default_extensions(),
            timeout_secs: 0,
        }
    }
}

#[cfg(windows)]
fn default_extensions() -> Vec<String> {
    vec!["bat".to_string(), "cmd".to_string()]
}

#[cfg(not(windows))]
fn default_extensions() -> Vec<String> {
    vec!["sh".to_string()]
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
