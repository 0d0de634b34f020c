//! Reachability probing.
//!
//! # Data Flow
//! ```text
//! Monitor tick
//!     → Prober::probe(target)
//!     → icmp.rs (system ping) or tcp.rs (TCP connect)
//!     → bool (false on no response OR probe error)
//! ```
//!
//! # Design Decisions
//! - Every probe has a hard timeout
//! - Failure modes (DNS, spawn, refused, timeout) are logged here and
//!   collapsed to `false`; callers never branch on error kinds
//! - Static dispatch: the monitor is generic over its prober

use std::future::Future;
use std::time::Duration;

use crate::config::{ProbeConfig, ProbeKind};

pub mod icmp;
pub mod tcp;

pub use icmp::{IcmpProber, PingFlavor};
pub use tcp::TcpProber;

/// Performs one reachability check against a target.
pub trait Prober: Send + Sync {
    /// Returns `true` if the target answered within the timeout.
    fn probe(&self, target: &str) -> impl Future<Output = bool> + Send;
}

/// Prober selected from configuration.
#[derive(Debug, Clone)]
pub enum HostProber {
    Icmp(IcmpProber),
    Tcp(TcpProber),
}

impl HostProber {
    /// Build the prober described by `config`. Assumes validated config.
    pub fn from_config(config: &ProbeConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs.max(1) as u64);
        match config.kind {
            ProbeKind::Icmp => HostProber::Icmp(IcmpProber::new(timeout)),
            ProbeKind::Tcp => HostProber::Tcp(TcpProber::new(config.port, timeout)),
        }
    }

    /// Which mechanism this prober uses.
    pub fn kind(&self) -> ProbeKind {
        match self {
            HostProber::Icmp(_) => ProbeKind::Icmp,
            HostProber::Tcp(_) => ProbeKind::Tcp,
        }
    }
}

impl Prober for HostProber {
    async fn probe(&self, target: &str) -> bool {
        match self {
            HostProber::Icmp(prober) => prober.probe(target).await,
            HostProber::Tcp(prober) => prober.probe(target).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_selects_kind() {
        let mut config = ProbeConfig::default();
        assert_eq!(HostProber::from_config(&config).kind(), ProbeKind::Icmp);

        config.kind = ProbeKind::Tcp;
        config.port = 443;
        match HostProber::from_config(&config) {
            HostProber::Tcp(prober) => assert_eq!(prober.port(), 443),
            other => panic!("expected tcp prober, got {other:?}"),
        }
    }
}
