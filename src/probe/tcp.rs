//! TCP connect probing.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time;

use crate::probe::Prober;

/// Considers the target reachable when a TCP handshake completes.
#[derive(Debug, Clone)]
pub struct TcpProber {
    port: u16,
    timeout: Duration,
}

impl TcpProber {
    /// Create a prober connecting to `port` unless the target names one.
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    /// Default port for targets without one.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Address to connect to. A port already present in the target wins.
    pub fn connect_address(&self, target: &str) -> String {
        if let Ok(addr) = target.parse::<SocketAddr>() {
            return addr.to_string();
        }
        if let Ok(ip) = target.parse::<IpAddr>() {
            return SocketAddr::new(ip, self.port).to_string();
        }
        match target.rsplit_once(':') {
            Some((host, port)) if !host.contains(':') && port.parse::<u16>().is_ok() => {
                target.to_string()
            }
            _ => format!("{}:{}", target, self.port),
        }
    }
}

impl Prober for TcpProber {
    async fn probe(&self, target: &str) -> bool {
        let addr = self.connect_address(target);

        match time::timeout(self.timeout, TcpStream::connect(addr.as_str())).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                tracing::warn!(addr = %addr, error = %e, "Probe failed: connection error");
                false
            }
            Err(_) => {
                tracing::warn!(addr = %addr, "Probe failed: timeout");
                false
            }
        }
    }
}
