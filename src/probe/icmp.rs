//! ICMP probing through the system `ping` utility.
//!
//! Shelling out avoids the raw-socket privileges an in-process ICMP
//! implementation would need.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time;

use crate::probe::Prober;

/// Extra time granted to the `ping` process beyond its own deadline.
const PROCESS_GRACE: Duration = Duration::from_secs(1);

/// Command-line dialect of the system `ping` utility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingFlavor {
    /// iputils/busybox: `-W` takes seconds.
    Linux,
    /// macOS and the BSDs: `-W` takes milliseconds.
    Bsd,
    /// `ping.exe`: `-w` takes milliseconds, and the exit status is zero
    /// even for a router's "destination unreachable" answer.
    Windows,
}

impl PingFlavor {
    /// Dialect of the platform this binary was built for.
    pub fn native() -> Self {
        if cfg!(windows) {
            PingFlavor::Windows
        } else if cfg!(any(
            target_os = "macos",
            target_os = "ios",
            target_os = "freebsd",
            target_os = "dragonfly",
        )) {
            PingFlavor::Bsd
        } else {
            PingFlavor::Linux
        }
    }

    /// Arguments for a single echo request to `target`.
    pub fn args(self, timeout: Duration, target: &str) -> Vec<String> {
        let millis = timeout.as_millis().max(1).to_string();
        let secs = timeout.as_secs().max(1).to_string();
        let (count_flag, wait_flag, wait) = match self {
            PingFlavor::Linux => ("-c", "-W", secs),
            PingFlavor::Bsd => ("-c", "-W", millis),
            PingFlavor::Windows => ("-n", "-w", millis),
        };
        vec![
            count_flag.to_string(),
            "1".to_string(),
            wait_flag.to_string(),
            wait,
            target.to_string(),
        ]
    }

    /// Whether a finished `ping` run saw an echo reply.
    pub fn replied(self, exit_success: bool, stdout: &str) -> bool {
        match self {
            PingFlavor::Windows => exit_success && stdout.to_ascii_uppercase().contains("TTL="),
            PingFlavor::Linux | PingFlavor::Bsd => exit_success,
        }
    }
}

/// Sends one echo request per probe.
#[derive(Debug, Clone)]
pub struct IcmpProber {
    program: String,
    flavor: PingFlavor,
    timeout: Duration,
}

impl IcmpProber {
    /// Create a prober using the platform's `ping`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: "ping".to_string(),
            flavor: PingFlavor::native(),
            timeout,
        }
    }

    /// Use a different executable in place of `ping`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Override the command-line dialect.
    pub fn with_flavor(mut self, flavor: PingFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    /// Per-probe timeout handed to `ping`.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn command(&self, target: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.flavor.args(self.timeout, target))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

impl Prober for IcmpProber {
    async fn probe(&self, target: &str) -> bool {
        let mut cmd = self.command(target);
        let output = cmd.output();

        match time::timeout(self.timeout + PROCESS_GRACE, output).await {
            Ok(Ok(output)) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let replied = self.flavor.replied(output.status.success(), &stdout);
                if !replied {
                    tracing::debug!(host = %target, status = %output.status, "No echo reply");
                }
                replied
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    host = %target,
                    program = %self.program,
                    error = %e,
                    "Probe failed: could not run ping"
                );
                false
            }
            Err(_) => {
                tracing::warn!(host = %target, "Probe failed: timeout");
                false
            }
        }
    }
}
