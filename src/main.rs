//! Ping Starter
//!
//! Monitors one host and runs the scripts in `reachable/` or
//! `not_reachable/` when its confirmed reachability changes.
//!
//! # Architecture Overview
//!
//! ```text
//!   settings.toml + CLI ──▶ config ──▶ lifecycle::startup
//!                                           │
//!                                           ▼
//!   ┌──────────────────────────── health::Monitor ─────────────────────────┐
//!   │                                                                      │
//!   │   probe (icmp/tcp) ──bool──▶ DebounceEngine ──Transition──▶ actions  │
//!   │        ▲                                                       │     │
//!   │        └──────────────────── sleep(interval) ◀─────────────────┘     │
//!   └──────────────────────────────────────────────────────────────────────┘
//!                                           │
//!                     SIGINT/SIGTERM ──▶ Shutdown
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ping_starter::config::{load_config_with, ConfigOverrides, PingStarterConfig};
use ping_starter::lifecycle::startup;
use ping_starter::observability::logging;

const DEFAULT_CONFIG_PATH: &str = "settings.toml";

#[derive(Parser)]
#[command(name = "ping-starter", version)]
#[command(about = "Run scripts when a host becomes reachable or unreachable", long_about = None)]
struct Cli {
    /// Configuration file [default: settings.toml, optional]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to monitor (overrides monitor.target)
    #[arg(short, long)]
    target: Option<String>,

    /// Seconds between probes (overrides monitor.interval_secs)
    #[arg(short, long, allow_negative_numbers = true)]
    interval: Option<i64>,

    /// Consecutive results needed to change state (overrides monitor.threshold)
    #[arg(short = 'l', long, allow_negative_numbers = true)]
    threshold: Option<i64>,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            target: self.target.clone(),
            interval_secs: self.interval,
            threshold: self.threshold,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = match load_config_with(Some(&path), cli.config.is_some(), &cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ping-starter: {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if cli.check {
        print_summary(&config);
        return match startup::build_monitor(&config) {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("ping-starter: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    if let Err(e) = logging::init_logging(&config.observability) {
        eprintln!("ping-starter: failed to initialize logging: {}", e);
    }

    if cli.config.is_none() && !path.exists() {
        tracing::info!(path = %path.display(), "Config file not found, using defaults");
    }

    match startup::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

fn print_summary(config: &PingStarterConfig) {
    println!("Configuration OK");
    println!("  target:        {}", config.monitor.target);
    println!("  interval:      {}s", config.monitor.interval_secs);
    println!("  threshold:     {}", config.monitor.threshold);
    println!("  probe:         {:?} (timeout {}s)", config.probe.kind, config.probe.timeout_secs);
    println!("  reachable:     {}", config.actions.reachable_dir);
    println!("  not reachable: {}", config.actions.not_reachable_dir);
    println!("  extensions:    {}", config.actions.extensions.join(", "));
}
