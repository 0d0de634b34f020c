//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! settings.toml
//!     → loader.rs (parse & deserialize)
//!     → CLI overrides (target, interval, threshold)
//!     → validation.rs (semantic checks)
//!     → PingStarterConfig (validated, immutable)
//!     → consumed once at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the threshold never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_with, ConfigError, ConfigOverrides};
pub use schema::{
    ActionsConfig, LogFormat, MonitorConfig, ObservabilityConfig, PingStarterConfig, ProbeConfig,
    ProbeKind,
};
pub use validation::{validate_config, ValidationError};
