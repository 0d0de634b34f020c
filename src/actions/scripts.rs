//! Script directory dispatcher.
//!
//! # Responsibilities
//! - Map a transition to its script directory
//! - Find scripts by extension, in file-name order
//! - Run them one at a time, recording every failure

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::fs;
use tokio::process::Command;
use tokio::time;

use crate::actions::{ActionDispatcher, ActionError, DispatchReport};
use crate::config::ActionsConfig;
use crate::health::Transition;
use crate::observability::metrics;

/// Runs every script in the directory named for a transition.
#[derive(Debug, Clone)]
pub struct ScriptDispatcher {
    reachable_dir: PathBuf,
    not_reachable_dir: PathBuf,
    extensions: Vec<String>,
    timeout: Option<Duration>,
}

impl ScriptDispatcher {
    /// Create a dispatcher over two directories with the platform's default extensions.
    pub fn new(reachable_dir: impl Into<PathBuf>, not_reachable_dir: impl Into<PathBuf>) -> Self {
        let defaults = ActionsConfig::default();
        Self {
            reachable_dir: reachable_dir.into(),
            not_reachable_dir: not_reachable_dir.into(),
            extensions: normalize_extensions(&defaults.extensions),
            timeout: None,
        }
    }

    /// Build from the `[actions]` section.
    pub fn from_config(config: &ActionsConfig) -> Self {
        Self {
            reachable_dir: PathBuf::from(&config.reachable_dir),
            not_reachable_dir: PathBuf::from(&config.not_reachable_dir),
            extensions: normalize_extensions(&config.extensions),
            timeout: u64::try_from(config.timeout_secs)
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    /// Replace the script extensions (leading dots and case are ignored).
    pub fn with_extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        self.extensions = normalize_extensions(extensions);
        self
    }

    /// Kill any script still running after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Directory holding the scripts for `transition`.
    pub fn dir_for(&self, transition: Transition) -> &Path {
        match transition {
            Transition::ToReachable => &self.reachable_dir,
            Transition::ToUnreachable => &self.not_reachable_dir,
        }
    }

    fn is_script(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    /// Scripts in `dir`, sorted by file name.
    pub async fn list_scripts(&self, dir: &Path) -> Result<Vec<PathBuf>, ActionError> {
        let read_err = |source| ActionError::ReadDir {
            dir: dir.to_path_buf(),
            source,
        };

        let mut entries = fs::read_dir(dir).await.map_err(read_err)?;
        let mut scripts = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
            let path = entry.path();
            if !self.is_script(&path) {
                continue;
            }
            // Follows symlinks.
            match fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => scripts.push(path),
                _ => {}
            }
        }

        scripts.sort();
        Ok(scripts)
    }

    async fn run_script(&self, script: &Path) -> Result<(), ActionError> {
        let mut child = Command::new(script)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ActionError::Spawn {
                script: script.to_path_buf(),
                source,
            })?;

        let status = match self.timeout {
            Some(limit) => match time::timeout(limit, child.wait()).await {
                Ok(result) => result,
                Err(_) => {
                    if let Err(e) = child.kill().await {
                        tracing::warn!(script = %script.display(), error = %e, "Failed to kill script");
                    }
                    return Err(ActionError::Timeout {
                        script: script.to_path_buf(),
                        secs: limit.as_secs(),
                    });
                }
            },
            None => child.wait().await,
        }
        .map_err(|source| ActionError::Wait {
            script: script.to_path_buf(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(ActionError::Failed {
                script: script.to_path_buf(),
                status,
            })
        }
    }
}

impl ActionDispatcher for ScriptDispatcher {
    async fn dispatch(&self, transition: Transition) -> DispatchReport {
        let dir = self.dir_for(transition);
        let mut report = DispatchReport::new(transition);

        tracing::info!(dir = %dir.display(), "Executing scripts");

        if !fs::try_exists(dir).await.unwrap_or(false) {
            tracing::warn!(dir = %dir.display(), "Script directory does not exist");
            return report;
        }

        let scripts = match self.list_scripts(dir).await {
            Ok(scripts) => scripts,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list scripts");
                report.failures.push(e);
                return report;
            }
        };

        if scripts.is_empty() {
            tracing::info!(dir = %dir.display(), extensions = ?self.extensions, "No scripts found");
            return report;
        }

        for script in scripts {
            report.attempted += 1;
            tracing::info!(script = %script.display(), "Executing script");

            match self.run_script(&script).await {
                Ok(()) => {
                    report.succeeded += 1;
                    metrics::record_action(true);
                    tracing::info!(script = %script.display(), "Script completed");
                }
                Err(e) => {
                    metrics::record_action(false);
                    tracing::error!(error = %e, "Script failed");
                    report.failures.push(e);
                }
            }
        }

        report
    }
}

fn normalize_extensions<S: AsRef<str>>(extensions: &[S]) -> Vec<String> {
    extensions
        .iter()
        .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_for_transition() {
        let dispatcher = ScriptDispatcher::new("up", "down");
        assert_eq!(dispatcher.dir_for(Transition::ToReachable), Path::new("up"));
        assert_eq!(dispatcher.dir_for(Transition::ToUnreachable), Path::new("down"));
    }

    #[test]
    fn test_extension_matching_is_case_insensitive() {
        let dispatcher = ScriptDispatcher::new("up", "down").with_extensions(&[".BAT", "cmd"]);
        assert!(dispatcher.is_script(Path::new("up/start.bat")));
        assert!(dispatcher.is_script(Path::new("up/START.Bat")));
        assert!(dispatcher.is_script(Path::new("up/run.cmd")));
        assert!(!dispatcher.is_script(Path::new("up/readme.txt")));
        assert!(!dispatcher.is_script(Path::new("up/bat")));
    }

    #[test]
    fn test_from_config_timeout() {
        let mut config = ActionsConfig::default();
        assert!(ScriptDispatcher::from_config(&config).timeout.is_none());

        config.timeout_secs = 30;
        assert_eq!(
            ScriptDispatcher::from_config(&config).timeout,
            Some(Duration::from_secs(30))
        );

        config.timeout_secs = -1;
        assert!(ScriptDispatcher::from_config(&config).timeout.is_none());
    }

    #[tokio::test]
    async fn test_list_scripts_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.bat"), "").unwrap();
        std::fs::write(dir.path().join("a.bat"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("nested.bat")).unwrap();

        let dispatcher = ScriptDispatcher::new("up", "down").with_extensions(&["bat"]);
        let scripts = dispatcher.list_scripts(dir.path()).await.unwrap();
        assert_eq!(
            scripts,
            vec![dir.path().join("a.bat"), dir.path().join("b.bat")]
        );
    }

    #[tokio::test]
    async fn test_missing_directory_yields_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = ScriptDispatcher::new(dir.path().join("nope"), dir.path().join("nope2"));

        let report = dispatcher.dispatch(Transition::ToReachable).await;
        assert_eq!(report.attempted, 0);
        assert!(report.is_success());
    }
}
