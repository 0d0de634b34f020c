//! Script dispatcher tests against real processes.
#![cfg(unix)]

use std::time::Duration;

use ping_starter::actions::{ActionDispatcher, ActionError, ScriptDispatcher};
use ping_starter::health::{DebounceEngine, Monitor, ReachabilityState, Transition};

mod common;

use common::{write_script, ScriptedProber};

struct Dirs {
    root: tempfile::TempDir,
}

impl Dirs {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("reachable")).unwrap();
        std::fs::create_dir(root.path().join("not_reachable")).unwrap();
        Self { root }
    }

    fn up(&self) -> std::path::PathBuf {
        self.root.path().join("reachable")
    }

    fn down(&self) -> std::path::PathBuf {
        self.root.path().join("not_reachable")
    }

    fn marker(&self, name: &str) -> std::path::PathBuf {
        self.root.path().join(name)
    }

    fn dispatcher(&self) -> ScriptDispatcher {
        ScriptDispatcher::new(self.up(), self.down()).with_extensions(&["sh"])
    }
}

#[tokio::test]
async fn test_runs_scripts_for_transition_in_order() {
    let dirs = Dirs::new();
    let log = dirs.marker("order.log");
    write_script(&dirs.up().join("b.sh"), &format!("echo b >> '{}'", log.display()));
    write_script(&dirs.up().join("a.sh"), &format!("echo a >> '{}'", log.display()));
    write_script(&dirs.down().join("down.sh"), &format!("echo down >> '{}'", log.display()));

    let report = dirs.dispatcher().dispatch(Transition::ToReachable).await;

    assert!(report.is_success());
    assert_eq!(report.attempted, 2);
    assert_eq!(report.succeeded, 2);
    assert_eq!(std::fs::read_to_string(&log).unwrap(), "a\nb\n");
}

#[tokio::test]
async fn test_failing_script_does_not_stop_batch() {
    let dirs = Dirs::new();
    let marker = dirs.marker("ran");
    write_script(&dirs.down().join("1-fail.sh"), "exit 3");
    write_script(&dirs.down().join("2-ok.sh"), &format!("touch '{}'", marker.display()));

    let report = dirs.dispatcher().dispatch(Transition::ToUnreachable).await;

    assert_eq!(report.attempted, 2);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0], ActionError::Failed { .. }));
    assert!(marker.exists());
}

#[tokio::test]
async fn test_non_executable_script_is_reported() {
    let dirs = Dirs::new();
    std::fs::write(dirs.up().join("plain.sh"), "#!/bin/sh\nexit 0\n").unwrap();

    let report = dirs.dispatcher().dispatch(Transition::ToReachable).await;

    assert_eq!(report.attempted, 1);
    assert!(matches!(report.failures[0], ActionError::Spawn { .. }));
}

#[tokio::test]
async fn test_script_timeout() {
    let dirs = Dirs::new();
    write_script(&dirs.up().join("slow.sh"), "sleep 10");

    let dispatcher = dirs.dispatcher().with_timeout(Duration::from_millis(200));
    let report = tokio::time::timeout(
        Duration::from_secs(5),
        dispatcher.dispatch(Transition::ToReachable),
    )
    .await
    .expect("timeout was not enforced");

    assert!(matches!(report.failures[0], ActionError::Timeout { .. }));
}

#[tokio::test]
async fn test_empty_directory() {
    let dirs = Dirs::new();
    std::fs::write(dirs.up().join("README.txt"), "not a script").unwrap();

    let report = dirs.dispatcher().dispatch(Transition::ToReachable).await;

    assert_eq!(report.attempted, 0);
    assert!(report.is_success());
}

#[tokio::test]
async fn test_monitor_runs_scripts_and_keeps_state_on_failure() {
    let dirs = Dirs::new();
    let marker = dirs.marker("went-down");
    write_script(&dirs.up().join("up.sh"), "exit 1");
    write_script(&dirs.down().join("down.sh"), &format!("touch '{}'", marker.display()));

    let mut monitor = Monitor::new(
        "192.0.2.20",
        Duration::from_millis(1),
        DebounceEngine::with_threshold(1).unwrap(),
        ScriptedProber::new(&[true, false], false),
        dirs.dispatcher(),
    );

    assert_eq!(monitor.tick().await, Some(Transition::ToReachable));
    // The failing script does not roll back the confirmed state.
    assert_eq!(monitor.engine().state(), ReachabilityState::Reachable);

    assert_eq!(monitor.tick().await, Some(Transition::ToUnreachable));
    assert!(marker.exists());
}
