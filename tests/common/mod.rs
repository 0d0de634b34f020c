//! Shared fakes for integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ping_starter::actions::{ActionDispatcher, DispatchReport};
use ping_starter::probe::Prober;
use ping_starter::Transition;

/// Prober that replays a fixed list of results, then keeps returning `fallback`.
#[allow(dead_code)]
pub struct ScriptedProber {
    results: Mutex<VecDeque<bool>>,
    fallback: bool,
    calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl ScriptedProber {
    pub fn new(results: &[bool], fallback: bool) -> Self {
        Self {
            results: Mutex::new(results.iter().copied().collect()),
            fallback,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    pub fn remaining(&self) -> usize {
        self.results.lock().unwrap().len()
    }
}

impl Prober for ScriptedProber {
    async fn probe(&self, _target: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.results.lock().unwrap().pop_front();
        next.unwrap_or(self.fallback)
    }
}

/// Dispatcher that records every transition it receives.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct RecordingDispatcher {
    pub seen: Arc<Mutex<Vec<Transition>>>,
}

#[allow(dead_code)]
impl RecordingDispatcher {
    pub fn transitions(&self) -> Vec<Transition> {
        self.seen.lock().unwrap().clone()
    }
}

impl ActionDispatcher for RecordingDispatcher {
    async fn dispatch(&self, transition: Transition) -> DispatchReport {
        self.seen.lock().unwrap().push(transition);
        DispatchReport::new(transition)
    }
}

/// Write an executable shell script.
#[cfg(unix)]
#[allow(dead_code)]
pub fn write_script(path: &std::path::Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}
