//! Shared test utilities.

#![allow(dead_code)]

use pagemarker::config::{Config, ConfigStore, MarkerConfig};
use pagemarker::marker::{Marker, RequestContext};
use pagemarker::session::{MemorySessions, SessionBackend, SessionError, StateStore};
use pagemarker::PageState;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

pub const CLIENT: &str = "client-1";

/// Marker for a plain-HTTP request to `example.com` on port 80.
pub fn marker_for(uri: &str, sessions: &MemorySessions) -> Marker {
    let ctx = RequestContext::new(uri, "example.com").with_port(80);
    Marker::new(ctx, sessions.session(CLIENT), MarkerConfig::default())
}

/// Remembered state for `name` in the test client's session.
pub fn stored(sessions: &MemorySessions, name: &str) -> Option<PageState> {
    StateStore::new(MarkerConfig::default().namespace, sessions.session(CLIENT))
        .get(name)
        .expect("memory store never fails")
}

/// Seed remembered state for `name` in the test client's session.
pub fn seed(sessions: &MemorySessions, name: &str, state: &PageState) {
    StateStore::new(MarkerConfig::default().namespace, sessions.session(CLIENT))
        .set(name, state)
        .expect("memory store never fails");
}

pub fn test_config_store() -> ConfigStore {
    ConfigStore::new(Config::default(), PathBuf::from("/tmp/pagemarker-test.toml"))
}

/// Create a temporary config file with the given contents.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// Session backend that fails every call and counts attempts.
#[derive(Clone, Default)]
pub struct FailingSession {
    pub calls: Arc<AtomicUsize>,
}

impl FailingSession {
    fn fail(&self) -> SessionError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        SessionError::Unavailable("backend offline".to_string())
    }
}

impl SessionBackend for FailingSession {
    fn get(&self, _key: &str) -> Result<Option<String>, SessionError> {
        Err(self.fail())
    }

    fn set(&self, _key: &str, _value: String) -> Result<(), SessionError> {
        Err(self.fail())
    }

    fn remove(&self, _key: &str) -> Result<(), SessionError> {
        Err(self.fail())
    }
}
