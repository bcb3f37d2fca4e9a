//! Per-page state entries on top of a client session.

use crate::marker::state::PageState;
use crate::session::{SessionBackend, SessionError};

/// Reads and writes the remembered state of one page, stored under
/// `<namespace>.<name>` as JSON.
pub struct StateStore {
    namespace: String,
    backend: Box<dyn SessionBackend>,
}

impl StateStore {
    pub fn new(namespace: impl Into<String>, backend: impl SessionBackend + 'static) -> Self {
        Self {
            namespace: namespace.into(),
            backend: Box::new(backend),
        }
    }

    /// Session key for the page `name`.
    pub fn key(&self, name: &str) -> String {
        format!("{}.{}", self.namespace, name)
    }

    /// Remembered state for `name`, or `None` when nothing is stored.
    ///
    /// An entry that no longer decodes is treated as absent.
    pub fn get(&self, name: &str) -> Result<Option<PageState>, SessionError> {
        let key = self.key(name);
        let Some(raw) = self.backend.get(&key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Ignoring undecodable page state");
                Ok(None)
            }
        }
    }

    pub fn set(&self, name: &str, state: &PageState) -> Result<(), SessionError> {
        let raw = serde_json::to_string(state)?;
        self.backend.set(&self.key(name), raw)
    }

    pub fn delete(&self, name: &str) -> Result<(), SessionError> {
        self.backend.remove(&self.key(name))
    }
}
