//! In-process session storage shared by all requests.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::session::{SessionBackend, SessionError};

type SessionMap = HashMap<String, String>;

/// All client sessions, keyed by session id.
///
/// Cheap to clone; clones share the same storage. Many requests can read
/// concurrently while writes are exclusive.
#[derive(Clone, Default)]
pub struct MemorySessions {
    inner: Arc<RwLock<HashMap<String, SessionMap>>>,
}

impl MemorySessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to a new session with a random id. Nothing is stored until the
    /// first write.
    pub fn create(&self) -> ClientSession {
        let id = Uuid::new_v4().to_string();
        tracing::debug!(session = %id, "Session id issued");
        self.session(id)
    }

    /// Handle to the session `id`. The session is created on first write.
    pub fn session(&self, id: impl Into<String>) -> ClientSession {
        ClientSession {
            id: id.into(),
            sessions: self.clone(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().contains_key(id)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

/// One client's view of [`MemorySessions`].
#[derive(Clone)]
pub struct ClientSession {
    id: String,
    sessions: MemorySessions,
}

impl ClientSession {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl SessionBackend for ClientSession {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let sessions = self.sessions.inner.read();
        Ok(sessions.get(&self.id).and_then(|s| s.get(key)).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), SessionError> {
        let mut sessions = self.sessions.inner.write();
        sessions
            .entry(self.id.clone())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut sessions = self.sessions.inner.write();
        if let Some(session) = sessions.get_mut(&self.id) {
            session.remove(key);
        }
        Ok(())
    }
}
