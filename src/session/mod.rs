//! Client session storage.
//!
//! A session is a string-keyed map scoped to one client. The marker reaches
//! it through [`SessionBackend`], and [`StateStore`] layers the per-page
//! entry layout on top.

mod memory;
mod store;

pub use memory::{ClientSession, MemorySessions};
pub use store::StateStore;

use thiserror::Error;

/// Errors raised by a session backend.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session backend unavailable: {0}")]
    Unavailable(String),

    #[error("failed to encode session value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String-keyed storage scoped to the current client.
pub trait SessionBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: String) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}
