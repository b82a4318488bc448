use std::fmt;

use crate::key::KeyError;

/// Error type for repository operations.
///
/// Absence is never an error: a missing entity is `Ok(None)` from
/// `get_by_id` and `Ok(false)` from `delete`, so callers can tell "empty"
/// from "failed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// An interior lock was poisoned during the named operation.
    LockPoisoned(&'static str),
    /// The key counter for this entity type is saturated.
    KeySpaceExhausted { key_type: &'static str },
    /// Entity serialization/deserialization failed.
    Serde(String),
    /// The backing store reported a failure.
    Storage(String),
    /// The network exchange itself failed.
    Transport(String),
    /// The remote endpoint answered with a non-success HTTP status.
    RemoteStatus { status: u16 },
    /// The remote endpoint answered with a `success: false` envelope.
    RemoteRejected { messages: Vec<String> },
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::LockPoisoned(operation) => {
                write!(f, "repository lock poisoned during {}", operation)
            }
            RepositoryError::KeySpaceExhausted { key_type } => {
                write!(f, "all possible {} key values have been used", key_type)
            }
            RepositoryError::Serde(message) => {
                write!(f, "entity serialization error: {}", message)
            }
            RepositoryError::Storage(message) => write!(f, "storage error: {}", message),
            RepositoryError::Transport(message) => write!(f, "transport error: {}", message),
            RepositoryError::RemoteStatus { status } => {
                write!(f, "remote endpoint returned status {}", status)
            }
            RepositoryError::RemoteRejected { messages } => {
                write!(
                    f,
                    "remote endpoint rejected the request: {}",
                    messages.join("; ")
                )
            }
        }
    }
}

impl std::error::Error for RepositoryError {}

impl From<KeyError> for RepositoryError {
    fn from(err: KeyError) -> Self {
        match err {
            KeyError::Exhausted { key_type } => RepositoryError::KeySpaceExhausted { key_type },
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serde(err.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        RepositoryError::Storage(err.to_string())
    }
}
