//! Reasons a connection pump stops.

use std::time::Duration;

use thiserror::Error;

/// Fatal error for a single connection.
///
/// These terminate the connection's pumps and are logged; they never reach
/// other participants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("no frame received within {0:?}")]
    ReadTimeout(Duration),

    #[error("write did not complete within {0:?}")]
    WriteTimeout(Duration),

    #[error("inbound message of {size} bytes exceeds limit of {limit} bytes")]
    MessageTooLarge { size: usize, limit: usize },

    #[error("failed to encode frame: {0}")]
    Encode(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl ConnectionError {
    pub fn transport(error: impl std::fmt::Display) -> Self {
        Self::Transport(error.to_string())
    }
}
