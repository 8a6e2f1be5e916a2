/// # Garage Door Errors
/// This module defines the `GarageDoorError` enum, which encapsulates all potential errors that can occur within the garage door accessory.
/// Cancellation of a pending delay is modelled as its own variant so the sequence boundary can tell "superseded" apart from "failed".


use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum GarageDoorError {
    /// A pending delay was cancelled by a superseding reset. Not a failure.
    #[error("Delay cancelled")]
    DelayCancelled,

    /// Represents failures reported by the external command transport.
    #[error("Command dispatch error: {0}")]
    DispatchError(String),

    /// Represents a malformed hex payload or a command with no payload configured.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Represents errors arising from misconfigurations or invalid settings.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Represents errors that occur during serialization or deserialization of the persisted state.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl GarageDoorError {
    /// Returns `true` when the error only signals that a sequence was superseded.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, GarageDoorError::DelayCancelled)
    }
}

impl From<config::ConfigError> for GarageDoorError {
    fn from(err: config::ConfigError) -> Self {
        GarageDoorError::ConfigError(err.to_string())
    }
}

pub type GarageDoorResult<T> = Result<T, GarageDoorError>;
