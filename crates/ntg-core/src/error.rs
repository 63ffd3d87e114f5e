//! Error types for the contestant bridge

use thiserror::Error;

/// Result type for contestant operations
pub type Result<T> = std::result::Result<T, ContestantError>;

/// Contestant error types
#[derive(Debug, Error)]
pub enum ContestantError {
    /// Listening endpoint could not be created
    #[error("Bind error: {0}")]
    Bind(String),

    /// Read/write fault or unexpected close on the game connection
    #[error("Connection error: {0}")]
    Connection(String),

    /// Engine process could not be started
    #[error("Engine launch error: {0}")]
    EngineLaunch(String),

    /// A move was requested from an engine that was never opened (or was torn down)
    #[error("Engine not running: {0}")]
    EngineNotRunning(String),

    /// Pipe write failed, engine closed its output, or the reply was unusable
    #[error("Engine communication error: {0}")]
    EngineCommunication(String),

    /// Engine did not reply within the configured budget
    #[error("Engine timed out after {0:?}")]
    EngineTimeout(std::time::Duration),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ContestantError {
    /// Errors after which the process should not try to play another game
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ContestantError::Bind(_)
                | ContestantError::EngineLaunch(_)
                | ContestantError::EngineNotRunning(_)
                | ContestantError::Config(_)
        )
    }

    /// Errors that end the current game but leave the process able to shut down cleanly
    pub fn ends_game(&self) -> bool {
        matches!(
            self,
            ContestantError::Connection(_)
                | ContestantError::EngineCommunication(_)
                | ContestantError::EngineTimeout(_)
        )
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            ContestantError::Bind(_) => exit_codes::BIND,
            ContestantError::EngineLaunch(_) | ContestantError::EngineNotRunning(_) => {
                exit_codes::ENGINE_LAUNCH
            }
            ContestantError::Config(_) | ContestantError::Serialization(_) => exit_codes::CONFIG,
            ContestantError::Connection(_)
            | ContestantError::EngineCommunication(_)
            | ContestantError::EngineTimeout(_) => exit_codes::GAME_ABORTED,
        }
    }
}

impl From<serde_json::Error> for ContestantError {
    fn from(err: serde_json::Error) -> Self {
        ContestantError::Serialization(err.to_string())
    }
}

/// Process exit codes for the contestant binary
pub mod exit_codes {
    pub const OK: u8 = 0;
    pub const USAGE: u8 = 2;
    pub const BIND: u8 = 3;
    pub const ENGINE_LAUNCH: u8 = 4;
    pub const CONFIG: u8 = 5;
    pub const GAME_ABORTED: u8 = 6;
}
