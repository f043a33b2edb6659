//! # CLI Error Type
//!
//! One error type for every command, with a process exit code.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in billsplit                              │
//! │                                                                         │
//! │  ValidationError ──► CoreError ──┐                                      │
//! │                                  │                                      │
//! │  StoreError ─────────────────────┼──► CliError ──► stderr + exit code   │
//! │                                  │                                      │
//! │  config / bill file problems ────┘                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use billsplit_core::{CoreError, ValidationError};
use billsplit_store::StoreError;
use thiserror::Error;

/// Exit code classes, for scripts wrapping the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Something unexpected (I/O, serialization).
    Internal,

    /// Bad input: amounts, Pix key, bill file contents.
    Validation,

    /// Bad or unreadable configuration.
    Config,

    /// Bill id not in the history.
    NotFound,
}

impl ErrorCode {
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCode::Internal => 1,
            ErrorCode::Validation => 2,
            ErrorCode::Config => 3,
            ErrorCode::NotFound => 4,
        }
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Cannot encode config: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid bill file {path}: {source}")]
    BillFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),

    #[error("No Pix key given: pass --key or set pix.key in the config file")]
    MissingPixKey,

    #[error("Output failed: {0}")]
    Output(#[from] std::io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CliError::Core(CoreError::ItemNotFound(_))
            | CliError::Core(CoreError::ParticipantNotFound(_)) => ErrorCode::NotFound,
            CliError::Core(_)
            | CliError::Validation(_)
            | CliError::BillFile { .. }
            | CliError::InvalidAmount(_)
            | CliError::MissingPixKey => ErrorCode::Validation,
            CliError::Store(e) if e.is_not_found() => ErrorCode::NotFound,
            CliError::Store(StoreError::Corrupt { .. }) => ErrorCode::Validation,
            CliError::Config(_)
            | CliError::ConfigNotFound(_)
            | CliError::ConfigParse(_)
            | CliError::ConfigEncode(_) => ErrorCode::Config,
            CliError::Store(_) | CliError::Io { .. } | CliError::Output(_) | CliError::Json(_) => {
                ErrorCode::Internal
            }
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
