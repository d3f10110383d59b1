use std::path::PathBuf;

use hangartrack_engine::EngineError;
use thiserror::Error;

/// Process exit codes.
pub struct ExitCode;

impl ExitCode {
    pub const SUCCESS: i32 = 0;
    pub const ERROR: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
    pub const IO_ERROR: i32 = 3;
    pub const USAGE_ERROR: i32 = 64;
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("cannot read config {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no {kind} with id {id:?}")]
    UnknownItem { kind: &'static str, id: String },

    #[error("{0} is irreversible; pass --yes to confirm")]
    NotConfirmed(&'static str),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Engine(EngineError::Core(_)) | Self::Config { .. } => ExitCode::CONFIG_ERROR,
            Self::Engine(EngineError::ConfirmationRequired) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::UnknownItem { .. } | Self::NotConfirmed(_) => ExitCode::USAGE_ERROR,
            Self::Engine(_) => ExitCode::ERROR,
        }
    }
}
