use hangartrack_core::CoreError;
use hangartrack_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The message is meant for the user; `reason` is for logs.
    #[error("Invalid backup file. Expected an Exec Hangar Tracker JSON export.")]
    InvalidImport { reason: String },

    #[error("reset requires explicit confirmation")]
    ConfirmationRequired,
}
