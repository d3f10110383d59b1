use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
