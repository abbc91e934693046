use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShioriError {
    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
