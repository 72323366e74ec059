use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid field path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("invalid link-qualified field path `{0}`: expected `<resourceName>::<fieldPath>`")]
    InvalidQualifiedPath(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
