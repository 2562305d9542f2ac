//! Error types for training, persisting and loading models.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Model file exists but could not be decoded
    #[error("Failed to load model from {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Cannot build a train set from zero ratings")]
    EmptyTrainSet,

    #[error("Invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
