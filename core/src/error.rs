//! Error types surrounding the analysis core
//!
//! The analyzers themselves are total and never fail. Errors only come from
//! the collaborators around them: reading files, decoding images, parsing
//! configuration and serializing reports.

use thiserror::Error;

/// Errors that can occur while acquiring pixels or handling results
#[derive(Error, Debug)]
pub enum StegError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StegResult<T> = Result<T, StegError>;
