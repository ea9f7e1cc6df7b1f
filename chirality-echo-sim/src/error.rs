//! Error types for the CEP simulator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring, running or exporting a simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot parse configuration {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Grid data length mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Ensemble requires at least one cycle")]
    NoCycles,

    #[error("Malformed .npy data: {0}")]
    Npy(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for simulator operations.
pub type Result<T> = std::result::Result<T, SimError>;
