//! Error types for sources and protocol output

use std::io;
use thiserror::Error;

/// Failure to bring a source up. Isolated to that source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` was started without a stdout pipe")]
    MissingStdout { command: String },
}

/// Failure to encode or write protocol output. Fatal to the process.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to encode status frame: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write status output: {0}")]
    Io(#[from] io::Error),
}
