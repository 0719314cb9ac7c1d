//! Error types for code generation.

use mavdl_schema::SchemaError;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Loading, normalizing or validating the dialect failed.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Writing an artifact failed.
    #[error("cannot write {}: {source}", .path.display())]
    Io {
        /// Path being written.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The model cannot be expressed in the target language.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },

    /// No emitter exists for the requested target.
    #[error("unknown target '{name}'")]
    UnknownTarget {
        /// Requested target name.
        name: String,
    },
}

impl CodegenError {
    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }
}
