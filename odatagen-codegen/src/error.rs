//! Error types for code generation.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Metadata parsing or schema lookup error.
    #[error("schema error: {0}")]
    Schema(#[from] odatagen_schema::SchemaError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The output directory has no usable final path segment.
    #[error("cannot derive a module name from output path '{}'", .path.display())]
    InvalidOutputPath {
        /// Offending path.
        path: PathBuf,
    },
}
