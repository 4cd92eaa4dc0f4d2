//! Error types for mesh reading

/// Errors produced while reading a model file
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// Model file does not exist
    #[error("model file not found: {path}")]
    FileNotFound {
        /// Path that was resolved
        path: String,
    },

    /// Bytes are neither valid binary nor valid ASCII STL
    #[error("malformed STL data: {0}")]
    Malformed(String),

    /// Underlying I/O failure other than not-found
    #[error("i/o error reading model: {0}")]
    Io(#[from] std::io::Error),
}
