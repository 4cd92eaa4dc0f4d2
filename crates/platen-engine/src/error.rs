//! Error types for the session engine
//!
//! Most user mistakes (bad order text, wrong file type, incomplete
//! uploads) are answered with corrective prompts and are not errors at
//! this level. `EngineError` covers the failures the engine cannot
//! handle by prompting: transport loss, upload persistence, rendering.

use crate::messenger::PromptHandle;

/// Errors reported by a messaging transport
#[derive(Debug, thiserror::Error)]
pub enum MessengerError {
    /// The prompt to retract no longer exists
    ///
    /// Swallowed at every retraction site; stale prompts disappearing
    /// (e.g. deleted by the user) is expected.
    #[error("prompt not found: {0}")]
    PromptNotFound(PromptHandle),

    /// Transport-level delivery failure
    #[error("transport failed: {0}")]
    Transport(String),
}

/// Errors reported by a receipt renderer
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Rendering failed
    #[error("render failed: {0}")]
    Failed(String),
}

/// Errors escalated by the session engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Messenger transport failure while issuing a prompt or document
    #[error("messenger error: {0}")]
    Messenger(#[from] MessengerError),

    /// Failed to persist an accepted upload
    #[error("failed to store upload '{filename}': {source}")]
    Upload {
        /// Filename as delivered
        filename: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Receipt rendering failure on an otherwise complete finish
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}
