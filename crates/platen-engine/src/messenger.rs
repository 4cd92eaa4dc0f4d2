//! Messaging collaborator seam
//!
//! The engine talks to its user through a [`Messenger`]: it issues
//! prompts (optionally actionable, i.e. carrying a finish button),
//! retracts stale prompts best-effort, and delivers the final receipt
//! document.

use crate::error::MessengerError;
use async_trait::async_trait;
use platen_order::SessionId;
use serde::{Deserialize, Serialize};

/// Opaque reference to an issued prompt
///
/// Owned exclusively by one session; the engine retracts the previous
/// handle before recording a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PromptHandle(pub u64);

impl std::fmt::Display for PromptHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "prompt#{}", self.0)
    }
}

/// Outbound messaging transport
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Show a prompt to the session's user
    ///
    /// `actionable` prompts carry the finish control.
    ///
    /// # Errors
    /// [`MessengerError::Transport`] if the message cannot be delivered.
    async fn issue_prompt(
        &self,
        session: SessionId,
        text: &str,
        actionable: bool,
    ) -> Result<PromptHandle, MessengerError>;

    /// Remove a previously issued prompt
    ///
    /// # Errors
    /// [`MessengerError::PromptNotFound`] if the prompt no longer
    /// exists; callers treat this as non-fatal.
    async fn retract_prompt(
        &self,
        session: SessionId,
        handle: PromptHandle,
    ) -> Result<(), MessengerError>;

    /// Deliver the receipt document to the session's user
    ///
    /// # Errors
    /// [`MessengerError::Transport`] on delivery failure.
    async fn deliver_document(
        &self,
        session: SessionId,
        filename: &str,
        bytes: &[u8],
    ) -> Result<(), MessengerError>;
}
