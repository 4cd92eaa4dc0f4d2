//! Console messenger
//!
//! Stdout-backed [`Messenger`] for the CLI. Prompts print as lines;
//! actionable prompts advertise the `/done` command in place of a
//! button. Retraction cannot unprint, so it only invalidates the
//! handle (and reports `PromptNotFound` for unknown ones, matching a
//! real transport).

use crate::error::MessengerError;
use crate::messenger::{Messenger, PromptHandle};
use async_trait::async_trait;
use parking_lot::Mutex;
use platen_order::SessionId;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

/// Messenger printing to stdout
#[derive(Debug, Default)]
pub struct ConsoleMessenger {
    next_handle: AtomicU64,
    live: Mutex<HashSet<PromptHandle>>,
}

impl ConsoleMessenger {
    /// Create console messenger
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn issue_prompt(
        &self,
        session: SessionId,
        text: &str,
        actionable: bool,
    ) -> Result<PromptHandle, MessengerError> {
        let handle = PromptHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.live.lock().insert(handle);

        println!("[{session}] {text}");
        if actionable {
            println!("[{session}] (type /done to finish uploading)");
        }
        Ok(handle)
    }

    async fn retract_prompt(
        &self,
        _session: SessionId,
        handle: PromptHandle,
    ) -> Result<(), MessengerError> {
        if self.live.lock().remove(&handle) {
            Ok(())
        } else {
            Err(MessengerError::PromptNotFound(handle))
        }
    }

    async fn deliver_document(
        &self,
        session: SessionId,
        filename: &str,
        bytes: &[u8],
    ) -> Result<(), MessengerError> {
        println!("[{session}] --- document: {filename} ---");
        println!("{}", String::from_utf8_lossy(bytes));
        println!("[{session}] --- end of document ---");
        Ok(())
    }
}
