//! Per-session state
//!
//! One [`SessionState`] per user/chat, always accessed under its own
//! mutex (see [`crate::store`]). The state carries the workflow phase,
//! the parsed order, the delivery history, the pending prompt handle,
//! and the debounce timer bookkeeping.

use crate::debounce::DebounceControl;
use crate::messenger::PromptHandle;
use platen_order::{reconcile, OrderLine, Reconciliation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Workflow phase of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No order in progress
    #[default]
    Idle,
    /// Waiting for the order text
    AwaitingOrder,
    /// Order accepted, waiting for model files
    AwaitingFiles,
}

/// State of one order-to-completion workflow
///
/// Invariants (all maintained by the engine under the session lock):
/// - `required_items` is non-empty only while `phase != Idle`
/// - at most one live debounce timer exists at any instant
/// - `pending_prompt` refers to at most one externally visible prompt
#[derive(Debug, Default)]
pub struct SessionState {
    /// Current workflow phase
    pub phase: Phase,
    /// Unique item names derived from the order (case-sensitive)
    pub required_items: BTreeSet<String>,
    /// Order lines in the order the customer wrote them
    pub order_lines: Vec<OrderLine>,
    /// Filenames received so far (append-only while AwaitingFiles;
    /// may contain duplicates and extras)
    pub delivered_files: Vec<String>,
    /// Handle of the last actionable prompt issued for this session
    pub pending_prompt: Option<PromptHandle>,
    /// Debounce timer bookkeeping
    pub debounce: DebounceControl,
}

impl SessionState {
    /// Fresh idle session
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a parsed order and move to `AwaitingFiles`
    ///
    /// Duplicate names collapse into the required set but stay as
    /// separate order lines.
    pub fn begin_order(&mut self, lines: Vec<OrderLine>) {
        self.required_items = lines.iter().map(|l| l.name.clone()).collect();
        self.order_lines = lines;
        self.delivered_files.clear();
        self.phase = Phase::AwaitingFiles;
    }

    /// Reconcile required items against the delivery history
    #[inline]
    #[must_use]
    pub fn reconcile(&self) -> Reconciliation {
        reconcile(
            &self.required_items,
            self.delivered_files.iter().map(String::as_str),
        )
    }

    /// Clear everything back to `Idle` (order completed)
    ///
    /// Cancels any live debounce timer. The pending prompt handle is
    /// dropped; retracting it is the engine's job before calling this.
    pub fn clear_to_idle(&mut self) {
        self.debounce.cancel();
        self.required_items.clear();
        self.order_lines.clear();
        self.delivered_files.clear();
        self.pending_prompt = None;
        self.phase = Phase::Idle;
    }

    /// Clear everything and wait for a new order (start/reset)
    pub fn clear_to_awaiting_order(&mut self) {
        self.clear_to_idle();
        self.phase = Phase::AwaitingOrder;
    }
}
