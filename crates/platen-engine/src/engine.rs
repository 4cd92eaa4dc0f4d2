//! Session engine
//!
//! Sequences the six inbound events per session — start, order
//! submission, file delivery, non-file input, finish, reset — and
//! maintains the session invariants. Every event takes the session's
//! mutex once and mutates delivered files, debounce bookkeeping, and
//! the pending prompt handle inside that single critical section, so
//! two refresh actions can never race to claim the current prompt.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::messenger::Messenger;
use crate::render::{ReceiptMeta, ReceiptRenderer};
use crate::session::{Phase, SessionState};
use crate::store::{SessionHandle, SessionStore};
use platen_order::{parse_order, SessionId};
use platen_pricing::{price_order, MassEstimator, RateTable};
use std::path::Path;
use std::sync::Arc;

/// Prompt texts shown to the user
pub mod prompts {
    /// Shown on start and reset
    pub const ORDER_INSTRUCTIONS: &str = "Enter the list of part names without extension, one per line:\n\
         PartName1 quantity\n\
         PartName2 quantity\n\
         ...";
    /// Shown when order text fails to parse
    pub const ORDER_REJECTED: &str = "Invalid format. Please enter the order again.";
    /// The actionable finish prompt
    pub const FINISH_WHEN_READY: &str =
        "When you have uploaded all the files, use the finish button below.";
    /// Shown for non-file input while uploads are expected
    pub const UPLOAD_OR_FINISH: &str =
        "Please upload model files or use the finish button below.";
    /// Shown after a reset
    pub const RESET_DONE: &str = "Process reset. Enter the part list:";
    /// Shown once the receipt has been delivered
    pub const COMPLETED: &str = "Done!";
    /// Shown when pricing aborts on an estimation failure
    pub const PRICING_FAILED: &str =
        "Could not generate the receipt. Check the uploaded files and try again.";
    /// Shown for events that need an open order
    pub const NO_ORDER_IN_PROGRESS: &str = "No order in progress. Start a new order first.";
    /// Shown when order text arrives while uploads are expected
    pub const ORDER_ALREADY_OPEN: &str =
        "An order is already in progress. Upload files, finish, or reset.";
}

/// The per-session order workflow engine
///
/// Owns the session store and the collaborator seams. Cheap to share:
/// wrap in an [`Arc`]; `deliver` needs the `Arc` receiver to spawn its
/// debounce timer.
pub struct SessionEngine {
    config: EngineConfig,
    store: SessionStore,
    messenger: Arc<dyn Messenger>,
    estimator: Arc<dyn MassEstimator>,
    renderer: Arc<dyn ReceiptRenderer>,
    rates: RateTable,
}

impl SessionEngine {
    /// Create engine over its collaborators
    #[must_use]
    pub fn new(
        config: EngineConfig,
        messenger: Arc<dyn Messenger>,
        estimator: Arc<dyn MassEstimator>,
        renderer: Arc<dyn ReceiptRenderer>,
        rates: RateTable,
    ) -> Self {
        Self {
            config,
            store: SessionStore::new(),
            messenger,
            estimator,
            renderer,
            rates,
        }
    }

    /// Engine configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Session store (sessions are created on first contact)
    #[inline]
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Current phase of a session
    pub async fn phase(&self, id: SessionId) -> Phase {
        self.store.session(id).lock().await.phase
    }

    /// `start` event: begin a fresh order workflow
    ///
    /// Clears all session state (cancelling any live timer, retracting
    /// any live prompt) and asks for the order text.
    ///
    /// # Errors
    /// Transport failure while issuing the instructions prompt.
    pub async fn start(&self, id: SessionId) -> Result<(), EngineError> {
        let session = self.store.session(id);
        let mut state = session.lock().await;

        self.retract_pending(id, &mut state).await;
        state.clear_to_awaiting_order();
        self.messenger
            .issue_prompt(id, prompts::ORDER_INSTRUCTIONS, false)
            .await?;
        tracing::info!(session = %id, "session started");
        Ok(())
    }

    /// `submit_order` event: parse order text and move to uploads
    ///
    /// On parse failure the session is unchanged and the user is asked
    /// to retry. On success the engine lists the expected files and
    /// issues the actionable finish prompt.
    ///
    /// # Errors
    /// Transport failure while prompting.
    pub async fn submit_order(&self, id: SessionId, text: &str) -> Result<(), EngineError> {
        let session = self.store.session(id);
        let mut state = session.lock().await;

        match state.phase {
            Phase::AwaitingOrder => {}
            Phase::Idle => {
                self.messenger
                    .issue_prompt(id, prompts::NO_ORDER_IN_PROGRESS, false)
                    .await?;
                return Ok(());
            }
            Phase::AwaitingFiles => {
                self.messenger
                    .issue_prompt(id, prompts::ORDER_ALREADY_OPEN, false)
                    .await?;
                return Ok(());
            }
        }

        let lines = match parse_order(text) {
            Ok(lines) => lines,
            Err(e) => {
                tracing::debug!(session = %id, error = %e, "order rejected");
                self.messenger
                    .issue_prompt(id, prompts::ORDER_REJECTED, false)
                    .await?;
                return Ok(());
            }
        };

        let names: Vec<&str> = lines.iter().map(|l| l.name.as_str()).collect();
        let listing = format!("Order accepted. Now upload the files:\n{}", names.join("\n"));
        state.begin_order(lines);

        self.messenger.issue_prompt(id, &listing, false).await?;
        self.replace_prompt(id, &mut state, prompts::FINISH_WHEN_READY, true)
            .await?;
        tracing::info!(
            session = %id,
            items = state.required_items.len(),
            "order accepted, awaiting files"
        );
        Ok(())
    }

    /// `deliver` event: one uploaded file
    ///
    /// Rejects filenames without the accepted model extension
    /// (case-insensitive) or carrying path components with no state
    /// change. Accepted files are
    /// persisted to the models directory, appended to the delivery
    /// history, reported against the requirement, and the debounced
    /// prompt refresh is (re)scheduled.
    ///
    /// # Errors
    /// - [`EngineError::Upload`] if the file cannot be persisted
    /// - Transport failure while prompting
    pub async fn deliver(
        self: &Arc<Self>,
        id: SessionId,
        filename: &str,
        bytes: &[u8],
    ) -> Result<(), EngineError> {
        let session = self.store.session(id);
        let mut state = session.lock().await;

        if state.phase != Phase::AwaitingFiles {
            self.messenger
                .issue_prompt(id, prompts::NO_ORDER_IN_PROGRESS, false)
                .await?;
            return Ok(());
        }

        if !is_plain_filename(filename)
            || !has_accepted_extension(filename, &self.config.model_extension)
        {
            tracing::debug!(session = %id, filename, "upload rejected");
            let text = format!(
                "File {filename} is not an {} model. Skipped.",
                self.config.model_extension.to_uppercase()
            );
            self.messenger.issue_prompt(id, &text, false).await?;
            return Ok(());
        }

        self.persist_upload(filename, bytes).await?;
        state.delivered_files.push(filename.to_string());

        let reconciliation = state.reconcile();
        let remaining = if reconciliation.missing.is_empty() {
            "all files are uploaded!".to_string()
        } else {
            reconciliation
                .missing
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join("\n")
        };
        self.messenger
            .issue_prompt(
                id,
                &format!("File {filename} uploaded.\nRemaining:\n{remaining}"),
                false,
            )
            .await?;

        self.schedule_refresh(id, &session, &mut state);
        tracing::debug!(
            session = %id,
            filename,
            missing = reconciliation.missing.len(),
            "file delivered"
        );
        Ok(())
    }

    /// `non_file_input` event: text or other noise during uploads
    ///
    /// Immediately (no debounce) replaces the stale prompt with the
    /// upload-or-finish reminder.
    ///
    /// # Errors
    /// Transport failure while prompting.
    pub async fn non_file_input(&self, id: SessionId) -> Result<(), EngineError> {
        let session = self.store.session(id);
        let mut state = session.lock().await;

        if state.phase != Phase::AwaitingFiles {
            self.messenger
                .issue_prompt(id, prompts::NO_ORDER_IN_PROGRESS, false)
                .await?;
            return Ok(());
        }

        self.replace_prompt(id, &mut state, prompts::UPLOAD_OR_FINISH, true)
            .await
    }

    /// `finish` event: attempt to complete the order
    ///
    /// Missing items block completion and are listed first; extra
    /// items are only reported once nothing is missing (deliberate
    /// precedence). On an exact match the order is priced, the receipt
    /// rendered and delivered, and the session cleared to idle. An
    /// estimation failure aborts the attempt and leaves the session
    /// awaiting files.
    ///
    /// # Errors
    /// - Transport failure while prompting or delivering the document
    /// - [`EngineError::Render`] if the renderer fails
    pub async fn finish(&self, id: SessionId) -> Result<(), EngineError> {
        let session = self.store.session(id);
        let mut state = session.lock().await;

        if state.phase != Phase::AwaitingFiles {
            self.messenger
                .issue_prompt(id, prompts::NO_ORDER_IN_PROGRESS, false)
                .await?;
            return Ok(());
        }

        let reconciliation = state.reconcile();
        if !reconciliation.missing.is_empty() {
            let listing = reconciliation
                .missing
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join("\n");
            self.replace_prompt(id, &mut state, &format!("Not yet uploaded:\n{listing}"), true)
                .await?;
            return Ok(());
        }
        if !reconciliation.extra.is_empty() {
            let listing = reconciliation
                .extra
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            self.replace_prompt(id, &mut state, &format!("Extra files: {listing}."), true)
                .await?;
            return Ok(());
        }

        let receipt = match price_order(
            &state.order_lines,
            &self.config.material,
            self.estimator.as_ref(),
            &self.rates,
        ) {
            Ok(receipt) => receipt,
            Err(e) => {
                // Abort this attempt; never deliver a receipt with wrong data.
                tracing::error!(session = %id, error = %e, "pricing failed");
                self.messenger
                    .issue_prompt(id, prompts::PRICING_FAILED, false)
                    .await?;
                return Ok(());
            }
        };

        let meta = ReceiptMeta {
            executor: self.config.executor.clone(),
            customer: self.config.customer.clone(),
            printed_on: chrono::Local::now().date_naive(),
        };
        let document = self.renderer.render(&receipt, &meta)?;

        self.retract_pending(id, &mut state).await;
        self.messenger
            .deliver_document(id, &format!("receipt-{}.txt", receipt.id), &document)
            .await?;
        state.clear_to_idle();
        self.messenger
            .issue_prompt(id, prompts::COMPLETED, false)
            .await?;
        tracing::info!(
            session = %id,
            receipt = %receipt.id,
            total = receipt.total,
            "order completed"
        );
        Ok(())
    }

    /// `reset` event: abandon the current workflow from any state
    ///
    /// Cancels any live timer, retracts any live prompt, clears the
    /// required/delivered state, and waits for a new order.
    ///
    /// # Errors
    /// Transport failure while issuing the reset prompt.
    pub async fn reset(&self, id: SessionId) -> Result<(), EngineError> {
        let session = self.store.session(id);
        let mut state = session.lock().await;

        self.retract_pending(id, &mut state).await;
        state.clear_to_awaiting_order();
        self.messenger
            .issue_prompt(id, prompts::RESET_DONE, false)
            .await?;
        tracing::info!(session = %id, "session reset");
        Ok(())
    }

    /// Schedule the debounced finish-prompt refresh for a session
    ///
    /// Supersedes any outstanding timer; the new timer re-checks its
    /// generation under the session lock before acting, so a timer
    /// superseded or reset while sleeping (or while waiting on the
    /// lock) does nothing.
    fn schedule_refresh(
        self: &Arc<Self>,
        id: SessionId,
        session: &SessionHandle,
        state: &mut SessionState,
    ) {
        let generation = state.debounce.supersede();
        let engine = Arc::clone(self);
        let session = Arc::clone(session);
        let delay = self.config.debounce_delay;

        state.debounce.arm(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = session.lock().await;
            if !state.debounce.try_fire(generation) {
                return;
            }
            if let Err(e) = engine
                .replace_prompt(id, &mut state, prompts::FINISH_WHEN_READY, true)
                .await
            {
                tracing::warn!(session = %id, error = %e, "debounced prompt refresh failed");
            }
        }));
    }

    /// Retract the session's pending prompt, best effort
    ///
    /// The `Result` of the retraction is deliberately discarded: a
    /// prompt the user already removed is not an error.
    async fn retract_pending(&self, id: SessionId, state: &mut SessionState) {
        if let Some(handle) = state.pending_prompt.take() {
            if let Err(e) = self.messenger.retract_prompt(id, handle).await {
                tracing::debug!(session = %id, %handle, error = %e, "prompt retraction failed");
            }
        }
    }

    /// Retract the stale prompt and issue a replacement, recording it
    async fn replace_prompt(
        &self,
        id: SessionId,
        state: &mut SessionState,
        text: &str,
        actionable: bool,
    ) -> Result<(), EngineError> {
        self.retract_pending(id, state).await;
        let handle = self.messenger.issue_prompt(id, text, actionable).await?;
        state.pending_prompt = Some(handle);
        Ok(())
    }

    /// Persist an accepted upload under the models directory
    async fn persist_upload(&self, filename: &str, bytes: &[u8]) -> Result<(), EngineError> {
        let upload_err = |source: std::io::Error| EngineError::Upload {
            filename: filename.to_string(),
            source,
        };
        tokio::fs::create_dir_all(&self.config.models_dir)
            .await
            .map_err(upload_err)?;
        tokio::fs::write(self.config.models_dir.join(filename), bytes)
            .await
            .map_err(upload_err)?;
        Ok(())
    }
}

impl std::fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEngine")
            .field("config", &self.config)
            .field("sessions", &self.store.len())
            .finish_non_exhaustive()
    }
}

/// Case-insensitive extension check against the accepted model extension
fn has_accepted_extension(filename: &str, extension: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// True when `filename` is a bare file name with no path components
///
/// Delivered names are joined onto the models directory, so anything
/// carrying a separator or `..` must never reach the join.
fn is_plain_filename(filename: &str) -> bool {
    !filename.contains('\\') && Path::new(filename).file_name().is_some_and(|n| n == filename)
}
