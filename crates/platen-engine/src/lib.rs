//! Platen Engine - the order session state machine
//!
//! The stateful core of the workspace:
//! - Owns per-session state (phase, required items, delivered files,
//!   the pending prompt handle) behind a per-session critical section
//! - Sequences the inbound events: start, order submission, file
//!   delivery, non-file input, finish, reset
//! - Debounces prompt refreshes behind a cancellable timer so a burst
//!   of uploads yields one refresh
//! - Prices and renders the receipt once delivered files match the
//!   order exactly
//!
//! # Example
//!
//! ```rust,ignore
//! use platen_engine::{ConsoleMessenger, EngineConfig, PlainTextRenderer, SessionEngine};
//! use platen_pricing::{RateTable, StlMassEstimator};
//! use std::sync::Arc;
//!
//! let config = EngineConfig::default();
//! let estimator = StlMassEstimator::new(&config.models_dir, &config.model_extension);
//! let engine = Arc::new(SessionEngine::new(
//!     config,
//!     Arc::new(ConsoleMessenger::new()),
//!     Arc::new(estimator),
//!     Arc::new(PlainTextRenderer),
//!     RateTable::default(),
//! ));
//!
//! engine.start(1.into()).await?;
//! engine.submit_order(1.into(), "bracket 2\nclamp 1").await?;
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod config;
pub mod console;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod messenger;
pub mod render;
pub mod session;
pub mod store;

// Re-exports for convenience
pub use config::EngineConfig;
pub use console::ConsoleMessenger;
pub use debounce::DebounceControl;
pub use engine::SessionEngine;
pub use error::{EngineError, MessengerError, RenderError};
pub use messenger::{Messenger, PromptHandle};
pub use render::{PlainTextRenderer, ReceiptMeta, ReceiptRenderer};
pub use session::{Phase, SessionState};
pub use store::SessionStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
