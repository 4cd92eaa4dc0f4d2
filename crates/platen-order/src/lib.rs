//! Platen Order - order intake primitives
//!
//! The pure leaf of the workspace:
//! - Parses free-text orders into ordered (name, quantity) lines
//! - Reconciles required item names against delivered filenames
//! - Defines the shared order types used by the engine and pricing crates
//!
//! # Example
//!
//! ```rust
//! use platen_order::{parse_order, reconcile};
//! use std::collections::BTreeSet;
//!
//! let lines = parse_order("bracket 2\nclamp 1").unwrap();
//! let required: BTreeSet<String> = lines.iter().map(|l| l.name.clone()).collect();
//!
//! let report = reconcile(&required, ["bracket.stl"].into_iter());
//! assert_eq!(report.missing.iter().next().map(String::as_str), Some("clamp"));
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod parser;
pub mod reconcile;
pub mod types;

// Re-exports for convenience
pub use parser::{parse_order, ParseError};
pub use reconcile::{normalize_delivered_name, reconcile, Reconciliation};
pub use types::{OrderLine, SessionId};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
