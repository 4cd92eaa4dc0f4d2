//! Platen Pricing - from order lines to a priced receipt
//!
//! Given the finalized order lines, this crate:
//! - Estimates the printed mass of each item through the
//!   [`MassEstimator`] seam (STL-backed by default)
//! - Applies a per-material rate table with ceiling rounding at the
//!   gram and currency steps
//! - Groups bill lines by material and totals them into a [`Receipt`]
//!
//! # Example
//!
//! ```rust,ignore
//! use platen_pricing::{price_order, RateTable, StlMassEstimator};
//!
//! let estimator = StlMassEstimator::new("data/models", "stl");
//! let receipt = price_order(&lines, "PETG", &estimator, &RateTable::default())?;
//! println!("total: {}", receipt.total);
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod estimator;
pub mod price;
pub mod rates;
pub mod receipt;

// Re-exports for convenience
pub use estimator::{EstimationError, MassEstimator, StlMassEstimator};
pub use price::{price_order, PricingError};
pub use rates::{MaterialRate, RateTable};
pub use receipt::{BillLine, MaterialGroup, Receipt, ReceiptId, NAME_WRAP_WIDTH};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
