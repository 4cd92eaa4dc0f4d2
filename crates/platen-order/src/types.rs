//! Shared order types
//!
//! Defines the identifiers and records that flow between the parser,
//! the session engine, and the pricing engine.

use serde::{Deserialize, Serialize};

/// Session identifier (the external chat/user identity)
///
/// Sessions are keyed by the identity the messaging transport reports;
/// the engine never generates these itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub i64);

impl SessionId {
    /// Wrap a raw chat identifier
    #[inline]
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl From<i64> for SessionId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One line of a parsed order
///
/// Insertion order of lines is significant: the receipt lists items in
/// the order the customer wrote them. Duplicate names are kept as
/// separate lines; only the derived required-item *set* collapses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Item name (may contain internal whitespace)
    pub name: String,
    /// Requested quantity
    pub quantity: u64,
}

impl OrderLine {
    /// Create new order line
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, quantity: u64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

impl std::fmt::Display for OrderLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.quantity)
    }
}
