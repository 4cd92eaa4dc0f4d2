//! Required/delivered reconciliation
//!
//! Computes which required items are still missing and which delivered
//! files do not belong to the order. Filenames are normalized to their
//! base name before comparison.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Result of reconciling required items against delivered filenames
///
/// Both sets enumerate lexicographically (`BTreeSet`), giving stable
/// output for display and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Required items with no delivered file
    pub missing: BTreeSet<String>,
    /// Delivered base names not present in the order
    pub extra: BTreeSet<String>,
}

impl Reconciliation {
    /// True when delivered files match the requirement exactly
    #[inline]
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// Normalize a delivered filename to its base name
///
/// Drops everything after the *last* `.`; a name with no dot is
/// returned unchanged. Part names containing literal dots therefore
/// lose their final segment; that matches the upload-side convention
/// of "item name + one extension".
#[inline]
#[must_use]
pub fn normalize_delivered_name(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) => &filename[..idx],
        None => filename,
    }
}

/// Reconcile required item names against delivered filenames
///
/// `missing = required − normalized(delivered)`;
/// `extra = normalized(delivered) − required`. Duplicate deliveries
/// normalizing to the same name count as satisfied once.
pub fn reconcile<'a>(
    required: &BTreeSet<String>,
    delivered: impl Iterator<Item = &'a str>,
) -> Reconciliation {
    let normalized: BTreeSet<&str> = delivered.map(normalize_delivered_name).collect();

    let missing = required
        .iter()
        .filter(|name| !normalized.contains(name.as_str()))
        .cloned()
        .collect();

    let extra = normalized
        .iter()
        .filter(|name| !required.contains(**name))
        .map(|name| (*name).to_string())
        .collect();

    Reconciliation { missing, extra }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    fn names(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn normalize_strips_extension() {
        assert_eq!(normalize_delivered_name("bracket.stl"), "bracket");
        assert_eq!(normalize_delivered_name("bracket.STL"), "bracket");
    }

    #[test]
    fn normalize_drops_after_last_dot_only() {
        assert_eq!(normalize_delivered_name("bracket.v2.stl"), "bracket.v2");
    }

    #[test]
    fn normalize_without_dot_is_unchanged() {
        assert_eq!(normalize_delivered_name("bracket"), "bracket");
    }

    #[test]
    fn normalize_leading_dot() {
        assert_eq!(normalize_delivered_name(".hidden"), "");
    }

    #[test]
    fn reconcile_reports_missing() {
        let rec = reconcile(&required(&["bracket", "clamp"]), ["bracket.stl"].into_iter());
        assert_eq!(names(&rec.missing), vec!["clamp"]);
        assert!(rec.extra.is_empty());
        assert!(!rec.is_exact());
    }

    #[test]
    fn reconcile_reports_extra() {
        let rec = reconcile(&required(&["bracket"]), ["widget.stl"].into_iter());
        assert_eq!(names(&rec.missing), vec!["bracket"]);
        assert_eq!(names(&rec.extra), vec!["widget"]);
    }

    #[test]
    fn reconcile_exact_match() {
        let rec = reconcile(
            &required(&["bracket", "clamp"]),
            ["clamp.stl", "bracket.stl"].into_iter(),
        );
        assert!(rec.is_exact());
    }

    #[test]
    fn reconcile_duplicate_deliveries_count_once() {
        let rec = reconcile(
            &required(&["bracket", "clamp"]),
            ["bracket.stl", "bracket.stl", "bracket.STL"].into_iter(),
        );
        assert_eq!(names(&rec.missing), vec!["clamp"]);
        assert!(rec.extra.is_empty());
    }

    #[test]
    fn reconcile_is_case_sensitive_on_names() {
        let rec = reconcile(&required(&["Bracket"]), ["bracket.stl"].into_iter());
        assert_eq!(names(&rec.missing), vec!["Bracket"]);
        assert_eq!(names(&rec.extra), vec!["bracket"]);
    }

    #[test]
    fn reconcile_empty_inputs() {
        let rec = reconcile(&BTreeSet::new(), std::iter::empty());
        assert!(rec.is_exact());
    }

    #[test]
    fn reconcile_sets_enumerate_sorted() {
        let rec = reconcile(
            &required(&["zeta", "alpha", "mid"]),
            ["extra-b.stl", "extra-a.stl"].into_iter(),
        );
        assert_eq!(names(&rec.missing), vec!["alpha", "mid", "zeta"]);
        assert_eq!(names(&rec.extra), vec!["extra-a", "extra-b"]);
    }
}
