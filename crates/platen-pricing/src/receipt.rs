//! Receipt data model
//!
//! A [`Receipt`] is the priced outcome of an order: one [`BillLine`]
//! per order line (in order), a grand total, and grouping by material
//! for the renderer.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Character budget for a bill line's display name before soft-wrapping
pub const NAME_WRAP_WIDTH: usize = 25;

/// Unique receipt identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReceiptId(pub Ulid);

impl ReceiptId {
    /// Generate new receipt ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ReceiptId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One priced entry in the receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillLine {
    /// Item name exactly as ordered
    pub name: String,
    /// Soft-wrapped name for display (`\n`-joined segments)
    pub display_name: String,
    /// Ordered quantity
    pub quantity: u64,
    /// Material the line was priced as
    pub material: String,
    /// Grams per unit, rounded up to a whole gram
    pub unit_grams: u64,
    /// Rate applied, in currency units per gram
    pub rate_per_gram: f64,
    /// Line price in whole currency units (ceiling-rounded)
    pub price: u64,
}

/// Bill lines sharing a material, for the renderer's grouped table
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialGroup<'a> {
    /// Material name
    pub material: &'a str,
    /// Lines in receipt order
    pub lines: Vec<&'a BillLine>,
    /// Sum of the group's line prices
    pub subtotal: u64,
}

/// Priced receipt for one completed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Receipt identifier
    pub id: ReceiptId,
    /// Bill lines in the order the customer wrote them
    pub lines: Vec<BillLine>,
    /// Exact sum of line prices (not re-rounded)
    pub total: u64,
}

impl Receipt {
    /// Group bill lines by material, in first-appearance order
    #[must_use]
    pub fn material_groups(&self) -> Vec<MaterialGroup<'_>> {
        let mut groups: Vec<MaterialGroup<'_>> = Vec::new();
        for line in &self.lines {
            match groups.iter_mut().find(|g| g.material == line.material) {
                Some(group) => {
                    group.lines.push(line);
                    group.subtotal += line.price;
                }
                None => groups.push(MaterialGroup {
                    material: &line.material,
                    lines: vec![line],
                    subtotal: line.price,
                }),
            }
        }
        groups
    }
}

/// Soft-wrap a name into fixed-width segments joined by line breaks
///
/// Display only; pricing never looks at the wrapped form. Splits on
/// character boundaries, so multi-byte names wrap safely.
#[must_use]
pub(crate) fn wrap_display_name(name: &str, width: usize) -> String {
    if width == 0 || name.chars().count() <= width {
        return name.to_string();
    }
    let chars: Vec<char> = name.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, material: &str, price: u64) -> BillLine {
        BillLine {
            name: name.to_string(),
            display_name: name.to_string(),
            quantity: 1,
            material: material.to_string(),
            unit_grams: 10,
            rate_per_gram: 3.0,
            price,
        }
    }

    #[test]
    fn wrap_short_name_is_unchanged() {
        assert_eq!(wrap_display_name("bracket", NAME_WRAP_WIDTH), "bracket");
    }

    #[test]
    fn wrap_exact_width_is_unchanged() {
        let name = "a".repeat(NAME_WRAP_WIDTH);
        assert_eq!(wrap_display_name(&name, NAME_WRAP_WIDTH), name);
    }

    #[test]
    fn wrap_long_name_splits_at_width() {
        let name = "a".repeat(30);
        let wrapped = wrap_display_name(&name, NAME_WRAP_WIDTH);
        assert_eq!(wrapped, format!("{}\n{}", "a".repeat(25), "a".repeat(5)));
    }

    #[test]
    fn wrap_counts_characters_not_bytes() {
        let name = "д".repeat(26);
        let wrapped = wrap_display_name(&name, NAME_WRAP_WIDTH);
        let segments: Vec<_> = wrapped.split('\n').collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].chars().count(), 25);
        assert_eq!(segments[1].chars().count(), 1);
    }

    #[test]
    fn material_groups_follow_first_appearance() {
        let receipt = Receipt {
            id: ReceiptId::new(),
            lines: vec![
                line("a", "PETG", 10),
                line("b", "PLA", 20),
                line("c", "PETG", 30),
            ],
            total: 60,
        };

        let groups = receipt.material_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].material, "PETG");
        assert_eq!(groups[0].subtotal, 40);
        assert_eq!(groups[1].material, "PLA");
        assert_eq!(groups[1].subtotal, 20);
    }

    #[test]
    fn material_groups_keep_line_order() {
        let receipt = Receipt {
            id: ReceiptId::new(),
            lines: vec![line("first", "PETG", 1), line("second", "PETG", 2)],
            total: 3,
        };
        let groups = receipt.material_groups();
        assert_eq!(groups[0].lines[0].name, "first");
        assert_eq!(groups[0].lines[1].name, "second");
    }
}
