//! Pricing engine
//!
//! Turns finalized order lines into a [`Receipt`]: one estimator call
//! per line, ceiling rounding at the gram and currency steps, exact
//! summation of the total.

use crate::estimator::{EstimationError, MassEstimator};
use crate::rates::RateTable;
use crate::receipt::{wrap_display_name, BillLine, Receipt, ReceiptId, NAME_WRAP_WIDTH};
use platen_order::OrderLine;

/// Errors produced while pricing an order
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    /// The assumed material has no entry in the rate table
    #[error("unknown material '{0}'")]
    UnknownMaterial(String),

    /// Mass estimation failed for an item
    #[error("estimation failed for item '{item}': {source}")]
    Estimation {
        /// Item that could not be estimated
        item: String,
        /// Underlying estimation error
        #[source]
        source: EstimationError,
    },
}

/// Price order lines into a receipt
///
/// For each line: estimate grams per unit at the material's density,
/// round up to a whole gram, then price
/// `ceil(unit_grams × quantity × rate_per_gram)` in whole currency
/// units. The total is the exact sum of line prices.
///
/// Pure aside from the one estimator call per line; neither the
/// estimator nor the rate table is mutated.
///
/// # Errors
/// - [`PricingError::UnknownMaterial`] if `material` is not in `rates`
/// - [`PricingError::Estimation`] if any line's mass cannot be estimated
pub fn price_order(
    lines: &[OrderLine],
    material: &str,
    estimator: &dyn MassEstimator,
    rates: &RateTable,
) -> Result<Receipt, PricingError> {
    let rate = rates
        .rate(material)
        .ok_or_else(|| PricingError::UnknownMaterial(material.to_string()))?;

    let mut bill_lines = Vec::with_capacity(lines.len());
    let mut total = 0u64;

    for line in lines {
        let grams = estimator
            .unit_mass_grams(&line.name, rate.density_g_cm3)
            .map_err(|source| PricingError::Estimation {
                item: line.name.clone(),
                source,
            })?;

        // Never round mass down; a 12.4 g part bills as 13 g.
        let unit_grams = grams.max(0.0).ceil() as u64;
        let price = (unit_grams as f64 * line.quantity as f64 * rate.rate_per_gram).ceil() as u64;
        total += price;

        bill_lines.push(BillLine {
            name: line.name.clone(),
            display_name: wrap_display_name(&line.name, NAME_WRAP_WIDTH),
            quantity: line.quantity,
            material: material.to_string(),
            unit_grams,
            rate_per_gram: rate.rate_per_gram,
            price,
        });
    }

    Ok(Receipt {
        id: ReceiptId::new(),
        lines: bill_lines,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::MaterialRate;
    use std::collections::BTreeMap;

    /// Estimator returning a fixed mass per item name
    struct TableEstimator {
        masses: BTreeMap<String, f64>,
    }

    impl TableEstimator {
        fn new(entries: &[(&str, f64)]) -> Self {
            Self {
                masses: entries
                    .iter()
                    .map(|(name, mass)| ((*name).to_string(), *mass))
                    .collect(),
            }
        }
    }

    impl MassEstimator for TableEstimator {
        fn unit_mass_grams(&self, item: &str, _density: f64) -> Result<f64, EstimationError> {
            self.masses
                .get(item)
                .copied()
                .ok_or_else(|| EstimationError::ModelNotFound {
                    item: item.to_string(),
                })
        }
    }

    #[test]
    fn prices_with_ceiling_rounding() {
        // 12.4 g/unit → 13 g; qty 2 at 3/g → 78.
        let estimator = TableEstimator::new(&[("bracket", 12.4)]);
        let receipt = price_order(
            &[OrderLine::new("bracket", 2)],
            "PETG",
            &estimator,
            &RateTable::default(),
        )
        .unwrap();

        assert_eq!(receipt.lines.len(), 1);
        let line = &receipt.lines[0];
        assert_eq!(line.unit_grams, 13);
        assert_eq!(line.price, 78);
        assert_eq!(receipt.total, 78);
    }

    #[test]
    fn total_is_exact_sum_of_line_prices() {
        let estimator = TableEstimator::new(&[("a", 1.1), ("b", 2.2), ("c", 3.3)]);
        let lines = vec![
            OrderLine::new("a", 1),
            OrderLine::new("b", 2),
            OrderLine::new("c", 3),
        ];
        let receipt =
            price_order(&lines, "PETG", &estimator, &RateTable::default()).unwrap();

        let sum: u64 = receipt.lines.iter().map(|l| l.price).sum();
        assert_eq!(receipt.total, sum);
        // 2g*1*3 + 3g*2*3 + 4g*3*3 = 6 + 18 + 36
        assert_eq!(receipt.total, 60);
    }

    #[test]
    fn fractional_rate_rounds_line_price_up() {
        let rates = RateTable::empty().with_material("RESIN", MaterialRate::new(2.5, 1.1));
        let estimator = TableEstimator::new(&[("tile", 1.0)]);
        let receipt =
            price_order(&[OrderLine::new("tile", 3)], "RESIN", &estimator, &rates).unwrap();
        // 1g × 3 × 2.5 = 7.5 → 8
        assert_eq!(receipt.lines[0].price, 8);
    }

    #[test]
    fn lines_keep_order_and_names() {
        let estimator = TableEstimator::new(&[("z part", 1.0), ("a part", 1.0)]);
        let lines = vec![OrderLine::new("z part", 1), OrderLine::new("a part", 1)];
        let receipt =
            price_order(&lines, "PETG", &estimator, &RateTable::default()).unwrap();
        assert_eq!(receipt.lines[0].name, "z part");
        assert_eq!(receipt.lines[1].name, "a part");
    }

    #[test]
    fn long_names_are_wrapped_for_display_only() {
        let name = "x".repeat(30);
        let estimator = TableEstimator::new(&[(name.as_str(), 1.0)]);
        let receipt = price_order(
            &[OrderLine::new(name.clone(), 1)],
            "PETG",
            &estimator,
            &RateTable::default(),
        )
        .unwrap();

        assert_eq!(receipt.lines[0].name, name);
        assert!(receipt.lines[0].display_name.contains('\n'));
        assert_eq!(receipt.lines[0].price, 3);
    }

    #[test]
    fn zero_quantity_line_prices_to_zero() {
        let estimator = TableEstimator::new(&[("bracket", 12.4)]);
        let receipt = price_order(
            &[OrderLine::new("bracket", 0)],
            "PETG",
            &estimator,
            &RateTable::default(),
        )
        .unwrap();
        assert_eq!(receipt.lines[0].price, 0);
        assert_eq!(receipt.total, 0);
    }

    #[test]
    fn unknown_material_fails() {
        let estimator = TableEstimator::new(&[]);
        let err = price_order(
            &[OrderLine::new("bracket", 1)],
            "ABS",
            &estimator,
            &RateTable::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PricingError::UnknownMaterial(_)));
    }

    #[test]
    fn estimation_failure_aborts_pricing() {
        let estimator = TableEstimator::new(&[("known", 1.0)]);
        let err = price_order(
            &[OrderLine::new("known", 1), OrderLine::new("missing", 1)],
            "PETG",
            &estimator,
            &RateTable::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PricingError::Estimation { ref item, .. } if item == "missing"));
    }
}
