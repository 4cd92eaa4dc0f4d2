//! Receipt rendering seam
//!
//! The engine hands the priced [`Receipt`] to a [`ReceiptRenderer`]
//! and sends the resulting bytes to the user. [`PlainTextRenderer`]
//! is the reference implementation: a UTF-8 payment receipt with the
//! bill table grouped by material. Typography and pagination belong
//! to external renderers.

use crate::error::RenderError;
use chrono::NaiveDate;
use platen_pricing::Receipt;

/// Metadata printed in the receipt footer
#[derive(Debug, Clone)]
pub struct ReceiptMeta {
    /// Executor (the shop) name
    pub executor: String,
    /// Customer name
    pub customer: String,
    /// Print date
    pub printed_on: NaiveDate,
}

/// Renders a priced receipt into document bytes
pub trait ReceiptRenderer: Send + Sync {
    /// Render `receipt` with `meta` into an opaque document
    ///
    /// # Errors
    /// [`RenderError`] if the document cannot be produced.
    fn render(&self, receipt: &Receipt, meta: &ReceiptMeta) -> Result<Vec<u8>, RenderError>;
}

/// Plain-text receipt renderer
///
/// Layout: centered title and receipt number, the bill table grouped
/// by material (material and rate printed on each group's first row
/// only), the grand total, and the executor/customer/date footer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

/// Total character width of the rendered table
const TABLE_WIDTH: usize = 78;

impl PlainTextRenderer {
    fn centered(text: &str, width: usize) -> String {
        let len = text.chars().count();
        if len >= width {
            return text.to_string();
        }
        format!("{:pad$}{text}", "", pad = (width - len) / 2)
    }
}

impl ReceiptRenderer for PlainTextRenderer {
    fn render(&self, receipt: &Receipt, meta: &ReceiptMeta) -> Result<Vec<u8>, RenderError> {
        let mut out = String::new();

        out.push_str(&Self::centered("PAYMENT RECEIPT", TABLE_WIDTH));
        out.push('\n');
        out.push_str(&Self::centered(&format!("No {}", receipt.id), TABLE_WIDTH));
        out.push_str("\n\n");

        let rule = "-".repeat(TABLE_WIDTH);
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!(
            "{:<25} {:>8} {:>10} {:>9} {:>10} {:>10}\n",
            "Item", "Qty", "Material", "Mass, g", "Rate, /g", "Price"
        ));
        out.push_str(&rule);
        out.push('\n');

        for group in receipt.material_groups() {
            for (idx, line) in group.lines.iter().enumerate() {
                let material = if idx == 0 { group.material } else { "" };
                let mut name_rows = line.display_name.split('\n');
                let first_name = name_rows.next().unwrap_or_default();

                out.push_str(&format!(
                    "{:<25} {:>8} {:>10} {:>9} {:>10} {:>10}\n",
                    first_name,
                    line.quantity,
                    material,
                    line.unit_grams,
                    format_rate(line.rate_per_gram),
                    line.price,
                ));
                for continuation in name_rows {
                    out.push_str(&format!("{continuation:<25}\n"));
                }
            }
        }

        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!("TOTAL: {}\n\n", receipt.total));

        out.push_str(&format!("Executor: {}\n", meta.executor));
        out.push_str(&format!("Customer: {}\n", meta.customer));
        out.push_str(&format!(
            "Printed on: {}\n",
            meta.printed_on.format("%d.%m.%Y")
        ));

        Ok(out.into_bytes())
    }
}

/// Rates are whole numbers for the standard filaments; keep fractional
/// rates readable without trailing zeros.
fn format_rate(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("{rate:.0}")
    } else {
        format!("{rate}")
    }
}
