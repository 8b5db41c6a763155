//! Outward shape of a barcode classification.

use super::verdict::ClassificationVerdict;

/// The three distinct results of classifying by barcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarcodeOutcome {
    /// Catalog has no such product.
    NotFound,
    /// Product exists but has no ingredient text; the user should photograph the label.
    NeedsPhoto { name: String },
    /// Product was analysed. `verdict.product_name` is set.
    Classified { name: String, verdict: ClassificationVerdict },
}
