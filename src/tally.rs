//! Sales tally: index a product catalogue by title and sum price × quantity
//! over a sales record, skipping entries that cannot be priced.
//!
//! The three stages are independent of each other's I/O:
//! [`loader`] turns a path into a [`serde_json::Value`], [`catalogue`] turns
//! catalogue entries into a [`PriceIndex`], and [`sales`] folds sale entries
//! into a total. Skipped entries are recorded in [`Diagnostics`] rather than
//! printed, so the binary decides how to show them.

pub mod catalogue;
pub mod diagnostics;
pub mod loader;
pub mod report;
pub mod sales;

pub use catalogue::{PriceIndex, ProductRecord};
pub use diagnostics::{Diagnostics, Warning};
pub use loader::{load_document, load_or_report, LoadError};
pub use report::{format_currency, Summary, RESULTS_DIR, RESULTS_FILE};
pub use sales::{compute_total_cost, SaleRecord, Tally};

use serde_json::Value;

/// Entries of a top-level document. Anything other than an array counts as a
/// single entry.
pub fn entries(document: &Value) -> std::slice::Iter<'_, Value> {
    match document {
        Value::Array(items) => items.iter(),
        other => std::slice::from_ref(other).iter(),
    }
}

#[cfg(test)]
use serde_json::json;

#[test]
fn entries_of_array() {
    let doc = json!([1, "two", {"three": 3}]);
    assert_eq!(entries(&doc).count(), 3);
}

#[test]
fn entries_of_scalar_document() {
    let doc = json!({"title": "Widget", "price": 2.5});
    let items: Vec<&Value> = entries(&doc).collect();
    assert_eq!(items, vec![&doc]);
}
