use serde::Deserialize;
use serde_json::Value;

use crate::catalogue::PriceIndex;
use crate::diagnostics::{Diagnostics, Warning};

/// One sale as recorded. `Quantity` must be a JSON number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SaleRecord {
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Quantity")]
    pub quantity: f64,
}

impl SaleRecord {
    pub fn new(product: impl Into<String>, quantity: f64) -> Self {
        SaleRecord {
            product: product.into(),
            quantity,
        }
    }

    pub fn from_entry(entry: &Value) -> Result<Self, serde_json::Error> {
        SaleRecord::deserialize(entry)
    }
}

/// Running total of sales priced against a [`PriceIndex`].
///
/// Sales are numbered from 1 in the order they are processed. A sale that
/// cannot be priced leaves the total untouched and is recorded as a
/// [`Warning`] instead.
pub struct Tally<'a> {
    index: &'a PriceIndex,
    total: f64,
    sequence: usize,
    diagnostics: Diagnostics,
}

impl<'a> Tally<'a> {
    pub fn new(index: &'a PriceIndex) -> Self {
        Tally {
            index,
            total: 0.0,
            sequence: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn consume<'v>(&mut self, sales: impl IntoIterator<Item = &'v Value>) {
        sales.into_iter().for_each(|sale| self.process_sale(sale));
    }

    pub fn process_sale(&mut self, sale: &Value) {
        self.sequence += 1;

        let record = match SaleRecord::from_entry(sale) {
            Ok(record) => record,
            Err(e) => {
                self.diagnostics.push(Warning::MalformedSale {
                    sequence: self.sequence,
                    reason: e.to_string(),
                    record: sale.clone(),
                });
                return;
            }
        };

        match self.index.price(&record.product) {
            // quantity sign and magnitude are taken as given
            Some(price) => self.total += price * record.quantity,
            None => self.diagnostics.push(Warning::UnknownProduct {
                sequence: self.sequence,
                product: record.product,
            }),
        }
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Number of sales seen so far, skipped ones included.
    pub fn processed(&self) -> usize {
        self.sequence
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn finish(self) -> (f64, Diagnostics) {
        (self.total, self.diagnostics)
    }
}

/// Sums price × quantity over `sales`, appending a warning to `diagnostics`
/// for every sale that was skipped.
pub fn compute_total_cost<'v>(
    index: &PriceIndex,
    sales: impl IntoIterator<Item = &'v Value>,
    diagnostics: &mut Diagnostics,
) -> f64 {
    let mut tally = Tally::new(index);
    tally.consume(sales);
    let (total, mut warnings) = tally.finish();
    diagnostics.extend(warnings.take());
    total
}

#[cfg(test)]
use crate::catalogue::ProductRecord;
#[cfg(test)]
use serde_json::json;

#[cfg(test)]
fn catalogue() -> PriceIndex {
    vec![
        ProductRecord::new("Product A", 10.0),
        ProductRecord::new("Product B", 25.5),
        ProductRecord::new("Product C", 5.75),
    ]
    .into_iter()
    .collect()
}

#[test]
fn sums_valid_sales() {
    let index = catalogue();
    let sales = json!([
        {"Product": "Product A", "Quantity": 2},
        {"Product": "Product C", "Quantity": 4},
    ]);
    let mut diagnostics = Diagnostics::new();

    let total = compute_total_cost(&index, crate::entries(&sales), &mut diagnostics);

    assert_eq!(total, 43.0);
    assert!(diagnostics.is_empty());
}

#[test]
fn unknown_product_is_skipped() {
    let index = catalogue();
    let sales = json!([
        {"Product": "Product A", "Quantity": 1},
        {"Product": "Unknown Product", "Quantity": 5},
    ]);
    let mut diagnostics = Diagnostics::new();

    let total = compute_total_cost(&index, crate::entries(&sales), &mut diagnostics);

    assert_eq!(total, 10.0);
    assert_eq!(
        diagnostics.iter().collect::<Vec<_>>(),
        vec![&Warning::UnknownProduct {
            sequence: 2,
            product: "Unknown Product".to_string(),
        }]
    );
}

#[test]
fn malformed_sale_is_skipped() {
    let index = catalogue();
    let sales = json!([
        {"Product": "Product B", "Quantity": 1},
        {"Item": "Product C", "Count": 3},
    ]);
    let mut diagnostics = Diagnostics::new();

    let total = compute_total_cost(&index, crate::entries(&sales), &mut diagnostics);

    assert_eq!(total, 25.5);
    assert_eq!(diagnostics.malformed_sales(), 1);
    let warning = diagnostics.iter().next().unwrap();
    match warning {
        Warning::MalformedSale {
            sequence,
            reason,
            record,
        } => {
            assert_eq!(*sequence, 2);
            assert!(reason.contains("missing field"));
            assert_eq!(record, &json!({"Item": "Product C", "Count": 3}));
        }
        other => panic!("unexpected warning {:?}", other),
    };
}

#[test]
fn non_object_and_mistyped_sales_are_malformed() {
    let index = catalogue();
    let sales = json!([
        "Product A",
        42,
        null,
        {"Product": "Product A", "Quantity": "lots"},
        {"Product": ["Product A"], "Quantity": 1},
        {"Product": "Product A"},
        {"Quantity": 1},
        {"Product": "Product A", "Quantity": true},
    ]);
    let mut diagnostics = Diagnostics::new();

    let total = compute_total_cost(&index, crate::entries(&sales), &mut diagnostics);

    assert_eq!(total, 0.0);
    assert_eq!(diagnostics.malformed_sales(), 8);
    let sequences: Vec<usize> = diagnostics
        .iter()
        .map(|w| match w {
            Warning::MalformedSale { sequence, .. } => *sequence,
            _ => 0,
        })
        .collect();
    assert_eq!(sequences, vec![1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn numeric_string_quantity_is_malformed() {
    let index = catalogue();
    let sales = json!([{"Product": "Product A", "Quantity": "4"}]);
    let mut diagnostics = Diagnostics::new();

    let total = compute_total_cost(&index, crate::entries(&sales), &mut diagnostics);

    assert_eq!(total, 0.0);
    assert_eq!(diagnostics.malformed_sales(), 1);
    assert_eq!(diagnostics.unknown_products(), 0);
}

#[test]
fn negative_zero_and_fractional_quantities_count() {
    let index = catalogue();
    let sales = json!([
        {"Product": "Product A", "Quantity": 3},
        {"Product": "Product A", "Quantity": -1},
        {"Product": "Product B", "Quantity": 0},
        {"Product": "Product C", "Quantity": 0.5},
    ]);
    let mut diagnostics = Diagnostics::new();

    let total = compute_total_cost(&index, crate::entries(&sales), &mut diagnostics);

    assert_eq!(total, 22.875);
    assert!(diagnostics.is_empty());
}

#[test]
fn large_amounts_are_summed_without_skipping() {
    let catalogue: Value =
        serde_json::from_str(r#"[{"title": "Big", "price": 1e30}]"#).unwrap();
    let mut diagnostics = Diagnostics::new();
    let index = PriceIndex::build(crate::entries(&catalogue), &mut diagnostics);

    let sales = json!([
        {"Product": "Big", "Quantity": 1},
        {"Product": "Big", "Quantity": 2},
    ]);
    let total = compute_total_cost(&index, crate::entries(&sales), &mut diagnostics);

    assert_eq!(total, 1e30 + 1e30 * 2.0);
    assert!(diagnostics.is_empty());
}

#[test]
fn tally_tracks_sequence_and_is_repeatable() {
    let index = catalogue();
    let sales = json!([
        {"Product": "Product A", "Quantity": 1},
        {"Product": "Nope", "Quantity": 1},
        {"Product": "Product B", "Quantity": 2},
    ]);

    let mut first = Tally::new(&index);
    first.consume(crate::entries(&sales));
    assert_eq!(first.processed(), 3);
    assert_eq!(first.diagnostics().unknown_products(), 1);

    let mut second = Tally::new(&index);
    second.consume(crate::entries(&sales));

    assert_eq!(first.total(), 61.0);
    assert_eq!(first.total(), second.total());
    assert_eq!(index, catalogue());
}

#[test]
fn empty_index_skips_everything() {
    let index = PriceIndex::new();
    let sales = json!([{"Product": "Product A", "Quantity": 1}]);
    let mut diagnostics = Diagnostics::new();

    let total = compute_total_cost(&index, crate::entries(&sales), &mut diagnostics);

    assert_eq!(total, 0.0);
    assert_eq!(diagnostics.unknown_products(), 1);
}
