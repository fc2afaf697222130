use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::diagnostics::{Diagnostics, Warning};

/// A priced product as listed in the catalogue. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductRecord {
    pub title: String,
    pub price: f64,
}

impl ProductRecord {
    pub fn new(title: impl Into<String>, price: f64) -> Self {
        ProductRecord {
            title: title.into(),
            price,
        }
    }

    /// Reads a catalogue entry. `price` must be a JSON number.
    pub fn from_entry(entry: &Value) -> Result<Self, serde_json::Error> {
        ProductRecord::deserialize(entry)
    }
}

/// Unit price by product title.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PriceIndex {
    prices: HashMap<String, f64>,
}

impl PriceIndex {
    pub fn new() -> Self {
        PriceIndex::default()
    }

    /// Indexes catalogue entries in order. Entries that are not a
    /// `title`/`price` object are reported and left out; a later entry with
    /// the same title replaces the earlier price.
    pub fn build<'a>(
        entries: impl IntoIterator<Item = &'a Value>,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut index = PriceIndex::new();
        for (position, entry) in entries.into_iter().enumerate() {
            match ProductRecord::from_entry(entry) {
                Ok(record) => {
                    index.insert(record);
                }
                Err(_) => diagnostics.push(Warning::InvalidCatalogueEntry {
                    position: position + 1,
                    entry: entry.clone(),
                }),
            }
        }
        index
    }

    /// Returns the price previously stored under the same title, if any.
    pub fn insert(&mut self, record: ProductRecord) -> Option<f64> {
        self.prices.insert(record.title, record.price)
    }

    pub fn price(&self, title: &str) -> Option<f64> {
        self.prices.get(title).copied()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.prices.contains_key(title)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl FromIterator<ProductRecord> for PriceIndex {
    fn from_iter<I: IntoIterator<Item = ProductRecord>>(iter: I) -> Self {
        let mut index = PriceIndex::new();
        iter.into_iter().for_each(|record| {
            index.insert(record);
        });
        index
    }
}

#[cfg(test)]
use serde_json::json;

#[test]
fn indexes_every_valid_entry() {
    let catalogue = json!([
        {"title": "Product A", "price": 10.0},
        {"title": "Product B", "price": 25.5},
        {"title": "Product C", "price": 5.75},
    ]);
    let mut diagnostics = Diagnostics::new();

    let index = PriceIndex::build(crate::entries(&catalogue), &mut diagnostics);

    assert!(diagnostics.is_empty());
    assert_eq!(index.len(), 3);
    assert_eq!(index.price("Product A"), Some(10.0));
    assert_eq!(index.price("Product B"), Some(25.5));
    assert_eq!(index.price("Product C"), Some(5.75));
}

#[test]
fn skips_entries_without_title_or_price() {
    let catalogue = json!([
        {"title": "Valid Product", "price": 1.0},
        {"name": "Invalid Product", "cost": 2.0},
        {"title": "No Price"},
        {"price": 3},
        "just a string",
        null,
    ]);
    let mut diagnostics = Diagnostics::new();

    let index = PriceIndex::build(crate::entries(&catalogue), &mut diagnostics);

    assert_eq!(index.len(), 1);
    assert!(index.contains("Valid Product"));
    assert!(!index.contains("Invalid Product"));
    assert!(!index.contains("No Price"));
    assert_eq!(diagnostics.invalid_catalogue_entries(), 5);

    let first = diagnostics.iter().next().unwrap();
    assert_eq!(
        first,
        &Warning::InvalidCatalogueEntry {
            position: 2,
            entry: json!({"name": "Invalid Product", "cost": 2.0}),
        }
    );
}

#[test]
fn wrongly_typed_fields_are_invalid() {
    let catalogue = json!([
        {"title": 7, "price": 1.0},
        {"title": "Quoted", "price": "2.5"},
        {"title": "Boxed", "price": {"amount": 1}},
        {"title": "Listed", "price": [1]},
        {"title": "Nothing", "price": null},
    ]);
    let mut diagnostics = Diagnostics::new();

    let index = PriceIndex::build(crate::entries(&catalogue), &mut diagnostics);

    assert!(index.is_empty());
    assert_eq!(diagnostics.len(), 5);
}

#[test]
fn any_json_number_is_a_price() {
    let catalogue: Value = serde_json::from_str(
        r#"[
            {"title": "Huge", "price": 1e30},
            {"title": "Tiny", "price": 1e-40},
            {"title": "Wide", "price": 50000000000000000000000000000},
            {"title": "Whole", "price": 3}
        ]"#,
    )
    .unwrap();
    let mut diagnostics = Diagnostics::new();

    let index = PriceIndex::build(crate::entries(&catalogue), &mut diagnostics);

    assert!(diagnostics.is_empty());
    assert_eq!(index.price("Huge"), Some(1e30));
    assert_eq!(index.price("Tiny"), Some(1e-40));
    assert_eq!(index.price("Wide"), Some(5e28));
    assert_eq!(index.price("Whole"), Some(3.0));
}

#[test]
fn last_duplicate_title_wins() {
    let catalogue = json!([
        {"title": "Widget", "price": 1.0},
        {"title": "Gadget", "price": 4},
        {"title": "Widget", "price": 2.5},
    ]);
    let mut diagnostics = Diagnostics::new();

    let index = PriceIndex::build(crate::entries(&catalogue), &mut diagnostics);

    assert_eq!(index.len(), 2);
    assert_eq!(index.price("Widget"), Some(2.5));
    assert_eq!(index.price("Gadget"), Some(4.0));
}

#[test]
fn entirely_invalid_catalogue_gives_empty_index() {
    let catalogue = json!([1, 2, 3]);
    let mut diagnostics = Diagnostics::new();

    let index = PriceIndex::build(crate::entries(&catalogue), &mut diagnostics);

    assert!(index.is_empty());
    assert_eq!(diagnostics.len(), 3);
}

#[test]
fn extra_fields_are_ignored() {
    let entry = json!({"title": "Widget", "price": 2.5, "category": "tools", "stock": 3});

    let record = ProductRecord::from_entry(&entry).unwrap();
    assert_eq!(record, ProductRecord::new("Widget", 2.5));
}

#[test]
fn collects_from_records() {
    let index: PriceIndex = vec![
        ProductRecord::new("Widget", 1.0),
        ProductRecord::new("Widget", 3.0),
    ]
    .into_iter()
    .collect();

    assert_eq!(index.len(), 1);
    assert_eq!(index.price("Widget"), Some(3.0));
}
