use serde_json::Value;
use std::fmt;

/// A single skipped entry and why it was skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// Catalogue entry without a usable `title`/`price` pair.
    InvalidCatalogueEntry { position: usize, entry: Value },
    /// Sale whose product has no price in the catalogue.
    UnknownProduct { sequence: usize, product: String },
    /// Sale that could not be read as a `Product`/`Quantity` pair.
    MalformedSale {
        sequence: usize,
        reason: String,
        record: Value,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::InvalidCatalogueEntry { entry, .. } => {
                write!(f, "Skipping invalid item in price catalogue: {}", entry)
            }
            Warning::UnknownProduct { sequence, product } => write!(
                f,
                "Product '{}' from sale #{} not in price catalogue. Skipping.",
                product, sequence
            ),
            Warning::MalformedSale {
                sequence,
                reason,
                record,
            } => write!(
                f,
                "Malformed sale record #{}. Skipping. Error: {}. Record: {}",
                sequence, reason, record
            ),
        }
    }
}

/// Ordered collection of warnings raised while indexing and aggregating.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn push(&mut self, warning: Warning) {
        self.warnings.push(warning)
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.warnings.iter()
    }

    /// Drains the collected warnings, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn unknown_products(&self) -> usize {
        self.iter()
            .filter(|w| matches!(w, Warning::UnknownProduct { .. }))
            .count()
    }

    pub fn malformed_sales(&self) -> usize {
        self.iter()
            .filter(|w| matches!(w, Warning::MalformedSale { .. }))
            .count()
    }

    pub fn invalid_catalogue_entries(&self) -> usize {
        self.iter()
            .filter(|w| matches!(w, Warning::InvalidCatalogueEntry { .. }))
            .count()
    }
}

impl Extend<Warning> for Diagnostics {
    fn extend<I: IntoIterator<Item = Warning>>(&mut self, iter: I) {
        self.warnings.extend(iter)
    }
}

#[cfg(test)]
use serde_json::json;

#[test]
fn warning_lines() {
    let invalid = Warning::InvalidCatalogueEntry {
        position: 2,
        entry: json!({"name": "Gizmo"}),
    };
    assert_eq!(
        invalid.to_string(),
        r#"Skipping invalid item in price catalogue: {"name":"Gizmo"}"#
    );

    let unknown = Warning::UnknownProduct {
        sequence: 3,
        product: "Gadget".to_string(),
    };
    assert_eq!(
        unknown.to_string(),
        "Product 'Gadget' from sale #3 not in price catalogue. Skipping."
    );

    let malformed = Warning::MalformedSale {
        sequence: 1,
        reason: "missing field `Product`".to_string(),
        record: json!({"Item": "Widget"}),
    };
    assert_eq!(
        malformed.to_string(),
        r#"Malformed sale record #1. Skipping. Error: missing field `Product`. Record: {"Item":"Widget"}"#
    );
}

#[test]
fn counts_by_kind_and_take() {
    let mut diagnostics = Diagnostics::new();
    assert!(diagnostics.is_empty());

    diagnostics.push(Warning::UnknownProduct {
        sequence: 1,
        product: "a".to_string(),
    });
    diagnostics.push(Warning::UnknownProduct {
        sequence: 2,
        product: "b".to_string(),
    });
    diagnostics.push(Warning::MalformedSale {
        sequence: 3,
        reason: "bad".to_string(),
        record: json!(null),
    });

    assert_eq!(diagnostics.len(), 3);
    assert_eq!(diagnostics.unknown_products(), 2);
    assert_eq!(diagnostics.malformed_sales(), 1);
    assert_eq!(diagnostics.invalid_catalogue_entries(), 0);

    let drained = diagnostics.take();
    assert_eq!(drained.len(), 3);
    assert!(diagnostics.is_empty());
}

#[test]
fn entry_keeps_document_key_order() {
    let entry: Value = serde_json::from_str(r#"{"title": "W", "cost": 2.5, "kind": "tool"}"#).unwrap();
    let warning = Warning::InvalidCatalogueEntry { position: 1, entry };

    assert_eq!(
        warning.to_string(),
        r#"Skipping invalid item in price catalogue: {"title":"W","cost":2.5,"kind":"tool"}"#
    );
}
