use serde_json::{json, Value};
use std::path::Path;
use std::process::{Command, Output};
use tally::{compute_total_cost, entries, Diagnostics, PriceIndex, Warning, RESULTS_DIR, RESULTS_FILE};

fn total_for(catalogue: Value, sales: Value) -> (f64, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let index = PriceIndex::build(entries(&catalogue), &mut diagnostics);
    let total = compute_total_cost(&index, entries(&sales), &mut diagnostics);
    (total, diagnostics)
}

#[test]
fn single_sale() {
    let (total, diagnostics) = total_for(
        json!([{"title": "Widget", "price": 2.5}]),
        json!([{"Product": "Widget", "Quantity": 4}]),
    );

    assert_eq!(total, 10.0);
    assert!(diagnostics.is_empty());
}

#[test]
fn unknown_product_is_reported_once() {
    let (total, diagnostics) = total_for(
        json!([{"title": "Widget", "price": 2.5}]),
        json!([
            {"Product": "Widget", "Quantity": 2},
            {"Product": "Gadget", "Quantity": 1},
        ]),
    );

    assert_eq!(total, 5.0);
    assert_eq!(diagnostics.len(), 1);
    let warning = diagnostics.iter().next().unwrap();
    assert!(warning.to_string().contains("not in price catalogue"));
}

#[test]
fn malformed_sale_is_reported_once() {
    let (total, diagnostics) = total_for(
        json!([{"title": "Widget", "price": 2.5}]),
        json!([{"Item": "Widget", "Count": 2}]),
    );

    assert_eq!(total, 0.0);
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(
        diagnostics.iter().next(),
        Some(Warning::MalformedSale { sequence: 1, .. })
    ));
    assert!(diagnostics
        .iter()
        .next()
        .unwrap()
        .to_string()
        .starts_with("Malformed sale record #1."));
}

#[test]
fn quoted_numbers_do_not_price_a_sale() {
    let (total, diagnostics) = total_for(
        json!([{"title": "Widget", "price": "2.5"}, {"title": "Gizmo", "price": 1.5}]),
        json!([
            {"Product": "Widget", "Quantity": "4"},
            {"Product": "Gizmo", "Quantity": "2"},
        ]),
    );

    assert_eq!(total, 0.0);
    assert_eq!(diagnostics.invalid_catalogue_entries(), 1);
    assert_eq!(diagnostics.malformed_sales(), 2);
}

#[test]
fn half_cent_prices_round_like_the_stored_float() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("catalogue.json"),
        r#"[{"title": "Widget", "price": 2.675}]"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("sales.json"),
        r#"[{"Product": "Widget", "Quantity": 1}]"#,
    )
    .unwrap();

    let output = run_in(dir.path(), &["catalogue.json", "sales.json"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Total Cost: $2.67\n"));
}

#[test]
fn warnings_keep_catalogue_then_sale_order() {
    let (total, diagnostics) = total_for(
        json!([
            {"title": "Widget", "price": 2.5},
            {"name": "Nameless"},
            {"title": "Gizmo", "price": 1.25},
        ]),
        json!([
            {"Product": "Gizmo", "Quantity": 8},
            {"Product": "Nameless", "Quantity": 1},
            [1, 2],
            {"Product": "Widget", "Quantity": 2},
        ]),
    );

    assert_eq!(total, 15.0);
    let kinds: Vec<&str> = diagnostics
        .iter()
        .map(|w| match w {
            Warning::InvalidCatalogueEntry { .. } => "catalogue",
            Warning::UnknownProduct { .. } => "unknown",
            Warning::MalformedSale { .. } => "malformed",
        })
        .collect();
    assert_eq!(kinds, vec!["catalogue", "unknown", "malformed"]);
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_compute_sales"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run compute_sales")
}

#[test]
fn cli_writes_summary_to_stdout_and_results_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("catalogue.json"),
        r#"[{"title": "Widget", "price": 2.5}, {"title": "Crate", "price": 400}]"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("sales.json"),
        r#"[{"Product": "Widget", "Quantity": 4}, {"Product": "Crate", "Quantity": 3}, {"Product": "Gadget", "Quantity": 1}]"#,
    )
    .unwrap();

    let output = run_in(dir.path(), &["catalogue.json", "sales.json"]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Total Cost: $1,210.00\n\nExecution Time: "));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Product 'Gadget' from sale #3 not in price catalogue. Skipping."));

    let written =
        std::fs::read_to_string(dir.path().join(RESULTS_DIR).join(RESULTS_FILE)).unwrap();
    assert!(written.starts_with("Total Cost: $1,210.00\n\nExecution Time: "));
    assert!(written.ends_with(" seconds\n"));
    assert!(stdout.starts_with(&written));
}

#[test]
fn cli_missing_catalogue_aborts_without_results() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("sales.json"), "[]").unwrap();

    let output = run_in(dir.path(), &["missing.json", "sales.json"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("File not found at 'missing.json'."));
    assert!(!dir.path().join(RESULTS_DIR).exists());
}

#[test]
fn cli_reports_both_unreadable_inputs() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.json"), "{'key': 'value'}").unwrap();

    let output = run_in(dir.path(), &["broken.json", "absent.json"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Could not decode JSON from 'broken.json'"));
    assert!(stderr.contains("File not found at 'absent.json'."));
}

#[test]
fn cli_wrong_argument_count_prints_usage() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_in(dir.path(), &["only-one.json"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("Usage: "));
    assert!(stdout.contains("<price_catalogue.json> <sales_record.json>"));
}
