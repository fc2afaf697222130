use log::{debug, error, warn};
use std::time::Instant;
use std::{env, io};

use tally::{
    compute_total_cost, entries, load_or_report, Diagnostics, PriceIndex, Summary, RESULTS_DIR,
};

fn emit_warnings(diagnostics: &mut Diagnostics) {
    diagnostics
        .take()
        .iter()
        .for_each(|warning| warn!("{}", warning));
}

fn main() {
    let start = Instant::now();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        let program = args.first().map(String::as_str).unwrap_or("compute_sales");
        println!(
            "Usage: {} <price_catalogue.json> <sales_record.json>",
            program
        );
        std::process::exit(1);
    }

    // load both so that every unreadable input gets reported
    let catalogue = load_or_report(&args[1]);
    let sales = load_or_report(&args[2]);
    let (catalogue, sales) = match (catalogue, sales) {
        (Some(catalogue), Some(sales)) => (catalogue, sales),
        _ => std::process::exit(1),
    };

    let mut diagnostics = Diagnostics::new();
    let index = PriceIndex::build(entries(&catalogue), &mut diagnostics);
    debug!("indexed {} products", index.len());
    emit_warnings(&mut diagnostics);

    let total = compute_total_cost(&index, entries(&sales), &mut diagnostics);
    debug!("priced {} sale records", entries(&sales).len());
    emit_warnings(&mut diagnostics);

    let summary = Summary::new(total, start.elapsed());
    if let Err(e) = summary.write_to(io::stdout().lock()) {
        error!("Unable to write summary to stdout: {}", e);
        std::process::exit(1);
    }
    println!();

    if let Err(e) = summary.persist(RESULTS_DIR) {
        error!("Unable to write results to '{}': {}", RESULTS_DIR, e);
        std::process::exit(1);
    }
}
