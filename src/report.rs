use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory, relative to the working directory, that receives the summary.
pub const RESULTS_DIR: &str = "results";
pub const RESULTS_FILE: &str = "SalesResults.txt";

/// Formats an amount as `1,234.50`: two decimal places rounded from the
/// exact binary value, comma-grouped thousands. Non-finite amounts print as
/// `inf`, `-inf` or `nan`.
pub fn format_currency(amount: f64) -> String {
    if amount.is_nan() {
        return "nan".to_string();
    }
    let sign = if amount.is_sign_negative() { "-" } else { "" };
    if amount.is_infinite() {
        return format!("{}inf", sign);
    }

    let digits = format!("{:.2}", amount.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 + 4);
    grouped.push_str(sign);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped.push('.');
    grouped.push_str(fraction);
    grouped
}

/// Result of one run, as printed and persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: f64,
    pub elapsed: Duration,
}

impl Summary {
    pub fn new(total: f64, elapsed: Duration) -> Self {
        Summary { total, elapsed }
    }

    pub fn write_to<T: io::Write>(&self, mut target: T) -> io::Result<()> {
        write!(target, "{}", self)?;
        target.flush()
    }

    /// Creates `dir` if needed and overwrites [`RESULTS_FILE`] inside it.
    pub fn persist<P: AsRef<Path>>(&self, dir: P) -> io::Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(RESULTS_FILE);
        std::fs::write(&path, self.to_string())?;
        Ok(path)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Cost: ${}", format_currency(self.total))?;
        writeln!(f)?;
        writeln!(
            f,
            "Execution Time: {:.4} seconds",
            self.elapsed.as_secs_f64()
        )
    }
}

#[test]
fn currency_grouping() {
    assert_eq!(format_currency(0.0), "0.00");
    assert_eq!(format_currency(10.0), "10.00");
    assert_eq!(format_currency(999.999), "1,000.00");
    assert_eq!(format_currency(1234.5), "1,234.50");
    assert_eq!(format_currency(123456.0), "123,456.00");
    assert_eq!(format_currency(2481.86), "2,481.86");
    assert_eq!(format_currency(1234567.891), "1,234,567.89");
    assert_eq!(format_currency(1e30), "1,000,000,000,000,000,019,884,624,838,656.00");
}

#[test]
fn currency_rounds_the_binary_value() {
    // 2.675 is stored just below the midpoint
    assert_eq!(format_currency(2.675), "2.67");
    assert_eq!(format_currency(1.005), "1.00");
    assert_eq!(format_currency(0.126), "0.13");
}

#[test]
fn currency_negative_and_non_finite() {
    assert_eq!(format_currency(-5.0), "-5.00");
    assert_eq!(format_currency(-1234.5), "-1,234.50");
    assert_eq!(format_currency(-0.001), "-0.00");
    assert_eq!(format_currency(f64::INFINITY), "inf");
    assert_eq!(format_currency(f64::NEG_INFINITY), "-inf");
    assert_eq!(format_currency(f64::NAN), "nan");
}

#[test]
fn summary_text() {
    let summary = Summary::new(2481.86, Duration::from_micros(1300));

    let mut output = Vec::new();
    summary.write_to(&mut output).unwrap();

    assert_eq!(
        output,
        b"Total Cost: $2,481.86\n\nExecution Time: 0.0013 seconds\n"
    );
}

#[test]
fn persist_creates_directory_and_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let results = dir.path().join(RESULTS_DIR);

    let path = Summary::new(1.0, Duration::ZERO).persist(&results).unwrap();
    assert_eq!(path, results.join(RESULTS_FILE));

    let summary = Summary::new(10.0, Duration::from_millis(2));
    summary.persist(&results).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        "Total Cost: $10.00\n\nExecution Time: 0.0020 seconds\n"
    );
}
