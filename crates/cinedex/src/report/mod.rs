//! Summary reports written after extraction, organization and batch runs.
//!
//! Every report is built fresh from in-memory records (or, for placement
//! counts, from the directory tree just written), serialized as JSON and
//! rendered as an aligned console block through `Display`.

pub mod batch;
pub mod extraction;
pub mod organization;

use std::collections::BTreeMap;
use std::fmt;

pub use batch::{BatchReport, BatchStatistics, BATCH_REPORT_FILE};
pub use extraction::{ExtractionReport, MovieSummary};
pub use organization::{count_info_files, ImageStats, OrganizationReport, ORGANIZATION_REPORT_FILE};

/// Counts keyed by category, ordered for stable JSON output.
pub type Histogram = BTreeMap<String, usize>;

fn bump(histogram: &mut Histogram, key: impl Into<String>) {
    *histogram.entry(key.into()).or_insert(0) += 1;
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

const RULE_WIDTH: usize = 50;

fn write_heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", "=".repeat(RULE_WIDTH))
}

fn write_row(f: &mut fmt::Formatter<'_>, label: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "{:<24}{:>12}", format!("{}:", label), value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_counts() {
        let mut histogram = Histogram::new();
        bump(&mut histogram, "Drama");
        bump(&mut histogram, "Drama");
        bump(&mut histogram, "Crime");
        assert_eq!(histogram["Drama"], 2);
        assert_eq!(histogram["Crime"], 1);
        assert_eq!(
            histogram.keys().collect::<Vec<_>>(),
            vec!["Crime", "Drama"]
        );
    }
}
