//! Drives the parser over a whole catalog, skipping lines that fail.

use crate::core::parser::parse_record;
use crate::domain::model::{Catalogs, Record, RecordKind};
use crate::domain::ports::Diagnostics;
use crate::utils::error::Result;
use std::io::BufRead;

/// Line accounting for one ingested source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub processed: usize,
    pub failed: usize,
}

/// Reads every line of `reader` as a `kind` record into `catalogs`.
///
/// Products are keyed by manufacturer and a later product replaces an earlier
/// one. Listings are grouped by manufacturer in file order. Line numbers start
/// at 1. Only read errors escape; parse errors are reported and skipped.
pub fn ingest<R: BufRead>(
    reader: R,
    source: &str,
    kind: RecordKind,
    catalogs: &mut Catalogs,
    diagnostics: &dyn Diagnostics,
) -> Result<IngestStats> {
    let mut stats = IngestStats::default();

    for (index, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        let line_no = index + 1;

        match parse_record(&line, kind, source, line_no) {
            Ok(Record::Product(product)) => {
                let manufacturer = product.manufacturer.clone();
                if let Some(replaced) = catalogs.products.insert(product) {
                    diagnostics.info(&format!(
                        "{}: line {} replaces product '{}' for manufacturer '{}'",
                        source, line_no, replaced.product_name, manufacturer
                    ));
                }
            }
            Ok(Record::Listing(listing)) => catalogs.listings.push(listing),
            Err(e) => {
                stats.failed += 1;
                diagnostics.error_with(
                    &format!("{}: processing of line {} failed", source, line_no),
                    &e,
                );
                continue;
            }
        }

        stats.processed += 1;
        diagnostics.line(&format!("{}: line {} processed successfully", source, line_no));
    }

    diagnostics.info(&format!(
        "{}: {} {} lines processed, {} failed",
        source, stats.processed, kind, stats.failed
    ));

    Ok(stats)
}
