//! Writes the association as line-delimited JSON.

use crate::domain::model::Association;
use crate::domain::ports::Diagnostics;
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitReport {
    pub written: usize,
    pub skipped: usize,
}

/// One `{"product_name": .., "listings": [..]}` line per entry, in association order.
pub fn emit<W: Write>(
    association: &Association,
    sink: &mut W,
    diagnostics: &dyn Diagnostics,
) -> Result<EmitReport> {
    emit_records(association.iter(), sink, diagnostics)
}

/// Serializes each record onto its own line. A record that fails to serialize is
/// reported and skipped; a failed write aborts.
pub fn emit_records<W, T, I>(records: I, sink: &mut W, diagnostics: &dyn Diagnostics) -> Result<EmitReport>
where
    W: Write,
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut report = EmitReport::default();

    for (index, record) in records.into_iter().enumerate() {
        let mut line = match serde_json::to_vec(&record) {
            Ok(line) => line,
            Err(e) => {
                report.skipped += 1;
                diagnostics.error_with(
                    &format!(
                        "error writing result {}, check if input data is correct",
                        index + 1
                    ),
                    &e,
                );
                continue;
            }
        };
        line.push(b'\n');
        sink.write_all(&line)?;
        report.written += 1;
    }

    sink.flush()?;
    Ok(report)
}
