//! CSV result reporting.
//!
//! The output schema is fixed: `Certificate ID,Card Name,Grade`, one row
//! per input identifier in input order. Not-found rows carry an empty name
//! and a `Not Found` grade; exhausted lookups carry `Error` in both columns.

use std::path::Path;

use anyhow::Context;
use certscan_core::{CertRecord, LookupStatus};

const HEADER: [&str; 3] = ["Certificate ID", "Card Name", "Grade"];
const NOT_FOUND_MARKER: &str = "Not Found";
const ERROR_MARKER: &str = "Error";

/// Write all resolved records to `path` as CSV.
pub fn write_csv(path: &Path, records: &[CertRecord]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;

    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record(row(record))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write output file: {}", path.display()))?;

    Ok(())
}

fn row(record: &CertRecord) -> [String; 3] {
    let cert_id = record.cert_id.to_string();
    match record.status {
        LookupStatus::Found => [
            cert_id,
            record.card_name.clone().unwrap_or_default(),
            record.grade.clone().unwrap_or_default(),
        ],
        LookupStatus::NotFound => [cert_id, String::new(), NOT_FOUND_MARKER.to_string()],
        LookupStatus::Error => [cert_id, ERROR_MARKER.to_string(), ERROR_MARKER.to_string()],
    }
}
