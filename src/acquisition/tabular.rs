//! Brute-force CSV column extraction.
//!
//! The portals publish CSV files with no metadata about text encoding or
//! field delimiter, so every combination from a fixed candidate set is tried
//! in a deterministic order and the first clean parse wins. The contract is
//! purely positional: column index 1, header row skipped.

use crate::error::TabularError;
use encoding_rs::{Encoding, IBM866, UTF_8, WINDOWS_1251};
use std::path::Path;
use tracing::{debug, warn};

/// Candidate encodings in trial order.
static ENCODINGS: [&Encoding; 3] = [WINDOWS_1251, UTF_8, IBM866];

/// Candidate field delimiters in trial order.
const DELIMITERS: [u8; 2] = [b';', b','];

/// Extract the second column of a delimited file.
///
/// Tries every encoding x delimiter combination in order. Returns an empty
/// list when the file cannot be read or no combination parses cleanly; the
/// caller then sees a childless node rather than a failed run.
pub fn extract_second_column(path: &Path) -> Vec<String> {
    let raw = match std::fs::read(path) {
        Ok(raw) => raw,
        Err(err) => {
            warn!("cannot read {}: {err}", path.display());
            return Vec::new();
        }
    };

    for encoding in ENCODINGS {
        for delimiter in DELIMITERS {
            match parse_with(&raw, encoding, delimiter) {
                Ok(values) => return values,
                Err(err) => {
                    debug!(
                        "{}: {} + {:?} rejected: {err}",
                        path.display(),
                        encoding.name(),
                        delimiter as char
                    );
                }
            }
        }
    }

    warn!(
        "{}: every encoding/delimiter combination failed",
        path.display()
    );
    Vec::new()
}

/// Parse with one combination. Fails on decode replacement errors, a header
/// row narrower than two columns, or any record that cannot supply index 1.
fn parse_with(
    raw: &[u8],
    encoding: &'static Encoding,
    delimiter: u8,
) -> Result<Vec<String>, TabularError> {
    let (text, _, had_errors) = encoding.decode(raw);
    if had_errors {
        return Err(TabularError::Decode {
            encoding: encoding.name(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?;
    if headers.len() < 2 {
        return Err(TabularError::TooFewColumns {
            found: headers.len(),
        });
    }

    let mut values = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let value = record
            .get(1)
            .ok_or(TabularError::MissingColumn { row })?;
        values.push(value.to_string());
    }

    Ok(values)
}
