//! Record file parser
//!
//! Newline-separated lines, each split on `,` into `id,name,interests`.
//! No header row, no quoting or escaping.

use contracts::{ContractError, Record};
use tracing::{debug, trace};

/// Field delimiter
pub const FIELD_DELIMITER: char = ',';

/// Parse a raw record file
///
/// - empty lines (including the one left by a trailing newline) are skipped;
///   whitespace-only lines are records
/// - a trailing `\r` is stripped from every line
/// - missing fields become empty strings, fields past the third are ignored
///
/// # Errors
/// The payload is not valid UTF-8.
pub fn parse_records(payload: &[u8], source_name: &str) -> Result<Vec<Record>, ContractError> {
    let text = std::str::from_utf8(payload)
        .map_err(|e| ContractError::source_decode(source_name, e.to_string()))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let records: Vec<Record> = text
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect();

    debug!(source = %source_name, records = records.len(), "Parsed record file");
    Ok(records)
}

/// Map one line positionally onto a record
pub fn parse_line(line: &str) -> Record {
    let mut fields = line.split(FIELD_DELIMITER);
    let id = fields.next().unwrap_or_default();
    let name = fields.next().unwrap_or_default();
    let interests = fields.next().unwrap_or_default();

    if fields.next().is_some() {
        trace!(id = %id, "Ignoring fields past the third");
    }

    Record::new(id, name, interests)
}
