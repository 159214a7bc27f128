//! Turns one raw catalog line into a typed record.

use crate::domain::model::{LineRecord, Listing, Product, Record, RecordKind};
use crate::utils::error::ParseError;
use serde_json::Value;

/// Parses `line` as a `T`. `source` and `line_no` only feed the error.
///
/// Only presence of the required keys is checked; any scalar value is taken as text.
pub fn parse_line<T: LineRecord>(line: &[u8], source: &str, line_no: usize) -> Result<T, ParseError> {
    let value: Value =
        serde_json::from_slice(line.trim_ascii()).map_err(|cause| ParseError::Malformed {
            source_name: source.to_string(),
            line: line_no,
            cause,
        })?;

    let Value::Object(object) = value else {
        return Err(ParseError::NotAnObject {
            source_name: source.to_string(),
            line: line_no,
        });
    };

    if let Some(field) = T::REQUIRED_FIELDS
        .iter()
        .find(|field| !object.contains_key(**field))
    {
        return Err(ParseError::MissingField {
            source_name: source.to_string(),
            line: line_no,
            field: *field,
        });
    }

    serde_json::from_value(Value::Object(object)).map_err(|e| ParseError::InvalidValue {
        source_name: source.to_string(),
        line: line_no,
        kind: T::KIND,
        message: e.to_string(),
    })
}

pub fn parse_record(
    line: &[u8],
    kind: RecordKind,
    source: &str,
    line_no: usize,
) -> Result<Record, ParseError> {
    match kind {
        RecordKind::Product => parse_line::<Product>(line, source, line_no).map(Record::Product),
        RecordKind::Listing => parse_line::<Listing>(line, source, line_no).map(Record::Listing),
    }
}
