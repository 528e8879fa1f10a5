//! CSV ingestion for uploaded contact lists.
//!
//! Turns raw upload bytes into an ordered list of [`ContactRecord`]s.
//! Checks run in a fixed order: tokenization, emptiness, column presence,
//! then per-row values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::ContactRecord;

/// Columns every upload must carry (case-sensitive)
pub const REQUIRED_COLUMNS: [&str; 3] = ["FirstName", "Phone", "Notes"];

/// How required columns are checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnCheck {
    /// Columns must be present in the header row; blank values are allowed
    /// except for `FirstName`.
    #[default]
    Header,
    /// Columns must be present in the header and non-blank on the first data
    /// row. Later rows are not inspected.
    FirstRow,
}

/// Errors produced while ingesting an upload
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IngestError {
    /// The bytes could not be tokenized as delimited text
    #[error("Invalid CSV format. Please check your file structure.")]
    InvalidFormat { reason: String },

    /// No data rows after the header
    #[error("CSV file is empty or has no valid data.")]
    EmptyInput,

    /// A required column is missing
    #[error("CSV must have columns: FirstName, Phone, Notes")]
    MissingColumns,

    /// A data row has a blank value in a column that must be filled
    #[error("Row {row} has an empty {column} value")]
    MissingValue { row: usize, column: &'static str },
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        IngestError::InvalidFormat {
            reason: err.to_string(),
        }
    }
}

/// Positions of the required columns within a header row
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    first_name: usize,
    phone: usize,
    notes: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Option<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Some(Self {
            first_name: find(REQUIRED_COLUMNS[0])?,
            phone: find(REQUIRED_COLUMNS[1])?,
            notes: find(REQUIRED_COLUMNS[2])?,
        })
    }

    fn record(&self, row: &csv::StringRecord) -> ContactRecord {
        let field = |idx: usize| row.get(idx).unwrap_or_default();
        ContactRecord::new(field(self.first_name), field(self.phone), field(self.notes))
    }
}

/// Parse an uploaded CSV and validate it into contact records.
///
/// Headers and values are trimmed. Extra columns are ignored and the
/// required ones may appear in any order. Row order is preserved.
pub fn parse_and_validate(
    raw: &[u8],
    check: ColumnCheck,
) -> Result<Vec<ContactRecord>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(raw);

    let headers = reader.headers()?.clone();
    let rows = reader
        .records()
        .collect::<Result<Vec<csv::StringRecord>, _>>()?;

    if rows.is_empty() {
        return Err(IngestError::EmptyInput);
    }

    let columns = ColumnIndex::resolve(&headers).ok_or(IngestError::MissingColumns)?;
    let records: Vec<ContactRecord> = rows.iter().map(|row| columns.record(row)).collect();

    match check {
        ColumnCheck::FirstRow => {
            let first = &records[0];
            if first.first_name.is_empty() || first.phone.is_empty() || first.notes.is_empty() {
                return Err(IngestError::MissingColumns);
            }
        }
        ColumnCheck::Header => {
            if let Some(pos) = records.iter().position(|r| r.first_name.is_empty()) {
                return Err(IngestError::MissingValue {
                    row: pos + 1,
                    column: REQUIRED_COLUMNS[0],
                });
            }
        }
    }

    tracing::debug!("Parsed {} contact rows", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(csv: &str) -> Result<Vec<ContactRecord>, IngestError> {
        parse_and_validate(csv.as_bytes(), ColumnCheck::Header)
    }

    #[test]
    fn test_parses_rows_in_order() {
        let records = parse("FirstName,Phone,Notes\nAda,111,first\nBob,222,second\nCy,333,third\n")
            .expect("valid csv");
        assert_eq!(
            records,
            vec![
                ContactRecord::new("Ada", "111", "first"),
                ContactRecord::new("Bob", "222", "second"),
                ContactRecord::new("Cy", "333", "third"),
            ]
        );
    }

    #[test]
    fn test_columns_in_any_order_with_extras() {
        let records = parse("Notes,Email,FirstName,Phone\nvip,a@x.io,Ada,111\n").unwrap();
        assert_eq!(records, vec![ContactRecord::new("Ada", "111", "vip")]);
    }

    #[test]
    fn test_trims_headers_and_values() {
        let records = parse(" FirstName , Phone ,Notes\n  Ada ,  111 , hi  \n").unwrap();
        assert_eq!(records, vec![ContactRecord::new("Ada", "111", "hi")]);
    }

    #[test]
    fn test_quoted_fields_keep_commas() {
        let records = parse("FirstName,Phone,Notes\nAda,111,\"call, then email\"\n").unwrap();
        assert_eq!(records[0].notes, "call, then email");
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let records = parse("FirstName,Phone,Notes\n\nAda,111,x\n\nBob,222,y\n").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_header_only_is_empty_input() {
        assert_eq!(parse("FirstName,Phone,Notes\n"), Err(IngestError::EmptyInput));
    }

    #[test]
    fn test_no_bytes_is_empty_input() {
        assert_eq!(parse(""), Err(IngestError::EmptyInput));
    }

    #[test]
    fn test_empty_check_runs_before_column_check() {
        assert_eq!(parse("Name,Number\n"), Err(IngestError::EmptyInput));
    }

    #[test]
    fn test_missing_column_in_header() {
        assert_eq!(
            parse("FirstName,Phone\nAda,111\n"),
            Err(IngestError::MissingColumns)
        );
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        assert_eq!(
            parse("firstname,phone,notes\nAda,111,x\n"),
            Err(IngestError::MissingColumns)
        );
    }

    #[test]
    fn test_ragged_row_is_invalid_format() {
        let err = parse("FirstName,Phone,Notes\nAda,111\n").unwrap_err();
        assert!(matches!(err, IngestError::InvalidFormat { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_invalid_format() {
        let raw = b"FirstName,Phone,Notes\n\xff\xfe,111,x\n";
        let err = parse_and_validate(raw, ColumnCheck::Header).unwrap_err();
        assert!(matches!(err, IngestError::InvalidFormat { .. }));
    }

    #[test]
    fn test_header_check_allows_blank_notes_on_first_row() {
        let records = parse("FirstName,Phone,Notes\nAda,111,\nBob,222,y\n").unwrap();
        assert_eq!(records[0].notes, "");
    }

    #[test]
    fn test_header_check_rejects_blank_first_name() {
        assert_eq!(
            parse("FirstName,Phone,Notes\nAda,111,x\n,222,y\n"),
            Err(IngestError::MissingValue {
                row: 2,
                column: "FirstName"
            })
        );
    }

    #[test]
    fn test_first_row_check_rejects_blank_first_row_value() {
        let raw = b"FirstName,Phone,Notes\nAda,111,\nBob,222,y\n";
        assert_eq!(
            parse_and_validate(raw, ColumnCheck::FirstRow),
            Err(IngestError::MissingColumns)
        );
    }

    #[test]
    fn test_first_row_check_ignores_later_rows() {
        let raw = b"FirstName,Phone,Notes\nAda,111,x\n,,\n";
        let records = parse_and_validate(raw, ColumnCheck::FirstRow).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], ContactRecord::new("", "", ""));
    }

    #[test]
    fn test_column_check_deserializes_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            check: ColumnCheck,
        }
        let w: Wrapper = toml::from_str("check = \"first_row\"").unwrap();
        assert_eq!(w.check, ColumnCheck::FirstRow);
    }
}
