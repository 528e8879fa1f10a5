//! Contact records and CSV ingestion

mod ingest;
mod types;

pub use ingest::{parse_and_validate, ColumnCheck, IngestError, REQUIRED_COLUMNS};
pub use types::ContactRecord;
