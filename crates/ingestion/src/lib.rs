//! # Ingestion
//!
//! Record ingestion module.
//!
//! Responsibilities:
//! - Fetch the record file (object storage, local file, memory)
//! - Parse it into an ordered `Vec<Record>`
//!
//! ## Usage Example
//!
//! ```ignore
//! use contracts::{ObjectRef, RecordSource};
//! use ingestion::S3RecordSource;
//!
//! let source = S3RecordSource::new(&sdk_config, ObjectRef::new("bucket", "records.csv"));
//! let records = source.fetch_records().await?;
//! ```

mod parser;
mod sources;

// Re-exports
pub use contracts::Record;
pub use parser::{parse_line, parse_records, FIELD_DELIMITER};
pub use sources::{FileRecordSource, MemoryRecordSource, S3RecordSource};
