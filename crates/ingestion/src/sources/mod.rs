//! Record source implementations
//!
//! Contains S3RecordSource, FileRecordSource, and MemoryRecordSource.

mod file;
mod memory;
mod s3;

pub use self::file::FileRecordSource;
pub use self::memory::MemoryRecordSource;
pub use self::s3::S3RecordSource;

use metrics::counter;

fn record_ingested(count: usize) {
    counter!("batch_relay_records_ingested_total").increment(count as u64);
}
