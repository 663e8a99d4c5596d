//! MemoryRecordSource - in-memory payload

use bytes::Bytes;
use contracts::{ContractError, Record, RecordSource};

use crate::parser::parse_records;

/// Serves a fixed byte payload, as if it had been fetched
pub struct MemoryRecordSource {
    name: String,
    payload: Bytes,
}

impl MemoryRecordSource {
    pub fn new(name: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            payload: payload.into(),
        }
    }
}

impl RecordSource for MemoryRecordSource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    async fn fetch_records(&self) -> Result<Vec<Record>, ContractError> {
        let records = parse_records(&self.payload, &self.name)?;
        super::record_ingested(records.len());
        Ok(records)
    }
}
