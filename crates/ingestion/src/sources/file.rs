//! FileRecordSource - record file on the local filesystem

use std::path::{Path, PathBuf};

use contracts::{ContractError, Record, RecordSource};
use tracing::{info, instrument};

use crate::parser::parse_records;

/// Reads a local record file (local replays and dry runs)
pub struct FileRecordSource {
    path: PathBuf,
}

impl FileRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for FileRecordSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    #[instrument(name = "file_record_source_fetch", skip(self), fields(path = %self.path.display()))]
    async fn fetch_records(&self) -> Result<Vec<Record>, ContractError> {
        let payload = tokio::fs::read(&self.path)
            .await
            .map_err(|e| ContractError::source_fetch(self.describe(), e.to_string()))?;

        let records = parse_records(&payload, &self.describe())?;
        super::record_ingested(records.len());
        info!(records = records.len(), "Loaded records from file");
        Ok(records)
    }
}
