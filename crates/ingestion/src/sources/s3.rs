//! S3RecordSource - record file from object storage

use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use bytes::Bytes;
use contracts::{ContractError, ObjectRef, Record, RecordSource};
use tracing::{debug, info, instrument};

use crate::parser::parse_records;

/// Reads the record file named by a trigger event
pub struct S3RecordSource {
    client: aws_sdk_s3::Client,
    object: ObjectRef,
}

impl S3RecordSource {
    /// Create a source with a client built from shared AWS config
    pub fn new(sdk_config: &SdkConfig, object: ObjectRef) -> Self {
        Self::with_client(aws_sdk_s3::Client::new(sdk_config), object)
    }

    /// Create a source around an existing client
    pub fn with_client(client: aws_sdk_s3::Client, object: ObjectRef) -> Self {
        Self { client, object }
    }

    /// Object this source reads
    pub fn object(&self) -> &ObjectRef {
        &self.object
    }

    async fn fetch_object(&self) -> Result<Bytes, ContractError> {
        let source_name = self.object.to_string();

        let response = self
            .client
            .get_object()
            .bucket(&self.object.bucket)
            .key(&self.object.key)
            .send()
            .await
            .map_err(|e| {
                ContractError::source_fetch(&source_name, DisplayErrorContext(&e).to_string())
            })?;

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| ContractError::source_fetch(&source_name, e.to_string()))?;

        let bytes = body.into_bytes();
        debug!(source = %source_name, bytes = bytes.len(), "Fetched object");
        Ok(bytes)
    }
}

impl RecordSource for S3RecordSource {
    fn describe(&self) -> String {
        self.object.to_string()
    }

    #[instrument(
        name = "s3_record_source_fetch",
        skip(self),
        fields(bucket = %self.object.bucket, key = %self.object.key)
    )]
    async fn fetch_records(&self) -> Result<Vec<Record>, ContractError> {
        let payload = self.fetch_object().await?;
        let records = parse_records(&payload, &self.describe())?;
        super::record_ingested(records.len());
        info!(records = records.len(), "Loaded records from object storage");
        Ok(records)
    }
}
