//! Run input resolution
//!
//! Turns `--event`, `--object`, `--bucket/--key` or `--file` into a record source.

use std::path::PathBuf;

use anyhow::{Context, Result};
use contracts::{ContractError, ObjectRef, Record, RecordSource, TriggerEvent};
use ingestion::{FileRecordSource, S3RecordSource};
use providers::SdkConfig;

use crate::cli::RunArgs;
use crate::error::CliError;

/// Where the record file lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunInput {
    /// Object in storage
    Object(ObjectRef),
    /// Local file
    File(PathBuf),
}

impl RunInput {
    /// Resolve the input from CLI arguments
    pub fn from_args(args: &RunArgs) -> Result<Self> {
        if let Some(path) = &args.event {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read event file {}", path.display()))?;
            return Self::from_event_json(&content);
        }

        if let Some(uri) = &args.object {
            return Ok(Self::Object(ObjectRef::parse_uri(uri)?));
        }

        if let (Some(bucket), Some(key)) = (&args.bucket, &args.key) {
            return Ok(Self::Object(ObjectRef::new(bucket, key)));
        }

        if let Some(path) = &args.file {
            return Ok(Self::File(path.clone()));
        }

        Err(CliError::NoInput.into())
    }

    /// Resolve the input from an object-storage event notification
    pub fn from_event_json(content: &str) -> Result<Self> {
        let event = TriggerEvent::from_json(content)?;
        Ok(Self::Object(event.first_object()?))
    }

    pub fn needs_aws(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Build the record source for this input
    pub fn into_source(self, sdk_config: Option<&SdkConfig>) -> Result<InputSource> {
        match self {
            Self::Object(object) => {
                let sdk_config =
                    sdk_config.context("AWS configuration required for object input")?;
                Ok(InputSource::S3(S3RecordSource::new(sdk_config, object)))
            }
            Self::File(path) => Ok(InputSource::File(FileRecordSource::new(path))),
        }
    }
}

impl std::fmt::Display for RunInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Object(object) => write!(f, "{object}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Record source chosen at runtime
pub enum InputSource {
    S3(S3RecordSource),
    File(FileRecordSource),
}

impl RecordSource for InputSource {
    fn describe(&self) -> String {
        match self {
            Self::S3(source) => source.describe(),
            Self::File(source) => source.describe(),
        }
    }

    async fn fetch_records(&self) -> Result<Vec<Record>, ContractError> {
        match self {
            Self::S3(source) => source.fetch_records().await,
            Self::File(source) => source.fetch_records().await,
        }
    }
}
