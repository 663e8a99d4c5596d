//! TriggerEvent - run input
//!
//! Object-storage notification naming the record file to relay.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ContractError;

/// Location of the record file in object storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse `s3://bucket/key/to/file`
    pub fn parse_uri(uri: &str) -> Result<Self, ContractError> {
        let rest = uri
            .strip_prefix("s3://")
            .ok_or_else(|| ContractError::trigger_event("S3 URI must start with 's3://'"))?;

        match rest.split_once('/') {
            Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => {
                Ok(Self::new(bucket, key))
            }
            _ => Err(ContractError::trigger_event(
                "S3 URI must be in format 's3://bucket/key/to/file'",
            )),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Object-created notification as delivered by the storage service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<TriggerRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Object {
    pub key: String,
}

impl TriggerEvent {
    /// Parse a notification from its JSON form
    pub fn from_json(content: &str) -> Result<Self, ContractError> {
        serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
            message: format!("trigger event parse error: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// The object named by the first notification record
    ///
    /// Keys arrive form-encoded (`+` for space, `%XX` escapes) and are decoded here.
    pub fn first_object(&self) -> Result<ObjectRef, ContractError> {
        let record = self
            .records
            .first()
            .ok_or_else(|| ContractError::trigger_event("event contains no records"))?;

        let key = decode_object_key(&record.s3.object.key)?;
        Ok(ObjectRef::new(record.s3.bucket.name.clone(), key))
    }
}

fn decode_object_key(raw: &str) -> Result<String, ContractError> {
    let plus_decoded = raw.replace('+', " ");
    urlencoding::decode(&plus_decoded)
        .map(|key| key.into_owned())
        .map_err(|e| ContractError::trigger_event(format!("object key is not valid UTF-8: {e}")))
}
