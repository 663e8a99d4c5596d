//! Record - Record Source output
//!
//! One parsed line of the record file.

use serde::{Deserialize, Serialize};

/// A single record to deliver
///
/// Identity is `id`. Records are never mutated after parsing; fields that were
/// missing on the source line are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record identifier, also the last path segment of the delivery target
    pub id: String,

    /// Display name
    pub name: String,

    /// Free-form interests column
    pub interests: String,
}

impl Record {
    /// Create a record from its three positional fields
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        interests: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            interests: interests.into(),
        }
    }
}

/// An ordered, contiguous slice of records dispatched together
pub type Batch<'a> = &'a [Record];
