//! Batch planning
//!
//! Splits a record sequence into contiguous, ordered spans of at most
//! `batch_size` records. The last span may be shorter.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

/// One planned batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSpan {
    /// Zero-based batch index
    pub index: usize,
    /// Offset of the first record
    pub start: usize,
    /// Number of records
    pub len: usize,
}

impl BatchSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// Full batch plan for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchPlan {
    total_records: usize,
    batch_size: usize,
    spans: Vec<BatchSpan>,
}

impl BatchPlan {
    /// Plan batches for `total_records` records
    ///
    /// A `batch_size` of zero is treated as one.
    pub fn new(total_records: usize, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        let spans = (0..total_records)
            .step_by(batch_size)
            .enumerate()
            .map(|(index, start)| BatchSpan {
                index,
                start,
                len: batch_size.min(total_records - start),
            })
            .collect();

        Self {
            total_records,
            batch_size,
            spans,
        }
    }

    pub fn spans(&self) -> &[BatchSpan] {
        &self.spans
    }

    pub fn batch_count(&self) -> usize {
        self.spans.len()
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

impl fmt::Display for BatchPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} records in {} batches (batch size {})",
            self.total_records,
            self.batch_count(),
            self.batch_size
        )?;
        for span in &self.spans {
            writeln!(
                f,
                "  batch {:>4}: records {}..{} ({})",
                span.index,
                span.start,
                span.start + span.len,
                span.len
            )?;
        }
        Ok(())
    }
}
