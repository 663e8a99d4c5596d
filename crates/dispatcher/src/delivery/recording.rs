//! RecordingDeliveryClient - in-memory delivery double

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use contracts::{DeliveryClient, DeliveryOutcome, Record};

/// Records every delivered record and answers with scripted outcomes
///
/// Unscripted ids are `Delivered`. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingDeliveryClient {
    outcomes: Arc<HashMap<String, DeliveryOutcome>>,
    delivered: Arc<Mutex<Vec<Record>>>,
}

impl RecordingDeliveryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `outcome` for every record whose id is `id`
    pub fn with_outcome(mut self, id: impl Into<String>, outcome: DeliveryOutcome) -> Self {
        Arc::make_mut(&mut self.outcomes).insert(id.into(), outcome);
        self
    }

    /// Every record passed to `deliver`, in call order
    pub fn delivered(&self) -> Vec<Record> {
        self.delivered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Ids passed to `deliver`, in call order
    pub fn delivered_ids(&self) -> Vec<String> {
        self.delivered().into_iter().map(|r| r.id).collect()
    }

    pub fn attempt_count(&self) -> usize {
        self.delivered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl DeliveryClient for RecordingDeliveryClient {
    async fn deliver(&self, record: &Record) -> DeliveryOutcome {
        self.delivered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record.clone());
        self.outcomes
            .get(&record.id)
            .cloned()
            .unwrap_or(DeliveryOutcome::Delivered)
    }
}
