//! Collaborator traits - dispatcher inputs
//!
//! The dispatcher only sees these four interfaces. Every concrete I/O client
//! (object storage, secret store, metric store, HTTP) lives behind one of them
//! so it can be swapped for a test double.

use crate::{ContractError, DeliveryOutcome, LagReading, Record};

/// Supplies the ordered record sequence for a run
#[trait_variant::make(RecordSource: Send)]
pub trait LocalRecordSource {
    /// Source description (used for logging)
    fn describe(&self) -> String;

    /// Retrieve and parse every record, in file order
    ///
    /// # Errors
    /// Retrieval or decoding failure. This is the only fatal failure of a run.
    async fn fetch_records(&self) -> Result<Vec<Record>, ContractError>;
}

/// Supplies the current API credential
#[trait_variant::make(CredentialProvider: Send)]
pub trait LocalCredentialProvider {
    /// Current credential, or an empty string when it cannot be obtained
    async fn fetch_credential(&self) -> String;
}

/// Supplies the downstream consumer's current lag
#[trait_variant::make(LagMonitor: Send)]
pub trait LocalLagMonitor {
    /// Maximum lag over the trailing window, or zero when unavailable
    async fn current_lag(&self) -> LagReading;
}

/// Delivers one record to the external endpoint
#[trait_variant::make(DeliveryClient: Send)]
pub trait LocalDeliveryClient {
    /// Deliver `record`, folding every failure into the returned outcome
    async fn deliver(&self, record: &Record) -> DeliveryOutcome;
}
