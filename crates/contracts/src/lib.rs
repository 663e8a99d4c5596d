//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Failure Model
//! - Input-phase failures surface as [`ContractError`]
//! - Credential, lag and delivery failures are collapsed to values
//!   (empty credential, zero lag, [`DeliveryOutcome`]) at the trait boundary

mod collaborators;
mod error;
mod outcome;
mod record;
mod relay_config;
mod trigger;

pub use collaborators::{
    CredentialProvider, DeliveryClient, LagMonitor, LocalCredentialProvider, LocalDeliveryClient,
    LocalLagMonitor, LocalRecordSource, RecordSource,
};
pub use error::*;
pub use outcome::*;
pub use record::*;
pub use relay_config::*;
pub use trigger::*;
