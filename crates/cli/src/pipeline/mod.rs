//! Relay orchestration module.

mod collaborators;
mod input;
mod orchestrator;

pub use input::RunInput;
pub use orchestrator::RelayPlan;
