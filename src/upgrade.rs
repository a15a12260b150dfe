//! Engine host upgrade workflow.

pub mod approval;
pub mod engine;
pub mod kernel;
pub mod orchestrator;
pub mod profile;
