//! Software channel (repository) subscriptions.

pub mod compliance;
pub mod manager;
pub mod types;
