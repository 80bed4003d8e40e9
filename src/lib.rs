// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod chart;
pub mod config;
pub mod event;
pub mod metrics;
pub mod reference;
pub mod report;
