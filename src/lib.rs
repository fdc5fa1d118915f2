// Library root: re-exports all modules so integration tests and the CLI
// binary share one public API.

pub mod config;
pub mod draft;
pub mod valuation;
