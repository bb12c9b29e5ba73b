//! coddoc: AI-assisted code review and documentation (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod config;
pub mod constants;
pub mod env;
pub mod models;
pub mod normalize;
pub mod orchestrator;
pub mod output;
pub mod prompt;
pub mod providers;
pub mod store;
