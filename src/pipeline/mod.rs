//! Extraction configuration and end-to-end execution.

mod config;
mod runner;

pub use config::ExtractConfig;
pub use runner::run_extraction;
