// Public modules
pub mod config;
pub mod error;
pub mod files;
pub mod output;
pub mod rewrap;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use output::{FileOutcome, RunSummary};
