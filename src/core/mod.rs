// Public modules
pub mod audit;
pub mod config;
pub mod deploy;
pub mod error;
pub mod fragment;
pub mod generate;
pub mod git;
pub mod pivot;
pub mod record;
pub mod retry;
pub mod runner;
pub mod source;

// Internal modules - not part of public API
pub(crate) mod http;
pub(crate) mod paths;

// Public modules for CLI access
pub mod defaults;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
