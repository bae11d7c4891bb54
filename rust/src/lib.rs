pub mod analyzer;
pub mod config;
pub mod error;

// Re-export main types and functions
pub use analyzer::*;
pub use config::{BuildConfig, FileOptions, OutputFormat};
pub use error::{CorpusError, Result};
