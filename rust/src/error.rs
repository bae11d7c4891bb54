use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load Java grammar: {0}")]
    Grammar(String),

    #[error("Parser produced no tree for {path}")]
    Parse { path: String },

    #[error("Syntax errors in {path}")]
    Syntax { path: String },

    #[error("Comment block spans lines {start_line}..{stop_line} backwards")]
    Invariant { start_line: usize, stop_line: usize },

    #[error("Configuration error in {path}: {message}")]
    Config { path: String, message: String },

    #[error("Invalid exclude pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, CorpusError>;
