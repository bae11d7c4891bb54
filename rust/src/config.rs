//! Corpus build configuration.
//!
//! Mirrors a small TOML file:
//!
//! ```toml
//! base_dir = "/data/java"
//! roots = ["commons-lang", "guava"]
//! output = "dataset.json"
//! ```

use regex::RegexSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::analyzer::methods::DEFAULT_METHOD_KINDS;
use crate::error::{CorpusError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON array, four-space indented.
    #[default]
    Json,
    /// One row object per line.
    Jsonl,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Prefix for relative entries in `roots`.
    pub base_dir: Option<PathBuf>,
    pub roots: Vec<PathBuf>,
    pub output: PathBuf,
    pub extensions: Vec<String>,
    /// Regexes matched against each file's `/`-separated path relative to its
    /// root, with a leading `/`.
    pub exclude: Vec<String>,
    pub method_kinds: Vec<String>,
    /// Also mine `method_declaration`s that are interface members.
    pub interface_methods: bool,
    /// Treat any recovered syntax error as a parse failure for the file.
    pub strict_syntax: bool,
    /// Worker threads; 0 uses rayon's global pool.
    pub jobs: usize,
    pub format: OutputFormat,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            roots: Vec::new(),
            output: PathBuf::from("dataset.json"),
            extensions: vec!["java".to_string()],
            exclude: vec![r"/target/".into(), r"/build/".into(), r"/\.git/".into()],
            method_kinds: DEFAULT_METHOD_KINDS.iter().map(|k| k.to_string()).collect(),
            interface_methods: false,
            strict_syntax: false,
            jobs: 0,
            format: OutputFormat::Json,
        }
    }
}

/// Per-file knobs handed to each worker.
#[derive(Debug, Clone)]
pub struct FileOptions {
    pub method_kinds: Vec<String>,
    pub interface_methods: bool,
    pub strict_syntax: bool,
}

impl Default for FileOptions {
    fn default() -> Self {
        BuildConfig::default().file_options()
    }
}

impl BuildConfig {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots, ..Self::default() }
    }

    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CorpusError::Config {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |message: &str| {
            Err(CorpusError::Config { path: "<config>".into(), message: message.into() })
        };
        if self.roots.is_empty() {
            return fail("at least one source root is required");
        }
        if self.extensions.iter().all(|e| e.trim_start_matches('.').is_empty()) {
            return fail("at least one file extension is required");
        }
        if self.method_kinds.is_empty() {
            return fail("at least one method node kind is required");
        }
        self.exclude_set()?;
        Ok(())
    }

    /// Roots with `base_dir` applied to relative entries.
    pub fn resolved_roots(&self) -> Vec<PathBuf> {
        self.roots
            .iter()
            .map(|root| match &self.base_dir {
                Some(base) if root.is_relative() => base.join(root),
                _ => root.clone(),
            })
            .collect()
    }

    pub fn exclude_set(&self) -> Result<RegexSet> {
        Ok(RegexSet::new(&self.exclude)?)
    }

    pub fn file_options(&self) -> FileOptions {
        FileOptions {
            method_kinds: self.method_kinds.clone(),
            interface_methods: self.interface_methods,
            strict_syntax: self.strict_syntax,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = BuildConfig::default();
        assert_eq!(cfg.extensions, vec!["java"]);
        assert_eq!(cfg.method_kinds, vec!["method_declaration"]);
        assert_eq!(cfg.format, OutputFormat::Json);
        assert_eq!(cfg.output, PathBuf::from("dataset.json"));
        assert!(!cfg.strict_syntax);
        assert!(!cfg.interface_methods);
    }

    #[test]
    fn test_parse_toml_with_base_dir() {
        let cfg = BuildConfig::from_toml_str(
            r#"
base_dir = "/data"
roots = ["proj-a", "/abs/proj-b"]
output = "out.jsonl"
format = "jsonl"
jobs = 4
interface_methods = true
"#,
            "corpus.toml",
        )
        .unwrap();
        assert_eq!(
            cfg.resolved_roots(),
            vec![PathBuf::from("/data/proj-a"), PathBuf::from("/abs/proj-b")]
        );
        assert_eq!(cfg.format, OutputFormat::Jsonl);
        assert_eq!(cfg.jobs, 4);
        assert!(cfg.file_options().interface_methods);
        assert_eq!(cfg.extensions, vec!["java"], "unset keys keep defaults");
        cfg.validate().unwrap();
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = BuildConfig::from_toml_str("rots = [\"a\"]", "corpus.toml").unwrap_err();
        assert!(matches!(err, CorpusError::Config { .. }));
    }

    #[test]
    fn test_validate_rejects_empty_roots_and_bad_regex() {
        assert!(BuildConfig::default().validate().is_err());

        let mut cfg = BuildConfig::new(vec![PathBuf::from("src")]);
        cfg.exclude.push("(unclosed".into());
        assert!(matches!(cfg.validate(), Err(CorpusError::InvalidRegex(_))));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = BuildConfig::from_toml_file(Path::new("/nonexistent/corpus.toml")).unwrap_err();
        assert!(matches!(err, CorpusError::Read { .. }));
    }
}
