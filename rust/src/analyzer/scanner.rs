use crate::analyzer::align::align;
use crate::analyzer::comments::aggregate_comments;
use crate::analyzer::lexer::tokenize;
use crate::analyzer::methods::extract_methods;
use crate::analyzer::model::DatasetRow;
use crate::analyzer::nlp::{CommentTokenizer, UnicodeTokenizer};
use crate::analyzer::source::{decode_lossy, new_parser, SourceUnit};
use crate::analyzer::util::{display_path, has_extension, is_excluded};
use crate::config::{BuildConfig, FileOptions, OutputFormat};
use crate::error::{CorpusError, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Result of running the pipeline over one file's text.
#[derive(Debug, Clone, Default)]
pub struct FileOutcome {
    pub comments: usize,
    pub methods: usize,
    pub rows: Vec<DatasetRow>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Processed { comments: usize, methods: usize, rows: usize },
    Unreadable { reason: String },
    ParseFailed { reason: String },
    Failed { reason: String },
}

#[derive(Serialize, Debug, Clone)]
pub struct FileReport {
    pub path: String,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileReport {
    pub fn is_skipped(&self) -> bool {
        !matches!(self.status, FileStatus::Processed { .. })
    }
}

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorpusSummary {
    pub files: usize,
    pub processed: usize,
    pub skipped: usize,
    pub rows: usize,
}

/// Rows of every file, in discovery order, plus what happened to each file.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub rows: Vec<DatasetRow>,
    pub files: Vec<FileReport>,
}

impl Corpus {
    pub fn summary(&self) -> CorpusSummary {
        let skipped = self.files.iter().filter(|f| f.is_skipped()).count();
        CorpusSummary {
            files: self.files.len(),
            processed: self.files.len() - skipped,
            skipped,
            rows: self.rows.len(),
        }
    }

    pub fn persist(&self, path: &Path, format: OutputFormat) -> Result<()> {
        let mut f = File::create(path).map_err(|source| CorpusError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        // write_corpus buffers internally.
        write_corpus(&self.rows, format, &mut f).map_err(|e| {
            let source = match e {
                CorpusError::Io(source) => source,
                CorpusError::Json(err) => err.into(),
                other => return other,
            };
            CorpusError::Write { path: path.to_path_buf(), source }
        })
    }
}

/// Run the comment and method pipelines over one file's text and align them.
pub fn process_source(
    label: &str,
    text: &str,
    opts: &FileOptions,
    tokenizer: &dyn CommentTokenizer,
) -> Result<FileOutcome> {
    let unit = SourceUnit::parse(label, text)?;
    if opts.strict_syntax && unit.has_syntax_errors() {
        return Err(CorpusError::Syntax { path: label.to_string() });
    }
    let comments = aggregate_comments(&tokenize(&unit))?;
    let methods = extract_methods(&unit, opts.method_kinds.as_slice(), opts.interface_methods);
    let rows = align(&comments, &methods, tokenizer);
    Ok(FileOutcome { comments: comments.len(), methods: methods.len(), rows })
}

/// Read a source file, decoding invalid UTF-8 lossily.
pub fn read_source(file: &Path) -> Result<String> {
    let bytes = fs::read(file).map_err(|source| CorpusError::Read {
        path: file.to_path_buf(),
        source,
    })?;
    Ok(decode_lossy(&bytes))
}

fn process_file(
    root: &Path,
    file: &Path,
    opts: &FileOptions,
    tokenizer: &dyn CommentTokenizer,
) -> (FileReport, Vec<DatasetRow>) {
    let path = display_path(root, file);
    let text = match read_source(file) {
        Ok(t) => t,
        Err(e) => {
            warn!(path = %path, error = %e, "Skipping unreadable file");
            let status = FileStatus::Unreadable { reason: e.to_string() };
            return (FileReport { path, status }, Vec::new());
        }
    };
    match process_source(&path, &text, opts, tokenizer) {
        Ok(outcome) => {
            debug!(
                path = %path,
                comments = outcome.comments,
                methods = outcome.methods,
                rows = outcome.rows.len(),
                "Processed file"
            );
            let status = FileStatus::Processed {
                comments: outcome.comments,
                methods: outcome.methods,
                rows: outcome.rows.len(),
            };
            (FileReport { path, status }, outcome.rows)
        }
        Err(e @ (CorpusError::Parse { .. } | CorpusError::Syntax { .. })) => {
            warn!(path = %path, error = %e, "Skipping file that failed to parse");
            let status = FileStatus::ParseFailed { reason: e.to_string() };
            (FileReport { path, status }, Vec::new())
        }
        Err(e) => {
            warn!(path = %path, error = %e, "Skipping file");
            let status = FileStatus::Failed { reason: e.to_string() };
            (FileReport { path, status }, Vec::new())
        }
    }
}

/// Every matching source file under the configured roots, as `(root, file)`,
/// sorted by name within each root.
pub fn discover_files(cfg: &BuildConfig) -> Result<Vec<(PathBuf, PathBuf)>> {
    let excluded = cfg.exclude_set()?;
    let mut out = Vec::new();
    for root in cfg.resolved_roots() {
        if !root.exists() {
            warn!(root = %root.display(), "Source root does not exist");
            continue;
        }
        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!(root = %root.display(), error = %e, "Cannot walk entry");
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            // Matched below the root only, so a root under `build/` is still scanned.
            let rel = format!("/{}", display_path(&root, path));
            if is_excluded(Path::new(&rel), &excluded) {
                continue;
            }
            if has_extension(path, &cfg.extensions) {
                out.push((root.clone(), path.to_path_buf()));
            }
        }
    }
    Ok(out)
}

pub fn build_corpus(cfg: &BuildConfig) -> Result<Corpus> {
    build_corpus_with(cfg, &UnicodeTokenizer)
}

/// Build the corpus with a caller-supplied comment tokenizer.
pub fn build_corpus_with(cfg: &BuildConfig, tokenizer: &dyn CommentTokenizer) -> Result<Corpus> {
    cfg.validate()?;
    // Surface a broken grammar once instead of once per file.
    new_parser()?;

    let start = Instant::now();
    let files = discover_files(cfg)?;
    let opts = cfg.file_options();
    info!(files = files.len(), roots = cfg.roots.len(), "Building corpus");

    let run = || -> Vec<(FileReport, Vec<DatasetRow>)> {
        files
            .par_iter()
            .map(|(root, file)| process_file(root, file, &opts, tokenizer))
            .collect()
    };
    let results = if cfg.jobs == 0 {
        run()
    } else {
        rayon::ThreadPoolBuilder::new().num_threads(cfg.jobs).build()?.install(run)
    };

    let mut corpus = Corpus::default();
    for (report, mut rows) in results {
        corpus.rows.append(&mut rows);
        corpus.files.push(report);
    }

    let summary = corpus.summary();
    info!(
        files = summary.files,
        skipped = summary.skipped,
        rows = summary.rows,
        time_ms = start.elapsed().as_millis() as u64,
        "Corpus built"
    );
    Ok(corpus)
}

pub fn write_corpus(rows: &[DatasetRow], format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    let mut buf = BufWriter::new(out);
    match format {
        OutputFormat::Json => {
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            rows.serialize(&mut ser)?;
            buf.write_all(b"\n")?;
        }
        OutputFormat::Jsonl => {
            for r in rows {
                serde_json::to_writer(&mut buf, r)?;
                buf.write_all(b"\n")?;
            }
        }
    }
    buf.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> FileOutcome {
        process_source("T.java", src, &FileOptions::default(), &UnicodeTokenizer).unwrap()
    }

    #[test]
    fn test_single_line_comment_scenario() {
        let src = "class T {\n  int x;\n\n  // returns x\n  int getX() { return x; }\n}\n";
        let out = run(src);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].comment_text, "returns x");
        assert_eq!(out.rows[0].method_text, "int getX() { return x; }");
    }

    #[test]
    fn test_cumulative_comment_scenario() {
        let src = "class T {\n\n  // part one\n  // part two\n  void f() {}\n}\n";
        let out = run(src);
        assert_eq!(out.comments, 1);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].comment_text, "part one\npart two");
    }

    #[test]
    fn test_blank_line_scenario() {
        let src = "class T {\n\n\n  // lonely\n\n  void f() {}\n}\n";
        let out = run(src);
        assert_eq!((out.comments, out.methods), (1, 1));
        assert!(out.rows.is_empty());
    }

    #[test]
    fn test_empty_file_scenario() {
        let out = run("");
        assert_eq!((out.comments, out.methods), (0, 0));
        assert!(out.rows.is_empty());
    }

    #[test]
    fn test_interface_members_need_opt_in() {
        let src = "interface I {\n  // doc\n  void f();\n}\n";
        let out = run(src);
        assert_eq!((out.comments, out.methods), (1, 0));
        assert!(out.rows.is_empty());

        let opts = FileOptions { interface_methods: true, ..FileOptions::default() };
        let out = process_source("I.java", src, &opts, &UnicodeTokenizer).unwrap();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].method_text, "void f();");
    }

    #[test]
    fn test_strict_syntax_rejects_broken_file() {
        let src = "class T {\n  // doc\n  void f( {\n}\n";
        let opts = FileOptions { strict_syntax: true, ..FileOptions::default() };
        let err = process_source("T.java", src, &opts, &UnicodeTokenizer).unwrap_err();
        assert!(matches!(err, CorpusError::Syntax { .. }));
    }

    #[test]
    fn test_write_json_uses_four_space_indent() {
        let rows = vec![DatasetRow {
            method_text: "void f() {}".into(),
            method_tokens: vec!["void".into()],
            comment_text: "doc".into(),
            comment_tokens: vec!["doc".into()],
        }];
        let mut out = Vec::new();
        write_corpus(&rows, OutputFormat::Json, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("[\n    {\n        \"method_text\""));
        let parsed: Vec<DatasetRow> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, rows);
    }

    #[test]
    fn test_write_jsonl_one_row_per_line() {
        let row = DatasetRow {
            method_text: "void f() {\n}".into(),
            method_tokens: vec![],
            comment_text: "a\nb".into(),
            comment_tokens: vec![],
        };
        let mut out = Vec::new();
        write_corpus(&[row.clone(), row], OutputFormat::Jsonl, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_empty_corpus_is_empty_array() {
        let mut out = Vec::new();
        write_corpus(&[], OutputFormat::Json, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim(), "[]");
    }

    #[test]
    fn test_read_source_reports_missing_file() {
        let err = read_source(Path::new("/nonexistent/Missing.java")).unwrap_err();
        assert!(matches!(err, CorpusError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/Missing.java"));
    }

    #[test]
    fn test_missing_file_is_reported_unreadable() {
        let root = Path::new("/nonexistent");
        let (report, rows) = process_file(
            root,
            &root.join("Missing.java"),
            &FileOptions::default(),
            &UnicodeTokenizer,
        );
        assert_eq!(report.path, "Missing.java");
        assert!(matches!(report.status, FileStatus::Unreadable { .. }));
        assert!(report.is_skipped());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_persist_error_names_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir").join("dataset.json");
        let err = Corpus::default().persist(&missing, OutputFormat::Json).unwrap_err();
        assert!(matches!(err, CorpusError::Write { ref path, .. } if path == &missing));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_persist_write_failure_names_output_path() {
        // /dev/full opens fine but every write fails with ENOSPC.
        let full = Path::new("/dev/full");
        let err = Corpus::default().persist(full, OutputFormat::Json).unwrap_err();
        assert!(matches!(err, CorpusError::Write { ref path, .. } if path == full));
    }

    #[test]
    fn test_summary_counts_skips() {
        let corpus = Corpus {
            rows: Vec::new(),
            files: vec![
                FileReport {
                    path: "A.java".into(),
                    status: FileStatus::Processed { comments: 1, methods: 1, rows: 0 },
                },
                FileReport {
                    path: "B.java".into(),
                    status: FileStatus::Unreadable { reason: "denied".into() },
                },
            ],
        };
        assert_eq!(
            corpus.summary(),
            CorpusSummary { files: 2, processed: 1, skipped: 1, rows: 0 }
        );
    }
}
