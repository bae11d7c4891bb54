use anyhow::{Context, Result};
use clap::Parser;
use comment_corpus::{build_corpus, write_corpus, BuildConfig, OutputFormat};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "corpus_builder", version, about = "Pair Java methods with the comments directly above them")]
struct Cli {
    /// TOML configuration file
    #[arg(long, value_name = "file")]
    config: Option<PathBuf>,

    /// Source root to scan (repeatable)
    #[arg(long = "root", value_name = "dir")]
    roots: Vec<PathBuf>,

    /// Output file for the corpus (default: config output, else stdout)
    #[arg(long, value_name = "file")]
    out: Option<PathBuf>,

    /// Source file extension (repeatable)
    #[arg(long = "ext", value_name = "ext")]
    extensions: Vec<String>,

    /// Worker threads (0 = one per core)
    #[arg(long, value_name = "n")]
    jobs: Option<usize>,

    /// Skip method extraction for files with syntax errors
    #[arg(long)]
    strict: bool,

    /// Also mine abstract and default methods declared in interfaces
    #[arg(long)]
    interface_methods: bool,

    /// Write one row per line instead of a JSON array
    #[arg(long)]
    jsonl: bool,
}

/// `RUST_LOG` when set, otherwise info for this crate and binary.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("comment_corpus=info,corpus_builder=info"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let (mut cfg, out) = match &cli.config {
        Some(p) => {
            let cfg = BuildConfig::from_toml_file(p)
                .with_context(|| format!("Failed to load {}", p.display()))?;
            let out = cli.out.clone().unwrap_or_else(|| cfg.output.clone());
            (cfg, Some(out))
        }
        None => (BuildConfig::default(), cli.out.clone()),
    };
    if !cli.roots.is_empty() {
        cfg.roots = cli.roots;
    }
    if !cli.extensions.is_empty() {
        cfg.extensions = cli.extensions;
    }
    if let Some(jobs) = cli.jobs {
        cfg.jobs = jobs;
    }
    cfg.strict_syntax |= cli.strict;
    cfg.interface_methods |= cli.interface_methods;
    if cli.jsonl {
        cfg.format = OutputFormat::Jsonl;
    }

    let corpus = build_corpus(&cfg).context("Failed to build corpus")?;

    match out {
        Some(p) => {
            corpus
                .persist(&p, cfg.format)
                .with_context(|| format!("Failed to write {}", p.display()))?;
            info!(path = %p.display(), "Corpus written");
        }
        None => {
            let mut out = io::stdout().lock();
            write_corpus(&corpus.rows, cfg.format, &mut out)?;
        }
    }

    let summary = corpus.summary();
    for skipped in corpus.files.iter().filter(|f| f.is_skipped()) {
        info!(path = %skipped.path, status = ?skipped.status, "Skipped");
    }
    info!(
        files = summary.files,
        skipped = summary.skipped,
        rows = summary.rows,
        "Done"
    );
    Ok(())
}
