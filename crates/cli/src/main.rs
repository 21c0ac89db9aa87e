//! Codemate CLI: split source files into codelines and comments.
//!
//! Calls `codemate-core` directly; each file is read, indexed, dispatched by
//! extension and printed.

use clap::{CommandFactory, Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

use codemate_core::dialect::Dialect;
use codemate_core::dispatch::dispatch;
use codemate_core::index::{FileIndex, IndexLookup};
use codemate_core::pipeline::analyze_with;
use codemate_core::source::SourceFile;
use codemate_core::{load_codemate_config, load_config_file, DialectRegistry, ProcessedFile};

/// Separate code from comments, pairing each comment with the line it describes.
#[derive(Parser)]
#[command(name = "codemate", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print filtered codelines and annotated comments for each file
    Process {
        /// Files to process
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Treat every file as having this extension
        #[arg(long)]
        ext: Option<String>,

        /// Config file (default: .codemate.toml in the current directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show every comment block, inline comment and removed line of a file
    Inspect {
        /// File to inspect
        file: PathBuf,

        /// Treat the file as having this extension
        #[arg(long)]
        ext: Option<String>,

        /// Config file (default: .codemate.toml in the current directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the built-in comment dialects
    Dialects,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => fail(e),
    }
}

fn load_registry(config: Option<&Path>) -> DialectRegistry {
    match config {
        Some(path) => load_config_file(path).unwrap_or_else(|e| fail(e)),
        None => match std::env::current_dir() {
            Ok(cwd) => load_codemate_config(&cwd),
            Err(_) => DialectRegistry::builtin(),
        },
    }
}

fn read_source(path: &Path, ext: Option<&str>) -> codemate_core::Result<SourceFile> {
    let file = SourceFile::read(path)?;
    Ok(match ext {
        Some(ext) => file.with_extension(Some(ext.to_string())),
        None => file,
    })
}

struct FileReport {
    lookup: IndexLookup,
    processed: ProcessedFile,
}

fn process_file(
    registry: &DialectRegistry,
    index: &FileIndex,
    path: &Path,
    ext: Option<&str>,
) -> codemate_core::Result<FileReport> {
    let file = read_source(path, ext)?;
    let lookup = index.find_or_create(&file.display_name, file.byte_length);
    let processed = dispatch(registry, &file)?;
    Ok(FileReport { lookup, processed })
}

fn run_process(files: &[PathBuf], ext: Option<&str>, config: Option<&Path>, json: bool) {
    let registry = load_registry(config);
    let index = FileIndex::new();

    let reports: Vec<_> = files
        .par_iter()
        .map(|path| (path, process_file(&registry, &index, path, ext)))
        .collect();
    let failures = reports.iter().filter(|(_, r)| r.is_err()).count();
    debug!(files = files.len(), failures, indexed = index.len(), "Processed files");

    if json {
        let items: Vec<serde_json::Value> = reports
            .iter()
            .map(|(path, report)| match report {
                Ok(report) => serde_json::json!({
                    "path": path.display().to_string(),
                    "index_id": report.lookup.record().id,
                    "duplicate": report.lookup.is_existing(),
                    "codelines": report.processed.codelines,
                    "comments": report.processed.comments,
                }),
                Err(e) => serde_json::json!({
                    "path": path.display().to_string(),
                    "error": e.to_string(),
                }),
            })
            .collect();
        print_json(&serde_json::Value::Array(items));
    } else {
        for (path, report) in &reports {
            let report = match report {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Error: {e}");
                    continue;
                }
            };
            let dup = if report.lookup.is_existing() { " (already indexed)" } else { "" };
            println!("== {}{dup}", path.display());
            for line in &report.processed.codelines {
                println!("{:>5} | {}", line.line_number, line.text);
            }
            if !report.processed.comments.is_empty() {
                println!("\nComments:");
                for c in &report.processed.comments {
                    println!("  {:?} -> {}", c.comment, c.codeline.trim());
                }
            }
            println!();
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}

fn run_inspect(path: &Path, ext: Option<&str>, config: Option<&Path>, json: bool) {
    let registry = load_registry(config);
    let file = read_source(path, ext).unwrap_or_else(|e| fail(e));
    let analysis = analyze_with(&registry, &file.raw_text, file.extension.as_deref())
        .unwrap_or_else(|e| fail(e));

    if json {
        print_json(&serde_json::json!(analysis));
        return;
    }

    println!("Blocks ({}):", analysis.parsed.blocks.len());
    for block in &analysis.parsed.blocks {
        let first = block.line_numbers.first().copied().unwrap_or(0);
        let last = block.line_numbers.last().copied().unwrap_or(0);
        println!("  [{}] lines {first}-{last}: {:?}", block.kind.as_str(), block.cleaned_text);
        match &block.target_codeline {
            Some(target) => println!("      target {:>5} | {}", target.line_number, target.text),
            None => println!("      target <end of input>"),
        }
    }

    println!("\nInline ({}):", analysis.parsed.inline_comments.len());
    for inline in &analysis.parsed.inline_comments {
        let contents: Vec<&str> = inline.fragments.iter().map(|f| f.content.as_str()).collect();
        println!("  {:>5} | {:?}", inline.line_number, contents);
    }

    let removed: Vec<String> =
        analysis.parsed.removed_line_numbers.iter().map(|n| n.to_string()).collect();
    println!("\nRemoved lines: {}", removed.join(", "));
}

fn run_dialects(json: bool) {
    if json {
        let items: Vec<serde_json::Value> = Dialect::ALL
            .iter()
            .map(|d| {
                let markers = d.comment_dialect();
                serde_json::json!({
                    "name": d.name(),
                    "single_line": markers.single_line_openers(),
                    "multiline": markers.multiline_pairs(),
                    "extensions": d.extensions(),
                    "default": *d == Dialect::DEFAULT,
                })
            })
            .collect();
        print_json(&serde_json::Value::Array(items));
        return;
    }

    for d in Dialect::ALL {
        let markers = d.comment_dialect();
        let pairs: Vec<String> =
            markers.multiline_pairs().iter().map(|(o, c)| format!("{o} {c}")).collect();
        let default = if d == Dialect::DEFAULT { " (default)" } else { "" };
        println!("{}{default}", d.name());
        println!("  single-line: {}", markers.single_line_openers().join("  "));
        println!("  multiline:   {}", pairs.join(", "));
        println!("  extensions:  {}", d.extensions().join(" "));
    }
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("codemate=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process { files, ext, config } => {
            run_process(&files, ext.as_deref(), config.as_deref(), cli.json)
        }
        Commands::Inspect { file, ext, config } => {
            run_inspect(&file, ext.as_deref(), config.as_deref(), cli.json)
        }
        Commands::Dialects => run_dialects(cli.json),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "codemate", &mut std::io::stdout())
        }
    }
}
