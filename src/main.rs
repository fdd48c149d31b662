// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Javelin - A Java lexical analyzer written in Rust
//!
//! This is the main entry point for the javelin CLI/REPL.
//!
//! ## Features
//!
//! - Token listings for Java source files
//! - Async file loading with tokio
//! - Parallel tokenization with rayon
//! - Interactive REPL with token-based highlighting and history

mod repl;
mod report;

use clap::Parser;
use javelin_lexer::{ScannedUnit, ScannerFactory, ScannerOptions, SourceUnit};
use owo_colors::OwoColorize;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "javelin",
    about = "Java lexical analyzer",
    version,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    /// Java source files to tokenize
    files: Vec<PathBuf>,

    /// Tokenize code given on the command line
    #[arg(short = 'e', long = "eval")]
    eval: Option<String>,

    /// Start interactive REPL
    #[arg(short = 'i', long = "interactive", alias = "repl")]
    interactive: bool,

    /// Emit comments as tokens
    #[arg(long)]
    keep_comments: bool,

    /// Lex `_` as an identifier (Java 8 and earlier)
    #[arg(long)]
    allow_underscore: bool,

    /// Print only the closing line of each unit
    #[arg(long)]
    summary: bool,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

/// Main entry point - uses tokio runtime for async file loading.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = ScannerOptions::default()
        .keep_comments(cli.keep_comments)
        .allow_underscore_identifier(cli.allow_underscore);
    let factory = ScannerFactory::with_options(options);

    if let Some(code) = &cli.eval {
        return report_outcome(run_eval(&factory, code, cli.summary));
    }

    if !cli.files.is_empty() && !cli.interactive {
        return report_outcome(run_files(&factory, &cli.files, cli.summary).await);
    }

    run_repl(factory)
}

/// `javelin=warn` by default, debug output from the lexer with `--verbose`;
/// `RUST_LOG` overrides both.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "javelin=debug,javelin_lexer=debug"
    } else {
        "javelin=warn,javelin_lexer=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Maps a run result onto the process exit status.
fn report_outcome(result: anyhow::Result<bool>) -> ExitCode {
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Start the interactive REPL
fn run_repl(factory: ScannerFactory) -> ExitCode {
    match repl::Repl::new(factory) {
        Ok(mut repl) => {
            if let Err(e) = repl.run() {
                eprintln!("{}: {:?}", "REPL Error".red().bold(), e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!(
                "{}: Failed to initialize REPL: {:?}",
                "Error".red().bold(),
                e
            );
            ExitCode::FAILURE
        }
    }
}

/// Loads every file concurrently, then tokenizes them in parallel.
///
/// Returns `Ok(false)` if a file could not be read or had lexical errors.
async fn run_files(factory: &ScannerFactory, paths: &[PathBuf], summary: bool) -> anyhow::Result<bool> {
    let mut units = Vec::with_capacity(paths.len());
    let mut clean = true;

    for result in SourceUnit::load_all(paths).await {
        match result {
            Ok(unit) => units.push(unit),
            Err(e) => {
                eprintln!("{}: {}", "Error".red().bold(), e);
                clean = false;
            }
        }
    }

    let factory = factory.clone();
    let scanned = tokio::task::spawn_blocking(move || factory.tokenize_units(units)).await?;
    tracing::debug!(units = scanned.len(), "tokenized");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for unit in &scanned {
        clean &= print_unit(&mut out, unit, summary)?;
    }
    out.flush()?;
    Ok(clean)
}

/// Tokenize code from the command line.
fn run_eval(factory: &ScannerFactory, code: &str, summary: bool) -> anyhow::Result<bool> {
    let unit = factory
        .scanner_for(SourceUnit::new("<eval>", code))
        .scan_all();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let clean = print_unit(&mut out, &unit, summary)?;
    out.flush()?;
    Ok(clean)
}

/// Prints the listing and diagnostics of one unit; true if it had no errors.
fn print_unit(out: &mut impl Write, unit: &ScannedUnit, summary: bool) -> io::Result<bool> {
    if !summary {
        report::write_tokens(out, &unit.tokens, false)?;
    }
    report::write_summary(out, unit)?;
    if unit.has_errors() {
        out.flush()?;
        report::print_diagnostics(unit);
    }
    Ok(!unit.has_errors())
}
