//! CLI tool for sorting a list of files by their first physical block.
//!
//! Paths are read from stdin, one per line (or NUL-terminated with `-0`),
//! and written to stdout in ascending block order.

use blksort::{driver, Delimiter, Method, Options, Resolver};
use clap::error::ErrorKind;
use clap::Parser;
use once_cell::sync::Lazy;
use std::io::{self, BufWriter};
use tracing_subscriber::EnvFilter;

/// Name this process was invoked as, used to prefix diagnostics.
static PROGRAM_NAME: Lazy<String> = Lazy::new(|| {
    std::env::args_os()
        .next()
        .map(|arg| arg.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_BIN_NAME").to_string())
});

/// Sort file paths by the physical block where their data begins.
///
/// Reading files in this order avoids most seeks on rotational disks. Files
/// that cannot be resolved are reported on stderr and sorted as block 0.
#[derive(Parser, Debug)]
#[command(name = "blksort")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Records are terminated by NUL instead of newline
    #[arg(short = '0', long = "null")]
    null: bool,

    /// Prefix each output record with its block number
    #[arg(short = 'b', long)]
    show_block: bool,

    /// Block query method (fibmap or fiemap)
    #[arg(short, long, default_value = "fibmap")]
    method: Method,

    /// Enable verbose logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => {
            eprintln!("Usage: {} [-0] [-b] [-m METHOD] [-v]", *PROGRAM_NAME);
            std::process::exit(1);
        }
    };

    setup_logging(args.verbose);

    if let Err(e) = run(&args) {
        // The reader went away (e.g. `blksort | head`); nothing left to report.
        if e.kind() == io::ErrorKind::BrokenPipe {
            return;
        }
        eprintln!("{}: {}", *PROGRAM_NAME, e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> io::Result<()> {
    let delimiter = if args.null {
        Delimiter::Nul
    } else {
        Delimiter::Newline
    };

    let options = Options::new()
        .with_delimiter(delimiter)
        .with_show_key(args.show_block)
        .with_method(args.method)
        .with_program(PROGRAM_NAME.as_str());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let stderr = io::stderr();

    let summary = driver::run(
        stdin.lock(),
        BufWriter::new(stdout.lock()),
        stderr.lock(),
        Resolver::new(options.method),
        &options,
    )?;

    tracing::info!(
        records = summary.records,
        failed = summary.failed,
        method = %options.method,
        "sorted"
    );

    Ok(())
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("blksort=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("blksort=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();
}
