//! KFrac CLI - hierarchical block compressor
//!
//! Compresses single files into KF34 archives and restores them.

mod commands;
mod utils;

use clap::{ArgAction, Parser, Subcommand};
use commands::{MethodArg, cmd_compress, cmd_decompress, cmd_info, cmd_test};
use kfrac_codec::DEFAULT_MAX_OUTPUT_LEN;
use log::LevelFilter;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kfrac")]
#[command(
    author,
    version,
    about = "KFrac - BWT, MTF and tiered range coding block compressor"
)]
#[command(long_about = "
KFrac compresses a whole file as one block: Burrows-Wheeler Transform,
Move-to-Front, zero-run splitting and adaptive range coding. Each archive
uses either the baseline or the tiered method, whichever is smaller.

Examples:
  kfrac compress notes.txt
  kfrac compress image.raw -o image.kf --method tiered
  kfrac decompress notes.txt.kf
  kfrac test notes.txt.kf
  kfrac info notes.txt.kf --json
")]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into a KF34 archive
    #[command(alias = "c")]
    Compress {
        /// File to compress
        input: PathBuf,

        /// Output archive (default: <input>.kf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Encoding method
        #[arg(short, long, value_enum, default_value = "auto")]
        method: MethodArg,

        /// Overwrite an existing output file
        #[arg(short, long)]
        force: bool,
    },

    /// Restore the original file from an archive
    #[command(alias = "d")]
    Decompress {
        /// Archive to decompress
        archive: PathBuf,

        /// Output file (default: archive name without .kf, or with .out)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing output file
        #[arg(short, long)]
        force: bool,

        /// Refuse archives that declare more than this many bytes
        #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_OUTPUT_LEN)]
        max_output: usize,
    },

    /// Decode an archive and verify its checksum without writing output
    #[command(alias = "t")]
    Test {
        /// Archive to test
        archive: PathBuf,

        /// Refuse archives that declare more than this many bytes
        #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_MAX_OUTPUT_LEN)]
        max_output: usize,
    },

    /// Show archive header, stream sizes and ratio
    #[command(alias = "i")]
    Info {
        /// Archive to inspect
        archive: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

fn log_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() {
    let cli = Cli::parse();

    // A second logger can only fail to install; keep going without it.
    let _ = TermLogger::init(
        log_level(cli.verbose, cli.quiet),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let result = match cli.command {
        Commands::Compress {
            input,
            output,
            method,
            force,
        } => cmd_compress(&input, output.as_deref(), method, force, cli.quiet),
        Commands::Decompress {
            archive,
            output,
            force,
            max_output,
        } => cmd_decompress(&archive, output.as_deref(), force, max_output, cli.quiet),
        Commands::Test {
            archive,
            max_output,
        } => cmd_test(&archive, max_output, cli.quiet),
        Commands::Info { archive, json } => cmd_info(&archive, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
