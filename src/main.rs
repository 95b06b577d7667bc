//! pash-tools: read indexing and interval utilities
//!
//! Usage: pash-tools <COMMAND> [OPTIONS]

use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use pash_tools::commands::{BuildIndexCommand, FetchCommand, LengthsCommand, RangeOp};
use pash_tools::config::{IndexConfig, DEFAULT_PROGRESS_INTERVAL};
use pash_tools::interval::Interval;
use pash_tools::IndexError;

#[derive(Parser)]
#[command(name = "pash-tools")]
#[command(version)]
#[command(about = "Read index builder and coordinate interval utilities for short-read alignment", long_about = None)]
struct Cli {
    /// Only report warnings and errors (overridden by RUST_LOG)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an offset index and sequence store from a FASTA file or a list of files
    Index {
        /// FASTA sequence file (plain, gzip or bzip2)
        #[arg(short = 'r', long = "fasta", conflicts_with = "fof", required_unless_present = "fof")]
        fasta: Option<PathBuf>,

        /// File listing FASTA files, one per line, indexed in order
        #[arg(short = 'f', long = "fof")]
        fof: Option<PathBuf>,

        /// Output index file
        #[arg(short = 'o', long = "offsets")]
        offsets: PathBuf,

        /// Output file of concatenated residues
        #[arg(short = 's', long = "sequence")]
        sequence: PathBuf,

        /// Record-start marker character
        #[arg(long, default_value_t = '>')]
        marker: char,

        /// Log progress every N records (0 disables)
        #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL)]
        progress_every: u64,

        /// Print indexing statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Report the length of every record in a FASTA file
    Lengths {
        /// FASTA sequence file (plain, gzip or bzip2)
        #[arg(short = 'r', long = "fasta")]
        fasta: PathBuf,

        /// Output file (default: stdout)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        /// Record-start marker character
        #[arg(long, default_value_t = '>')]
        marker: char,
    },

    /// Print indexed records as FASTA
    Fetch {
        /// Index file written by `index`
        #[arg(short = 'o', long = "offsets")]
        offsets: PathBuf,

        /// Sequence store written by `index`
        #[arg(short = 's', long = "sequence")]
        sequence: PathBuf,

        /// Residues per output line (0 = unwrapped)
        #[arg(short = 'w', long, default_value_t = 0)]
        width: usize,

        /// Identifiers to fetch
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Evaluate an interval predicate (ranges as FIRST..LAST or FIRST...LAST)
    Range {
        #[arg(value_enum)]
        op: RangeOpArg,

        /// First interval
        a: Interval,

        /// Second interval (not needed for size)
        b: Option<Interval>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RangeOpArg {
    Compare,
    Contains,
    Within,
    Overlaps,
    Size,
}

impl From<RangeOpArg> for RangeOp {
    fn from(op: RangeOpArg) -> Self {
        match op {
            RangeOpArg::Compare => RangeOp::Compare,
            RangeOpArg::Contains => RangeOp::Contains,
            RangeOpArg::Within => RangeOp::Within,
            RangeOpArg::Overlaps => RangeOp::Overlaps,
            RangeOpArg::Size => RangeOp::Size,
        }
    }
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let result = match cli.command {
        Commands::Index {
            fasta,
            fof,
            offsets,
            sequence,
            marker,
            progress_every,
            stats,
        } => run_index(fasta, fof, offsets, sequence, marker, progress_every, stats),

        Commands::Lengths {
            fasta,
            output,
            marker,
        } => run_lengths(fasta, output, marker),

        Commands::Fetch {
            offsets,
            sequence,
            width,
            ids,
        } => run_fetch(offsets, sequence, width, ids),

        Commands::Range { op, a, b } => run_range(op.into(), a, b),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn marker_byte(marker: char) -> Result<u8, IndexError> {
    u8::try_from(marker)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            IndexError::InvalidArgument(format!(
                "marker must be a single ASCII character, got '{}'",
                marker
            ))
        })
}

fn run_index(
    fasta: Option<PathBuf>,
    fof: Option<PathBuf>,
    offsets: PathBuf,
    sequence: PathBuf,
    marker: char,
    progress_every: u64,
    stats: bool,
) -> Result<(), IndexError> {
    let config = IndexConfig::new()
        .with_marker(marker_byte(marker)?)
        .with_progress_interval(progress_every);
    let cmd = BuildIndexCommand::new().with_config(config);

    let result = match (fasta, fof) {
        (Some(fasta), _) => cmd.run(fasta, &offsets, &sequence)?,
        (None, Some(fof)) => cmd.run_manifest(fof, &offsets, &sequence)?,
        // clap enforces one of the two
        (None, None) => unreachable!("either --fasta or --fof is required"),
    };

    if stats {
        eprintln!("Index stats: {}", result);
    }
    Ok(())
}

fn run_lengths(fasta: PathBuf, output: Option<PathBuf>, marker: char) -> Result<(), IndexError> {
    let config = IndexConfig::new()
        .with_marker(marker_byte(marker)?)
        .with_progress_interval(0);
    let cmd = LengthsCommand::new().with_config(config);

    match output {
        Some(path) => {
            let file =
                std::fs::File::create(&path).map_err(|e| IndexError::OutputWriteFailure {
                    path: path.clone(),
                    source: e,
                })?;
            cmd.run(fasta, file, &path)?;
        }
        None => {
            let stdout = io::stdout();
            cmd.run(fasta, stdout.lock(), Path::new("-"))?;
        }
    }
    Ok(())
}

fn run_fetch(
    offsets: PathBuf,
    sequence: PathBuf,
    width: usize,
    ids: Vec<String>,
) -> Result<(), IndexError> {
    let stdout = io::stdout();
    let handle = stdout.lock();
    FetchCommand::new()
        .with_line_width(width)
        .run(offsets, sequence, &ids, handle)?;
    Ok(())
}

fn run_range(op: RangeOp, a: Interval, b: Option<Interval>) -> Result<(), IndexError> {
    if op.is_binary() && b.is_none() {
        return Err(IndexError::InvalidArgument(
            "this operation needs two intervals".to_string(),
        ));
    }
    if let Some(answer) = op.apply(&a, b.as_ref()) {
        println!("{}", answer);
    }
    Ok(())
}
