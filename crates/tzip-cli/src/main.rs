use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tzip_core::{
    CompressionLevel, DEFAULT_ARCHIVE_NAME, DEFAULT_BUFFER_CAPACITY, EngineConfig, Orchestrator,
};

const LOG_ENV: &str = "TZIP_LOG";

#[derive(Parser)]
#[command(
    name = "tzip",
    version,
    about = "Compress the .txt files of a directory into one archive",
    long_about = "Compresses every .txt file directly inside DIRECTORY with a bounded pool of \
                  worker threads and writes one length-prefixed record per file, in file name \
                  order, to the output archive."
)]
struct Cli {
    /// Directory whose .txt files are compressed.
    directory: PathBuf,

    /// Destination archive path.
    #[arg(short, long, default_value = DEFAULT_ARCHIVE_NAME)]
    output: PathBuf,

    /// Maximum number of worker threads (defaults to CPU count).
    #[arg(long, default_value_t = num_cpus::get())]
    workers: usize,

    /// zlib compression level, 0-9.
    #[arg(long, default_value_t = 9, value_parser = clap::value_parser!(u32).range(0..=9))]
    level: u32,

    /// Per-worker buffer capacity, also the largest accepted file (supports K/M suffixes).
    #[arg(long, default_value_t = DEFAULT_BUFFER_CAPACITY, value_parser = parse_size)]
    buffer_size: usize,

    /// Print the run report as JSON instead of the one-line summary.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() {
    init_tracing();

    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = EngineConfig::default()
        .with_worker_cap(cli.workers)
        .with_buffer_capacity(cli.buffer_size)
        .with_compression_level(CompressionLevel::new(cli.level))
        .with_archive_path(cli.output);

    let report = Orchestrator::new(config).run(&cli.directory)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn parse_size(value: &str) -> Result<usize, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("size cannot be empty".to_string());
    }

    let split_at = trimmed
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (num_part, suffix_part) = trimmed.split_at(split_at);
    let base: usize = num_part
        .parse()
        .map_err(|_| format!("invalid size number: {value}"))?;
    if base == 0 {
        return Err("size must be greater than zero".to_string());
    }

    let multiplier = match suffix_part.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1usize,
        "k" | "kb" => 1024usize,
        "m" | "mb" => 1024usize * 1024usize,
        other => {
            return Err(format!("invalid size suffix '{other}' in '{value}'"));
        }
    };

    base.checked_mul(multiplier)
        .filter(|size| u32::try_from(*size).is_ok())
        .ok_or_else(|| format!("size does not fit a record length field: {value}"))
}
