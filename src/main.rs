use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use u_flightjudge::{Judge, JudgeConfig, JudgeError, JudgeReport};

/// Judges a flight schedule against a contest instance.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The path to the instance file
    input: PathBuf,
    /// The path to the submitted schedule
    output: PathBuf,
    /// JSON configuration overriding the contest constants
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
    /// Number of sampled comparison rows
    #[arg(short, long)]
    samples: Option<usize>,
    /// Seed for the comparison sampler
    #[arg(long)]
    seed: Option<u64>,
    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn read(path: &Path) -> Result<String, JudgeError> {
    std::fs::read_to_string(path).map_err(|source| JudgeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn run(cli: &Cli) -> Result<JudgeReport, JudgeError> {
    let mut config = match &cli.config {
        Some(path) => JudgeConfig::from_path(path)?,
        None => JudgeConfig::default(),
    };
    if let Some(n) = cli.samples {
        config = config.with_sample_size(n);
    }
    if let Some(seed) = cli.seed {
        config = config.with_sample_seed(seed);
    }

    let input = read(&cli.input)?;
    let output = read(&cli.output)?;
    Judge::new(config)?.judge(&input, &output)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    let report = match run(&cli) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("failed to serialize report: {e}");
                return ExitCode::from(2);
            }
        }
    } else {
        print!("{}", report.summary());
    }

    if report.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
