use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use instant::Duration;
use serde::Serialize;

use gridfill::patterns::{self, PRESETS};
use gridfill::{
    extract_answers, find_fill, FillConfig, Grid, NumberedAnswers, ScoreThreshold, Statistics,
    WordBank, DEFAULT_MAX_REPAIRS, DEFAULT_SCORE_THRESHOLD,
};

const DEFAULT_PATTERN: &str = "mini";

#[derive(Parser)]
#[command(name = "gridfill")]
#[command(about = "Fill a crossword grid from a scored word list")]
#[command(version)]
struct Cli {
    #[arg(long, short, help = "Word list with one `word;score` record per line")]
    words: PathBuf,
    #[arg(long, short, conflicts_with = "template", help = "Named black-square layout")]
    pattern: Option<String>,
    #[arg(long, help = "Grid template file, with `.` for open cells and `#` for blocks")]
    template: Option<PathBuf>,
    #[arg(long, short, default_value_t = DEFAULT_SCORE_THRESHOLD, help = "Only use words scoring above this")]
    threshold: i32,
    #[arg(long, help = "Seed for the first attempt; later attempts use the following seeds")]
    seed: Option<u64>,
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..), help = "Number of differently seeded attempts")]
    attempts: u32,
    #[arg(long, default_value_t = DEFAULT_MAX_REPAIRS, help = "Give up an attempt after this many repairs")]
    max_repairs: usize,
    #[arg(long, value_name = "SECONDS", help = "Give up an attempt after this many seconds")]
    timeout: Option<u64>,
    #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
    format: OutputFormat,
    #[arg(long, short, help = "Log repairs as they happen")]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct Report<'a> {
    filled: bool,
    seed: u64,
    grid: Vec<String>,
    answers: NumberedAnswers,
    statistics: &'a Statistics,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn load_grid(cli: &Cli) -> Result<Grid> {
    if let Some(path) = &cli.template {
        let template = fs::read_to_string(path)
            .with_context(|| format!("couldn't read template {}", path.display()))?;
        let grid = Grid::from_template(&template)
            .with_context(|| format!("invalid template {}", path.display()))?;

        if !grid.is_symmetric() {
            log::warn!("template {} isn't rotationally symmetric", path.display());
        }
        return Ok(grid);
    }

    let name = cli.pattern.as_deref().unwrap_or(DEFAULT_PATTERN);
    let pattern = patterns::find(name).with_context(|| {
        let names: Vec<&str> = PRESETS.iter().map(|pattern| pattern.name).collect();
        format!("unknown pattern {name:?}, expected one of {}", names.join(", "))
    })?;

    Ok(pattern.build()?)
}

/// Returns whether the grid got filled.
fn run(cli: &Cli) -> Result<bool> {
    let grid = load_grid(cli)?;
    let bank = WordBank::load(&cli.words)?;

    let config = FillConfig {
        score_threshold: ScoreThreshold(cli.threshold),
        max_repairs: Some(cli.max_repairs),
        time_limit: cli.timeout.map(Duration::from_secs),
        ..FillConfig::default()
    };

    let first_seed = cli.seed.unwrap_or_else(rand::random);
    let mut last_failure = None;

    for attempt in 0..cli.attempts {
        let seed = first_seed.wrapping_add(attempt as u64);

        match find_fill(grid.clone(), bank.clone(), &config, seed) {
            Ok(success) => {
                print_report(cli.format, true, seed, &success.grid, &success.statistics)?;
                return Ok(true);
            }
            Err(failure) => {
                log::warn!("attempt {} with seed {} failed: {}", attempt + 1, seed, failure.reason);
                last_failure = Some((seed, failure));
            }
        }
    }

    if let Some((seed, failure)) = last_failure {
        eprintln!("{} after {} attempt(s)", failure, cli.attempts);
        print_report(cli.format, false, seed, &failure.grid, &failure.statistics)?;
    }

    Ok(false)
}

fn print_report(
    format: OutputFormat,
    filled: bool,
    seed: u64,
    grid: &Grid,
    statistics: &Statistics,
) -> Result<()> {
    let answers = extract_answers(grid);

    match format {
        OutputFormat::Text => {
            println!("{:?}", statistics);
            println!("{}", grid);
            println!();
            print!("{}", answers);
        }
        OutputFormat::Json => {
            let report = Report {
                filled,
                seed,
                grid: grid.rows_as_strings(),
                answers,
                statistics,
            };
            println!("{}", serde_json::to_string_pretty(&report).context("serializing report")?);
        }
    }

    Ok(())
}
