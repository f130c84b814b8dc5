//! audiomatch - decide whether audio files carry the same content
//!
//! Usage:
//!   audiomatch -f <file> -f <file>
//!   audiomatch -d <dir> -f <file>
//!   audiomatch -f <file> -d <dir>
//!   audiomatch -d <dir> -d <dir>
//!
//! Options (`--config`, `--json`, `--verbose`) go before the operands.

use anyhow::{Context, Result};
use audiomatch_cli::forced_log_level;
use audiomatch_cli::ingest::build_store;
use audiomatch_cli::operands::{parse_operands, plan_pairs, unique_sources};
use audiomatch_cli::output::{print_json_results, print_matches, PairResult};
use audiomatch_core::{MatchConfig, Matcher};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "audiomatch")]
#[command(about = "Report pairs of audio files with matching content", long_about = None)]
struct Args {
    /// Path to a TOML matching configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print every evaluated pair as JSON instead of MATCH lines
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Two operands, each `-f <file>` or `-d <dir>`
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "OPERANDS"
    )]
    operands: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if let Some(level) = forced_log_level(args.verbose, std::env::var_os("RUST_LOG").is_some()) {
        logger.filter_level(level);
    }
    logger.init();

    let config = match &args.config {
        Some(path) => MatchConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => MatchConfig::default(),
    };

    run_audiomatch(&args.operands, &config, args.json)
}

fn run_audiomatch(raw_operands: &[String], config: &MatchConfig, json: bool) -> Result<()> {
    let (left, right) = parse_operands(raw_operands)?;

    let left_sources = left.sources()?;
    let right_sources = right.sources()?;

    let store = build_store(&unique_sources(&left_sources, &right_sources), config)?;

    let matcher = Matcher::new(config);
    let match_start = std::time::Instant::now();

    let results: Vec<PairResult> = plan_pairs(left.kind, &left_sources, right.kind, &right_sources)
        .into_iter()
        .filter_map(|(l, r)| {
            let report = store.compare(&l.key, &r.key, &matcher)?;
            log::debug!("{} vs {}: {:?}", l.name, r.name, report.outcome);
            Some(PairResult {
                left: l.name.clone(),
                right: r.name.clone(),
                report,
            })
        })
        .collect();

    log::info!(
        "Compared {} pairs in {:.2}s",
        results.len(),
        match_start.elapsed().as_secs_f64()
    );

    if json {
        print_json_results(&results);
    } else {
        print_matches(&results);
    }

    Ok(())
}
