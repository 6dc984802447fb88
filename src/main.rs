//! betslip command-line caller
//!
//! Entry point. Loads configuration, initialises structured logging,
//! reads a bet text, enforces the betting cutoff, and prints the priced
//! batch (optionally settled against a file of draw results).

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use uuid::Uuid;

use betslip::config::AppConfig;
use betslip::engine::{Engine, Evaluation};
use betslip::settlement::{settlement_total, DrawBook, DrawResult, Winning};
use betslip::types::Market;

#[derive(Parser, Debug)]
#[command(name = "betslip", version, about = "Price 4D bet texts and settle them against draw results")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "BETSLIP_CONFIG", default_value = "config.toml")]
    config: String,

    /// Emit the batch as JSON instead of confirmation text.
    #[arg(long)]
    json: bool,

    /// Evaluate as if the current time were this RFC 3339 instant.
    #[arg(long)]
    now: Option<String>,

    /// Skip the betting cutoff check.
    #[arg(long)]
    no_cutoff: bool,

    /// TOML file of `[[draws]]` results to settle the batch against.
    #[arg(long)]
    results: Option<PathBuf>,

    /// Bet text file; reads stdin when omitted.
    input: Option<PathBuf>,
}

/// `[[draws]]` entry of a results file.
#[derive(Debug, Deserialize)]
struct DrawEntry {
    date: NaiveDate,
    /// Market codes the result applies to, e.g. `"MKT"`.
    markets: String,
    /// Result text in `title: numbers` lines.
    text: String,
}

#[derive(Debug, Deserialize)]
struct ResultsFile {
    #[serde(default)]
    draws: Vec<DrawEntry>,
}

#[derive(Debug, Serialize)]
struct BatchOutput<'a> {
    batch_id: String,
    #[serde(flatten)]
    evaluation: &'a Evaluation,
    #[serde(skip_serializing_if = "Option::is_none")]
    winnings: Option<&'a [Winning]>,
}

fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    init_logging();

    let cfg = AppConfig::load_or_default(&cli.config)?;

    let now = match cli.now.as_deref() {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("Invalid --now timestamp: {s}"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    // DD/MM dates take the bettor's local year, not the UTC one.
    let today = cfg.cutoff.local_date(now)?;
    let engine = Engine::new(cfg.engine_config(today.year()));
    let text = read_input(cli.input.as_deref())?;

    let evaluation = match engine.evaluate(&text) {
        Ok(evaluation) => evaluation,
        Err(e) => {
            error!(line = e.line(), error = %e, "Bet text rejected");
            return Err(e.into());
        }
    };

    if !cli.no_cutoff {
        cfg.cutoff
            .check(evaluation.records.iter().map(|r| r.intent.date), now)?;
    }

    let batch_id = Uuid::new_v4().to_string();
    info!(
        batch_id = %batch_id,
        records = evaluation.records.len(),
        total_amount = %evaluation.summary.total_amount,
        "Batch accepted"
    );

    let winnings = match cli.results.as_deref() {
        Some(path) => {
            let book = load_draws(path)?;
            Some(engine.settle(&evaluation.records, &book))
        }
        None => None,
    };

    if cli.json {
        let output = BatchOutput {
            batch_id,
            evaluation: &evaluation,
            winnings: winnings.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Batch {batch_id}");
        println!("{}", evaluation.confirmation());
        if let Some(winnings) = &winnings {
            print_winnings(winnings);
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read bet text: {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read bet text from stdin")?;
            Ok(text)
        }
    }
}

/// Build a draw book from a results TOML file.
fn load_draws(path: &Path) -> Result<DrawBook> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read results file: {}", path.display()))?;
    let file: ResultsFile = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse results file: {}", path.display()))?;

    let mut book = DrawBook::new();
    for entry in file.draws {
        let result: DrawResult = entry
            .text
            .parse()
            .with_context(|| format!("Bad draw result for {}", entry.date))?;
        for code in entry.markets.chars().filter(|c| !c.is_whitespace()) {
            let market = Market::from_code(code)
                .with_context(|| format!("Unknown market code `{code}` for {}", entry.date))?;
            book.insert(entry.date, market, result.clone());
        }
    }

    info!(path = %path.display(), draws = book.len(), "Draw results loaded");
    Ok(book)
}

fn print_winnings(winnings: &[Winning]) {
    println!();
    if winnings.is_empty() {
        println!("No winning bets.");
        return;
    }
    for w in winnings {
        let mode = w.mode.map(|m| format!(" {m}")).unwrap_or_default();
        println!(
            "{} {} {}{}{} {} ({}) RM{:.2}",
            w.date.format("%d/%m/%Y"),
            w.market,
            w.number,
            w.wager_type.letter(),
            mode,
            w.tier,
            w.drawn,
            w.payout,
        );
    }
    println!("Total payout: RM{:.2}", settlement_total(winnings));
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("betslip=info"));

    let json_logging = std::env::var("BETSLIP_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
