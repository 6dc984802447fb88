//! Core engine: text → parsed intents → priced records → batch summary.
//!
//! The engine owns its odds and commission tables and never mutates them,
//! so one instance can be shared across threads and called concurrently.

pub mod aggregator;
pub mod combinatorics;
pub mod commission;
pub mod payout;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt::Write as _;
use tracing::{debug, info};

use crate::parser::BetParser;
use crate::settlement::{self, DrawBook, Winning};
use crate::types::{BatchSummary, BetError, BetIntent, BetRecord, MarketGroup};
use commission::CommissionRates;
use payout::OddsTable;

/// Everything the engine needs, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Year applied to dates written as `DD/MM`.
    pub default_year: i32,
    pub odds: OddsTable,
    pub commission: CommissionRates,
}

impl EngineConfig {
    /// Built-in odds and commission tables.
    pub fn new(default_year: i32) -> Self {
        Self {
            default_year,
            odds: OddsTable::default(),
            commission: CommissionRates::default(),
        }
    }
}

/// Priced records for one input text plus their totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub records: Vec<BetRecord>,
    pub summary: BatchSummary,
}

impl Evaluation {
    /// Confirmation text shown to the bettor before the batch is accepted.
    pub fn confirmation(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            let _ = writeln!(out, "{record}");
        }
        let _ = writeln!(out);
        let _ = write!(out, "{}", self.summary);
        out
    }
}

pub struct Engine {
    parser: BetParser,
    odds: OddsTable,
    commission: CommissionRates,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            parser: BetParser::new(config.default_year),
            odds: config.odds,
            commission: config.commission,
        }
    }

    pub fn odds(&self) -> &OddsTable {
        &self.odds
    }

    pub fn commission_rates(&self) -> &CommissionRates {
        &self.commission
    }

    /// Parse only; no pricing.
    pub fn parse(&self, text: &str) -> Result<Vec<BetIntent>, BetError> {
        self.parser.parse(text)
    }

    /// Price a single intent.
    ///
    /// Stake depends only on mode and combination count. It is rounded once
    /// and the total and commission are derived from the rounded figure.
    /// When the markets span both groups the potential win is the best
    /// single-market quote, since one intent is one wager on one number.
    pub fn price(&self, intent: &BetIntent) -> BetRecord {
        let combinations = combinatorics::combination_count(&intent.number);
        let stake = round_money(payout::stake_per_market(
            intent.wager_type,
            intent.mode,
            combinations,
            intent.amount,
        ));

        let potential_win = groups_of(intent)
            .map(|group| {
                payout::quote(
                    self.odds.for_group(group),
                    intent.wager_type,
                    intent.mode,
                    combinations,
                    intent.amount,
                )
            })
            .max()
            .unwrap_or(Decimal::ZERO);

        let market_count = Decimal::from(intent.markets.len());

        let record = BetRecord {
            intent: intent.clone(),
            combination_count: combinations,
            stake_per_market: stake,
            total_stake: stake * market_count,
            potential_win: round_money(potential_win),
            commission: round_money(self.commission.commission(stake, &intent.markets)),
        };

        debug!(
            number = %record.intent.number,
            wager_type = %record.intent.wager_type,
            mode = ?record.intent.mode,
            combinations,
            stake = %record.total_stake,
            potential_win = %record.potential_win,
            commission = %record.commission,
            "Intent priced"
        );

        record
    }

    /// Full pipeline: parse, price every intent, summarise.
    pub fn evaluate(&self, text: &str) -> Result<Evaluation, BetError> {
        let intents = self.parse(text)?;
        let records: Vec<BetRecord> = intents.iter().map(|i| self.price(i)).collect();
        let summary = aggregator::summarize(&records);

        info!(
            records = records.len(),
            total_amount = %summary.total_amount,
            total_potential = %summary.total_potential,
            total_commission = %summary.total_commission,
            "Batch evaluated"
        );

        Ok(Evaluation { records, summary })
    }

    /// Match priced records against published draws.
    pub fn settle(&self, records: &[BetRecord], book: &DrawBook) -> Vec<Winning> {
        let winnings = settlement::settle(&self.odds, records, book);
        info!(
            records = records.len(),
            draws = book.len(),
            winnings = winnings.len(),
            payout = %settlement::settlement_total(&winnings),
            "Batch settled"
        );
        winnings
    }
}

/// Two-decimal monetary rounding, half away from zero.
pub(crate) fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Distinct market groups of an intent, in first-seen order.
fn groups_of(intent: &BetIntent) -> impl Iterator<Item = MarketGroup> + '_ {
    let mut seen: Vec<MarketGroup> = Vec::with_capacity(2);
    intent.markets.iter().filter_map(move |m| {
        let group = m.group();
        if seen.contains(&group) {
            None
        } else {
            seen.push(group);
            Some(group)
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
