//! Settlement against published draw results.
//!
//! A draw result is posted per market per date as chat-style text:
//!
//! ```text
//! 1st: 1526
//! 2nd: 0042
//! 3rd: 9310
//! Special: 1111 2222 3333
//! Consolation: 4444 5555
//! ```
//!
//! [`settle`] walks priced records against a [`DrawBook`] of such
//! results and reports every winning (record, market, tier) match.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

use crate::engine::combinatorics::permutations;
use crate::engine::payout::{winning_unit, OddsTable};
use crate::engine::round_money;
use crate::types::{BetRecord, Market, Mode, PrizeTier, WagerType};

// ---------------------------------------------------------------------------
// Draw results
// ---------------------------------------------------------------------------

/// Why a draw-result text was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DrawError {
    #[error("line {line}: unknown prize title `{title}`")]
    UnknownTitle { line: usize, title: String },

    #[error("line {line}: `{number}` is not a 4-digit number")]
    BadNumber { line: usize, number: String },

    #[error("line {line}: {tier} prize takes exactly one number")]
    TierCount { line: usize, tier: PrizeTier },

    #[error("line {line}: {tier} prize listed twice")]
    Duplicate { line: usize, tier: PrizeTier },

    #[error("{0} prize missing")]
    Missing(PrizeTier),
}

/// One market's draw for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawResult {
    pub first: String,
    pub second: Option<String>,
    pub third: Option<String>,
    #[serde(default)]
    pub special: Vec<String>,
    #[serde(default)]
    pub consolation: Vec<String>,
}

impl DrawResult {
    /// Every drawn number with its tier, in draw order.
    pub fn entries(&self) -> impl Iterator<Item = (PrizeTier, &str)> + '_ {
        let top = [Some(self.first.as_str()), self.second.as_deref(), self.third.as_deref()];
        PrizeTier::TOP_THREE
            .iter()
            .copied()
            .zip(top)
            .filter_map(|(tier, n)| n.map(|n| (tier, n)))
            .chain(self.special.iter().map(|n| (PrizeTier::Special, n.as_str())))
            .chain(self.consolation.iter().map(|n| (PrizeTier::Consolation, n.as_str())))
    }
}

impl FromStr for DrawResult {
    type Err = DrawError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut top: [Option<String>; 3] = [None, None, None];
        let mut special = Vec::new();
        let mut consolation = Vec::new();

        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let Some((title, numbers)) = raw.split_once(':') else {
                continue;
            };
            let tier = parse_title(title.trim()).ok_or_else(|| DrawError::UnknownTitle {
                line,
                title: title.trim().to_string(),
            })?;

            let numbers = numbers
                .split_whitespace()
                .map(|n| {
                    if n.len() == 4 && n.bytes().all(|b| b.is_ascii_digit()) {
                        Ok(n.to_string())
                    } else {
                        Err(DrawError::BadNumber { line, number: n.to_string() })
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;

            match tier {
                PrizeTier::Special => special.extend(numbers),
                PrizeTier::Consolation => consolation.extend(numbers),
                PrizeTier::First | PrizeTier::Second | PrizeTier::Third => {
                    let slot = &mut top[tier as usize];
                    if slot.is_some() {
                        return Err(DrawError::Duplicate { line, tier });
                    }
                    let [number] = <[String; 1]>::try_from(numbers)
                        .map_err(|_| DrawError::TierCount { line, tier })?;
                    *slot = Some(number);
                }
            }
        }

        let [first, second, third] = top;
        Ok(DrawResult {
            first: first.ok_or(DrawError::Missing(PrizeTier::First))?,
            second,
            third,
            special,
            consolation,
        })
    }
}

fn parse_title(title: &str) -> Option<PrizeTier> {
    match title.to_ascii_lowercase().as_str() {
        "1st" | "first" | "1" => Some(PrizeTier::First),
        "2nd" | "second" | "2" => Some(PrizeTier::Second),
        "3rd" | "third" | "3" => Some(PrizeTier::Third),
        "special" | "starter" | "sp" => Some(PrizeTier::Special),
        "consolation" | "consol" | "cons" => Some(PrizeTier::Consolation),
        _ => None,
    }
}

/// Draw results keyed by date and market.
#[derive(Debug, Clone, Default)]
pub struct DrawBook {
    draws: HashMap<(NaiveDate, Market), DrawResult>,
}

impl DrawBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the result for one market on one date.
    pub fn insert(&mut self, date: NaiveDate, market: Market, result: DrawResult) {
        self.draws.insert((date, market), result);
    }

    pub fn get(&self, date: NaiveDate, market: Market) -> Option<&DrawResult> {
        self.draws.get(&(date, market))
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Settlement
// ---------------------------------------------------------------------------

/// One winning match of a record on one market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winning {
    pub date: NaiveDate,
    pub market: Market,
    /// Number as bet.
    pub number: String,
    /// Number as drawn (a permutation of `number` for box/ibox).
    pub drawn: String,
    pub wager_type: WagerType,
    pub mode: Option<Mode>,
    pub tier: PrizeTier,
    pub payout: Decimal,
}

/// Match every record against the draws in `book`.
///
/// Big/Small win when a covered number (the number itself, or any
/// permutation under box/ibox) appears at a tier the wager type pays on.
/// Ang and Consolation compare the last three digits only.
pub fn settle(odds: &OddsTable, records: &[BetRecord], book: &DrawBook) -> Vec<Winning> {
    let mut winnings = Vec::new();

    for record in records {
        let intent = &record.intent;
        let covered = covered_numbers(intent.wager_type, intent.mode, &intent.number);
        let unit = winning_unit(
            intent.wager_type,
            intent.mode,
            record.combination_count,
            intent.amount,
        );

        for market in &intent.markets {
            let Some(draw) = book.get(intent.date, *market) else {
                continue;
            };
            let group_odds = odds.for_group(market.group());

            for (tier, drawn) in draw.entries() {
                let Some(rate) = group_odds.tier(intent.wager_type, tier) else {
                    continue;
                };
                let hit = match intent.wager_type {
                    WagerType::Big | WagerType::Small => covered.iter().any(|n| n == drawn),
                    WagerType::Ang | WagerType::Consolation => last_three(&intent.number) == last_three(drawn),
                };
                if !hit {
                    continue;
                }

                let payout = round_money(rate * unit);
                debug!(
                    date = %intent.date,
                    market = %market,
                    number = %intent.number,
                    drawn,
                    tier = %tier,
                    payout = %payout,
                    "Winning match"
                );
                winnings.push(Winning {
                    date: intent.date,
                    market: *market,
                    number: intent.number.clone(),
                    drawn: drawn.to_string(),
                    wager_type: intent.wager_type,
                    mode: intent.mode,
                    tier,
                    payout,
                });
            }
        }
    }

    winnings
}

/// Sum of all payouts.
pub fn settlement_total(winnings: &[Winning]) -> Decimal {
    winnings.iter().map(|w| w.payout).sum()
}

fn covered_numbers(wager_type: WagerType, mode: Option<Mode>, number: &str) -> Vec<String> {
    match mode {
        Some(_) if wager_type.accepts_mode() => permutations(number),
        _ => vec![number.to_string()],
    }
}

fn last_three(number: &str) -> &str {
    number.get(number.len().saturating_sub(3)..).unwrap_or(number)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
