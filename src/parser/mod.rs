//! Bet-notation parser.
//!
//! Turns bettor text such as
//!
//! ```text
//! 08/06
//! MKT
//! 1526-1B 1S ibox
//! ```
//!
//! into one [`BetIntent`] per date × wager token. The whole market set
//! stays on each intent; per-market fan-out is the engine's job.
//!
//! Parsing is all-or-nothing: the first invalid construct rejects the
//! entire text.

mod token;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::types::{BetError, BetIntent, Market, Mode, WagerType};
use token::{classify, Token};

/// Parser configured with the year applied to `DD/MM` dates.
#[derive(Debug, Clone, Copy)]
pub struct BetParser {
    default_year: i32,
}

/// One stake from a wager line, number and mode already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Wager {
    number: String,
    amount: Decimal,
    wager_type: WagerType,
    mode: Option<Mode>,
}

impl BetParser {
    pub fn new(default_year: i32) -> Self {
        Self { default_year }
    }

    /// Parse a full bet text into intents.
    pub fn parse(&self, text: &str) -> Result<Vec<BetIntent>, BetError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let (date_no, date_line) = lines.next().ok_or_else(|| BetError::DateFormat {
            line: 1,
            token: String::new(),
            reason: "missing date line".into(),
        })?;
        let dates = self.parse_dates(date_no, date_line)?;

        let (market_no, market_line) = lines.next().ok_or_else(|| BetError::MarketCode {
            line: date_no + 1,
            token: String::new(),
            reason: "missing market line".into(),
        })?;
        let markets = parse_markets(market_no, market_line)?;

        let mut intents = Vec::new();
        let mut wager_lines = 0usize;

        for (line_no, line) in lines {
            wager_lines += 1;
            let wagers = parse_wager_line(line_no, line)?;
            for date in &dates {
                for wager in &wagers {
                    intents.push(BetIntent {
                        date: *date,
                        markets: markets.clone(),
                        number: wager.number.clone(),
                        wager_type: wager.wager_type,
                        mode: wager.mode,
                        amount: wager.amount,
                    });
                }
            }
        }

        if wager_lines == 0 {
            return Err(BetError::MissingWagers { line: market_no });
        }

        let market_codes: String = markets.iter().map(Market::code).collect();
        debug!(
            dates = dates.len(),
            markets = %market_codes,
            wager_lines,
            intents = intents.len(),
            "Bet text parsed"
        );

        Ok(intents)
    }

    /// `DD/MM[/YYYY]` joined by `&`.
    fn parse_dates(&self, line_no: usize, line: &str) -> Result<Vec<NaiveDate>, BetError> {
        line.split('&')
            .map(|part| self.parse_date(line_no, part.trim()))
            .collect()
    }

    fn parse_date(&self, line_no: usize, text: &str) -> Result<NaiveDate, BetError> {
        let fail = |reason: &str| BetError::DateFormat {
            line: line_no,
            token: text.to_string(),
            reason: reason.to_string(),
        };
        let field = |s: &str, max_len: usize| -> Option<u32> {
            if s.is_empty() || s.len() > max_len || !s.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            s.parse().ok()
        };

        let parts: Vec<&str> = text.split('/').collect();
        let (day, month, year) = match parts.as_slice() {
            [d, m] => (field(*d, 2), field(*m, 2), Some(self.default_year)),
            [d, m, y] if y.len() == 4 => {
                (field(*d, 2), field(*m, 2), field(*y, 4).map(|y| y as i32))
            }
            _ => return Err(fail("expected DD/MM or DD/MM/YYYY")),
        };

        match (day, month, year) {
            (Some(d), Some(m), Some(y)) => {
                NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| fail("no such calendar date"))
            }
            _ => Err(fail("expected DD/MM or DD/MM/YYYY")),
        }
    }
}

/// One letter per market; spaces ignored, repeats collapsed.
fn parse_markets(line_no: usize, line: &str) -> Result<Vec<Market>, BetError> {
    let mut markets = Vec::new();
    for code in line.chars().filter(|c| !c.is_whitespace()) {
        let market = Market::from_code(code).ok_or_else(|| BetError::MarketCode {
            line: line_no,
            token: code.to_string(),
            reason: "expected one of M, K, T, S, H, E".into(),
        })?;
        if !markets.contains(&market) {
            markets.push(market);
        }
    }
    Ok(markets)
}

/// `NUMBER-AMOUNT TYPE [[NUMBER-]AMOUNT TYPE ...] [box|ibox]`
fn parse_wager_line(line_no: usize, line: &str) -> Result<Vec<Wager>, BetError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let (body, mode) = match tokens.split_last() {
        Some((last, rest)) => match Mode::from_keyword(last) {
            Some(mode) => (rest, Some(mode)),
            None => (tokens.as_slice(), None),
        },
        None => (tokens.as_slice(), None),
    };

    if body.is_empty() {
        return Err(BetError::UnknownToken { line: line_no, token: line.to_string() });
    }

    let mut current: Option<String> = None;
    let mut wagers = Vec::with_capacity(body.len());

    for raw in body {
        let stake = match classify(raw, line_no)? {
            Token::Stake(stake) => stake,
            // A mode keyword is only legal as the last token.
            Token::Mode(_) => {
                return Err(BetError::UnknownToken { line: line_no, token: raw.to_string() });
            }
        };

        if let Some(number) = stake.number {
            current = Some(number);
        }
        let number = current
            .clone()
            .ok_or_else(|| BetError::UnknownToken { line: line_no, token: raw.to_string() })?;

        if let Some(mode) = mode {
            if !stake.wager_type.accepts_mode() {
                return Err(BetError::ModeMismatch {
                    line: line_no,
                    mode,
                    wager_type: stake.wager_type,
                });
            }
        }

        wagers.push(Wager {
            number,
            amount: stake.amount,
            wager_type: stake.wager_type,
            mode,
        });
    }

    Ok(wagers)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
