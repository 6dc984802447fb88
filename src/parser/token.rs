//! Wager-line token classification.
//!
//! A wager line is whitespace-separated. Each token is either a stake
//! (`[NUMBER-]AMOUNT TYPE`, e.g. `1526-1B` or `1S`) or a trailing mode
//! keyword (`box` / `ibox`).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

use crate::types::{BetError, Mode, WagerType};

/// Largest accepted stake amount.
pub(crate) const MAX_AMOUNT: Decimal = dec!(1000000);

/// A classified wager-line token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Stake(StakeToken),
    Mode(Mode),
}

/// `[NUMBER-]AMOUNT TYPE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StakeToken {
    /// Zero-padded to four digits when present.
    pub number: Option<String>,
    pub amount: Decimal,
    pub wager_type: WagerType,
}

/// Classify a single token from the wager line at `line`.
pub(crate) fn classify(raw: &str, line: usize) -> Result<Token, BetError> {
    if let Some(mode) = Mode::from_keyword(raw) {
        return Ok(Token::Mode(mode));
    }

    let (number, stake) = match raw.split_once('-') {
        Some((number, stake)) => (Some(parse_number(number, raw, line)?), stake),
        None => (None, raw),
    };
    let (amount, wager_type) = parse_stake(stake, raw, line)?;

    Ok(Token::Stake(StakeToken { number, amount, wager_type }))
}

/// 1–4 ASCII digits, left-padded with zeros.
fn parse_number(digits: &str, raw: &str, line: usize) -> Result<String, BetError> {
    if digits.is_empty() || digits.len() > 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BetError::NumberFormat { line, token: raw.to_string() });
    }
    Ok(format!("{digits:0>4}"))
}

/// `AMOUNT TYPE`, e.g. `2.5B`.
fn parse_stake(stake: &str, raw: &str, line: usize) -> Result<(Decimal, WagerType), BetError> {
    let unknown = || BetError::UnknownToken { line, token: raw.to_string() };

    let mut chars = stake.chars();
    let letter = chars.next_back().ok_or_else(unknown)?;
    let amount_text = chars.as_str();

    if !looks_like_amount(amount_text) {
        return Err(unknown());
    }

    let wager_type = match WagerType::from_letter(letter) {
        Some(t) => t,
        None if letter.is_ascii_alphabetic() => {
            return Err(BetError::WagerType { line, token: raw.to_string(), letter });
        }
        None => return Err(unknown()),
    };

    let bad_amount = || BetError::Amount { line, token: raw.to_string() };
    // Whole cents only, so priced money never needs a second rounding.
    let amount = Decimal::from_str(amount_text).map_err(|_| bad_amount())?.normalize();
    if amount <= Decimal::ZERO || amount > MAX_AMOUNT || amount.scale() > 2 {
        return Err(bad_amount());
    }

    Ok((amount, wager_type))
}

/// Digits with at most one interior decimal point.
fn looks_like_amount(text: &str) -> bool {
    let (whole, frac) = match text.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (text, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    digits(whole) && frac.map_or(true, digits)
}
