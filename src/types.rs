//! Shared types for the betslip engine.
//!
//! These types form the data model handed from the parser to the
//! payout/commission engine and on to the calling layer. They are plain
//! immutable values: created fresh per parse call, never updated.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Markets
// ---------------------------------------------------------------------------

/// One of the six parallel draw markets, identified by a one-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Market {
    M,
    K,
    T,
    S,
    H,
    E,
}

impl Market {
    /// All known markets, in canonical order.
    pub const ALL: &'static [Market] = &[
        Market::M,
        Market::K,
        Market::T,
        Market::S,
        Market::H,
        Market::E,
    ];

    /// Look up a market by its code letter (case-insensitive).
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'M' => Some(Market::M),
            'K' => Some(Market::K),
            'T' => Some(Market::T),
            'S' => Some(Market::S),
            'H' => Some(Market::H),
            'E' => Some(Market::E),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Market::M => 'M',
            Market::K => 'K',
            Market::T => 'T',
            Market::S => 'S',
            Market::H => 'H',
            Market::E => 'E',
        }
    }

    /// The odds/commission class this market belongs to.
    pub fn group(&self) -> MarketGroup {
        match self {
            Market::M | Market::K | Market::T | Market::S => MarketGroup::A,
            Market::H | Market::E => MarketGroup::B,
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Rate class shared by a set of markets. Each group carries its own odds
/// table and commission rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarketGroup {
    /// M, K, T, S
    A,
    /// H, E
    B,
}

impl fmt::Display for MarketGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketGroup::A => write!(f, "A"),
            MarketGroup::B => write!(f, "B"),
        }
    }
}

// ---------------------------------------------------------------------------
// Wager enums
// ---------------------------------------------------------------------------

/// Wager kind, written as a single letter in bet notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WagerType {
    /// `B`: matches the drawn number across all five prize tiers.
    Big,
    /// `S`: matches the drawn number on 1st/2nd/3rd prize only.
    Small,
    /// `A`: last three digits of the 1st prize.
    Ang,
    /// `C`: last three digits of any of the top three prizes.
    Consolation,
}

impl WagerType {
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'B' => Some(WagerType::Big),
            'S' => Some(WagerType::Small),
            'A' => Some(WagerType::Ang),
            'C' => Some(WagerType::Consolation),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            WagerType::Big => 'B',
            WagerType::Small => 'S',
            WagerType::Ang => 'A',
            WagerType::Consolation => 'C',
        }
    }

    /// Whether a box/ibox modifier may be applied to this wager type.
    pub fn accepts_mode(&self) -> bool {
        matches!(self, WagerType::Big | WagerType::Small)
    }
}

impl fmt::Display for WagerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WagerType::Big => write!(f, "Big"),
            WagerType::Small => write!(f, "Small"),
            WagerType::Ang => write!(f, "Ang"),
            WagerType::Consolation => write!(f, "Consolation"),
        }
    }
}

/// Permutation modifier for Big/Small wagers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Full stake on every distinct permutation.
    Box,
    /// One stake shared across every distinct permutation.
    IBox,
}

impl Mode {
    /// Parse a mode keyword (case-insensitive).
    pub fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("box") {
            Some(Mode::Box)
        } else if word.eq_ignore_ascii_case("ibox") {
            Some(Mode::IBox)
        } else {
            None
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Box => write!(f, "box"),
            Mode::IBox => write!(f, "ibox"),
        }
    }
}

/// Prize tier of a 4D draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrizeTier {
    First,
    Second,
    Third,
    Special,
    Consolation,
}

impl PrizeTier {
    /// Tiers in draw order.
    pub const ALL: &'static [PrizeTier] = &[
        PrizeTier::First,
        PrizeTier::Second,
        PrizeTier::Third,
        PrizeTier::Special,
        PrizeTier::Consolation,
    ];

    /// The three headline prizes.
    pub const TOP_THREE: &'static [PrizeTier] =
        &[PrizeTier::First, PrizeTier::Second, PrizeTier::Third];
}

impl fmt::Display for PrizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrizeTier::First => write!(f, "1st"),
            PrizeTier::Second => write!(f, "2nd"),
            PrizeTier::Third => write!(f, "3rd"),
            PrizeTier::Special => write!(f, "Special"),
            PrizeTier::Consolation => write!(f, "Consolation"),
        }
    }
}

// ---------------------------------------------------------------------------
// Bet intent / record
// ---------------------------------------------------------------------------

/// One atomic wager as written by the bettor, before any pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetIntent {
    pub date: NaiveDate,
    /// Non-empty, no repeats, in the order the bettor wrote them.
    pub markets: Vec<Market>,
    /// Always exactly four ASCII digits.
    pub number: String,
    #[serde(rename = "type")]
    pub wager_type: WagerType,
    pub mode: Option<Mode>,
    /// Unit stake per market per date, before any mode multiplier.
    pub amount: Decimal,
}

impl BetIntent {
    /// Market codes joined, e.g. `MKT`.
    pub fn market_codes(&self) -> String {
        self.markets.iter().map(Market::code).collect()
    }

    /// Bet notation for this single wager, e.g. `1526-1B ibox`.
    pub fn notation(&self) -> String {
        let mut out = format!("{}-{}{}", self.number, self.amount.normalize(), self.wager_type.letter());
        if let Some(mode) = self.mode {
            out.push(' ');
            out.push_str(&mode.to_string());
        }
        out
    }
}

/// A priced wager: the intent plus stake, payout and commission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetRecord {
    #[serde(flatten)]
    pub intent: BetIntent,
    /// Distinct digit permutations of `number` (1, 4, 6, 12 or 24).
    pub combination_count: u32,
    /// Amount charged against one market.
    pub stake_per_market: Decimal,
    /// `stake_per_market × markets.len()`
    pub total_stake: Decimal,
    /// Amount payable if the number is drawn at the headline tier.
    pub potential_win: Decimal,
    /// Referral commission across all markets of the intent.
    pub commission: Decimal,
}

impl fmt::Display for BetRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}  stake {:.2}  win {:.2}",
            self.intent.date.format("%d/%m/%Y"),
            self.intent.market_codes(),
            self.intent.notation(),
            self.total_stake,
            self.potential_win,
        )
    }
}

/// Totals over every record produced from one input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_amount: Decimal,
    pub total_potential: Decimal,
    pub total_commission: Decimal,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total stake: RM{:.2} | Max win: RM{:.2} | Commission: RM{:.2}",
            self.total_amount, self.total_potential, self.total_commission,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why a bet text was rejected. Line numbers are 1-based physical lines of
/// the input, blank lines included.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BetError {
    #[error("line {line}: invalid date `{token}`: {reason}")]
    DateFormat { line: usize, token: String, reason: String },

    #[error("line {line}: invalid market code `{token}`: {reason}")]
    MarketCode { line: usize, token: String, reason: String },

    #[error("line {line}: invalid number `{token}` (expected 1-4 digits)")]
    NumberFormat { line: usize, token: String },

    #[error("line {line}: unknown wager type `{letter}` in `{token}` (expected B, S, A or C)")]
    WagerType { line: usize, token: String, letter: char },

    #[error("line {line}: mode `{mode}` can only be used with Big/Small, not {wager_type}")]
    ModeMismatch { line: usize, mode: Mode, wager_type: WagerType },

    #[error("line {line}: invalid stake amount in `{token}`")]
    Amount { line: usize, token: String },

    #[error("line {line}: unrecognised token `{token}`")]
    UnknownToken { line: usize, token: String },

    #[error("no wager lines after market line {line}")]
    MissingWagers { line: usize },
}

impl BetError {
    /// The input line the error refers to.
    pub fn line(&self) -> usize {
        match self {
            BetError::DateFormat { line, .. }
            | BetError::MarketCode { line, .. }
            | BetError::NumberFormat { line, .. }
            | BetError::WagerType { line, .. }
            | BetError::ModeMismatch { line, .. }
            | BetError::Amount { line, .. }
            | BetError::UnknownToken { line, .. }
            | BetError::MissingWagers { line } => *line,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_market_codes_round_trip() {
        for market in Market::ALL {
            assert_eq!(Market::from_code(market.code()), Some(*market));
        }
        assert_eq!(Market::from_code('m'), Some(Market::M));
        assert_eq!(Market::from_code('L'), None);
    }

    #[test]
    fn test_market_groups() {
        let group_a: Vec<_> = Market::ALL.iter().filter(|m| m.group() == MarketGroup::A).collect();
        let group_b: Vec<_> = Market::ALL.iter().filter(|m| m.group() == MarketGroup::B).collect();
        assert_eq!(group_a.len(), 4);
        assert_eq!(group_b, vec![&Market::H, &Market::E]);
    }

    #[test]
    fn test_wager_type_letters() {
        assert_eq!(WagerType::from_letter('b'), Some(WagerType::Big));
        assert_eq!(WagerType::from_letter('C'), Some(WagerType::Consolation));
        assert_eq!(WagerType::from_letter('X'), None);
        assert!(WagerType::Small.accepts_mode());
        assert!(!WagerType::Ang.accepts_mode());
    }

    #[test]
    fn test_mode_keywords() {
        assert_eq!(Mode::from_keyword("BOX"), Some(Mode::Box));
        assert_eq!(Mode::from_keyword("iBox"), Some(Mode::IBox));
        assert_eq!(Mode::from_keyword("boxx"), None);
    }

    #[test]
    fn test_notation() {
        let intent = BetIntent {
            date: NaiveDate::from_ymd_opt(2025, 6, 8).unwrap(),
            markets: vec![Market::M, Market::K, Market::T],
            number: "1526".into(),
            wager_type: WagerType::Big,
            mode: Some(Mode::IBox),
            amount: dec!(1.50),
        };
        assert_eq!(intent.notation(), "1526-1.5B ibox");
        assert_eq!(intent.market_codes(), "MKT");
    }

    #[test]
    fn test_error_display_names_line_and_token() {
        let err = BetError::UnknownToken { line: 3, token: "foo".into() };
        assert_eq!(err.to_string(), "line 3: unrecognised token `foo`");
        assert_eq!(err.line(), 3);

        let err = BetError::ModeMismatch { line: 3, mode: Mode::Box, wager_type: WagerType::Consolation };
        assert!(err.to_string().contains("box"));
    }

    #[test]
    fn test_summary_display() {
        let summary = BatchSummary {
            total_amount: dec!(6),
            total_potential: dec!(274.17),
            total_commission: dec!(1.56),
        };
        assert_eq!(
            summary.to_string(),
            "Total stake: RM6.00 | Max win: RM274.17 | Commission: RM1.56"
        );
    }
}
