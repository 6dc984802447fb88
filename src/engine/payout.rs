//! Payout resolver.
//!
//! Base odds per market group, wager type and prize tier, plus the
//! stake/payout transforms for the `box` and `ibox` modes. Odds are per
//! unit (RM1) stake.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{MarketGroup, Mode, PrizeTier, WagerType};

// ---------------------------------------------------------------------------
// Odds tables (defaults; overridden by config.toml at runtime)
// ---------------------------------------------------------------------------

/// Big pays on all five tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BigOdds {
    pub first: Decimal,
    pub second: Decimal,
    pub third: Decimal,
    pub special: Decimal,
    pub consolation: Decimal,
}

/// Small pays on the top three tiers only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmallOdds {
    pub first: Decimal,
    pub second: Decimal,
    pub third: Decimal,
}

/// Complete odds table for one market group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOdds {
    pub big: BigOdds,
    pub small: SmallOdds,
    /// Flat rate, last three digits of 1st prize.
    pub ang: Decimal,
    /// Flat rate per matching top-three prize, last three digits.
    pub consolation: Decimal,
}

impl GroupOdds {
    /// Group A (M, K, T, S) standard odds.
    pub fn group_a() -> Self {
        Self {
            big: BigOdds {
                first: dec!(2750),
                second: dec!(1100),
                third: dec!(550),
                special: dec!(198),
                consolation: dec!(66),
            },
            small: SmallOdds {
                first: dec!(3850),
                second: dec!(2200),
                third: dec!(1100),
            },
            ang: dec!(726),
            consolation: dec!(242),
        }
    }

    /// Group B (H, E) standard odds.
    pub fn group_b() -> Self {
        Self {
            big: BigOdds {
                first: dec!(3045),
                second: dec!(1218),
                third: dec!(609),
                special: dec!(219.24),
                consolation: dec!(73.08),
            },
            small: SmallOdds {
                first: dec!(4095),
                second: dec!(2340),
                third: dec!(1170),
            },
            ang: dec!(740.25),
            consolation: dec!(246.75),
        }
    }

    /// Headline odds used for potential-win quotes: 1st tier for Big/Small,
    /// the flat rate for Ang/Consolation.
    pub fn base(&self, wager_type: WagerType) -> Decimal {
        match wager_type {
            WagerType::Big => self.big.first,
            WagerType::Small => self.small.first,
            WagerType::Ang => self.ang,
            WagerType::Consolation => self.consolation,
        }
    }

    /// Odds paid when `wager_type` wins at `tier`, or `None` if that wager
    /// type does not pay on that tier.
    pub fn tier(&self, wager_type: WagerType, tier: PrizeTier) -> Option<Decimal> {
        match (wager_type, tier) {
            (WagerType::Big, PrizeTier::First) => Some(self.big.first),
            (WagerType::Big, PrizeTier::Second) => Some(self.big.second),
            (WagerType::Big, PrizeTier::Third) => Some(self.big.third),
            (WagerType::Big, PrizeTier::Special) => Some(self.big.special),
            (WagerType::Big, PrizeTier::Consolation) => Some(self.big.consolation),
            (WagerType::Small, PrizeTier::First) => Some(self.small.first),
            (WagerType::Small, PrizeTier::Second) => Some(self.small.second),
            (WagerType::Small, PrizeTier::Third) => Some(self.small.third),
            (WagerType::Ang, PrizeTier::First) => Some(self.ang),
            (WagerType::Consolation, PrizeTier::First | PrizeTier::Second | PrizeTier::Third) => {
                Some(self.consolation)
            }
            _ => None,
        }
    }
}

/// Odds for both market groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OddsTable {
    pub group_a: GroupOdds,
    pub group_b: GroupOdds,
}

impl Default for OddsTable {
    fn default() -> Self {
        Self {
            group_a: GroupOdds::group_a(),
            group_b: GroupOdds::group_b(),
        }
    }
}

impl OddsTable {
    pub fn for_group(&self, group: MarketGroup) -> &GroupOdds {
        match group {
            MarketGroup::A => &self.group_a,
            MarketGroup::B => &self.group_b,
        }
    }
}

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

/// Amount actually charged per market. Only `box` multiplies the stake.
pub fn stake_per_market(wager_type: WagerType, mode: Option<Mode>, combinations: u32, amount: Decimal) -> Decimal {
    match effective_mode(wager_type, mode) {
        Some(Mode::Box) => amount * Decimal::from(combinations),
        Some(Mode::IBox) | None => amount,
    }
}

/// Stake unit that a single winning permutation is paid on.
///
/// `ibox` spreads the unit stake over every permutation, so each one
/// carries `amount / combinations`.
pub fn winning_unit(wager_type: WagerType, mode: Option<Mode>, combinations: u32, amount: Decimal) -> Decimal {
    match effective_mode(wager_type, mode) {
        Some(Mode::IBox) if combinations > 0 => amount / Decimal::from(combinations),
        _ => amount,
    }
}

/// Unrounded potential win of a wager against one group's odds.
pub fn quote(
    odds: &GroupOdds,
    wager_type: WagerType,
    mode: Option<Mode>,
    combinations: u32,
    amount: Decimal,
) -> Decimal {
    odds.base(wager_type) * winning_unit(wager_type, mode, combinations, amount)
}

/// Ang and Consolation ignore any mode.
fn effective_mode(wager_type: WagerType, mode: Option<Mode>) -> Option<Mode> {
    if wager_type.accepts_mode() {
        mode
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_quote() {
        let win = quote(&GroupOdds::group_a(), WagerType::Big, None, 24, dec!(2));
        assert_eq!(stake_per_market(WagerType::Big, None, 24, dec!(2)), dec!(2));
        assert_eq!(win, dec!(5500));
    }

    #[test]
    fn test_box_multiplies_stake_not_payout() {
        let win = quote(&GroupOdds::group_a(), WagerType::Big, Some(Mode::Box), 6, dec!(1));
        assert_eq!(stake_per_market(WagerType::Big, Some(Mode::Box), 6, dec!(1)), dec!(6));
        assert_eq!(win, dec!(2750));
    }

    #[test]
    fn test_ibox_divides_payout() {
        let win = quote(&GroupOdds::group_a(), WagerType::Small, Some(Mode::IBox), 12, dec!(1));
        assert_eq!(stake_per_market(WagerType::Small, Some(Mode::IBox), 12, dec!(1)), dec!(1));
        assert!((win * dec!(12) - dec!(3850)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_ang_and_consolation_ignore_mode() {
        let odds = GroupOdds::group_b();
        assert_eq!(stake_per_market(WagerType::Ang, Some(Mode::Box), 24, dec!(5)), dec!(5));
        assert_eq!(quote(&odds, WagerType::Ang, Some(Mode::Box), 24, dec!(5)), dec!(3701.25));
        assert_eq!(quote(&odds, WagerType::Consolation, Some(Mode::IBox), 24, dec!(2)), dec!(493.50));
    }

    #[test]
    fn test_tier_coverage() {
        let odds = GroupOdds::group_a();
        for tier in PrizeTier::ALL {
            assert!(odds.tier(WagerType::Big, *tier).is_some());
        }
        assert_eq!(odds.tier(WagerType::Small, PrizeTier::Special), None);
        assert_eq!(odds.tier(WagerType::Ang, PrizeTier::Second), None);
        assert_eq!(odds.tier(WagerType::Consolation, PrizeTier::Third), Some(dec!(242)));
        assert_eq!(odds.tier(WagerType::Big, PrizeTier::First), Some(odds.base(WagerType::Big)));
    }

    #[test]
    fn test_group_b_pays_more() {
        let table = OddsTable::default();
        for t in [WagerType::Big, WagerType::Small, WagerType::Ang, WagerType::Consolation] {
            assert!(table.for_group(MarketGroup::B).base(t) > table.for_group(MarketGroup::A).base(t));
        }
    }
}
