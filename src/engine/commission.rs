//! Referral commission per market group.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Market, MarketGroup};

/// Commission rate applied to the per-market stake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionRates {
    pub group_a: Decimal,
    pub group_b: Decimal,
}

impl Default for CommissionRates {
    fn default() -> Self {
        Self {
            group_a: dec!(0.26),
            group_b: dec!(0.19),
        }
    }
}

impl CommissionRates {
    pub fn rate(&self, group: MarketGroup) -> Decimal {
        match group {
            MarketGroup::A => self.group_a,
            MarketGroup::B => self.group_b,
        }
    }

    /// Sum of `stake_per_market × rate(group of m)` over every market.
    pub fn commission(&self, stake_per_market: Decimal, markets: &[Market]) -> Decimal {
        markets
            .iter()
            .map(|m| stake_per_market * self.rate(m.group()))
            .sum()
    }
}
