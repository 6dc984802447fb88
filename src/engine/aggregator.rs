//! Batch totals over priced records.

use crate::types::{BatchSummary, BetRecord};

/// Fold records into one summary. Values are already rounded per record
/// and are summed as-is; `potential_win` is taken once per record.
pub fn summarize(records: &[BetRecord]) -> BatchSummary {
    records.iter().fold(BatchSummary::default(), |acc, r| BatchSummary {
        total_amount: acc.total_amount + r.total_stake,
        total_potential: acc.total_potential + r.potential_win,
        total_commission: acc.total_commission + r.commission,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BetIntent, Market, WagerType};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn record(total_stake: Decimal, potential_win: Decimal, commission: Decimal) -> BetRecord {
        BetRecord {
            intent: BetIntent {
                date: NaiveDate::from_ymd_opt(2025, 6, 7).unwrap(),
                markets: vec![Market::M, Market::K],
                number: "1234".into(),
                wager_type: WagerType::Big,
                mode: None,
                amount: total_stake / dec!(2),
            },
            combination_count: 24,
            stake_per_market: total_stake / dec!(2),
            total_stake,
            potential_win,
            commission,
        }
    }

    #[test]
    fn test_empty_batch() {
        assert_eq!(summarize(&[]), BatchSummary::default());
    }

    #[test]
    fn test_sums_each_field() {
        let records = vec![
            record(dec!(2), dec!(2750), dec!(0.52)),
            record(dec!(4), dec!(114.58), dec!(1.04)),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.total_amount, dec!(6));
        assert_eq!(summary.total_potential, dec!(2864.58));
        assert_eq!(summary.total_commission, dec!(1.56));
    }
}
