//! Text → records → summary, through the `Engine` facade.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use betslip::config::AppConfig;
use betslip::engine::combinatorics::combination_count;
use betslip::engine::{Engine, EngineConfig};
use betslip::types::{BetError, Market, Mode, WagerType};

fn engine() -> Engine {
    Engine::new(EngineConfig::new(2025))
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn scenario_ibox_on_three_markets() {
    let eval = engine().evaluate("08/06\nMKT\n1526-1B 1S ibox").unwrap();

    assert_eq!(eval.records.len(), 2);
    let types: Vec<_> = eval.records.iter().map(|r| r.intent.wager_type).collect();
    assert_eq!(types, vec![WagerType::Big, WagerType::Small]);

    for r in &eval.records {
        assert_eq!(r.intent.date, ymd(2025, 6, 8));
        assert_eq!(r.intent.markets, vec![Market::M, Market::K, Market::T]);
        assert_eq!(r.intent.number, "1526");
        assert_eq!(r.intent.mode, Some(Mode::IBox));
        assert_eq!(r.intent.amount, dec!(1));
        assert_eq!(r.combination_count, 24);
        assert_eq!(r.stake_per_market, dec!(1));
        assert_eq!(r.total_stake, dec!(3));
    }
}

#[test]
fn scenario_two_dates_no_mode() {
    let e = engine();
    let eval = e.evaluate("07/06/2025&08/06/2025\nM\n1234-2C 5A").unwrap();

    assert_eq!(eval.records.len(), 4);
    let odds = &e.odds().group_a;
    for r in &eval.records {
        assert_eq!(r.intent.markets, vec![Market::M]);
        assert_eq!(r.intent.mode, None);
        assert_eq!(r.combination_count, 24);
        assert_eq!(r.potential_win, odds.base(r.intent.wager_type) * r.intent.amount);
    }
    let dates: Vec<_> = eval.records.iter().map(|r| r.intent.date).collect();
    assert_eq!(dates, vec![ymd(2025, 6, 7), ymd(2025, 6, 7), ymd(2025, 6, 8), ymd(2025, 6, 8)]);
}

#[test]
fn scenario_box_on_consolation_rejected() {
    let err = engine().evaluate("07/06/2025\nM\n1234-2C box").unwrap_err();
    assert!(matches!(
        err,
        BetError::ModeMismatch { mode: Mode::Box, wager_type: WagerType::Consolation, .. }
    ));
}

#[test]
fn scenario_box_two_pairs() {
    let eval = engine().evaluate("08/06/2025\nM\n2233-1B box").unwrap();
    let r = &eval.records[0];
    assert_eq!(r.combination_count, 6);
    assert_eq!(r.stake_per_market, dec!(6));
    assert_eq!(r.potential_win, engine().odds().group_a.big.first);
}

#[test]
fn commission_matches_per_market_rates() {
    let e = engine();
    let eval = e
        .evaluate("08/06\nMKTSHE\n1234-3B 2S\n2223-1B box\n1111-4S ibox\n0007-2A 1C")
        .unwrap();

    for r in &eval.records {
        let expected: Decimal = r
            .intent
            .markets
            .iter()
            .map(|m| r.stake_per_market * e.commission_rates().rate(m.group()))
            .sum();
        assert_eq!(r.commission, expected.round_dp(2));
    }

    let rates: std::collections::BTreeSet<_> = Market::ALL
        .iter()
        .map(|m| e.commission_rates().rate(m.group()))
        .collect();
    assert_eq!(rates.len(), 2);
}

#[test]
fn summary_sums_records_without_market_multiplier() {
    let eval = engine().evaluate("08/06\nMKTS\n1234-1B").unwrap();
    let r = &eval.records[0];
    assert_eq!(r.total_stake, dec!(4));
    assert_eq!(eval.summary.total_amount, dec!(4));
    // One payout per intent, not one per market.
    assert_eq!(eval.summary.total_potential, dec!(2750));
    assert_eq!(eval.summary.total_commission, dec!(1.04));
}

#[test]
fn evaluation_is_idempotent() {
    let text = "07/06/2025&08/06/2025\nMKH\n1526-1B 1S ibox\n2233-2B box 3S\n12-1A";
    let e = engine();
    assert_eq!(e.evaluate(text).unwrap(), e.evaluate(text).unwrap());
}

#[test]
fn combination_counts_follow_multiplicities() {
    for n in 0..10_000u32 {
        let number = format!("{n:04}");
        let mut counts = [0u32; 10];
        for b in number.bytes() {
            counts[(b - b'0') as usize] += 1;
        }
        let factorial = |k: u32| (1..=k).product::<u32>();
        let expected = 24 / counts.iter().map(|&c| factorial(c)).product::<u32>();
        assert_eq!(combination_count(&number), expected, "{number}");
    }
}

#[test]
fn configured_tables_flow_into_engine() {
    let cfg = AppConfig::from_toml(
        "[parser]\ndefault_year = 2024\n[commission]\ngroup_a = 0.30\n",
    )
    .unwrap();
    let e = Engine::new(cfg.engine_config(2099));
    let eval = e.evaluate("29/02\nM\n1234-10B").unwrap();
    assert_eq!(eval.records[0].intent.date, ymd(2024, 2, 29));
    assert_eq!(eval.records[0].commission, dec!(3.00));
}

#[test]
fn error_reports_line_and_token() {
    let err = engine().evaluate("08/06\nM\n1234-1B\n\n1234-1Q").unwrap_err();
    assert_eq!(err.line(), 5);
    assert_eq!(
        err.to_string(),
        "line 5: unknown wager type `Q` in `1234-1Q` (expected B, S, A or C)"
    );
}

#[test]
fn records_serialize_with_flat_intent() {
    let eval = engine().evaluate("08/06\nM\n1526-1B ibox").unwrap();
    let json = serde_json::to_value(&eval).unwrap();
    let record = &json["records"][0];
    assert_eq!(record["number"], "1526");
    assert_eq!(record["type"], "Big");
    assert_eq!(record["mode"], "ibox");
    assert_eq!(record["combination_count"], 24);
    assert!(json["summary"]["total_amount"].is_number());
}
