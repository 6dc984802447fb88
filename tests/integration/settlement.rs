//! Settlement of evaluated batches against draw results.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use betslip::engine::{Engine, EngineConfig};
use betslip::settlement::{settlement_total, DrawBook};
use betslip::types::{Market, PrizeTier};

const RESULT: &str = "\
Magnum 08/06/2025
1st: 1526
2nd: 8841
3rd: 0526
Special: 2233 4417 9001
Consolation: 6152 3030";

fn book() -> DrawBook {
    let date = NaiveDate::from_ymd_opt(2025, 6, 8).unwrap();
    let mut book = DrawBook::new();
    for market in [Market::M, Market::K] {
        book.insert(date, market, RESULT.parse().unwrap());
    }
    book
}

#[test]
fn batch_settles_per_market_and_tier() {
    let engine = Engine::new(EngineConfig::new(2025));
    let eval = engine.evaluate("08/06\nMKT\n1526-1B 1S ibox\n0526-2C").unwrap();

    let winnings = engine.settle(&eval.records, &book());

    // T has no published result. On M and K:
    //   1526 ibox Big: 1526 (1st), 6152 (consolation)
    //   1526 ibox Small: 1526 (1st)
    //   0526 C: 1st and 3rd share the last three digits
    assert_eq!(winnings.len(), 10);
    assert!(winnings.iter().all(|w| w.market != Market::T));

    let on_m: Vec<_> = winnings
        .iter()
        .filter(|w| w.market == Market::M)
        .map(|w| (w.tier, w.payout))
        .collect();
    assert_eq!(
        on_m,
        vec![
            (PrizeTier::First, dec!(114.58)),
            (PrizeTier::Consolation, dec!(2.75)),
            (PrizeTier::First, dec!(160.42)),
            (PrizeTier::First, dec!(484)),
            (PrizeTier::Third, dec!(484)),
        ]
    );
    assert_eq!(settlement_total(&winnings), dec!(2491.50));
}

#[test]
fn losing_batch_has_no_winnings() {
    let engine = Engine::new(EngineConfig::new(2025));
    let eval = engine.evaluate("08/06\nMK\n7777-5B 5S").unwrap();
    assert!(engine.settle(&eval.records, &book()).is_empty());
}
