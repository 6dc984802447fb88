//! betslip: 4D bet-notation parser and payout engine
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod parser;
pub mod engine;
pub mod settlement;
pub mod cutoff;
