//! Stats module - income vs crime statistics

mod calculator;

pub use calculator::{CorrelationSummary, StatsCalculator};
