//! Aggregation operations and the statistics they rely on.

pub mod aggregator;
pub mod stats;

pub use aggregator::*;
pub use stats::{five_number_summary, median, FiveNumberSummary};
