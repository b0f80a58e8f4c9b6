use tabled::Tabled;

mod aggregate;
pub mod error;
pub mod format;
mod interval;
mod market;
pub mod record;
mod report;

pub use aggregate::*;
pub use error::{Error, IntervalError, MarketError, RecordError};
pub use interval::*;
pub use market::*;
pub use record::{Record, RecordReader};
pub use report::*;

/// Share of a symbol's total volume traded in one interval.
#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct VolumeShare {
    #[tabled(rename = "stock")]
    pub symbol: String,
    pub interval: Interval,
    /// 0..=100, and 0 for a symbol with no traded volume
    #[tabled(rename = "% volume")]
    pub percentage: f64,
}

/// Day extrema for a symbol across all intervals.
#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct PriceRange {
    #[tabled(rename = "stock")]
    pub symbol: String,
    #[tabled(rename = "high")]
    pub max_high: f64,
    #[tabled(rename = "low")]
    pub min_low: f64,
}
