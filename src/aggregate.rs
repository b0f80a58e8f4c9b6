use std::collections::HashMap;

use crate::Interval;

/// Running statistics for one stock symbol.
#[derive(Debug, Clone)]
pub struct Aggregate {
    symbol: String,

    // u128 so summing any number of u64 volumes cannot wrap
    // invariant: equals the sum of interval_volume values
    total_volume: u128,
    // invariant: values only ever grow
    interval_volume: HashMap<Interval, u128>,

    max_high: f64,
    min_low: f64,
}

impl Aggregate {
    /// Seeds a new aggregate with a single interval entry.
    pub fn new(symbol: impl Into<String>, interval: Interval, volume: u64, high: f64, low: f64) -> Self {
        Self {
            symbol: symbol.into(),
            total_volume: u128::from(volume),
            interval_volume: HashMap::from([(interval, u128::from(volume))]),
            max_high: high,
            min_low: low,
        }
    }

    /// Accumulates one record. Repeated intervals add to the existing entry.
    #[inline]
    pub fn update(&mut self, interval: Interval, volume: u64, high: f64, low: f64) {
        let volume = u128::from(volume);
        self.total_volume += volume;
        *self.interval_volume.entry(interval).or_insert(0) += volume;
        self.max_high = self.max_high.max(high);
        self.min_low = self.min_low.min(low);
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn total_volume(&self) -> u128 {
        self.total_volume
    }

    /// `None` when no record for `interval` was ingested for this symbol.
    pub fn volume_at(&self, interval: Interval) -> Option<u128> {
        self.interval_volume.get(&interval).copied()
    }

    /// Share of the total volume traded in `interval`, as a percentage.
    ///
    /// An unrecorded interval counts as zero volume, and so does every
    /// interval of a symbol whose total volume is zero.
    pub fn volume_percentage(&self, interval: Interval) -> f64 {
        if self.total_volume == 0 {
            return 0.0;
        }
        let volume = self.volume_at(interval).unwrap_or(0);
        volume as f64 / self.total_volume as f64 * 100.0
    }

    pub fn max_high(&self) -> f64 {
        self.max_high
    }

    pub fn min_low(&self) -> f64 {
        self.min_low
    }

    /// Recorded (interval, volume) entries, in no particular order.
    pub fn intervals(&self) -> impl ExactSizeIterator<Item = (Interval, u128)> {
        self.interval_volume.iter().map(|(i, v)| (*i, *v))
    }
}
