use std::{collections::HashMap, io::BufRead};

use tracing::{debug, warn};

use crate::{
    Aggregate, Interval, Record, RecordReader,
    error::{Error, MarketError},
};

/// How an ingest pass over a line source went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Lines read, blank ones included.
    pub lines: usize,
    pub records: usize,
    /// Malformed lines passed over in lenient mode.
    pub skipped: usize,
}

/// Registry of per-symbol aggregates for one run.
#[derive(Debug, Clone, Default)]
pub struct Market {
    // invariant: first-seen order, one entry per symbol
    aggregates: Vec<Aggregate>,
    // symbol -> position in aggregates
    index: HashMap<String, usize>,

    // invariant: never decreases, 0 until the first ingest
    max_interval: u32,
}

impl Market {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorbs one record, creating the symbol's aggregate on first sight.
    pub fn ingest(&mut self, symbol: &str, interval: Interval, volume: u64, high: f64, low: f64) {
        match self.index.get(symbol) {
            Some(&i) => self.aggregates[i].update(interval, volume, high, low),
            None => self.insert_new(symbol, interval, volume, high, low),
        }
        self.track_interval(interval);
    }

    /// Ingests every record of a line source.
    ///
    /// A malformed line is logged and skipped, or returned as an error when
    /// `strict` is set. Read failures always end the pass.
    pub fn ingest_reader<R: BufRead>(&mut self, reader: R, strict: bool) -> Result<IngestSummary, Error> {
        let mut summary = IngestSummary::default();
        let mut records = RecordReader::new(reader);

        for result in records.by_ref() {
            match result {
                Ok(record) => {
                    self.ingest_record(&record);
                    summary.records += 1;
                }
                Err(err @ Error::Record { .. }) if !strict => {
                    warn!("skipping {err}");
                    summary.skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        summary.lines = records.line_no();
        Ok(summary)
    }

    #[inline]
    pub fn ingest_record(&mut self, record: &Record) {
        self.ingest(
            &record.symbol,
            record.interval,
            record.volume,
            record.high,
            record.low,
        );
    }

    /// Registers a symbol not seen before. A known symbol is left untouched.
    pub fn add(
        &mut self,
        symbol: &str,
        interval: Interval,
        volume: u64,
        high: f64,
        low: f64,
    ) -> Result<(), MarketError> {
        if self.index.contains_key(symbol) {
            warn!(symbol, "stock already exists, add rejected");
            return Err(MarketError::DuplicateSymbol(symbol.to_owned()));
        }
        self.insert_new(symbol, interval, volume, high, low);
        self.track_interval(interval);
        Ok(())
    }

    /// Accumulates into a known symbol. Unknown symbols are rejected.
    pub fn update(
        &mut self,
        symbol: &str,
        interval: Interval,
        volume: u64,
        high: f64,
        low: f64,
    ) -> Result<(), MarketError> {
        let Some(&i) = self.index.get(symbol) else {
            warn!(symbol, "cannot update non-existent stock");
            return Err(MarketError::UnknownSymbol(symbol.to_owned()));
        };
        self.aggregates[i].update(interval, volume, high, low);
        self.track_interval(interval);
        Ok(())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    /// `None` for a symbol never ingested. Logged, never fatal.
    pub fn lookup(&self, symbol: &str) -> Option<&Aggregate> {
        let found = self.index.get(symbol).map(|&i| &self.aggregates[i]);
        if found.is_none() {
            warn!(symbol, "stock not found in records");
        }
        found
    }

    /// Symbols in the order they were first ingested.
    pub fn symbols_in_order(&self) -> impl ExactSizeIterator<Item = &str> {
        self.aggregates.iter().map(Aggregate::symbol)
    }

    /// Aggregates in the same order as [`Market::symbols_in_order`].
    pub fn aggregates(&self) -> impl DoubleEndedIterator<Item = &Aggregate> + ExactSizeIterator {
        self.aggregates.iter()
    }

    /// Highest interval number seen across all symbols, 0 when empty.
    pub fn max_interval_seen(&self) -> u32 {
        self.max_interval
    }

    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }

    /// invariant: symbol not yet in index
    fn insert_new(&mut self, symbol: &str, interval: Interval, volume: u64, high: f64, low: f64) {
        debug_assert!(!self.index.contains_key(symbol));
        debug!(symbol, %interval, "new stock");

        self.index.insert(symbol.to_owned(), self.aggregates.len());
        self.aggregates
            .push(Aggregate::new(symbol, interval, volume, high, low));
    }

    #[inline]
    fn track_interval(&mut self, interval: Interval) {
        self.max_interval = self.max_interval.max(interval.value());
    }
}

impl<'a> Extend<&'a Record> for Market {
    fn extend<T: IntoIterator<Item = &'a Record>>(&mut self, iter: T) {
        for record in iter {
            self.ingest_record(record);
        }
    }
}

impl<'a> FromIterator<&'a Record> for Market {
    fn from_iter<T: IntoIterator<Item = &'a Record>>(iter: T) -> Self {
        let mut market = Market::new();
        market.extend(iter);
        market
    }
}
