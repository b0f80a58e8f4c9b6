//! Error types for record parsing, market bookkeeping and report runs.

use thiserror::Error;

/// Interval number could not be represented as an [`Interval`](crate::Interval).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IntervalError {
    /// Intervals are numbered from 1.
    #[error("invalid interval, intervals start at 1")]
    Zero,

    /// Does not fit in `u32`.
    #[error("invalid interval, must be at most {}", u32::MAX)]
    OutOfRange,
}

/// A single input line could not be turned into a [`Record`](crate::Record).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("expected 5 fields (symbol, interval, volume, high, low), found {0}")]
    FieldCount(usize),

    #[error("invalid {field} '{value}'")]
    Field { field: &'static str, value: String },

    #[error("line is not valid UTF-8")]
    Encoding,

    #[error("invalid interval '{value}': {source}")]
    Interval {
        value: String,
        #[source]
        source: IntervalError,
    },
}

/// Contract violations on the explicit add/update paths of a [`Market`](crate::Market).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    #[error("stock '{0}' already exists")]
    DuplicateSymbol(String),

    #[error("cannot update non-existent stock '{0}'")]
    UnknownSymbol(String),
}

/// Errors that end a report run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: RecordError,
    },
}
