//! Input records and the line reader that produces them.
//!
//! One record per line: `symbol interval volume high low`. Fields may be
//! separated by commas, whitespace, or both.

use std::{
    io::{self, BufRead},
    str::FromStr,
};

use crate::{
    Interval,
    error::{Error, RecordError},
};

/// One trading observation for a symbol in an interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub symbol: String,
    pub interval: Interval,
    pub volume: u64,
    pub high: f64,
    pub low: f64,
}

impl Record {
    pub fn new(symbol: impl Into<String>, interval: Interval, volume: u64, high: f64, low: f64) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            volume,
            high,
            low,
        }
    }
}

fn field<T: FromStr>(name: &'static str, raw: &str) -> Result<T, RecordError> {
    raw.parse().map_err(|_| RecordError::Field {
        field: name,
        value: raw.to_owned(),
    })
}

impl FromStr for Record {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();

        let [symbol, interval, volume, high, low] = fields[..] else {
            return Err(RecordError::FieldCount(fields.len()));
        };

        let interval_raw: u64 = field("interval", interval)?;
        let interval = Interval::new(interval_raw).map_err(|source| RecordError::Interval {
            value: interval.to_owned(),
            source,
        })?;

        Ok(Record {
            symbol: symbol.to_owned(),
            interval,
            volume: field("volume", volume)?,
            high: field("high", high)?,
            low: field("low", low)?,
        })
    }
}

/// Streams [`Record`]s out of a line-oriented source, skipping blank lines.
///
/// Read failures and malformed lines are yielded as errors; the caller
/// decides whether to skip them or stop.
pub struct RecordReader<R> {
    reader: R,
    line: Vec<u8>,
    line_no: usize,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            line_no: 0,
        }
    }

    /// 1-based number of the last line read.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    // raw bytes, so one badly encoded line does not poison the stream
    fn read_line(&mut self) -> io::Result<usize> {
        self.line.clear();
        let n = self.reader.read_until(b'\n', &mut self.line)?;
        if n > 0 {
            self.line_no += 1;
        }
        Ok(n)
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Record, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.read_line() {
                Ok(0) => return None,
                Ok(_) => {
                    let parsed: Result<Record, RecordError> = match std::str::from_utf8(&self.line) {
                        Ok(text) if text.trim().is_empty() => continue,
                        Ok(text) => text.parse(),
                        Err(_) => Err(RecordError::Encoding),
                    };
                    return Some(parsed.map_err(|source| Error::Record {
                        line: self.line_no,
                        source,
                    }));
                }
                Err(err) => return Some(Err(err.into())),
            }
        }
    }
}
