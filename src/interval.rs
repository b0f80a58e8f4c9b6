use std::{convert::TryFrom, fmt::Display};

use crate::error::IntervalError;

/// A trading interval number, constrained to 1..=u32::MAX
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval(u32);

impl Interval {
    pub fn new<N: TryInto<u32>>(value: N) -> Result<Interval, IntervalError> {
        let value = value.try_into().map_err(|_| IntervalError::OutOfRange)?;
        if value == 0 {
            Err(IntervalError::Zero)
        } else {
            Ok(Self(value))
        }
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Every interval from 1 up to and including `last`, ascending.
    pub fn up_to(last: u32) -> impl DoubleEndedIterator<Item = Interval> {
        (1..=last).map(Interval)
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Interval {
    type Error = IntervalError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Interval::new(value)
    }
}

impl TryFrom<u16> for Interval {
    type Error = IntervalError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Interval::new(value)
    }
}

impl TryFrom<u32> for Interval {
    type Error = IntervalError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Interval::new(value)
    }
}

impl TryFrom<u64> for Interval {
    type Error = IntervalError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Interval::new(value)
    }
}

impl TryFrom<usize> for Interval {
    type Error = IntervalError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Interval::new(value)
    }
}
