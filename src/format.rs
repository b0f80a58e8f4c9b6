//! Float rendering in "general" notation: a fixed number of significant
//! digits, trailing zeros dropped, scientific notation for very large or
//! very small magnitudes.

use std::fmt::{self, Display};

pub const DEFAULT_PRECISION: usize = 6;

/// Renders `value` with `precision` significant digits.
#[derive(Debug, Clone, Copy)]
pub struct General {
    pub value: f64,
    pub precision: usize,
}

impl General {
    pub fn new(value: f64, precision: usize) -> Self {
        Self {
            value,
            precision: precision.max(1),
        }
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

impl Display for General {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.value;
        if value.is_nan() {
            return f.write_str("nan");
        }
        if value.is_infinite() {
            return f.write_str(if value < 0.0 { "-inf" } else { "inf" });
        }
        if value == 0.0 {
            return f.write_str("0");
        }

        let p = self.precision.max(1);

        // round to p significant digits first; the exponent can move (9.99999x -> 1e1)
        let sci = format!("{:.*e}", p - 1, value);
        let Some((mantissa, exp)) = sci.split_once('e') else {
            return f.write_str(&sci);
        };
        let exp: i32 = exp.parse().map_err(|_| fmt::Error)?;

        if exp < -4 || exp >= p as i32 {
            let sign = if exp < 0 { '-' } else { '+' };
            write!(f, "{}e{}{:02}", trim_fraction(mantissa), sign, exp.unsigned_abs())
        } else {
            let decimals = (p as i32 - 1 - exp) as usize;
            let fixed = format!("{:.*}", decimals, value);
            f.write_str(trim_fraction(&fixed))
        }
    }
}
