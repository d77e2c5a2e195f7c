use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Exact numerator/denominator pair used by RATIONAL and SRATIONAL fields.
///
/// Values are never reduced: `2/4` and `1/2` are different values, so a
/// producer's representation survives a decode/encode cycle untouched.
/// Unsigned RATIONAL fields keep their raw 32-bit patterns in the same `i32`
/// pair; use [`Rational::unsigned_parts`] to read them back as `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rational {
    pub numerator: i32,
    pub denominator: i32,
}

impl Rational {
    pub const fn new(numerator: i32, denominator: i32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Whole number `value/1`.
    pub const fn real(value: i32) -> Self {
        Self::new(value, 1)
    }

    /// Build from unsigned parts, keeping the bit patterns.
    pub const fn from_unsigned(numerator: u32, denominator: u32) -> Self {
        Self::new(numerator as i32, denominator as i32)
    }

    pub const fn unsigned_parts(self) -> (u32, u32) {
        (self.numerator as u32, self.denominator as u32)
    }

    /// Truncating integer division, `None` when the denominator is zero.
    pub fn to_integer(self) -> Option<i32> {
        self.numerator.checked_div(self.denominator)
    }

    pub fn to_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for Rational {
    type Err = String;

    /// Parse `n/d`, or a bare integer as `n/1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (numerator, denominator) = match s.split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s, "1"),
        };
        let numerator = numerator
            .parse::<i32>()
            .map_err(|e| format!("bad numerator {numerator:?}: {e}"))?;
        let denominator = denominator
            .parse::<i32>()
            .map_err(|e| format!("bad denominator {denominator:?}: {e}"))?;
        Ok(Rational::new(numerator, denominator))
    }
}
