//! Exact decimal arithmetic for `incr`
//!
//! Stored values are strings. `incr` reads one the way M does, taking the
//! longest leading numeric prefix (zero if there is none), adds the
//! increment exactly and writes the sum back in canonical form.

use std::fmt;

use keypath_core::{Error, Result};

/// Fraction digits kept when reading a value; further digits are dropped.
const MAX_SCALE: u32 = 36;

/// `mantissa / 10^scale`, normalized so `mantissa` has no trailing zeros
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Decimal {
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    pub(crate) const ZERO: Decimal = Decimal {
        mantissa: 0,
        scale: 0,
    };
    pub(crate) const ONE: Decimal = Decimal {
        mantissa: 1,
        scale: 0,
    };

    /// Numeric value of `s`: optional signs, digits, an optional `.` and
    /// fraction digits. Anything after that is ignored.
    pub(crate) fn from_numeric_prefix(s: &[u8]) -> Result<Self> {
        let overflow = || Error::numeric_overflow(String::from_utf8_lossy(s).into_owned());

        let mut rest = s;
        let mut negative = false;
        while let Some((&c, tail)) = rest.split_first() {
            match c {
                b'-' => negative = !negative,
                b'+' => {}
                _ => break,
            }
            rest = tail;
        }

        let mut mantissa: i128 = 0;
        let mut scale = 0;
        let mut seen_dot = false;
        for &c in rest {
            match c {
                b'0'..=b'9' => {
                    if seen_dot {
                        if scale == MAX_SCALE {
                            continue;
                        }
                        scale += 1;
                    }
                    mantissa = mantissa
                        .checked_mul(10)
                        .and_then(|m| m.checked_add(i128::from(c - b'0')))
                        .ok_or_else(overflow)?;
                }
                b'.' if !seen_dot => seen_dot = true,
                _ => break,
            }
        }
        if negative {
            mantissa = -mantissa;
        }
        Ok(Self { mantissa, scale }.normalized())
    }

    pub(crate) fn checked_add(self, other: Self) -> Option<Self> {
        let scale = self.scale.max(other.scale);
        let sum = self.rescaled(scale)?.checked_add(other.rescaled(scale)?)?;
        Some(
            Self {
                mantissa: sum,
                scale,
            }
            .normalized(),
        )
    }

    fn rescaled(self, scale: u32) -> Option<i128> {
        self.mantissa
            .checked_mul(10i128.checked_pow(scale - self.scale)?)
    }

    fn normalized(mut self) -> Self {
        if self.mantissa == 0 {
            return Self::ZERO;
        }
        while self.scale > 0 && self.mantissa % 10 == 0 {
            self.mantissa /= 10;
            self.scale -= 1;
        }
        self
    }
}

/// Canonical M form: `0`, `-7`, `1.5`, `.25`, `-.5`.
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mantissa == 0 {
            return f.write_str("0");
        }
        if self.mantissa < 0 {
            f.write_str("-")?;
        }
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return f.write_str(&digits);
        }
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{}.{}", int, frac)
        } else {
            write!(f, ".{:0>width$}", digits, width = scale)
        }
    }
}
