//! M collation order for subscripts
//!
//! The empty string sorts first, then canonical numbers in numeric order,
//! then every other string bytewise. `"10"` therefore follows `"9"` and
//! `"1.5"` precedes `"2"`, while `"010"` and `"0.5"` are strings and sort
//! after all numbers.
//!
//! A canonical number is the form M itself would print: an optional `-`,
//! integer digits without leading zeros, and an optional `.` with fraction
//! digits without trailing zeros. Zero is `0`; a number below one has no
//! integer digits (`.5`, `-.25`).

use std::cmp::Ordering;

use bytes::Bytes;

/// A subscript tagged with its collation class
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collated {
    /// `""`
    Empty,
    /// A canonical number subscript
    Number(CanonicalNumber),
    /// Any other subscript
    Text(Bytes),
}

impl Collated {
    /// Classify a subscript.
    pub fn new(subscript: &Bytes) -> Self {
        if subscript.is_empty() {
            return Collated::Empty;
        }
        match CanonicalNumber::parse(subscript) {
            Some(n) => Collated::Number(n),
            None => Collated::Text(subscript.clone()),
        }
    }

    /// The subscript as stored in a key buffer.
    pub fn to_bytes(&self) -> Bytes {
        match self {
            Collated::Empty => Bytes::new(),
            Collated::Number(n) => n.as_bytes().clone(),
            Collated::Text(b) => b.clone(),
        }
    }

    /// True for the empty subscript.
    pub fn is_empty(&self) -> bool {
        matches!(self, Collated::Empty)
    }
}

impl From<&Bytes> for Collated {
    fn from(subscript: &Bytes) -> Self {
        Collated::new(subscript)
    }
}

/// A subscript in canonical number form, ordered by value
///
/// Comparison works on the digit runs, so numbers of any length compare
/// exactly without converting to a machine type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalNumber {
    text: Bytes,
    negative: bool,
    /// Integer digits after the sign; 0 for zero and for magnitudes below one
    int_len: usize,
}

impl CanonicalNumber {
    /// Parse `text` if it is in canonical form.
    pub fn parse(text: &Bytes) -> Option<Self> {
        if text.as_ref() == b"0" {
            return Some(Self {
                text: text.clone(),
                negative: false,
                int_len: 0,
            });
        }
        let negative = text.first() == Some(&b'-');
        let body = &text[usize::from(negative)..];
        let (int, frac) = match body.iter().position(|&c| c == b'.') {
            Some(dot) => {
                let frac = &body[dot + 1..];
                if frac.is_empty() || frac.last() == Some(&b'0') {
                    return None;
                }
                (&body[..dot], Some(frac))
            }
            None => (body, None),
        };
        if int.is_empty() && frac.is_none() {
            return None;
        }
        if int.first() == Some(&b'0') {
            return None;
        }
        let all_digits = |s: &[u8]| s.iter().all(u8::is_ascii_digit);
        if !all_digits(int) || !frac.map_or(true, all_digits) {
            return None;
        }
        Some(Self {
            text: text.clone(),
            negative,
            int_len: int.len(),
        })
    }

    /// The subscript text
    pub fn as_bytes(&self) -> &Bytes {
        &self.text
    }

    /// True below zero
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    fn int_digits(&self) -> &[u8] {
        let start = usize::from(self.negative);
        &self.text[start..start + self.int_len]
    }

    fn frac_digits(&self) -> &[u8] {
        let dot = usize::from(self.negative) + self.int_len;
        match self.text.get(dot) {
            Some(b'.') => &self.text[dot + 1..],
            _ => &[],
        }
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        let (a, b) = (self.int_digits(), other.int_digits());
        // no leading zeros, so more integer digits means larger
        a.len()
            .cmp(&b.len())
            .then_with(|| a.cmp(b))
            // no trailing zeros, so bytewise order is numeric order
            .then_with(|| self.frac_digits().cmp(other.frac_digits()))
    }
}

impl Ord for CanonicalNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}

impl PartialOrd for CanonicalNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Returns true if `s` is a number in the form M would print it.
pub fn is_canonical_number(s: &[u8]) -> bool {
    CanonicalNumber::parse(&Bytes::copy_from_slice(s)).is_some()
}
