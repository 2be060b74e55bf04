//! Static digit shapes
//!
//! Each digit is a subset of the seven display segments laid out on a
//! 1x2 local grid:
//!
//! ```text
//!   a        a = (0,0,h)   b = (1,0,v)
//!  f b       c = (1,1,v)   d = (0,2,h)
//!   g        e = (0,1,v)   f = (0,0,v)
//!  e c       g = (0,1,h)
//!   d
//! ```
//!
//! Zero uses only a, b, g, f (four segments) so it reads as a small
//! upper loop rather than a full-height ring.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::segment::Segment;

const A: Segment = Segment::h(0, 0);
const B: Segment = Segment::v(1, 0);
const C: Segment = Segment::v(1, 1);
const D: Segment = Segment::h(0, 2);
const E: Segment = Segment::v(0, 1);
const F: Segment = Segment::v(0, 0);
const G: Segment = Segment::h(0, 1);

/// Base patterns indexed by digit, in display-letter order
const PATTERNS: [&[Segment]; 10] = [
    &[A, B, G, F],
    &[B, C],
    &[A, B, G, E, D],
    &[A, B, G, C, D],
    &[F, G, B, C],
    &[A, F, G, C, D],
    &[A, F, G, E, D, C],
    &[A, B, C],
    &[A, B, C, D, E, F, G],
    &[A, B, C, D, F, G],
];

/// A digit 0-9 (construction is checked, so catalog lookups cannot fail)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// All ten digits in ascending order
    pub fn all() -> impl Iterator<Item = Digit> {
        (0..=9).map(Digit)
    }
}

impl TryFrom<u8> for Digit {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Digit::new(value).ok_or_else(|| format!("digit out of range: {value}"))
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> u8 {
        digit.0
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unrotated segment pattern for a digit
pub fn base_pattern(digit: Digit) -> &'static [Segment] {
    PATTERNS[digit.0 as usize]
}
