//! Interval predicates exposed on the command line.

use crate::interval::Interval;
use std::cmp::Ordering;
use std::fmt;

/// A single interval operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOp {
    /// -1, 0 or 1 by interval order
    Compare,
    /// A contains B
    Contains,
    /// A lies within B
    Within,
    Overlaps,
    /// Size of A (B is ignored)
    Size,
}

/// Result of a [`RangeOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeAnswer {
    Order(Ordering),
    Flag(bool),
    /// `None` when the count is 2^64 (the closed interval `0..u64::MAX`)
    Size(Option<u64>),
}

impl fmt::Display for RangeAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeAnswer::Order(Ordering::Less) => write!(f, "-1"),
            RangeAnswer::Order(Ordering::Equal) => write!(f, "0"),
            RangeAnswer::Order(Ordering::Greater) => write!(f, "1"),
            RangeAnswer::Flag(b) => write!(f, "{}", b),
            RangeAnswer::Size(Some(n)) => write!(f, "{}", n),
            RangeAnswer::Size(None) => write!(f, "{}", u128::from(u64::MAX) + 1),
        }
    }
}

impl RangeOp {
    /// Evaluate the operation. Returns `None` when a binary operation is
    /// given only one interval.
    pub fn apply(self, a: &Interval, b: Option<&Interval>) -> Option<RangeAnswer> {
        if !self.is_binary() {
            return Some(RangeAnswer::Size(a.size()));
        }
        let b = b?;
        Some(match self {
            RangeOp::Compare => RangeAnswer::Order(a.cmp(b)),
            RangeOp::Contains => RangeAnswer::Flag(a.contains(b)),
            RangeOp::Within => RangeAnswer::Flag(a.within(b)),
            RangeOp::Overlaps => RangeAnswer::Flag(a.overlaps(b)),
            RangeOp::Size => RangeAnswer::Size(a.size()),
        })
    }

    /// True if the operation needs a second interval.
    pub fn is_binary(self) -> bool {
        self != RangeOp::Size
    }
}
