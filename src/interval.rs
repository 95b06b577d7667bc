//! Coordinate interval algebra.
//!
//! An [`Interval`] is a `(first, last, exclude_end)` triple. Coordinates on
//! the reverse strand run in the opposite numeric direction, so `first` may be
//! greater than `last`. When `exclude_end` is set, the excluded endpoint is
//! whichever physical end `last` maps to: the maximum for ascending intervals,
//! the minimum for descending ones.
//!
//! The direction-dependent flags are computed once in [`Interval::new`] and
//! every comparison below works on `min`/`max`/`exclude_min`/`exclude_max`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing an interval from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    #[error("Invalid range '{0}': expected FIRST..LAST or FIRST...LAST")]
    MissingSeparator(String),

    #[error("Invalid range bound '{bound}' in '{range}'")]
    InvalidBound { range: String, bound: String },
}

/// A closed or half-open coordinate range.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    first: u64,
    last: u64,
    exclude_end: bool,
    min: u64,
    max: u64,
    exclude_min: bool,
    exclude_max: bool,
}

impl Interval {
    /// Create an interval from its endpoints.
    #[inline]
    pub fn new(first: u64, last: u64, exclude_end: bool) -> Self {
        let ascending = first <= last;
        Self {
            first,
            last,
            exclude_end,
            min: first.min(last),
            max: first.max(last),
            exclude_min: exclude_end && !ascending,
            exclude_max: exclude_end && ascending,
        }
    }

    /// Closed interval `[first, last]`.
    #[inline]
    pub fn closed(first: u64, last: u64) -> Self {
        Self::new(first, last, false)
    }

    /// Interval with `last` excluded.
    #[inline]
    pub fn half_open(first: u64, last: u64) -> Self {
        Self::new(first, last, true)
    }

    #[inline]
    pub fn first(&self) -> u64 {
        self.first
    }

    #[inline]
    pub fn last(&self) -> u64 {
        self.last
    }

    #[inline]
    pub fn exclude_end(&self) -> bool {
        self.exclude_end
    }

    /// Smaller of the two endpoints.
    #[inline]
    pub fn min(&self) -> u64 {
        self.min
    }

    /// Larger of the two endpoints.
    #[inline]
    pub fn max(&self) -> u64 {
        self.max
    }

    /// True when the excluded endpoint is the minimum (descending, half-open).
    #[inline]
    pub fn exclude_min(&self) -> bool {
        self.exclude_min
    }

    /// True when the excluded endpoint is the maximum (ascending, half-open).
    #[inline]
    pub fn exclude_max(&self) -> bool {
        self.exclude_max
    }

    /// Number of coordinates covered by the interval.
    ///
    /// A half-open interval whose endpoints coincide has size 0. Returns
    /// `None` only for the closed interval `0..u64::MAX`, whose 2^64 members
    /// do not fit in a `u64`.
    #[inline]
    pub fn size(&self) -> Option<u64> {
        let span = self.max - self.min;
        if self.exclude_end {
            Some(span)
        } else {
            span.checked_add(1)
        }
    }

    /// Check whether `other` lies entirely within this interval.
    pub fn contains(&self, other: &Interval) -> bool {
        let lower_ok = if self.exclude_min && !other.exclude_min {
            other.min > self.min
        } else {
            other.min >= self.min
        };
        let upper_ok = if self.exclude_max && !other.exclude_max {
            other.max < self.max
        } else {
            other.max <= self.max
        };
        lower_ok && upper_ok
    }

    /// Check whether this interval lies entirely within `other`.
    #[inline]
    pub fn within(&self, other: &Interval) -> bool {
        other.contains(self)
    }

    /// Check whether the two intervals share at least one member coordinate.
    ///
    /// A boundary shared by both intervals only counts when neither side
    /// excludes it. Checking `exclude_min` as well as `exclude_max` keeps a
    /// descending half-open interval such as `30...20` from overlapping
    /// `10..20` at its excluded 20, which a rule on `exclude_max` alone would
    /// allow.
    pub fn overlaps(&self, other: &Interval) -> bool {
        let other_starts_before_end = if self.exclude_max || other.exclude_min {
            other.min < self.max
        } else {
            other.min <= self.max
        };
        let self_starts_before_end = if other.exclude_max || self.exclude_min {
            self.min < other.max
        } else {
            self.min <= other.max
        };
        other_starts_before_end && self_starts_before_end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.exclude_end { "..." } else { ".." };
        write!(f, "{}{}{}", self.first, sep, self.last)
    }
}

impl FromStr for Interval {
    type Err = IntervalError;

    /// Parse `FIRST..LAST` (closed) or `FIRST...LAST` (last excluded).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (first, last, exclude_end) = if let Some((a, b)) = s.split_once("...") {
            (a, b, true)
        } else if let Some((a, b)) = s.split_once("..") {
            (a, b, false)
        } else {
            return Err(IntervalError::MissingSeparator(s.to_string()));
        };

        let parse_bound = |bound: &str| {
            bound
                .trim()
                .parse::<u64>()
                .map_err(|_| IntervalError::InvalidBound {
                    range: s.to_string(),
                    bound: bound.to_string(),
                })
        };

        Ok(Interval::new(
            parse_bound(first)?,
            parse_bound(last)?,
            exclude_end,
        ))
    }
}

impl Ord for Interval {
    /// Order by lower edge, then upper edge. An excluded minimum sorts after
    /// an included one at the same coordinate; an excluded maximum sorts
    /// before an included one.
    fn cmp(&self, other: &Self) -> Ordering {
        self.min
            .cmp(&other.min)
            .then(self.exclude_min.cmp(&other.exclude_min))
            .then(self.max.cmp(&other.max))
            .then(other.exclude_max.cmp(&self.exclude_max))
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Two intervals are equal when they cover the same extent, regardless of
/// the direction they were written in.
impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Interval {}
