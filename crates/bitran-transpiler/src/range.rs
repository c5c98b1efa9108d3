//! Half-open byte ranges over inline text and how two of them overlap.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid range [{start}, {end}): end is before start")]
pub struct RangeError {
    pub start: usize,
    pub end: usize,
}

/// `[start, end)` in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Result<Self, RangeError> {
        Self::try_new(start, end).ok_or(RangeError { start, end })
    }

    #[must_use]
    pub fn try_new(start: usize, end: usize) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<regex::Match<'_>> for Range {
    fn from(m: regex::Match<'_>) -> Self {
        Self {
            start: m.start(),
            end: m.end(),
        }
    }
}

/// How a candidate range `a` relates to an accepted range `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeIntersection {
    /// Disjoint. Touching ends do not overlap.
    None,
    /// Overlap where neither contains the other.
    Partial,
    /// `a` lies within `b`, equal ranges included.
    Inside,
    /// `a` strictly contains `b`.
    Contain,
}

#[must_use]
pub fn intersection(a: Range, b: Range) -> RangeIntersection {
    if a.start.max(b.start) >= a.end.min(b.end) {
        return RangeIntersection::None;
    }
    if a == b {
        RangeIntersection::Inside
    } else if a.start <= b.start && a.end >= b.end {
        RangeIntersection::Contain
    } else if b.start <= a.start && b.end >= a.end {
        RangeIntersection::Inside
    } else {
        RangeIntersection::Partial
    }
}
