use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open byte range `[start, end)` in the source text.
///
/// The constructor doesn't check that `start <= end`: ranges coming from
/// rules are validated by the fixer, which needs to be able to represent and
/// reject inverted ones.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextRange {
    start: usize,
    end: usize,
}

impl TextRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A zero-width range at `offset`.
    pub const fn empty(offset: usize) -> Self {
        Self { start: offset, end: offset }
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn end(&self) -> usize {
        self.end
    }

    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub const fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Whether `offset` falls inside the range (the end is excluded).
    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Whether `other` lies entirely within `self`. Empty ranges at either
    /// boundary are contained.
    pub const fn contains_range(&self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two ranges share at least one offset.
    pub const fn overlaps(&self, other: TextRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The smallest range covering both.
    pub fn cover(&self, other: TextRange) -> TextRange {
        TextRange::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<std::ops::Range<usize>> for TextRange {
    fn from(range: std::ops::Range<usize>) -> Self {
        TextRange::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlaps() {
        let a = TextRange::new(0, 5);
        assert!(a.overlaps(TextRange::new(3, 8)));
        assert!(!a.overlaps(TextRange::new(5, 8)));
        assert!(!a.overlaps(TextRange::empty(2)));
    }

    #[test]
    fn test_contains_range() {
        let a = TextRange::new(2, 6);
        assert!(a.contains_range(TextRange::new(2, 6)));
        assert!(a.contains_range(TextRange::empty(6)));
        assert!(!a.contains_range(TextRange::new(1, 3)));
        assert!(a.contains(2));
        assert!(!a.contains(6));
    }

    #[test]
    fn test_inverted() {
        let r = TextRange::new(4, 1);
        assert!(r.is_inverted());
        assert_eq!(r.len(), 0);
        assert_eq!(TextRange::new(4, 1).cover(TextRange::new(0, 2)), TextRange::new(0, 2));
    }
}
