// Half-open byte intervals into a pristine source buffer

use std::cmp::Ordering;
use std::fmt;

use crate::error::{EngineError, EngineResult};

/// Half-open byte interval `[start, end)` over a text buffer.
///
/// Always references the original buffer, never a partially rewritten one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    start: usize,
    end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> EngineResult<Self> {
        if start > end {
            return Err(EngineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build a range whose ordering the caller already guarantees.
    pub(crate) fn spanning(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted range {start}..{end}");
        Self { start, end }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when the two ranges share at least one byte.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Smallest range covering both.
    pub fn cover(&self, other: &Range) -> Range {
        Range::spanning(self.start.min(other.start), self.end.max(other.end))
    }

    /// Slice `text` by this range, or `None` when it is out of bounds or
    /// splits a UTF-8 sequence.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }
}

impl PartialOrd for Range {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Range {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then(self.end.cmp(&other.end))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// One splice over the original buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextReplacement {
    pub range: Range,
    pub replacement: String,
}

impl TextReplacement {
    pub fn new(range: Range, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }
}
