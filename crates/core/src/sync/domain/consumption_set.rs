use std::collections::HashSet;
use std::ops::Range;

/// Transcribed-segment indices already claimed by an earlier reference line.
///
/// A segment may be consumed by at most one line per run. Only the aligner
/// mutates this set; the matcher reads it.
#[derive(Debug, Clone, Default)]
pub struct ConsumptionSet {
    consumed: HashSet<usize>,
}

impl ConsumptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.consumed.contains(&index)
    }

    /// True when no index in `range` has been consumed.
    pub fn is_range_free(&self, range: Range<usize>) -> bool {
        range.into_iter().all(|i| !self.contains(i))
    }

    /// Marks every index in `range` as consumed.
    pub fn consume(&mut self, range: Range<usize>) {
        for i in range {
            let newly_inserted = self.consumed.insert(i);
            debug_assert!(newly_inserted, "segment {i} consumed twice");
        }
    }

    pub fn len(&self) -> usize {
        self.consumed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty()
    }
}
