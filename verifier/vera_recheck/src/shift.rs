//! Line shift map: interval-keyed translation from old-text line numbers
//! to new-text line numbers for unchanged regions.
//!
//! Intervals are disjoint, cover only unchanged regions, and are kept in
//! sorted order. The differ constructs them in source order, so the common
//! insertion is an O(1) append; point lookup is a binary search. The map
//! is read-only after construction.

/// A contiguous run of *old* line numbers that survived the edit, with the
/// signed offset to its position in the new text.
///
/// Bounds are inclusive: every `line` with `old_start <= line <= old_end`
/// maps to `line + delta` in the new text.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ShiftInterval {
    pub old_start: u32,
    pub old_end: u32,
    pub delta: i64,
}

impl ShiftInterval {
    /// Whether `line` falls inside this interval.
    #[inline]
    pub fn contains(self, line: u32) -> bool {
        self.old_start <= line && line <= self.old_end
    }
}

/// Sorted disjoint interval list over old-text line numbers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShiftMap {
    intervals: Vec<ShiftInterval>,
}

impl ShiftMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an interval, keeping the list sorted.
    ///
    /// Intervals must be disjoint from those already present. In-order
    /// construction (the differ's access pattern) appends without a search.
    pub fn insert(&mut self, interval: ShiftInterval) {
        debug_assert!(interval.old_start <= interval.old_end);
        match self.intervals.last() {
            None => self.intervals.push(interval),
            Some(last) if last.old_end < interval.old_start => self.intervals.push(interval),
            _ => {
                let pos = self
                    .intervals
                    .partition_point(|iv| iv.old_start < interval.old_start);
                debug_assert!(
                    self.intervals
                        .get(pos)
                        .is_none_or(|next| interval.old_end < next.old_start),
                    "overlapping shift intervals"
                );
                self.intervals.insert(pos, interval);
            }
        }
    }

    /// Signed offset for an old line, or `None` if the line fell inside a
    /// changed or deleted region.
    pub fn offset(&self, line: u32) -> Option<i64> {
        let pos = self.intervals.partition_point(|iv| iv.old_end < line);
        self.intervals
            .get(pos)
            .filter(|iv| iv.contains(line))
            .map(|iv| iv.delta)
    }

    /// Translate an old line to its new-text position.
    ///
    /// `None` when the line is covered by no interval, or when applying the
    /// offset would leave the 1-based line range.
    pub fn remap(&self, line: u32) -> Option<u32> {
        let delta = self.offset(line)?;
        let shifted = i64::from(line) + delta;
        u32::try_from(shifted).ok().filter(|&new_line| new_line >= 1)
    }

    /// The intervals, in ascending order.
    pub fn intervals(&self) -> &[ShiftInterval] {
        &self.intervals
    }

    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns `true` if the map holds no intervals.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}
