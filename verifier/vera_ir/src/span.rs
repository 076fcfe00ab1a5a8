//! Source location spans.
//!
//! The host compiler reports locations as line/column pairs, so spans here
//! are line/column based rather than byte based. Lines and columns are
//! 1-based; both endpoints are inclusive.

use std::fmt;

/// Source location span in line/column coordinates.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct SrcSpan {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl SrcSpan {
    /// Dummy span for generated code with no source location.
    pub const DUMMY: SrcSpan = SrcSpan {
        start_line: 0,
        start_col: 0,
        end_line: 0,
        end_col: 0,
    };

    /// Create a new span.
    #[inline]
    pub const fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        SrcSpan {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Span covering whole lines, columns pinned to 1.
    #[inline]
    pub const fn lines(start_line: u32, end_line: u32) -> Self {
        SrcSpan::new(start_line, 1, end_line, 1)
    }

    /// Whether this is the dummy span.
    ///
    /// Lines are 1-based, so a zero start line only occurs on `DUMMY`.
    #[inline]
    pub const fn is_dummy(self) -> bool {
        self.start_line == 0
    }

    /// Smallest span covering both `self` and `other`.
    ///
    /// Hulling with a dummy span returns the other span, so dummies never
    /// drag a hull toward line zero.
    pub fn hull(self, other: SrcSpan) -> SrcSpan {
        if self.is_dummy() {
            return other;
        }
        if other.is_dummy() {
            return self;
        }
        let (start_line, start_col) = if (self.start_line, self.start_col)
            <= (other.start_line, other.start_col)
        {
            (self.start_line, self.start_col)
        } else {
            (other.start_line, other.start_col)
        };
        let (end_line, end_col) = if (self.end_line, self.end_col) >= (other.end_line, other.end_col)
        {
            (self.end_line, self.end_col)
        } else {
            (other.end_line, other.end_col)
        };
        SrcSpan {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }
}

impl fmt::Debug for SrcSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dummy() {
            write!(f, "<dummy>")
        } else {
            write!(
                f,
                "{}:{}-{}:{}",
                self.start_line, self.start_col, self.end_line, self.end_col
            )
        }
    }
}
