//! Definition index: one line-range record per top-level bound name.

use vera_ir::visitor::{walk_expr, Visitor};
use vera_ir::{CoreExpr, ExprArena, Name, Program, SrcSpan, StringInterner};

use crate::error::RecheckError;

/// A top-level definition with its enclosing source line range.
///
/// Both bounds are inclusive and the range is never empty. The derived
/// order compares `(start_line, end_line, name)`; the name tie-break is
/// interner order, which is total and stable within a run.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Definition {
    pub start_line: u32,
    pub end_line: u32,
    pub name: Name,
}

impl Definition {
    /// Whether `line` falls inside the definition's range (inclusive on
    /// both ends).
    #[inline]
    pub fn contains_line(&self, line: u32) -> bool {
        self.start_line <= line && line <= self.end_line
    }
}

/// Collects the hull of every located sub-expression span.
struct SpanCollector {
    hull: SrcSpan,
}

impl<'ast> Visitor<'ast> for SpanCollector {
    fn visit_expr(&mut self, expr: &'ast CoreExpr, arena: &'ast ExprArena) {
        if !expr.span.is_dummy() {
            self.hull = self.hull.hull(expr.span);
        }
        walk_expr(self, expr, arena);
    }
}

/// Index a program into sorted per-name definitions.
///
/// Each binding group's range is the hull of every located sub-expression
/// in its bodies. Body-derived spans can start spuriously early when
/// metadata is shared with unrelated earlier code, so each bind's start
/// line is clamped to be no earlier than its own declaration line; the end
/// line always comes from the body hull. All names of a mutually recursive
/// group share the group's range.
///
/// Fails with [`RecheckError::MissingSpan`] when a group has no located
/// sub-expression at all: fabricating an empty range would corrupt every
/// later stage, so the caller must fall back to full analysis instead.
pub fn index_program(
    program: &Program,
    interner: &StringInterner,
) -> Result<Vec<Definition>, RecheckError> {
    let mut defs = Vec::with_capacity(program.bind_count());

    for group in &program.groups {
        let mut collector = SpanCollector {
            hull: SrcSpan::DUMMY,
        };
        for bind in &group.binds {
            collector.visit_expr_id(bind.rhs, &program.arena);
        }
        if collector.hull.is_dummy() {
            let name = group
                .binds
                .first()
                .map(|bind| interner.lookup(bind.name).to_owned())
                .unwrap_or_default();
            return Err(RecheckError::MissingSpan { name });
        }

        let end_line = collector.hull.end_line;
        for bind in &group.binds {
            let mut start_line = collector.hull.start_line;
            if !bind.span.is_dummy() {
                start_line = start_line.max(bind.span.start_line);
            }
            // Keep the range well-formed even if a binder is declared after
            // the last located body line.
            start_line = start_line.min(end_line);
            defs.push(Definition {
                start_line,
                end_line,
                name: bind.name,
            });
        }
    }

    defs.sort_unstable();
    Ok(defs)
}
