//! Diagnostic reconciliation: remap and filter a prior result against the
//! new text and the set of definitions being re-verified.

use vera_diagnostic::{Diagnostic, DiagnosticResult};

use crate::index::Definition;
use crate::shift::ShiftMap;

/// Carry a previous result forward across an edit.
///
/// `Safe` passes through unchanged. For `Unsafe`/`Crash`, each diagnostic
/// with a concrete span is translated through the shift interval containing
/// its start line; a start line inside a changed or deleted region has no
/// interval, and the diagnostic is dropped as stale. Spanless diagnostics
/// pass through, they are not position dependent. Finally, any diagnostic
/// whose (remapped) start line falls inside a re-verified definition's
/// range is dropped: fresh results for that code are forthcoming and must
/// not be shadowed by stale ones.
///
/// Survivors keep their original relative order. Merging with the fresh
/// result for the re-verified slice is the caller's job.
pub fn reconcile(
    shift: &ShiftMap,
    reanalyzed: &[Definition],
    previous: DiagnosticResult,
) -> DiagnosticResult {
    previous.map_diagnostics(|diagnostics| {
        let before = diagnostics.len();
        let kept: Vec<Diagnostic> = diagnostics
            .into_iter()
            .filter_map(|diag| remap(shift, diag))
            .filter(|diag| !in_reanalyzed_region(reanalyzed, diag))
            .collect();
        tracing::debug!(
            "reconciled prior diagnostics: kept {} of {}",
            kept.len(),
            before
        );
        kept
    })
}

/// Translate a diagnostic's span through the shift map.
///
/// Returns `None` when the span can no longer be placed in the new text.
fn remap(shift: &ShiftMap, mut diag: Diagnostic) -> Option<Diagnostic> {
    let Some(span) = diag.span.as_mut() else {
        return Some(diag);
    };
    let delta = shift.offset(span.start_line)?;
    span.start_line = shift_line(span.start_line, delta)?;
    span.end_line = shift_line(span.end_line, delta)?;
    Some(diag)
}

fn shift_line(line: u32, delta: i64) -> Option<u32> {
    let shifted = i64::from(line) + delta;
    u32::try_from(shifted).ok().filter(|&new_line| new_line >= 1)
}

fn in_reanalyzed_region(reanalyzed: &[Definition], diag: &Diagnostic) -> bool {
    match diag.start_line() {
        Some(line) => reanalyzed.iter().any(|def| def.contains_line(line)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vera_diagnostic::SourceSpan;
    use vera_ir::Name;

    use crate::shift::ShiftInterval;

    fn spanned(line: u32) -> Diagnostic {
        Diagnostic::error("refinement violated").with_span(SourceSpan::new(
            "Main.vr",
            line,
            1,
            line,
            10,
        ))
    }

    fn zero_shift(lines: u32) -> ShiftMap {
        let mut map = ShiftMap::new();
        map.insert(ShiftInterval {
            old_start: 1,
            old_end: lines,
            delta: 0,
        });
        map
    }

    #[test]
    fn safe_passes_through() {
        let result = reconcile(&ShiftMap::new(), &[], DiagnosticResult::Safe);
        assert_eq!(result, DiagnosticResult::Safe);
    }

    #[test]
    fn zero_offset_leaves_positions_unchanged() {
        let previous = DiagnosticResult::Unsafe(vec![spanned(3), spanned(7)]);
        let result = reconcile(&zero_shift(10), &[], previous.clone());
        assert_eq!(result, previous);
    }

    #[test]
    fn remap_translates_both_endpoints() {
        // Insertion after line 1: lines 2+ shift down by one.
        let mut shift = ShiftMap::new();
        shift.insert(ShiftInterval {
            old_start: 1,
            old_end: 1,
            delta: 0,
        });
        shift.insert(ShiftInterval {
            old_start: 2,
            old_end: 4,
            delta: 1,
        });

        let previous = DiagnosticResult::Unsafe(vec![spanned(2), spanned(3)]);
        let result = reconcile(&shift, &[], previous);
        let lines: Vec<u32> = result
            .diagnostics()
            .iter()
            .filter_map(Diagnostic::start_line)
            .collect();
        assert_eq!(lines, vec![3, 4]);
    }

    #[test]
    fn unmappable_diagnostics_are_dropped() {
        // Only lines 1-2 survive the edit; a diagnostic at old line 5 is
        // stale and cannot be placed.
        let mut shift = ShiftMap::new();
        shift.insert(ShiftInterval {
            old_start: 1,
            old_end: 2,
            delta: 0,
        });
        let previous = DiagnosticResult::Unsafe(vec![spanned(1), spanned(5)]);
        let result = reconcile(&shift, &[], previous);
        assert_eq!(result.diagnostics().len(), 1);
        assert_eq!(result.diagnostics()[0].start_line(), Some(1));
    }

    #[test]
    fn diagnostics_in_reanalyzed_ranges_are_dropped() {
        let reanalyzed = [Definition {
            start_line: 5,
            end_line: 8,
            name: Name::from_raw(1),
        }];
        let previous = DiagnosticResult::Unsafe(vec![spanned(6), spanned(9)]);
        let result = reconcile(&zero_shift(20), &reanalyzed, previous);
        let lines: Vec<u32> = result
            .diagnostics()
            .iter()
            .filter_map(Diagnostic::start_line)
            .collect();
        assert_eq!(lines, vec![9]);
    }

    #[test]
    fn spanless_diagnostics_always_survive() {
        let reanalyzed = [Definition {
            start_line: 1,
            end_line: 100,
            name: Name::from_raw(1),
        }];
        let previous = DiagnosticResult::Unsafe(vec![
            Diagnostic::warning("solver timeout"),
            spanned(50),
        ]);
        // Empty shift map: every spanned diagnostic is unmappable.
        let result = reconcile(&ShiftMap::new(), &reanalyzed, previous);
        assert_eq!(result.diagnostics().len(), 1);
        assert_eq!(result.diagnostics()[0].span, None);
    }

    #[test]
    fn crash_shape_and_context_are_preserved() {
        let previous = DiagnosticResult::Crash {
            diagnostics: vec![spanned(3)],
            context: "constraint generation".to_owned(),
        };
        let result = reconcile(&zero_shift(10), &[], previous);
        assert_eq!(
            result,
            DiagnosticResult::Crash {
                diagnostics: vec![spanned(3)],
                context: "constraint generation".to_owned(),
            }
        );
    }
}
