//! Pipeline driver: compose diff, index, graph, closure, slice, and
//! reconcile into one recheck run against a snapshot store.

use rustc_hash::FxHashSet;
use vera_diagnostic::DiagnosticResult;
use vera_ir::{Name, Program, StringInterner};

use crate::closure::change_closure;
use crate::diff::diff_lines;
use crate::error::RecheckError;
use crate::graph::build_graph;
use crate::index::index_program;
use crate::reconcile::reconcile;
use crate::slice::slice_program;
use crate::snapshot::SnapshotStore;

/// The verification backend the recheck pipeline drives.
///
/// `trusted` carries the top-level names whose previous results are being
/// reused; the backend may assume their recorded signatures hold and must
/// not re-verify their bodies. On a full run the set is empty.
pub trait AnalysisEngine {
    fn analyze(&mut self, program: &Program, trusted: &FxHashSet<Name>) -> DiagnosticResult;
}

/// Why a run fell back to full analysis.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FullReason {
    /// No snapshot exists for the unit.
    FirstRun,
    /// The program has a definition group with no source locations, so
    /// line-based change tracking cannot be trusted.
    MissingSpans,
}

/// How a recheck run was executed.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum RecheckMode {
    /// Everything was analyzed from scratch.
    Full(FullReason),
    /// Only the change closure was re-verified.
    Incremental {
        /// Names that were re-verified, in interner order.
        reanalyzed: Vec<Name>,
        /// Count of new-text lines the diff marked as changed.
        changed_lines: usize,
        /// Count of prior diagnostics carried forward by reconciliation.
        carried: usize,
    },
}

/// Result of one recheck run.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct RecheckOutcome {
    pub result: DiagnosticResult,
    pub mode: RecheckMode,
}

/// Run one recheck of `unit` with the given current `text` and `program`.
///
/// Loads the unit's snapshot, determines the change closure, analyzes only
/// the sliced program, merges carried-forward diagnostics with the fresh
/// ones, and saves the new snapshot. Falls back to a full run when there is
/// no snapshot or when the program cannot be indexed by line range; in both
/// cases the saved snapshot reflects the full result, so the next run is
/// incremental again.
pub fn run_recheck(
    store: &impl SnapshotStore,
    engine: &mut impl AnalysisEngine,
    unit: &str,
    text: &str,
    program: &Program,
    interner: &StringInterner,
) -> Result<RecheckOutcome, RecheckError> {
    let Some(snapshot) = store.load(unit)? else {
        tracing::debug!("no snapshot for {unit}, running full analysis");
        return run_full(store, engine, unit, text, program, FullReason::FirstRun);
    };

    let defs = match index_program(program, interner) {
        Ok(defs) => defs,
        Err(RecheckError::MissingSpan { name }) => {
            tracing::warn!(
                "definition group containing `{name}` has no source locations, \
                 falling back to full analysis"
            );
            return run_full(store, engine, unit, text, program, FullReason::MissingSpans);
        }
        Err(err) => return Err(err),
    };

    let diff = diff_lines(&snapshot.text, text);
    let graph = build_graph(program);
    let keep = change_closure(&diff.changed, &defs, &graph);

    let reanalyzed_defs: Vec<_> = defs
        .iter()
        .copied()
        .filter(|def| keep.contains(&def.name))
        .collect();
    let sliced = slice_program(program, &keep);
    let trusted: FxHashSet<Name> = program
        .top_level_names()
        .filter(|name| !keep.contains(name))
        .collect();

    let carried = reconcile(&diff.shift, &reanalyzed_defs, snapshot.result);
    let carried_count = carried.diagnostics().len();
    let fresh = engine.analyze(&sliced, &trusted);
    let result = merge_results(carried, fresh);

    store.save(unit, text, &result)?;

    let mut reanalyzed: Vec<Name> = keep.into_iter().collect();
    reanalyzed.sort_unstable();
    tracing::debug!(
        "incremental recheck of {unit}: {} changed lines, {} re-verified, {} carried",
        diff.changed.len(),
        reanalyzed.len(),
        carried_count
    );
    Ok(RecheckOutcome {
        result,
        mode: RecheckMode::Incremental {
            reanalyzed,
            changed_lines: diff.changed.len(),
            carried: carried_count,
        },
    })
}

fn run_full(
    store: &impl SnapshotStore,
    engine: &mut impl AnalysisEngine,
    unit: &str,
    text: &str,
    program: &Program,
    reason: FullReason,
) -> Result<RecheckOutcome, RecheckError> {
    let result = engine.analyze(program, &FxHashSet::default());
    store.save(unit, text, &result)?;
    Ok(RecheckOutcome {
        result,
        mode: RecheckMode::Full(reason),
    })
}

/// Merge carried-forward diagnostics with the fresh slice result.
///
/// Carried diagnostics come first; they describe earlier source positions
/// by construction of the closure. A crash on either side makes the merged
/// result a crash, with the fresh context preferred, since reused results
/// cannot vouch for code the backend failed to process.
fn merge_results(carried: DiagnosticResult, fresh: DiagnosticResult) -> DiagnosticResult {
    let fresh_context = match &fresh {
        DiagnosticResult::Crash { context, .. } => Some(context.clone()),
        DiagnosticResult::Safe | DiagnosticResult::Unsafe(_) => None,
    };
    let carried_context = match &carried {
        DiagnosticResult::Crash { context, .. } => Some(context.clone()),
        DiagnosticResult::Safe | DiagnosticResult::Unsafe(_) => None,
    };

    let mut diagnostics = carried.into_diagnostics();
    diagnostics.extend(fresh.into_diagnostics());

    match fresh_context.or(carried_context) {
        Some(context) => DiagnosticResult::Crash {
            diagnostics,
            context,
        },
        None if diagnostics.is_empty() => DiagnosticResult::Safe,
        None => DiagnosticResult::Unsafe(diagnostics),
    }
}
