//! Property-based tests for the recheck pipeline.
//!
//! These use proptest to generate random edits, graphs, and results and
//! verify the structural invariants the unit tests spot-check:
//! 1. Diff alignment: every remapped line points at an identical line.
//! 2. Closure: idempotent, contains its seeds, stays inside the graph.
//! 3. Snapshot round-trip: save then load returns what was saved.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::disallowed_types,
    clippy::uninlined_format_args,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use std::collections::BTreeSet;

use proptest::prelude::*;
use rustc_hash::FxHashSet;
use vera_diagnostic::{Diagnostic, DiagnosticResult, Severity, SourceSpan};
use vera_ir::{BindGroup, ExprArena, Literal, Name, Program, SrcSpan, TopBind};
use vera_recheck::{
    change_closure, close_over_references, diff_lines, seed_definitions, Definition,
    MemorySnapshotStore, SnapshotStore,
};

// -- Strategies --

/// A short text over a tiny line alphabet, so diffs hit real collisions.
fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d"]), 0..20)
        .prop_map(|lines| {
            lines
                .into_iter()
                .map(|line| format!("{line}\n"))
                .collect::<String>()
        })
}

/// Edge list over a small name universe, self-edges excluded.
fn graph_program_strategy() -> impl Strategy<Value = (Program, Vec<Name>)> {
    let universe = 6u32;
    prop::collection::vec((0..universe, 0..universe), 0..12).prop_map(move |edges| {
        let names: Vec<Name> = (1..=universe).map(Name::from_raw).collect();
        let mut arena = ExprArena::new();
        let mut bodies = Vec::new();
        for (index, _) in names.iter().enumerate() {
            let callees: Vec<Name> = edges
                .iter()
                .filter(|&&(from, to)| from as usize == index && to as usize != index)
                .map(|&(_, to)| names[to as usize])
                .collect();
            // Body is a left-nested application of all callees.
            let mut body = arena.lit(Literal::Unit, SrcSpan::DUMMY);
            for callee in callees {
                let var = arena.var(callee, SrcSpan::DUMMY);
                body = arena.app(body, var, SrcSpan::DUMMY);
            }
            bodies.push(body);
        }
        let mut program = Program::new(arena);
        for (&name, &rhs) in names.iter().zip(&bodies) {
            program.groups.push(BindGroup {
                recursive: false,
                binds: vec![TopBind {
                    name,
                    span: SrcSpan::DUMMY,
                    rhs,
                }],
            });
        }
        (program, names)
    })
}

fn result_strategy() -> impl Strategy<Value = DiagnosticResult> {
    let severity = prop::sample::select(vec![Severity::Error, Severity::Warning, Severity::Note]);
    let span = prop::option::of((1..100u32, 1..80u32).prop_map(|(line, col)| {
        SourceSpan::new("Main.vr", line, col, line, col + 1)
    }));
    let diagnostic = (severity, "[a-z ]{0,30}", span).prop_map(|(severity, message, span)| {
        Diagnostic {
            severity,
            message,
            span,
        }
    });
    let diagnostics = prop::collection::vec(diagnostic, 0..8);
    prop_oneof![
        Just(DiagnosticResult::Safe),
        diagnostics.clone().prop_map(DiagnosticResult::Unsafe),
        (diagnostics, "[a-z ]{0,20}").prop_map(|(diagnostics, context)| {
            DiagnosticResult::Crash {
                diagnostics,
                context,
            }
        }),
    ]
}

// -- Properties --

proptest! {
    /// Every old line with an offset maps to an identical new line, and
    /// every changed line is a real new-text line number.
    #[test]
    fn diff_remaps_onto_identical_lines(old in text_strategy(), new in text_strategy()) {
        let diff = diff_lines(&old, &new);
        let old_lines: Vec<&str> = old.lines().collect();
        let new_lines: Vec<&str> = new.lines().collect();

        for old_line in 1..=u32::try_from(old_lines.len()).unwrap() {
            if let Some(new_line) = diff.shift.remap(old_line) {
                let old_text = old_lines[old_line as usize - 1];
                let new_text = new_lines[new_line as usize - 1];
                prop_assert_eq!(old_text, new_text);
            }
        }
        for &line in &diff.changed {
            prop_assert!(line >= 1);
            prop_assert!(line as usize <= new_lines.len());
        }
    }

    /// Remapping preserves relative order of surviving lines.
    #[test]
    fn diff_remap_is_strictly_monotonic(old in text_strategy(), new in text_strategy()) {
        let diff = diff_lines(&old, &new);
        let old_len = u32::try_from(old.lines().count()).unwrap();
        let mapped: Vec<u32> = (1..=old_len)
            .filter_map(|line| diff.shift.remap(line))
            .collect();
        for pair in mapped.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    /// Diffing a text against itself marks nothing changed.
    #[test]
    fn diff_of_identical_texts_is_empty(text in text_strategy()) {
        let diff = diff_lines(&text, &text);
        prop_assert!(diff.changed.is_empty());
        for line in 1..=u32::try_from(text.lines().count()).unwrap() {
            prop_assert_eq!(diff.shift.remap(line), Some(line));
        }
    }

    /// The closure contains its seeds, stays inside the name universe, and
    /// closing twice adds nothing.
    #[test]
    fn closure_is_inflationary_and_idempotent(
        (program, names) in graph_program_strategy(),
        raw_seeds in prop::collection::vec(0..6usize, 0..6),
    ) {
        let graph = vera_recheck::build_graph(&program);
        let seeds: FxHashSet<Name> = raw_seeds.iter().map(|&i| names[i]).collect();

        let closed = close_over_references(seeds.clone(), &graph);
        prop_assert!(seeds.iter().all(|name| closed.contains(name)));
        prop_assert!(closed.iter().all(|name| names.contains(name)));

        let twice = close_over_references(closed.clone(), &graph);
        prop_assert_eq!(closed, twice);
    }

    /// A larger seed set never closes to a smaller closure.
    #[test]
    fn closure_is_monotone_in_its_seeds(
        (program, names) in graph_program_strategy(),
        raw_seeds in prop::collection::vec(0..6usize, 0..6),
        extra in 0..6usize,
    ) {
        let graph = vera_recheck::build_graph(&program);
        let seeds: FxHashSet<Name> = raw_seeds.iter().map(|&i| names[i]).collect();
        let mut larger = seeds.clone();
        larger.insert(names[extra]);

        let small = close_over_references(seeds, &graph);
        let big = close_over_references(larger, &graph);
        prop_assert!(small.iter().all(|name| big.contains(name)));
    }

    /// Seeding agrees with a naive scan over all (line, definition) pairs.
    #[test]
    fn seeding_matches_naive_containment(
        changed in prop::collection::btree_set(1..40u32, 0..10),
        ranges in prop::collection::vec((1..30u32, 0..10u32), 0..8),
    ) {
        let defs: Vec<Definition> = ranges
            .iter()
            .enumerate()
            .map(|(i, &(start, extent))| Definition {
                start_line: start,
                end_line: start + extent,
                name: Name::from_raw(u32::try_from(i).unwrap() + 1),
            })
            .collect();

        let seeded = seed_definitions(&changed, &defs);
        let naive: FxHashSet<Name> = defs
            .iter()
            .filter(|def| changed.iter().any(|&line| def.contains_line(line)))
            .map(|def| def.name)
            .collect();
        prop_assert_eq!(seeded, naive);
    }

    /// An empty changed set closes to nothing regardless of the graph.
    #[test]
    fn no_changes_close_to_nothing((program, names) in graph_program_strategy()) {
        let graph = vera_recheck::build_graph(&program);
        let defs: Vec<Definition> = names
            .iter()
            .enumerate()
            .map(|(i, &name)| Definition {
                start_line: u32::try_from(i).unwrap() * 3 + 1,
                end_line: u32::try_from(i).unwrap() * 3 + 3,
                name,
            })
            .collect();
        let closed = change_closure(&BTreeSet::new(), &defs, &graph);
        prop_assert!(closed.is_empty());
    }

    /// The snapshot store returns exactly what was saved, for any result
    /// shape, exercising the persisted encoding both ways.
    #[test]
    fn snapshot_store_round_trips(text in text_strategy(), result in result_strategy()) {
        let store = MemorySnapshotStore::new();
        store.save("unit", &text, &result).unwrap();
        let snapshot = store.load("unit").unwrap().expect("just saved");
        prop_assert_eq!(snapshot.text, text);
        prop_assert_eq!(snapshot.result, result);
    }
}
