//! Change closure: from changed lines to the set of definitions that must
//! be re-verified.
//!
//! Seeding finds the definitions whose line ranges contain a changed line;
//! closing follows the reference graph outward from the seeds, so a changed
//! definition pulls in everything it calls, transitively, giving the
//! re-analysis the full context it needs. The closure runs over *callees*:
//! callers of a changed definition are pulled in only when a changed line
//! touches them directly.

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;
use vera_ir::Name;

use crate::graph::ReferenceGraph;
use crate::index::Definition;

/// Definitions whose ranges contain at least one changed line.
///
/// A changed line equal to a definition's `end_line` seeds it; a line one
/// past does not. A changed line falling in no definition's range (e.g. a
/// whitespace-only edit between definitions) contributes nothing.
pub fn seed_definitions(changed: &BTreeSet<u32>, defs: &[Definition]) -> FxHashSet<Name> {
    let mut seeds = FxHashSet::default();
    for def in defs {
        if changed
            .range(def.start_line..=def.end_line)
            .next()
            .is_some()
        {
            seeds.insert(def.name);
        }
    }
    seeds
}

/// Close a seed set under the reference graph.
///
/// Worklist closure: each frontier name contributes its referenced names,
/// minus those already accumulated. Terminates because the name universe is
/// finite. Idempotent: closing a closed set adds nothing.
pub fn close_over_references(seeds: FxHashSet<Name>, graph: &ReferenceGraph) -> FxHashSet<Name> {
    let mut closed = seeds;
    let mut frontier: Vec<Name> = closed.iter().copied().collect();
    while let Some(name) = frontier.pop() {
        if let Some(refs) = graph.references(name) {
            for &callee in refs {
                if closed.insert(callee) {
                    frontier.push(callee);
                }
            }
        }
    }
    closed
}

/// Seed from changed lines, then close under the reference graph.
pub fn change_closure(
    changed: &BTreeSet<u32>,
    defs: &[Definition],
    graph: &ReferenceGraph,
) -> FxHashSet<Name> {
    close_over_references(seed_definitions(changed, defs), graph)
}
