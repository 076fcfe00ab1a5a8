//! Program slicing: reduce a unit to the binding groups that need
//! re-verification.

use rustc_hash::FxHashSet;
use vera_ir::{Name, Program};

/// Keep only the groups with at least one bound name in `keep`.
///
/// Mutually recursive groups travel whole: if any member is kept, all are.
/// Group order and internal structure are preserved and nothing is
/// synthesized. Names referenced from kept code but absent from the slice
/// are supplied by the analysis engine's known-good context, so the result
/// is a valid program on its own.
pub fn slice_program(program: &Program, keep: &FxHashSet<Name>) -> Program {
    let groups = program
        .groups
        .iter()
        .filter(|group| group.binds.iter().any(|bind| keep.contains(&bind.name)))
        .cloned()
        .collect();
    Program {
        groups,
        arena: program.arena.clone(),
    }
}
