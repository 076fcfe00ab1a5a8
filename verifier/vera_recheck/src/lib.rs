//! Incremental recheck engine for the Vera verifier.
//!
//! Given the last-checked copy of a unit's text, the diagnostics that full
//! analysis produced for it, and the unit's current text and program, this
//! crate determines the minimal set of top-level definitions that must be
//! re-verified and reconciles the previously recorded diagnostics against
//! the new text.
//!
//! # Architecture
//!
//! ```text
//! snapshot store ──→ old text ──┐
//! current text ─────────────────┴→ diff     → changed lines + shift map
//! current program ─┬→ index    → per-name line ranges
//!                  └→ graph    → top-level reference graph
//! changed lines + ranges + graph → closure  → names to re-verify
//! closure → slice               → reduced program for the engine
//! shift map + closure ranges + previous result → reconcile
//!                                → carried-forward diagnostics
//! ```
//!
//! The stages compose in [`engine::run_recheck`]; each is also usable on
//! its own for callers that drive the pipeline manually.

pub mod closure;
pub mod diff;
pub mod engine;
mod error;
pub mod graph;
pub mod index;
pub mod reconcile;
pub mod shift;
pub mod slice;
pub mod snapshot;

pub use closure::{change_closure, close_over_references, seed_definitions};
pub use diff::{diff_lines, LineDiff};
pub use engine::{run_recheck, AnalysisEngine, FullReason, RecheckMode, RecheckOutcome};
pub use error::RecheckError;
pub use graph::{build_graph, ReferenceGraph};
pub use index::{index_program, Definition};
pub use reconcile::reconcile;
pub use shift::{ShiftInterval, ShiftMap};
pub use slice::slice_program;
pub use snapshot::{FsSnapshotStore, MemorySnapshotStore, Snapshot, SnapshotStore};
