//! Vera IR - core program representation for the verifier.
//!
//! This crate contains the data structures the recheck engine and the
//! verification backend share:
//! - Spans for source locations (line/column based)
//! - Names for interned identifiers
//! - The core expression tree (flat, arena-allocated)
//! - A visitor for structural traversal
//!
//! # Design Philosophy
//!
//! - **Intern identifiers**: strings → `Name(u32)` for O(1) equality
//! - **Flatten expressions**: no `Box<CoreExpr>`, use `ExprId(u32)` indices
//! - **Closed grammar**: the expression forms are a closed set of tagged
//!   cases; new forms are new variants, never open-ended payloads

mod core;
mod interner;
mod name;
mod span;
pub mod visitor;

pub use crate::core::{
    ArmRange, BindGroup, BindRange, CaseArm, CoreExpr, CoreExprKind, ExprArena, ExprId, LetBind,
    Literal, NameRange, Program, TopBind,
};
pub use interner::StringInterner;
pub use name::Name;
pub use span::SrcSpan;
