//! Flat core-expression types using arena allocation.
//!
//! The host compiler hands the verifier a desugared core program: a list of
//! top-level binding groups whose bodies are trees over a closed set of
//! expression forms (references, applications, lambdas, lets, casts, case
//! expressions, literals). Child expressions are referenced by `ExprId(u32)`
//! indices into an [`ExprArena`] rather than boxed, keeping nodes compact
//! and traversal cache friendly.

use std::fmt;

use crate::{Name, SrcSpan};

/// Index into the expression arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    /// Invalid expression ID (sentinel value).
    pub const INVALID: ExprId = ExprId(u32::MAX);

    /// Create a new `ExprId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    /// Get the index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is a valid ID.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "ExprId({})", self.0)
        } else {
            write!(f, "ExprId(INVALID)")
        }
    }
}

macro_rules! arena_range {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
        pub struct $name {
            pub start: u32,
            pub len: u32,
        }

        impl $name {
            /// Empty range.
            pub const EMPTY: $name = $name { start: 0, len: 0 };

            /// Returns `true` if the range is empty.
            #[inline]
            pub const fn is_empty(self) -> bool {
                self.len == 0
            }

            #[inline]
            fn as_usize(self) -> std::ops::Range<usize> {
                self.start as usize..(self.start + self.len) as usize
            }
        }
    };
}

arena_range! {
    /// Range of let-bindings in the arena.
    BindRange
}
arena_range! {
    /// Range of case arms in the arena.
    ArmRange
}
arena_range! {
    /// Range of binder names in the arena.
    NameRange
}

/// Literal value forms.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Literal {
    Int(i64),
    Bool(bool),
    Str(Name),
    Unit,
}

/// A single binding inside a `let`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct LetBind {
    pub name: Name,
    pub rhs: ExprId,
}

/// One alternative of a case expression.
///
/// Pattern structure beyond the bound names is irrelevant to the recheck
/// engine, so an arm carries only its binders and its body.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CaseArm {
    pub binders: NameRange,
    pub body: ExprId,
}

/// Core expression node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CoreExpr {
    pub kind: CoreExprKind,
    pub span: SrcSpan,
}

impl CoreExpr {
    pub const fn new(kind: CoreExprKind, span: SrcSpan) -> Self {
        CoreExpr { kind, span }
    }
}

/// Core expression variants.
///
/// This is a closed set: new forms are added as new tagged cases.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CoreExprKind {
    /// Variable reference.
    Var(Name),
    /// Function application.
    App { func: ExprId, arg: ExprId },
    /// Lambda abstraction.
    Lam { param: Name, body: ExprId },
    /// Let-binding (one or more binds, possibly mutually recursive).
    Let { binds: BindRange, body: ExprId },
    /// Type/coercion cast; the coercion itself is opaque here.
    Cast { expr: ExprId },
    /// Case expression with a scrutinee binder and alternatives.
    Case {
        scrutinee: ExprId,
        binder: Name,
        arms: ArmRange,
    },
    /// Literal.
    Lit(Literal),
}

/// Contiguous storage for all expressions in a program.
///
/// All expressions live in one flat vector indexed by [`ExprId`];
/// let-bindings, case arms, and binder lists live in side tables indexed
/// by the range types.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExprArena {
    exprs: Vec<CoreExpr>,
    let_binds: Vec<LetBind>,
    arms: Vec<CaseArm>,
    names: Vec<Name>,
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "arena sizes are bounded by the u32 id space"
)]
impl ExprArena {
    /// Create a new empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression, returning its ID.
    #[inline]
    pub fn alloc_expr(&mut self, expr: CoreExpr) -> ExprId {
        let id = ExprId::new(self.exprs.len() as u32);
        self.exprs.push(expr);
        id
    }

    /// Get an expression by ID.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn get_expr(&self, id: ExprId) -> &CoreExpr {
        &self.exprs[id.index()]
    }

    /// Number of allocated expressions.
    #[inline]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    /// Allocate a contiguous run of let-bindings.
    pub fn alloc_let_binds(&mut self, binds: impl IntoIterator<Item = LetBind>) -> BindRange {
        let start = self.let_binds.len() as u32;
        self.let_binds.extend(binds);
        BindRange {
            start,
            len: self.let_binds.len() as u32 - start,
        }
    }

    /// Get the let-bindings for a range.
    ///
    /// # Panics
    /// Panics if `range` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn let_binds(&self, range: BindRange) -> &[LetBind] {
        &self.let_binds[range.as_usize()]
    }

    /// Allocate a contiguous run of case arms.
    pub fn alloc_arms(&mut self, arms: impl IntoIterator<Item = CaseArm>) -> ArmRange {
        let start = self.arms.len() as u32;
        self.arms.extend(arms);
        ArmRange {
            start,
            len: self.arms.len() as u32 - start,
        }
    }

    /// Get the case arms for a range.
    ///
    /// # Panics
    /// Panics if `range` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn arms(&self, range: ArmRange) -> &[CaseArm] {
        &self.arms[range.as_usize()]
    }

    /// Allocate a contiguous run of binder names.
    pub fn alloc_names(&mut self, names: impl IntoIterator<Item = Name>) -> NameRange {
        let start = self.names.len() as u32;
        self.names.extend(names);
        NameRange {
            start,
            len: self.names.len() as u32 - start,
        }
    }

    /// Get the binder names for a range.
    ///
    /// # Panics
    /// Panics if `range` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn names(&self, range: NameRange) -> &[Name] {
        &self.names[range.as_usize()]
    }

    // Convenience constructors, used by frontends and tests.

    /// Allocate a variable reference.
    pub fn var(&mut self, name: Name, span: SrcSpan) -> ExprId {
        self.alloc_expr(CoreExpr::new(CoreExprKind::Var(name), span))
    }

    /// Allocate an application.
    pub fn app(&mut self, func: ExprId, arg: ExprId, span: SrcSpan) -> ExprId {
        self.alloc_expr(CoreExpr::new(CoreExprKind::App { func, arg }, span))
    }

    /// Allocate a lambda.
    pub fn lam(&mut self, param: Name, body: ExprId, span: SrcSpan) -> ExprId {
        self.alloc_expr(CoreExpr::new(CoreExprKind::Lam { param, body }, span))
    }

    /// Allocate a let expression.
    pub fn let_in(
        &mut self,
        binds: impl IntoIterator<Item = LetBind>,
        body: ExprId,
        span: SrcSpan,
    ) -> ExprId {
        let binds = self.alloc_let_binds(binds);
        self.alloc_expr(CoreExpr::new(CoreExprKind::Let { binds, body }, span))
    }

    /// Allocate a cast.
    pub fn cast(&mut self, expr: ExprId, span: SrcSpan) -> ExprId {
        self.alloc_expr(CoreExpr::new(CoreExprKind::Cast { expr }, span))
    }

    /// Allocate a case expression.
    pub fn case(
        &mut self,
        scrutinee: ExprId,
        binder: Name,
        arms: impl IntoIterator<Item = CaseArm>,
        span: SrcSpan,
    ) -> ExprId {
        let arms = self.alloc_arms(arms);
        self.alloc_expr(CoreExpr::new(
            CoreExprKind::Case {
                scrutinee,
                binder,
                arms,
            },
            span,
        ))
    }

    /// Allocate a literal.
    pub fn lit(&mut self, lit: Literal, span: SrcSpan) -> ExprId {
        self.alloc_expr(CoreExpr::new(CoreExprKind::Lit(lit), span))
    }
}

/// A top-level binding: a name, its declaration-site span (possibly dummy),
/// and its defining expression.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TopBind {
    pub name: Name,
    pub span: SrcSpan,
    pub rhs: ExprId,
}

/// A top-level binding group.
///
/// Mutually recursive definitions arrive as one group with several binds;
/// non-recursive definitions are singleton groups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindGroup {
    pub recursive: bool,
    pub binds: Vec<TopBind>,
}

/// A whole source unit: top-level binding groups plus the expression arena
/// their bodies live in.
///
/// Top-level names are distinct across the program; binds in one recursive
/// group are distinct names sharing one group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    pub groups: Vec<BindGroup>,
    pub arena: ExprArena,
}

impl Program {
    /// Create a program over an existing arena.
    pub fn new(arena: ExprArena) -> Self {
        Program {
            groups: Vec::new(),
            arena,
        }
    }

    /// Iterate over all top-level bound names, in group order.
    pub fn top_level_names(&self) -> impl Iterator<Item = Name> + '_ {
        self.groups
            .iter()
            .flat_map(|group| group.binds.iter().map(|bind| bind.name))
    }

    /// Total number of top-level binds.
    pub fn bind_count(&self) -> usize {
        self.groups.iter().map(|group| group.binds.len()).sum()
    }
}
