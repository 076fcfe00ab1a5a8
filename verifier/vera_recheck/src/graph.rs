//! Top-level reference graph.
//!
//! For every top-level name, the set of *other* top-level names its
//! defining expression references. Local binders (lambda parameters, let
//! binders, case binders) shadow top-level names and never appear in the
//! result.

use rustc_hash::{FxHashMap, FxHashSet};
use vera_ir::visitor::{walk_expr, Visitor};
use vera_ir::{CoreExpr, CoreExprKind, ExprArena, Name, Program};

/// Directed reference graph over top-level names.
///
/// Built fresh every run; read-only once built. Every top-level name has an
/// entry, possibly empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceGraph {
    edges: FxHashMap<Name, FxHashSet<Name>>,
}

impl ReferenceGraph {
    /// Names referenced by `name`, or `None` for a name outside the
    /// program's top level.
    pub fn references(&self, name: Name) -> Option<&FxHashSet<Name>> {
        self.edges.get(&name)
    }

    /// Number of top-level names in the graph.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Collects free top-level references with a scope stack for shadowing.
struct FreeVarCollector<'a> {
    top_level: &'a FxHashSet<Name>,
    scope: Vec<Name>,
    refs: FxHashSet<Name>,
}

impl FreeVarCollector<'_> {
    fn is_shadowed(&self, name: Name) -> bool {
        // Scopes are shallow in desugared core; a linear scan beats a
        // side map here.
        self.scope.contains(&name)
    }
}

impl<'ast> Visitor<'ast> for FreeVarCollector<'_> {
    fn visit_expr(&mut self, expr: &'ast CoreExpr, arena: &'ast ExprArena) {
        match expr.kind {
            CoreExprKind::Var(name) => {
                if self.top_level.contains(&name) && !self.is_shadowed(name) {
                    self.refs.insert(name);
                }
            }
            CoreExprKind::Lam { param, body } => {
                self.scope.push(param);
                self.visit_expr_id(body, arena);
                self.scope.pop();
            }
            CoreExprKind::Let { binds, body } => {
                // Let binders scope over every right-hand side as well as
                // the body (recursive lets).
                let depth = self.scope.len();
                let bind_list = arena.let_binds(binds);
                for bind in bind_list {
                    self.scope.push(bind.name);
                }
                for bind in bind_list {
                    self.visit_expr_id(bind.rhs, arena);
                }
                self.visit_expr_id(body, arena);
                self.scope.truncate(depth);
            }
            CoreExprKind::Case {
                scrutinee,
                binder,
                arms,
            } => {
                self.visit_expr_id(scrutinee, arena);
                let depth = self.scope.len();
                self.scope.push(binder);
                for arm in arena.arms(arms) {
                    let arm_depth = self.scope.len();
                    self.scope.extend_from_slice(arena.names(arm.binders));
                    self.visit_expr_id(arm.body, arena);
                    self.scope.truncate(arm_depth);
                }
                self.scope.truncate(depth);
            }
            CoreExprKind::App { .. } | CoreExprKind::Cast { .. } | CoreExprKind::Lit(_) => {
                walk_expr(self, expr, arena);
            }
        }
    }
}

/// Build the reference graph for a program.
pub fn build_graph(program: &Program) -> ReferenceGraph {
    let top_level: FxHashSet<Name> = program.top_level_names().collect();
    let mut edges =
        FxHashMap::with_capacity_and_hasher(top_level.len(), rustc_hash::FxBuildHasher);

    for group in &program.groups {
        for bind in &group.binds {
            let mut collector = FreeVarCollector {
                top_level: &top_level,
                scope: Vec::new(),
                refs: FxHashSet::default(),
            };
            collector.visit_expr_id(bind.rhs, &program.arena);
            let mut refs = collector.refs;
            refs.remove(&bind.name);
            edges.insert(bind.name, refs);
        }
    }

    ReferenceGraph { edges }
}
