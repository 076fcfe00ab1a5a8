//! Core-expression visitor.
//!
//! Provides generic traversal of the core expression tree. Based on the
//! arena-allocated structure where expressions are referenced by `ExprId`
//! indices.
//!
//! Default implementations call `walk_*` functions that traverse children.
//! Override `visit_*` methods to add custom behavior at specific nodes.
//! The visitor can mutate its own state during traversal; the program
//! itself remains immutable.
//!
//! # Example
//!
//! ```text
//! struct CountVars {
//!     count: usize,
//! }
//!
//! impl<'ast> Visitor<'ast> for CountVars {
//!     fn visit_expr(&mut self, expr: &'ast CoreExpr, arena: &'ast ExprArena) {
//!         if matches!(expr.kind, CoreExprKind::Var(_)) {
//!             self.count += 1;
//!         }
//!         walk_expr(self, expr, arena);
//!     }
//! }
//! ```

use crate::{BindGroup, CoreExpr, CoreExprKind, ExprArena, ExprId, Program, TopBind};

/// Core expression visitor trait.
///
/// Override `visit_*` methods to add custom behavior at specific nodes.
/// Call `walk_*` functions to continue traversal into children.
pub trait Visitor<'ast> {
    /// Visit a whole program.
    fn visit_program(&mut self, program: &'ast Program) {
        walk_program(self, program);
    }

    /// Visit a top-level binding group.
    fn visit_group(&mut self, group: &'ast BindGroup, arena: &'ast ExprArena) {
        walk_group(self, group, arena);
    }

    /// Visit a single top-level bind.
    fn visit_bind(&mut self, bind: &'ast TopBind, arena: &'ast ExprArena) {
        self.visit_expr_id(bind.rhs, arena);
    }

    /// Visit an expression by ID.
    fn visit_expr_id(&mut self, id: ExprId, arena: &'ast ExprArena) {
        self.visit_expr(arena.get_expr(id), arena);
    }

    /// Visit an expression node.
    fn visit_expr(&mut self, expr: &'ast CoreExpr, arena: &'ast ExprArena) {
        walk_expr(self, expr, arena);
    }
}

/// Walk all binding groups of a program.
pub fn walk_program<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, program: &'ast Program) {
    for group in &program.groups {
        visitor.visit_group(group, &program.arena);
    }
}

/// Walk all binds of a group.
pub fn walk_group<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    group: &'ast BindGroup,
    arena: &'ast ExprArena,
) {
    for bind in &group.binds {
        visitor.visit_bind(bind, arena);
    }
}

/// Walk the children of an expression.
pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    expr: &'ast CoreExpr,
    arena: &'ast ExprArena,
) {
    match expr.kind {
        CoreExprKind::Var(_) | CoreExprKind::Lit(_) => {}
        CoreExprKind::App { func, arg } => {
            visitor.visit_expr_id(func, arena);
            visitor.visit_expr_id(arg, arena);
        }
        CoreExprKind::Lam { body, .. } => {
            visitor.visit_expr_id(body, arena);
        }
        CoreExprKind::Let { binds, body } => {
            for bind in arena.let_binds(binds) {
                visitor.visit_expr_id(bind.rhs, arena);
            }
            visitor.visit_expr_id(body, arena);
        }
        CoreExprKind::Cast { expr } => {
            visitor.visit_expr_id(expr, arena);
        }
        CoreExprKind::Case {
            scrutinee, arms, ..
        } => {
            visitor.visit_expr_id(scrutinee, arena);
            for arm in arena.arms(arms) {
                visitor.visit_expr_id(arm.body, arena);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CaseArm, LetBind, Literal, Name, NameRange, SrcSpan};
    use pretty_assertions::assert_eq;

    struct CountVars {
        count: usize,
    }

    impl<'ast> Visitor<'ast> for CountVars {
        fn visit_expr(&mut self, expr: &'ast CoreExpr, arena: &'ast ExprArena) {
            if matches!(expr.kind, CoreExprKind::Var(_)) {
                self.count += 1;
            }
            walk_expr(self, expr, arena);
        }
    }

    #[test]
    fn walks_through_every_form() {
        let mut arena = ExprArena::new();
        let x = Name::from_raw(1);
        let y = Name::from_raw(2);

        // case (cast ((\x -> x) y)) of b { _ -> let z = y in y }
        let vx = arena.var(x, SrcSpan::DUMMY);
        let lam = arena.lam(x, vx, SrcSpan::DUMMY);
        let vy = arena.var(y, SrcSpan::DUMMY);
        let app = arena.app(lam, vy, SrcSpan::DUMMY);
        let cast = arena.cast(app, SrcSpan::DUMMY);

        let vy2 = arena.var(y, SrcSpan::DUMMY);
        let vy3 = arena.var(y, SrcSpan::DUMMY);
        let let_body = arena.let_in(
            [LetBind {
                name: Name::from_raw(3),
                rhs: vy2,
            }],
            vy3,
            SrcSpan::DUMMY,
        );
        let case = arena.case(
            cast,
            Name::from_raw(4),
            [CaseArm {
                binders: NameRange::EMPTY,
                body: let_body,
            }],
            SrcSpan::DUMMY,
        );

        let mut counter = CountVars { count: 0 };
        counter.visit_expr_id(case, &arena);
        assert_eq!(counter.count, 4);
    }

    #[test]
    fn walks_program_groups_and_binds() {
        let mut arena = ExprArena::new();
        let v = arena.var(Name::from_raw(9), SrcSpan::DUMMY);
        let unit = arena.lit(Literal::Unit, SrcSpan::DUMMY);
        let mut program = Program::new(arena);
        program.groups.push(BindGroup {
            recursive: false,
            binds: vec![
                TopBind {
                    name: Name::from_raw(1),
                    span: SrcSpan::DUMMY,
                    rhs: v,
                },
                TopBind {
                    name: Name::from_raw(2),
                    span: SrcSpan::DUMMY,
                    rhs: unit,
                },
            ],
        });

        let mut counter = CountVars { count: 0 };
        counter.visit_program(&program);
        assert_eq!(counter.count, 1);
    }
}
