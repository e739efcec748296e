//! AST-level constant folding.
//!
//! A single post-order pass: fold every child first, then try to collapse
//! the node itself. Lambda/Apply/Ident/Array/Index/Async/Await/GpuKernel
//! are never constant and are walked only to fold whatever `Expr`
//! children they happen to hold (none of them do, today — they pass
//! through untouched), matching the reference optimizer's `default:
//! return node` fallthrough.

use lpc_ast::{BinOp, Block, Expr, ExprKind, UnOp};

pub fn fold(expr: Expr) -> Expr {
    let span = expr.span;
    match expr.kind {
        ExprKind::Binary(op, lhs, rhs) => {
            let lhs = fold(*lhs);
            let rhs = fold(*rhs);
            if lhs.is_literal() && rhs.is_literal() {
                if let Some(folded) = eval_binary(op, &lhs, &rhs, span) {
                    return folded;
                }
            }
            Expr::new(ExprKind::Binary(op, Box::new(lhs), Box::new(rhs)), span)
        }
        ExprKind::Unary(op, operand) => {
            let operand = fold(*operand);
            if operand.is_literal() {
                if let Some(folded) = eval_unary(op, &operand, span) {
                    return folded;
                }
            }
            Expr::new(ExprKind::Unary(op, Box::new(operand)), span)
        }
        ExprKind::Ternary(cond, then_branch, else_branch) => {
            let cond = fold(*cond);
            let then_branch = fold(*then_branch);
            let else_branch = fold(*else_branch);
            if cond.is_literal() {
                // Eager branch elimination: only the taken arm survives,
                // even if the other arm is not itself constant.
                return if is_truthy(&cond) { then_branch } else { else_branch };
            }
            Expr::new(
                ExprKind::Ternary(Box::new(cond), Box::new(then_branch), Box::new(else_branch)),
                span,
            )
        }
        ExprKind::Let(name, ty, value) => {
            Expr::new(ExprKind::Let(name, ty, Box::new(fold(*value))), span)
        }
        ExprKind::For(var, start, end, body, is_parallel) => Expr::new(
            ExprKind::For(
                var,
                Box::new(fold(*start)),
                Box::new(fold(*end)),
                Box::new(fold_block(*body)),
                is_parallel,
            ),
            span,
        ),
        ExprKind::Block(block) => Expr::new(ExprKind::Block(fold_block(block)), span),
        ExprKind::Program(stmts) => {
            Expr::new(ExprKind::Program(stmts.into_iter().map(fold).collect()), span)
        }
        ExprKind::Builtin(name, args) => {
            Expr::new(ExprKind::Builtin(name, args.into_iter().map(fold).collect()), span)
        }
        other => Expr::new(other, span),
    }
}

fn fold_block(block: Block) -> Block {
    Block {
        stmts: block.stmts.into_iter().map(fold).collect(),
        span: block.span,
    }
}

fn is_truthy(expr: &Expr) -> bool {
    match expr.kind {
        ExprKind::IntLit(v) => v != 0,
        ExprKind::FloatLit(v) => v != 0.0,
        _ => false,
    }
}

fn numeric_value(expr: &Expr) -> f64 {
    match expr.kind {
        ExprKind::FloatLit(v) => v,
        ExprKind::IntLit(v) => v as f64,
        _ => 0.0,
    }
}

fn int_value(expr: &Expr) -> i64 {
    match expr.kind {
        ExprKind::IntLit(v) => v,
        _ => 0,
    }
}

/// Folds a binary op over two already-constant operands. Returns `None`
/// when the op has no meaning for the operand kind (float `And`/`Or`) —
/// the caller then leaves the node unfolded, same as the reference
/// optimizer's `default: return NULL`.
fn eval_binary(op: BinOp, lhs: &Expr, rhs: &Expr, span: lpc_util::Span) -> Option<Expr> {
    let use_float = matches!(lhs.kind, ExprKind::FloatLit(_)) || matches!(rhs.kind, ExprKind::FloatLit(_));

    if use_float {
        let l = numeric_value(lhs);
        let r = numeric_value(rhs);
        let kind = match op {
            BinOp::Add => ExprKind::FloatLit(l + r),
            BinOp::Sub => ExprKind::FloatLit(l - r),
            BinOp::Mul => ExprKind::FloatLit(l * r),
            BinOp::Div => ExprKind::FloatLit(if r != 0.0 { l / r } else { 0.0 }),
            // `%` on f64 already returns NaN for a zero divisor, same as
            // C's fmod — no extra guard needed here.
            BinOp::Mod => ExprKind::FloatLit(l % r),
            BinOp::Eq => ExprKind::IntLit((l == r) as i64),
            BinOp::Ne => ExprKind::IntLit((l != r) as i64),
            BinOp::Lt => ExprKind::IntLit((l < r) as i64),
            BinOp::Gt => ExprKind::IntLit((l > r) as i64),
            BinOp::Le => ExprKind::IntLit((l <= r) as i64),
            BinOp::Ge => ExprKind::IntLit((l >= r) as i64),
            BinOp::And | BinOp::Or => return None,
        };
        Some(Expr::new(kind, span))
    } else {
        let l = int_value(lhs);
        let r = int_value(rhs);
        let kind = match op {
            BinOp::Add => ExprKind::IntLit(l.wrapping_add(r)),
            BinOp::Sub => ExprKind::IntLit(l.wrapping_sub(r)),
            BinOp::Mul => ExprKind::IntLit(l.wrapping_mul(r)),
            BinOp::Div => ExprKind::IntLit(if r != 0 { l.wrapping_div(r) } else { 0 }),
            BinOp::Mod => ExprKind::IntLit(if r != 0 { l.wrapping_rem(r) } else { 0 }),
            BinOp::Eq => ExprKind::IntLit((l == r) as i64),
            BinOp::Ne => ExprKind::IntLit((l != r) as i64),
            BinOp::Lt => ExprKind::IntLit((l < r) as i64),
            BinOp::Gt => ExprKind::IntLit((l > r) as i64),
            BinOp::Le => ExprKind::IntLit((l <= r) as i64),
            BinOp::Ge => ExprKind::IntLit((l >= r) as i64),
            BinOp::And => ExprKind::IntLit(((l != 0) && (r != 0)) as i64),
            BinOp::Or => ExprKind::IntLit(((l != 0) || (r != 0)) as i64),
        };
        Some(Expr::new(kind, span))
    }
}

fn eval_unary(op: UnOp, operand: &Expr, span: lpc_util::Span) -> Option<Expr> {
    let kind = match (op, &operand.kind) {
        (UnOp::Neg, ExprKind::FloatLit(v)) => ExprKind::FloatLit(-v),
        (UnOp::Neg, ExprKind::IntLit(v)) => ExprKind::IntLit(v.wrapping_neg()),
        (UnOp::Not, ExprKind::FloatLit(v)) => ExprKind::IntLit((*v == 0.0) as i64),
        (UnOp::Not, ExprKind::IntLit(v)) => ExprKind::IntLit((*v == 0) as i64),
        _ => return None,
    };
    Some(Expr::new(kind, span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpc_lex::Lexer;
    use lpc_par::Parser;
    use lpc_util::FileId;

    fn fold_src(src: &str) -> Expr {
        let tokens = Lexer::new(src, FileId::new(0)).tokenize();
        fold(Parser::new(&tokens).parse())
    }

    fn first_stmt(ast: &Expr) -> &Expr {
        match &ast.kind {
            ExprKind::Program(stmts) => &stmts[0],
            _ => panic!("expected a program"),
        }
    }

    #[test]
    fn folds_precedence_correctly() {
        let ast = fold_src("2 + 3 * 4;");
        assert!(matches!(first_stmt(&ast).kind, ExprKind::IntLit(14)));
    }

    #[test]
    fn division_by_zero_folds_to_zero() {
        let ast = fold_src("10 / 0;");
        assert!(matches!(first_stmt(&ast).kind, ExprKind::IntLit(0)));
    }

    #[test]
    fn modulo_by_zero_folds_to_zero() {
        let ast = fold_src("10 % 0;");
        assert!(matches!(first_stmt(&ast).kind, ExprKind::IntLit(0)));
    }

    #[test]
    fn ternary_with_constant_condition_keeps_only_the_taken_branch() {
        let ast = fold_src("1 ? 5 : 9;");
        assert!(matches!(first_stmt(&ast).kind, ExprKind::IntLit(5)));

        let ast = fold_src("0 ? 5 : 9;");
        assert!(matches!(first_stmt(&ast).kind, ExprKind::IntLit(9)));
    }

    #[test]
    fn ternary_survives_when_condition_is_not_constant() {
        let ast = fold_src("let x: i32 = 0; x ? 5 : 9;");
        match &first_stmt_at(&ast, 1).kind {
            ExprKind::Ternary(_, _, _) => {}
            other => panic!("expected an unfolded ternary, got {other:?}"),
        }
    }

    fn first_stmt_at(ast: &Expr, index: usize) -> &Expr {
        match &ast.kind {
            ExprKind::Program(stmts) => &stmts[index],
            _ => panic!("expected a program"),
        }
    }

    #[test]
    fn float_division_by_zero_folds_to_zero_not_inf() {
        let ast = fold_src("1.0 / 0.0;");
        assert!(matches!(first_stmt(&ast).kind, ExprKind::FloatLit(v) if v == 0.0));
    }

    #[test]
    fn unary_not_on_nonzero_int_folds_to_zero() {
        let ast = fold_src("!5;");
        assert!(matches!(first_stmt(&ast).kind, ExprKind::IntLit(0)));
    }

    #[test]
    fn folding_is_idempotent() {
        for src in [
            "2 + 3 * 4;",
            "let x: i32 = 1; x + 2;",
            "1 ? (2 + 2) : (3 + 3);",
            "for i in 1+1..5*2 { @print(i); };",
        ] {
            let tokens = Lexer::new(src, FileId::new(0)).tokenize();
            let once = fold(Parser::new(&tokens).parse());
            let twice = fold(once.clone());
            assert_eq!(format!("{once:?}"), format!("{twice:?}"));
        }
    }

    #[test]
    fn an_expression_with_no_free_identifiers_folds_to_a_single_literal() {
        let ast = fold_src("((2 + 3) * (10 - 4)) / 2 - 1;");
        assert!(matches!(first_stmt(&ast).kind, ExprKind::IntLit(_)));

        let ast = fold_src("(1.5 + 2.5) * 2.0;");
        assert!(matches!(first_stmt(&ast).kind, ExprKind::FloatLit(_)));
    }

    #[test]
    fn folding_descends_into_for_loop_bounds() {
        let ast = fold_src("for i in 1+1..5*2 { i; };");
        match &first_stmt(&ast).kind {
            ExprKind::For(_, start, end, _, _) => {
                assert!(matches!(start.kind, ExprKind::IntLit(2)));
                assert!(matches!(end.kind, ExprKind::IntLit(10)));
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }
}
