//! The Lambda Photon abstract syntax tree.
//!
//! Every node owns its children exclusively (`Box`); dropping a subtree
//! drops everything beneath it. The optimizer and code generator both
//! walk this same tree — neither needs any lower-level IR.

use lpc_util::{Span, Symbol};

pub mod ty;
pub use ty::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

/// A block of statements, used by `For` loop bodies and `{ ... }` blocks.
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    IntLit(i64),
    FloatLit(f64),
    StrLit(Symbol),
    Ident(Symbol),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Unary(UnOp, Box<Expr>),
    /// `\x y -> body`
    Lambda(Vec<Symbol>, Box<Expr>),
    Apply(Box<Expr>, Vec<Expr>),
    /// cond, then, else
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),
    Array(Vec<Expr>),
    Index(Box<Expr>, Box<Expr>),
    /// `@name(args...)`
    Builtin(Symbol, Vec<Expr>),
    /// name, optional type annotation, initializer
    Let(Symbol, Option<Type>, Box<Expr>),
    /// var, start, end, body, is_parallel
    For(Symbol, Box<Expr>, Box<Expr>, Box<Block>, bool),
    Block(Block),
    Async(Box<Expr>),
    Await(Box<Expr>),
    /// name, params, body
    GpuKernel(Symbol, Vec<Symbol>, Box<Block>),
    Program(Vec<Expr>),
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, ExprKind::IntLit(_) | ExprKind::FloatLit(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpc_util::FileId;

    fn dummy_span() -> Span {
        Span::point(0, 1, 1, FileId::new(0))
    }

    #[test]
    fn is_literal_recognizes_int_and_float() {
        let i = Expr::new(ExprKind::IntLit(1), dummy_span());
        let f = Expr::new(ExprKind::FloatLit(1.0), dummy_span());
        let id = Expr::new(ExprKind::Ident(Symbol::intern("x")), dummy_span());
        assert!(i.is_literal());
        assert!(f.is_literal());
        assert!(!id.is_literal());
    }
}
