//! Recursive-descent parser: walks a flat `Token` stream into an
//! `lpc_ast::Expr` tree.
//!
//! Every `match_token` call silently tolerates an absent token rather
//! than reporting an error — this is a deliberate, inherited property of
//! the grammar (see SPEC_FULL.md §4.2/§10), not an oversight. A malformed
//! program simply produces a malformed tree; it is the later stages
//! (optimizer, codegen) that will eventually choke on nonsense, not the
//! parser.

use lpc_ast::{BinOp, Block, Expr, ExprKind, Type, UnOp};
use lpc_lex::{Token, TokenKind};
use lpc_util::{Span, Symbol};

pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser { tokens, current: 0 }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    /// True at `Eof` or at a lexical `Error` — both are terminal tokens
    /// the lexer never appends anything past, so the parser must never
    /// advance beyond them either.
    fn is_at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof | TokenKind::Error(_))
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn check(&self, kind: &TokenKind) -> bool {
        if self.is_at_end() {
            false
        } else {
            &self.current().kind == kind
        }
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn span_since(&self, start: Span) -> Span {
        start.to(self.previous().span)
    }

    /// Parses a type annotation, defaulting to `I64` for anything that
    /// isn't one of the recognized type keywords (no error is raised).
    fn parse_type(&mut self) -> Type {
        let ty = match &self.current().kind {
            TokenKind::TyI8 => Type::I8,
            TokenKind::TyI16 => Type::I16,
            TokenKind::TyI32 => Type::I32,
            TokenKind::TyI64 => Type::I64,
            TokenKind::TyU8 => Type::U8,
            TokenKind::TyU16 => Type::U16,
            TokenKind::TyU32 => Type::U32,
            TokenKind::TyU64 => Type::U64,
            TokenKind::TyF32 => Type::F32,
            TokenKind::TyF64 => Type::F64,
            TokenKind::TyStr => Type::Str,
            TokenKind::TyPtr => Type::Ptr,
            TokenKind::TyVoid => Type::Void,
            _ => return Type::I64,
        };
        self.advance();
        ty
    }

    fn ident_name(&self) -> Symbol {
        match &self.current().kind {
            TokenKind::Ident(sym) => *sym,
            _ => Symbol::intern(""),
        }
    }

    // --- expression ladder, precedence low to high: expression, ternary,
    // logical_or, logical_and, equality, comparison, term, factor, unary,
    // postfix, primary ---

    fn primary(&mut self) -> Option<Expr> {
        let start = self.current().span;

        if let TokenKind::Int(v) = self.current().kind {
            self.advance();
            return Some(Expr::new(ExprKind::IntLit(v), self.span_since(start)));
        }
        if let TokenKind::Float(v) = self.current().kind {
            self.advance();
            return Some(Expr::new(ExprKind::FloatLit(v), self.span_since(start)));
        }
        if let TokenKind::Str(sym) = self.current().kind {
            self.advance();
            return Some(Expr::new(ExprKind::StrLit(sym), self.span_since(start)));
        }
        if let TokenKind::Ident(sym) = self.current().kind {
            self.advance();
            return Some(Expr::new(ExprKind::Ident(sym), self.span_since(start)));
        }
        if self.match_token(&TokenKind::LParen) {
            let expr = self.expression();
            self.match_token(&TokenKind::RParen);
            return expr;
        }
        if self.match_token(&TokenKind::LBracket) {
            let mut elements = Vec::new();
            if !self.check(&TokenKind::RBracket) {
                loop {
                    if let Some(e) = self.expression() {
                        elements.push(e);
                    }
                    if !self.match_token(&TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.match_token(&TokenKind::RBracket);
            return Some(Expr::new(ExprKind::Array(elements), self.span_since(start)));
        }
        if self.match_token(&TokenKind::At) {
            let name = self.ident_name();
            self.advance();
            let mut args = Vec::new();
            if self.match_token(&TokenKind::LParen) {
                if !self.check(&TokenKind::RParen) {
                    loop {
                        if let Some(e) = self.expression() {
                            args.push(e);
                        }
                        if !self.match_token(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.match_token(&TokenKind::RParen);
            }
            return Some(Expr::new(ExprKind::Builtin(name, args), self.span_since(start)));
        }
        if self.match_token(&TokenKind::Backslash) {
            let mut params = Vec::new();
            while matches!(self.current().kind, TokenKind::Ident(_)) {
                params.push(self.ident_name());
                self.advance();
            }
            self.match_token(&TokenKind::Arrow);
            let body = self.expression()?;
            return Some(Expr::new(
                ExprKind::Lambda(params, Box::new(body)),
                self.span_since(start),
            ));
        }

        None
    }

    fn postfix(&mut self) -> Option<Expr> {
        let start = self.current().span;
        let mut left = self.primary()?;

        loop {
            if self.check(&TokenKind::LBracket) {
                self.advance();
                let index = self.expression()?;
                self.match_token(&TokenKind::RBracket);
                left = Expr::new(
                    ExprKind::Index(Box::new(left), Box::new(index)),
                    self.span_since(start),
                );
                continue;
            }
            break;
        }

        Some(left)
    }

    fn unary(&mut self) -> Option<Expr> {
        let start = self.current().span;
        if self.match_token(&TokenKind::Minus) {
            let operand = self.unary()?;
            return Some(Expr::new(
                ExprKind::Unary(UnOp::Neg, Box::new(operand)),
                self.span_since(start),
            ));
        }
        if self.match_token(&TokenKind::Bang) {
            let operand = self.unary()?;
            return Some(Expr::new(
                ExprKind::Unary(UnOp::Not, Box::new(operand)),
                self.span_since(start),
            ));
        }
        self.postfix()
    }

    fn binary_ladder(
        &mut self,
        next: fn(&mut Self) -> Option<Expr>,
        ops: &[(TokenKind, BinOp)],
    ) -> Option<Expr> {
        let start = self.current().span;
        let mut left = next(self)?;
        'outer: loop {
            for (tok, op) in ops {
                if self.match_token(tok) {
                    let right = next(self)?;
                    left = Expr::new(
                        ExprKind::Binary(*op, Box::new(left), Box::new(right)),
                        self.span_since(start),
                    );
                    continue 'outer;
                }
            }
            break;
        }
        Some(left)
    }

    fn factor(&mut self) -> Option<Expr> {
        self.binary_ladder(
            Self::unary,
            &[
                (TokenKind::Star, BinOp::Mul),
                (TokenKind::Slash, BinOp::Div),
                (TokenKind::Percent, BinOp::Mod),
            ],
        )
    }

    fn term(&mut self) -> Option<Expr> {
        self.binary_ladder(
            Self::factor,
            &[(TokenKind::Plus, BinOp::Add), (TokenKind::Minus, BinOp::Sub)],
        )
    }

    fn comparison(&mut self) -> Option<Expr> {
        self.binary_ladder(
            Self::term,
            &[
                (TokenKind::Lt, BinOp::Lt),
                (TokenKind::Gt, BinOp::Gt),
                (TokenKind::Le, BinOp::Le),
                (TokenKind::Ge, BinOp::Ge),
            ],
        )
    }

    fn equality(&mut self) -> Option<Expr> {
        self.binary_ladder(
            Self::comparison,
            &[(TokenKind::EqEq, BinOp::Eq), (TokenKind::Ne, BinOp::Ne)],
        )
    }

    fn logical_and(&mut self) -> Option<Expr> {
        self.binary_ladder(Self::equality, &[(TokenKind::AndAnd, BinOp::And)])
    }

    fn logical_or(&mut self) -> Option<Expr> {
        self.binary_ladder(Self::logical_and, &[(TokenKind::OrOr, BinOp::Or)])
    }

    fn ternary_expr(&mut self) -> Option<Expr> {
        let start = self.current().span;
        let cond = self.logical_or()?;

        if self.match_token(&TokenKind::Question) {
            let then_branch = self.expression()?;
            self.match_token(&TokenKind::Colon);
            let else_branch = self.ternary_expr()?;
            return Some(Expr::new(
                ExprKind::Ternary(Box::new(cond), Box::new(then_branch), Box::new(else_branch)),
                self.span_since(start),
            ));
        }

        Some(cond)
    }

    fn expression(&mut self) -> Option<Expr> {
        self.ternary_expr()
    }

    fn block(&mut self) -> Block {
        let start = self.current().span;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if let Some(stmt) = self.statement() {
                stmts.push(stmt);
            } else {
                break;
            }
        }
        self.match_token(&TokenKind::RBrace);
        Block { stmts, span: self.span_since(start) }
    }

    fn statement(&mut self) -> Option<Expr> {
        let mut start = self.current().span;

        let mut is_parallel = false;
        if self.match_token(&TokenKind::At) {
            let is_parallel_word = matches!(&self.current().kind, TokenKind::Ident(sym) if sym.as_str() == "parallel");
            if is_parallel_word {
                is_parallel = true;
                self.advance();
                start = self.current().span;
            } else {
                // Not `@parallel` — this is a builtin-call expression
                // statement. Rewind the consumed `@` so `expression()`
                // sees it again.
                self.current -= 1;
            }
        }

        if self.match_token(&TokenKind::Let) {
            let name = self.ident_name();
            self.advance();
            let mut annotation = None;
            if self.match_token(&TokenKind::Colon) {
                annotation = Some(self.parse_type());
            }
            self.match_token(&TokenKind::Eq);
            let value = self.expression()?;
            self.match_token(&TokenKind::Semicolon);
            return Some(Expr::new(
                ExprKind::Let(name, annotation, Box::new(value)),
                self.span_since(start),
            ));
        }

        if self.match_token(&TokenKind::For) {
            let var = self.ident_name();
            self.advance();
            self.match_token(&TokenKind::In);
            let range_start = self.expression()?;
            self.match_token(&TokenKind::DotDot);
            let range_end = self.expression()?;
            self.match_token(&TokenKind::LBrace);
            let body = self.block();
            self.match_token(&TokenKind::Semicolon);
            return Some(Expr::new(
                ExprKind::For(var, Box::new(range_start), Box::new(range_end), Box::new(body), is_parallel),
                self.span_since(start),
            ));
        }

        if self.match_token(&TokenKind::LBrace) {
            let block = self.block();
            let span = block.span;
            return Some(Expr::new(ExprKind::Block(block), span));
        }

        let expr = self.expression()?;
        self.match_token(&TokenKind::Semicolon);
        Some(expr)
    }

    /// Parses the whole token stream as a top-level program.
    pub fn parse(mut self) -> Expr {
        let start = self.current().span;
        let mut stmts = Vec::new();
        while !self.is_at_end() {
            match self.statement() {
                Some(stmt) => stmts.push(stmt),
                None => break,
            }
        }
        let span = self.span_since(start);
        Expr::new(ExprKind::Program(stmts), span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpc_lex::Lexer;
    use lpc_util::FileId;

    fn parse(src: &str) -> Expr {
        let tokens = Lexer::new(src, FileId::new(0)).tokenize();
        Parser::new(&tokens).parse()
    }

    #[test]
    fn parses_a_let_with_type_annotation() {
        let ast = parse("let x: i32 = 1 + 2;");
        let ExprKind::Program(stmts) = ast.kind else { panic!() };
        assert_eq!(stmts.len(), 1);
        match &stmts[0].kind {
            ExprKind::Let(name, ty, value) => {
                assert_eq!(name.as_str(), "x");
                assert_eq!(*ty, Some(Type::I32));
                assert!(matches!(value.kind, ExprKind::Binary(BinOp::Add, _, _)));
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn ternary_binds_looser_than_logical_or() {
        let ast = parse("1 || 0 ? 2 : 3;");
        let ExprKind::Program(stmts) = ast.kind else { panic!() };
        assert!(matches!(stmts[0].kind, ExprKind::Ternary(_, _, _)));
    }

    #[test]
    fn parallel_for_sets_the_flag() {
        let ast = parse("@parallel for i in 0..10 { i; };");
        let ExprKind::Program(stmts) = ast.kind else { panic!() };
        match &stmts[0].kind {
            ExprKind::For(_, _, _, _, is_parallel) => assert!(*is_parallel),
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn at_builtin_call_is_not_confused_with_parallel() {
        let ast = parse("@print(1);");
        let ExprKind::Program(stmts) = ast.kind else { panic!() };
        match &stmts[0].kind {
            ExprKind::Builtin(name, args) => {
                assert_eq!(name.as_str(), "print");
                assert_eq!(args.len(), 1);
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn precedence_ladder_respects_mul_over_add() {
        let ast = parse("2 + 3 * 4;");
        let ExprKind::Program(stmts) = ast.kind else { panic!() };
        match &stmts[0].kind {
            ExprKind::Binary(BinOp::Add, lhs, rhs) => {
                assert!(lhs.is_literal());
                assert!(matches!(rhs.kind, ExprKind::Binary(BinOp::Mul, _, _)));
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn array_and_index_expressions() {
        let ast = parse("[1, 2, 3][0];");
        let ExprKind::Program(stmts) = ast.kind else { panic!() };
        assert!(matches!(stmts[0].kind, ExprKind::Index(_, _)));
    }

    #[test]
    fn missing_tokens_are_tolerated_without_panicking() {
        // No closing paren, no semicolon — the grammar just presses on.
        let ast = parse("(1 + 2");
        let ExprKind::Program(stmts) = ast.kind else { panic!() };
        assert_eq!(stmts.len(), 1);
    }

    proptest::proptest! {
        #[test]
        fn never_panics_on_arbitrary_token_streams(src in ".{0,200}") {
            let tokens = Lexer::new(&src, FileId::new(0)).tokenize();
            let _ = Parser::new(&tokens).parse();
        }
    }
}
