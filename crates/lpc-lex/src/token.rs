//! Token kinds and the `Token` wrapper pairing a kind with its span.

use lpc_util::{Span, Symbol};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Int(i64),
    Float(f64),
    Str(Symbol),
    Ident(Symbol),

    // keywords
    Let,
    For,
    In,
    Async,
    Await,
    Gpu,
    Kernel,
    TyI8,
    TyI16,
    TyI32,
    TyI64,
    TyU8,
    TyU16,
    TyU32,
    TyU64,
    TyF32,
    TyF64,
    TyStr,
    TyPtr,
    TyVoid,

    // operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    EqEq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    AndAnd,
    OrOr,
    Bang,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    Arrow,
    Question,
    Colon,
    DotDot,
    Backslash,

    // delimiters / punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    At,

    Eof,
    /// A lexical error. The lexer never panics; it terminates the token
    /// stream with this and stops scanning, mirroring the C reference's
    /// `TOK_ERROR`-stops-`lexer_tokenize` behavior.
    Error(Symbol),
}

impl TokenKind {
    /// Maps an identifier's exact spelling to its keyword token, if any.
    /// Matches `examples/original_source/src/lexer.c`'s `identifier_type`
    /// dispatch — note `parallel` is deliberately absent: it lexes as a
    /// plain identifier and is only meaningful to the parser, one token
    /// after `@`.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        Some(match text {
            "let" => TokenKind::Let,
            "for" => TokenKind::For,
            "in" => TokenKind::In,
            "async" => TokenKind::Async,
            "await" => TokenKind::Await,
            "gpu" => TokenKind::Gpu,
            "kernel" => TokenKind::Kernel,
            "i8" => TokenKind::TyI8,
            "i16" => TokenKind::TyI16,
            "i32" => TokenKind::TyI32,
            "i64" => TokenKind::TyI64,
            "u8" => TokenKind::TyU8,
            "u16" => TokenKind::TyU16,
            "u32" => TokenKind::TyU32,
            "u64" => TokenKind::TyU64,
            "f32" => TokenKind::TyF32,
            "f64" => TokenKind::TyF64,
            "str" => TokenKind::TyStr,
            "ptr" => TokenKind::TyPtr,
            "void" => TokenKind::TyVoid,
            _ => return None,
        })
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, TokenKind::Eof)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TokenKind::Error(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_recognizes_type_and_control_words() {
        assert_eq!(TokenKind::keyword("i64"), Some(TokenKind::TyI64));
        assert_eq!(TokenKind::keyword("for"), Some(TokenKind::For));
        assert_eq!(TokenKind::keyword("kernel"), Some(TokenKind::Kernel));
    }

    #[test]
    fn parallel_is_not_a_keyword() {
        assert_eq!(TokenKind::keyword("parallel"), None);
    }

    #[test]
    fn unknown_word_is_not_a_keyword() {
        assert_eq!(TokenKind::keyword("frobnicate"), None);
    }
}
