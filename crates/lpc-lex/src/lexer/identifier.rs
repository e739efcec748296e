//! Identifiers and keywords. ASCII-only: `[a-zA-Z_][a-zA-Z0-9_]*`.

use lpc_util::Symbol;

use super::{is_ident_continue, Lexer};
use crate::token::{Token, TokenKind};

pub fn lex_identifier(lexer: &mut Lexer, start: usize, line: u32, column: u32) -> Token {
    while is_ident_continue(lexer.cursor.current_char()) {
        lexer.cursor.advance();
    }
    let text = lexer.cursor.slice_from(start);
    let kind = TokenKind::keyword(text).unwrap_or_else(|| TokenKind::Ident(Symbol::intern(text)));
    lexer.make(kind, start, line, column)
}
