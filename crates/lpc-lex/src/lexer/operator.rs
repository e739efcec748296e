//! Operators and delimiters, maximal-munch. Two-character operators are
//! disambiguated the same way as `examples/original_source/src/lexer.c`'s
//! `scan_token` switch: `-`→`->`/`-`, `=`→`==`/`=`, `!`→`!=`/`!`,
//! `<`→`<<`/`<=`/`<`, `>`→`>>`/`>=`/`>`, `&`→`&&`/`&`, `|`→`||`/`|`.
//! `.` only ever forms `..`; a lone `.` is a lexical error.

use super::Lexer;
use crate::token::{Token, TokenKind};

pub fn lex_operator(lexer: &mut Lexer, start: usize, line: u32, column: u32) -> Token {
    let c = lexer.cursor.current_char();
    lexer.cursor.advance();

    let kind = match c {
        '+' => TokenKind::Plus,
        '*' => TokenKind::Star,
        '/' => TokenKind::Slash,
        '%' => TokenKind::Percent,
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        '{' => TokenKind::LBrace,
        '}' => TokenKind::RBrace,
        '[' => TokenKind::LBracket,
        ']' => TokenKind::RBracket,
        ';' => TokenKind::Semicolon,
        ',' => TokenKind::Comma,
        ':' => TokenKind::Colon,
        '?' => TokenKind::Question,
        '@' => TokenKind::At,
        '^' => TokenKind::Caret,
        '\\' => TokenKind::Backslash,

        '-' => {
            if lexer.cursor.match_char('>') {
                TokenKind::Arrow
            } else {
                TokenKind::Minus
            }
        }
        '=' => {
            if lexer.cursor.match_char('=') {
                TokenKind::EqEq
            } else {
                TokenKind::Eq
            }
        }
        '!' => {
            if lexer.cursor.match_char('=') {
                TokenKind::Ne
            } else {
                TokenKind::Bang
            }
        }
        '<' => {
            if lexer.cursor.match_char('<') {
                TokenKind::Shl
            } else if lexer.cursor.match_char('=') {
                TokenKind::Le
            } else {
                TokenKind::Lt
            }
        }
        '>' => {
            if lexer.cursor.match_char('>') {
                TokenKind::Shr
            } else if lexer.cursor.match_char('=') {
                TokenKind::Ge
            } else {
                TokenKind::Gt
            }
        }
        '&' => {
            if lexer.cursor.match_char('&') {
                TokenKind::AndAnd
            } else {
                TokenKind::Amp
            }
        }
        '|' => {
            if lexer.cursor.match_char('|') {
                TokenKind::OrOr
            } else {
                TokenKind::Pipe
            }
        }
        '.' => {
            if lexer.cursor.match_char('.') {
                TokenKind::DotDot
            } else {
                return lexer.error("expected '..', found a lone '.'", start, line, column);
            }
        }

        other => return lexer.error(format!("unexpected character '{other}'"), start, line, column),
    };

    lexer.make(kind, start, line, column)
}
