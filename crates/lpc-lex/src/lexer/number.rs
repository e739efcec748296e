//! Integer and float literals. Decimal only — no hex/octal/binary
//! prefixes and no digit-group separators, matching
//! `examples/original_source/src/lexer.c`'s `number()`.

use super::Lexer;
use crate::token::{Token, TokenKind};

pub fn lex_number(lexer: &mut Lexer, start: usize, line: u32, column: u32) -> Token {
    while lexer.cursor.current_char().is_ascii_digit() {
        lexer.cursor.advance();
    }

    let mut is_float = false;
    if lexer.cursor.current_char() == '.' && lexer.cursor.peek_char(1).is_ascii_digit() {
        is_float = true;
        lexer.cursor.advance();
        while lexer.cursor.current_char().is_ascii_digit() {
            lexer.cursor.advance();
        }
    }

    if matches!(lexer.cursor.current_char(), 'e' | 'E') {
        let sign_offset = if matches!(lexer.cursor.peek_char(1), '+' | '-') { 2 } else { 1 };
        if lexer.cursor.peek_char(sign_offset).is_ascii_digit() {
            is_float = true;
            lexer.cursor.advance();
            if matches!(lexer.cursor.current_char(), '+' | '-') {
                lexer.cursor.advance();
            }
            while lexer.cursor.current_char().is_ascii_digit() {
                lexer.cursor.advance();
            }
        }
    }

    let text = lexer.cursor.slice_from(start);
    if is_float {
        match text.parse::<f64>() {
            Ok(value) => lexer.make(TokenKind::Float(value), start, line, column),
            Err(_) => lexer.error(format!("invalid float literal '{text}'"), start, line, column),
        }
    } else {
        match text.parse::<i64>() {
            Ok(value) => lexer.make(TokenKind::Int(value), start, line, column),
            Err(_) => lexer.error(format!("invalid integer literal '{text}'"), start, line, column),
        }
    }
}

#[cfg(test)]
mod tests {
    use lpc_util::FileId;

    use super::*;

    fn lex_one(src: &str) -> TokenKind {
        Lexer::new(src, FileId::new(0)).next_token().kind
    }

    #[test]
    fn plain_integer() {
        assert_eq!(lex_one("42"), TokenKind::Int(42));
    }

    #[test]
    fn decimal_float() {
        assert_eq!(lex_one("3.14"), TokenKind::Float(3.14));
    }

    #[test]
    fn dot_without_following_digit_is_not_part_of_the_number() {
        assert_eq!(lex_one("1."), TokenKind::Int(1));
    }

    #[test]
    fn exponent_form() {
        assert_eq!(lex_one("1e3"), TokenKind::Float(1e3));
        assert_eq!(lex_one("2.5e-2"), TokenKind::Float(2.5e-2));
    }

    #[test]
    fn trailing_e_without_digits_is_not_an_exponent() {
        assert_eq!(lex_one("5e"), TokenKind::Int(5));
    }
}
