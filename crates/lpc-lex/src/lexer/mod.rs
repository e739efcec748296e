//! The lexer: dispatches each source position to the right per-family
//! scanning method and assembles the resulting `Token`.

mod comment;
mod identifier;
mod number;
mod operator;
mod string;

use lpc_util::{FileId, Span, Symbol};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    file: FileId,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file: FileId) -> Self {
        Lexer {
            cursor: Cursor::new(source),
            file,
        }
    }

    /// Tokenizes the whole source, stopping after the first `Eof` or
    /// `Error` token — matching `lexer_tokenize`'s behavior of never
    /// appending anything past the terminal token.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let done = tok.kind.is_eof() || tok.kind.is_error();
            tokens.push(tok);
            if done {
                break;
            }
        }
        tokens
    }

    pub fn next_token(&mut self) -> Token {
        comment::skip_whitespace_and_comments(&mut self.cursor);

        let start = self.cursor.position();
        let line = self.cursor.line();
        let column = self.cursor.column();

        if self.cursor.is_at_end() {
            return self.make(TokenKind::Eof, start, line, column);
        }

        let c = self.cursor.current_char();

        if c.is_ascii_digit() {
            return number::lex_number(self, start, line, column);
        }
        if is_ident_start(c) {
            return identifier::lex_identifier(self, start, line, column);
        }
        if c == '"' {
            return string::lex_string(self, start, line, column);
        }

        operator::lex_operator(self, start, line, column)
    }

    fn make(&self, kind: TokenKind, start: usize, line: u32, column: u32) -> Token {
        let span = Span::new(start as u32, self.cursor.position() as u32, line, column, self.file);
        Token::new(kind, span)
    }

    fn error(&self, message: impl Into<String>, start: usize, line: u32, column: u32) -> Token {
        self.make(TokenKind::Error(Symbol::intern(&message.into())), start, line, column)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
