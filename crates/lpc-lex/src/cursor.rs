//! A source-text cursor tracking byte offset, line, and column.
//!
//! Adapted from this workspace's general-purpose `Cursor`: ASCII bytes
//! take a fast byte-indexing path, any byte `>= 0x80` falls back to a
//! `char`-boundary-safe path so string-literal contents may still contain
//! arbitrary UTF-8 even though identifiers/operators are ASCII-only.

#[derive(Debug, Clone, Copy)]
pub struct CursorSnapshot {
    pub position: usize,
    pub line: u32,
    pub column: u32,
}

pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Cursor {
            source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    fn char_at(&self, offset: usize) -> char {
        let bytes = self.source.as_bytes();
        let mut pos = self.position;
        let mut remaining = offset;
        while remaining > 0 {
            if pos >= bytes.len() {
                return '\0';
            }
            let width = if bytes[pos] < 0x80 {
                1
            } else {
                self.source[pos..].chars().next().map_or(1, char::len_utf8)
            };
            pos += width;
            remaining -= 1;
        }
        if pos >= bytes.len() {
            return '\0';
        }
        if bytes[pos] < 0x80 {
            bytes[pos] as char
        } else {
            self.source[pos..].chars().next().unwrap_or('\0')
        }
    }

    pub fn current_char(&self) -> char {
        self.char_at(0)
    }

    pub fn peek_char(&self, offset: usize) -> char {
        self.char_at(offset)
    }

    pub fn advance(&mut self) {
        if self.is_at_end() {
            return;
        }
        let bytes = self.source.as_bytes();
        let c = if bytes[self.position] < 0x80 {
            let c = bytes[self.position] as char;
            self.position += 1;
            c
        } else {
            let c = self.source[self.position..].chars().next().unwrap_or('\0');
            self.position += c.len_utf8();
            c
        };
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    pub fn match_char(&mut self, expected: char) -> bool {
        if self.current_char() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.position]
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn snapshot(&self) -> CursorSnapshot {
        CursorSnapshot {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    pub fn restore(&mut self, snapshot: CursorSnapshot) {
        self.position = snapshot.position;
        self.line = snapshot.line;
        self.column = snapshot.column;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_ascii_and_tracks_column() {
        let mut c = Cursor::new("ab");
        assert_eq!(c.current_char(), 'a');
        c.advance();
        assert_eq!(c.current_char(), 'b');
        assert_eq!(c.column(), 2);
    }

    #[test]
    fn newline_resets_column_and_bumps_line() {
        let mut c = Cursor::new("a\nb");
        c.advance();
        c.advance();
        assert_eq!(c.line(), 2);
        assert_eq!(c.column(), 1);
        assert_eq!(c.current_char(), 'b');
    }

    #[test]
    fn handles_multibyte_utf8_in_string_contents() {
        let mut c = Cursor::new("αβγ");
        assert_eq!(c.current_char(), 'α');
        c.advance();
        assert_eq!(c.current_char(), 'β');
        c.advance();
        assert_eq!(c.current_char(), 'γ');
        c.advance();
        assert!(c.is_at_end());
    }

    #[test]
    fn snapshot_restore_round_trips() {
        let mut c = Cursor::new("abcd");
        c.advance();
        c.advance();
        let snap = c.snapshot();
        c.advance();
        assert_eq!(c.current_char(), 'd');
        c.restore(snap);
        assert_eq!(c.current_char(), 'c');
    }

    #[test]
    fn peek_does_not_consume() {
        let c = Cursor::new("xy");
        assert_eq!(c.peek_char(1), 'y');
        assert_eq!(c.current_char(), 'x');
    }
}
