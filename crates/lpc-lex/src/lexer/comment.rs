//! Whitespace and `//` line comments. The simplified grammar has no
//! block-comment syntax, unlike this workspace's general-purpose lexer.

use crate::cursor::Cursor;

pub fn skip_whitespace_and_comments(cursor: &mut Cursor) {
    loop {
        match cursor.current_char() {
            ' ' | '\t' | '\r' | '\n' => cursor.advance(),
            '/' if cursor.peek_char(1) == '/' => skip_line_comment(cursor),
            _ => break,
        }
    }
}

fn skip_line_comment(cursor: &mut Cursor) {
    while !cursor.is_at_end() && cursor.current_char() != '\n' {
        cursor.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_spaces_tabs_and_newlines() {
        let mut c = Cursor::new("   \t\n\nx");
        skip_whitespace_and_comments(&mut c);
        assert_eq!(c.current_char(), 'x');
    }

    #[test]
    fn skips_a_line_comment_up_to_the_newline() {
        let mut c = Cursor::new("// hello\nx");
        skip_whitespace_and_comments(&mut c);
        assert_eq!(c.current_char(), 'x');
    }

    #[test]
    fn line_comment_at_end_of_file_consumes_everything() {
        let mut c = Cursor::new("// trailing");
        skip_whitespace_and_comments(&mut c);
        assert!(c.is_at_end());
    }

    #[test]
    fn single_slash_is_not_a_comment() {
        let mut c = Cursor::new("/x");
        skip_whitespace_and_comments(&mut c);
        assert_eq!(c.current_char(), '/');
    }
}
