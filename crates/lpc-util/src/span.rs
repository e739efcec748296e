//! Source locations: file identifiers and byte/line/column spans.

use std::fmt;

/// Identifies one source file registered with a [`crate::source_map::SourceMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(u32);

impl FileId {
    /// Sentinel used for synthetic spans not anchored to any real file.
    pub const DUMMY: FileId = FileId(u32::MAX);

    pub fn new(index: usize) -> Self {
        FileId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A byte range into a source file, plus the 1-based line/column of its
/// first byte. Every token and every AST node carries one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
    pub line: u32,
    pub column: u32,
    pub file: FileId,
}

impl Span {
    pub const DUMMY: Span = Span {
        start: 0,
        end: 0,
        line: 0,
        column: 0,
        file: FileId::DUMMY,
    };

    pub fn new(start: u32, end: u32, line: u32, column: u32, file: FileId) -> Self {
        Span {
            start,
            end,
            line,
            column,
            file,
        }
    }

    /// A zero-width span at a single position, used for EOF tokens.
    pub fn point(pos: u32, line: u32, column: u32, file: FileId) -> Self {
        Span::new(pos, pos, line, column, file)
    }

    /// Merges two spans from the same file into one covering both —
    /// used to give a compound AST node (e.g. a binary expression) a span
    /// that covers its whole subtree.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: self.line,
            column: self.column,
            file: self.file,
        }
    }

    pub fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
