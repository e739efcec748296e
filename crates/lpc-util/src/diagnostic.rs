//! Structured, accumulating diagnostics.
//!
//! Every compiler stage pushes into a shared [`Handler`] instead of
//! bailing out on the first problem; `Handler::has_errors` is the single
//! source of truth for whether a stage failed.

use std::cell::RefCell;
use std::fmt;

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Option<Span>,
    pub note: Option<String>,
    pub help: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "{}: {} ({})", self.level, self.message, span),
            None => write!(f, "{}: {}", self.level, self.message),
        }?;
        if let Some(note) = &self.note {
            write!(f, "\n  note: {note}")?;
        }
        if let Some(help) = &self.help {
            write!(f, "\n  help: {help}")?;
        }
        Ok(())
    }
}

/// Builds a [`Diagnostic`] through a chainable API, mirroring the way
/// this workspace's other diagnostic-emitting crates construct errors.
pub struct DiagnosticBuilder {
    diag: Diagnostic,
}

impl DiagnosticBuilder {
    pub fn error(message: impl Into<String>) -> Self {
        DiagnosticBuilder {
            diag: Diagnostic {
                level: Level::Error,
                message: message.into(),
                span: None,
                note: None,
                help: None,
            },
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        DiagnosticBuilder {
            diag: Diagnostic {
                level: Level::Warning,
                message: message.into(),
                span: None,
                note: None,
                help: None,
            },
        }
    }

    pub fn span(mut self, span: Span) -> Self {
        self.diag.span = Some(span);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.diag.note = Some(note.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.diag.help = Some(help.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        self.diag
    }

    pub fn emit(self, handler: &Handler) {
        handler.emit(self.build());
    }
}

/// Accumulates diagnostics for one compilation.
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Handler::default()
    }

    pub fn emit(&self, diag: Diagnostic) {
        self.diagnostics.borrow_mut().push(diag);
    }

    pub fn error(&self, message: impl Into<String>, span: Span) {
        DiagnosticBuilder::error(message).span(span).emit(self);
    }

    pub fn warning(&self, message: impl Into<String>, span: Span) {
        DiagnosticBuilder::warning(message).span(span).emit(self);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Warning)
            .count()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::FileId;

    #[test]
    fn has_errors_is_false_until_an_error_is_emitted() {
        let handler = Handler::new();
        assert!(!handler.has_errors());
        handler.warning("just fyi", Span::point(0, 1, 1, FileId::new(0)));
        assert!(!handler.has_errors());
        handler.error("broken", Span::point(0, 1, 1, FileId::new(0)));
        assert!(handler.has_errors());
    }

    #[test]
    fn counts_errors_and_warnings_separately() {
        let handler = Handler::new();
        handler.warning("w1", Span::DUMMY);
        handler.warning("w2", Span::DUMMY);
        handler.error("e1", Span::DUMMY);
        assert_eq!(handler.error_count(), 1);
        assert_eq!(handler.warning_count(), 2);
    }

    #[test]
    fn builder_attaches_note_and_help() {
        let handler = Handler::new();
        DiagnosticBuilder::error("bad")
            .note("this went wrong")
            .help("try this instead")
            .emit(&handler);
        let diags = handler.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].note.as_deref(), Some("this went wrong"));
        assert_eq!(diags[0].help.as_deref(), Some("try this instead"));
    }

    #[test]
    fn clear_empties_accumulated_diagnostics() {
        let handler = Handler::new();
        handler.error("e", Span::DUMMY);
        handler.clear();
        assert!(!handler.has_errors());
        assert!(handler.diagnostics().is_empty());
    }
}
