//! Shared infrastructure used by every stage of the Lambda Photon
//! compiler: source locations, string interning, and structured
//! diagnostics.

pub mod diagnostic;
pub mod source_map;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, Handler, Level};
pub use source_map::{SourceFile, SourceMap};
pub use span::{FileId, Span};

mod symbol;
pub use symbol::Symbol;
