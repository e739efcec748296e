//! Error types for LLVM code generation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodeGenError {
    /// An AST node kind the grammar can produce but this backend
    /// deliberately refuses to lower directly (`Lambda`, `Apply`,
    /// `Array`, `Index`, `Async`, `Await`, `GpuKernel` — none of which
    /// the optimizer can fold away). Where the reference emits nothing
    /// and carries on, this fails the build instead.
    #[error("unsupported expression kind: {0}")]
    Unsupported(String),

    #[error("basic block not found: {0}")]
    BlockNotFound(String),

    #[error("expression produced no value: {0}")]
    MissingValue(String),

    #[error("target initialization failed: {0}")]
    TargetInitFailed(String),

    /// Constructed whenever `Module::verify()` fails, but downgraded to
    /// a logged warning at the call site rather than surfaced — see the
    /// module finalization step in `lib.rs`.
    #[error("module verification failed: {0}")]
    VerifyFailed(String),

    #[error("object emission failed: {0}")]
    ObjectEmitFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodeGenError>;
