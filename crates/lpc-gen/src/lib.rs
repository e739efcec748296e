//! LLVM code generation for Lambda Photon: lowers an (already
//! constant-folded) AST into an LLVM module, then either prints its
//! textual IR or emits an object file and hands it to the system
//! linker.

mod codegen;
mod error;
mod linker;
mod scope;
mod types;

pub use codegen::CodeGen;
pub use error::{CodeGenError, Result};
pub use linker::link;
