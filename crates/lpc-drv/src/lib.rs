//! Driver for the Lambda Photon compiler: hand-rolled CLI argument
//! parsing plus the session that walks lex → parse → fold → codegen →
//! link and turns the first hard failure into a user-facing exit code.

mod config;
mod session;

pub use config::{usage, CliError, Config, ConfigAction, OptLevel};
pub use session::{CompileError, Session};

pub const VERSION: &str = "0.2.0-alpha";
