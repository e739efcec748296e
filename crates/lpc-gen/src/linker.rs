//! System-linker handoff.
//!
//! Object emission stops this compiler's own job short of a runnable
//! binary; the final link is delegated to whatever `clang` is on
//! `PATH`, the same way the reference shells out to it via `system()`.

use std::path::Path;
use std::process::Command;

use crate::error::{CodeGenError, Result};

fn opt_flag(opt_level: u8) -> &'static str {
    match opt_level {
        n if n >= 3 => "-O3",
        2 => "-O2",
        1 => "-O1",
        _ => "-O0",
    }
}

/// Links `object` into `output` via `clang`, then removes `object`
/// unconditionally — whether or not the link succeeded, matching the
/// reference's unguarded `remove(obj_file)`.
pub fn link(object: &Path, output: &Path, opt_level: u8) -> Result<()> {
    let result = Command::new("clang")
        .arg(opt_flag(opt_level))
        .arg(object)
        .arg("-o")
        .arg(output)
        .status();

    let cleanup = std::fs::remove_file(object);

    let status = result.map_err(|e| CodeGenError::ObjectEmitFailed(format!("clang: {e}")))?;
    cleanup.ok();

    if !status.success() {
        return Err(CodeGenError::ObjectEmitFailed(format!(
            "clang exited with {status}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opt_flag_thresholds() {
        assert_eq!(opt_flag(0), "-O0");
        assert_eq!(opt_flag(1), "-O1");
        assert_eq!(opt_flag(2), "-O2");
        assert_eq!(opt_flag(3), "-O3");
        assert_eq!(opt_flag(9), "-O3");
    }
}
