use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn lp() -> Command {
    Command::cargo_bin("lp").unwrap()
}

fn write_source(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".lp").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn bare_invocation_prints_usage_and_exits_one() {
    lp().assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn version_flag_prints_version_and_exits_zero() {
    lp().arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Lambda Photon"));
}

#[test]
fn help_flag_prints_usage_and_exits_zero() {
    lp().arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn flags_with_no_input_path_reports_no_input() {
    lp().arg("-O2")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("E: no input"));
}

#[test]
fn unreadable_input_reports_a_read_error() {
    lp().arg("/no/such/path/definitely-missing.lp")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("E: cannot read"));
}

#[test]
fn a_lex_error_is_reported() {
    let source = write_source("1 + ` 2");
    lp().arg(source.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("E: lex"));
}

#[test]
fn emit_llvm_to_stdout_prints_ir_containing_main() {
    let source = write_source("let x: i32 = 1; @print(x);");
    lp().arg(source.path())
        .arg("--emit-llvm")
        .assert()
        .success()
        .stdout(predicate::str::contains("define"))
        .stdout(predicate::str::contains("i32 @main"));
}

#[test]
fn emit_llvm_to_a_file_writes_ir_there_instead_of_stdout() {
    let source = write_source("let x: i32 = 1;");
    let out = tempfile::Builder::new().suffix(".ll").tempfile().unwrap();

    lp().arg(source.path())
        .arg("--emit-llvm")
        .arg("-o")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(out.path()).unwrap();
    assert!(written.contains("define"));
}

#[test]
fn constant_fold_still_produces_valid_ir_under_emit_llvm() {
    let source = write_source("let x: i32 = 2 + 2 * 3;");
    lp().arg(source.path())
        .arg("--emit-llvm")
        .arg("-O0")
        .assert()
        .success()
        .stdout(predicate::str::contains("define"));
}
