use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn write_source(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn clean_program_succeeds() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_source(
        &tmp_dir,
        "ok.c",
        "int g;\nint main() {\n  int i;\n  for (i = 0; i < 3; i++) printf(i);\n  return 0;\n}\n",
    );

    let mut cmd = Command::cargo_bin("driver").unwrap();
    cmd.arg("--input").arg(path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ok: 2 items, 2 symbols in global scope"));
}

#[test]
fn diagnostics_go_to_stderr_with_status_one() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_source(&tmp_dir, "bad.c", "int x;\nint x;\nint 1y;\n");

    let mut cmd = Command::cargo_bin("driver").unwrap();
    cmd.arg("-i").arg(path);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains(
            "line 2: semantic error: redeclaration of 'x' (previously declared on line 1)",
        ))
        .stderr(predicate::str::contains("line 3: syntax error: expected identifier, found '1'"))
        .stderr(predicate::str::contains("2 error(s)"));
}

#[test]
fn empty_file_is_invalid_input() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_source(&tmp_dir, "empty.c", "  \n");

    let mut cmd = Command::cargo_bin("driver").unwrap();
    cmd.arg("-i").arg(path);
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("invalid input"));
}

#[test]
fn missing_file_exits_with_two() {
    let tmp_dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("driver").unwrap();
    cmd.arg("-i").arg(tmp_dir.path().join("nope.c"));
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn token_dump_shows_codes() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_source(&tmp_dir, "tokens.c", "a<=b");

    let mut cmd = Command::cargo_bin("driver").unwrap();
    cmd.arg("-i").arg(path).arg("--tokens");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1:1 <ID, a> (291)"))
        .stdout(predicate::str::contains("1:2 <RELOP, <=> (278)"))
        .stdout(predicate::str::contains("1:4 <ID, b> (291)"));
}

#[test]
fn token_dump_reports_lexical_errors() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_source(&tmp_dir, "lex.c", "x = 1.2.3;");

    let mut cmd = Command::cargo_bin("driver").unwrap();
    cmd.arg("-i").arg(path).arg("-t");
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("lexical error: too many decimal points"));
}

#[test]
fn symbol_listing() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_source(&tmp_dir, "syms.c", "int arr[4];\nvoid f(int a) { }\n");

    let mut cmd = Command::cargo_bin("driver").unwrap();
    cmd.arg("-i").arg(path).arg("--symbols");
    cmd.assert()
        .success()
        .stdout(predicate::str::is_match(r"arr\s+variable\s+int\[4\]\s+line 1").unwrap())
        .stdout(predicate::str::is_match(r"f\s+function\s+void\s+line 2").unwrap());
}

#[test]
fn verbose_logging_goes_to_stderr() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = write_source(&tmp_dir, "v.c", "int x;\n");

    let mut cmd = Command::cargo_bin("driver").unwrap();
    cmd.arg("-i").arg(path).arg("-v");
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("[DEBUG - SEMANTIC]: declaring int 'x' at depth 0"));
}
