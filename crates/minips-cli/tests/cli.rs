use assert_cmd::Command;
use predicates::str::contains;
use std::io::Write;
use tempfile::NamedTempFile;

fn cli_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("minips-cli"))
}

#[test]
fn add_prints_result() {
    let mut cmd = cli_cmd();
    cmd.write_stdin("3 4 add =");
    cmd.assert().success().stdout("7\n");
}

#[test]
fn def_and_mul() {
    let mut cmd = cli_cmd();
    cmd.write_stdin("/x 10 def x 2 mul =");
    cmd.assert().success().stdout("20\n");
}

#[test]
fn ifelse_true_branch() {
    let mut cmd = cli_cmd();
    cmd.write_stdin("true { 1 } { 2 } ifelse =");
    cmd.assert().success().stdout("1\n");
}

#[test]
fn for_with_dup_body_balances_to_four() {
    let mut cmd = cli_cmd();
    cmd.write_stdin("0 1 3 { dup } for count =");
    cmd.assert().success().stdout("4\n");
}

#[test]
fn count_then_clear() {
    let mut cmd = cli_cmd();
    cmd.write_stdin("1 2 3 count = clear count =");
    cmd.assert().success().stdout("3\n0\n");
}

#[test]
fn shadowing_resolves_dynamically_by_default() {
    let mut cmd = cli_cmd();
    cmd.write_stdin("/x 10 def /f { x } def /g { /x 99 def f } def g =");
    cmd.assert().success().stdout("99\n");
}

#[test]
fn shadowing_resolves_lexically_with_the_flag() {
    let mut cmd = cli_cmd();
    cmd.arg("--lexical");
    cmd.write_stdin("/x 10 def /f { x } def /g { /x 99 def f } def g =");
    cmd.assert().success().stdout("10\n");
}

#[test]
fn short_lexical_flag() {
    let mut cmd = cli_cmd();
    cmd.arg("-l");
    cmd.write_stdin("/x 1 def /f { x } def /x 2 def f =");
    cmd.assert().success().stdout("1\n");
}

#[test]
fn file_argument_executes_program() {
    let mut tmp = NamedTempFile::new().unwrap();
    writeln!(tmp, "% doubles its input").unwrap();
    writeln!(tmp, "/double {{ 2 mul }} def").unwrap();
    writeln!(tmp, "21 double =").unwrap();

    let mut cmd = cli_cmd();
    cmd.arg(tmp.path());
    cmd.assert().success().stdout("42\n");
}

#[test]
fn print_writes_without_newline() {
    let mut cmd = cli_cmd();
    cmd.write_stdin("(hello, ) print (world) print");
    cmd.assert().success().stdout("hello, world");
}

#[test]
fn undefined_name_fails_with_a_diagnostic() {
    let mut cmd = cli_cmd();
    cmd.write_stdin("nosuch");
    cmd.assert().failure().stderr(contains("undefined name: nosuch"));
}

#[test]
fn type_error_names_the_operator() {
    let mut cmd = cli_cmd();
    cmd.write_stdin("(a) 1 add");
    cmd.assert().failure().stderr(contains("type error in add"));
}

#[test]
fn missing_file_fails() {
    let mut cmd = cli_cmd();
    cmd.arg("no-such-file.ps");
    cmd.assert().failure();
}
