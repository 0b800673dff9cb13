use std::process::Command;

fn culebra() -> Command {
    Command::new(env!("CARGO_BIN_EXE_culebra"))
}

fn run_eval(source: &str) -> std::process::Output {
    culebra()
        .arg("-e")
        .arg(source)
        .output()
        .expect("failed to execute culebra")
}

#[test]
fn test_version_flag() {
    let output = culebra()
        .arg("--version")
        .output()
        .expect("failed to execute culebra");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("culebra"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_arithmetic_goes_to_stdout() {
    let output = run_eval("puts(1 + 2 * 3)");

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "7\n");
}

#[test]
fn test_immutable_reassignment_fails_the_run() {
    let output = run_eval("x = 1; x = 2");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("immutable variable 'x'"));
}

#[test]
fn test_mutable_reassignment_succeeds() {
    let output = run_eval("mut x = 1; x = 2; puts(x)");

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "2\n");
}

#[test]
fn test_string_interpolation() {
    let output = run_eval("name = 'world'; puts(\"hello, {name}!\")");

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "hello, world!\n");
}

#[test]
fn test_array_push_and_size() {
    let output = run_eval("a = [10, 20]; a.push(30); puts(a.size())");

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "3\n");
}

#[test]
fn test_closure_counter_output() {
    let output = run_eval(
        "make = fn() { mut n = 0; fn() { n = n + 1; n } }; \
         counter = make(); puts(counter()); puts(counter())",
    );

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "1\n2\n");
}

#[test]
fn test_assert_failure_sets_the_exit_code() {
    let output = run_eval("assert(1 == 2)");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("assert failed at 1:1."));
}

#[test]
fn test_parse_error_sets_the_exit_code() {
    let output = run_eval(")");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("expected expression"));
}

#[test]
fn test_ast_dump_goes_to_stderr() {
    let output = culebra()
        .arg("--ast")
        .arg("-e")
        .arg("puts(7)")
        .output()
        .expect("failed to execute culebra");

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "7\n");
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("CALL"));
    assert!(stderr.contains("ARGUMENTS"));
    assert!(stderr.contains("IDENTIFIER (puts)"));
}

#[test]
fn test_script_file_runs() {
    let path = std::env::temp_dir().join("culebra_cli_script_test.clb");
    std::fs::write(&path, "greeting = 'from file'\nputs(greeting)\n").unwrap();

    let output = culebra()
        .arg(&path)
        .output()
        .expect("failed to execute culebra");
    std::fs::remove_file(&path).ok();

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "from file\n");
}

#[test]
fn test_missing_script_file_reports_an_error() {
    let output = culebra()
        .arg("definitely_missing.clb")
        .output()
        .expect("failed to execute culebra");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Failed to read"));
}
