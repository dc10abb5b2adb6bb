//! End-to-end tests for the `blksort` binary.

use std::io::Write;
use std::os::unix::ffi::OsStrExt;
use std::process::{Command, Output, Stdio};
use tempfile::tempdir;

fn blksort(args: &[&str], stdin: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_blksort"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    // The process may exit before reading stdin on a usage error.
    let _ = child.stdin.take().unwrap().write_all(stdin);
    child.wait_with_output().unwrap()
}

#[test]
fn test_unknown_flag_prints_usage() {
    let output = blksort(&["-x"], b"whatever\n");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.starts_with("Usage: "));
    assert!(stderr.contains("[-0] [-b]"));
    assert_eq!(stderr.lines().count(), 1);
}

#[test]
fn test_unknown_method_prints_usage() {
    let output = blksort(&["--method", "bmap"], b"");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Usage: "));
}

#[test]
fn test_failures_do_not_change_exit_status() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let mut input = Vec::new();
    input.extend_from_slice(dir.path().as_os_str().as_bytes());
    input.push(b'\n');
    input.extend_from_slice(missing.as_os_str().as_bytes());
    input.push(b'\n');

    let output = blksort(&["-b"], &input);

    assert!(output.status.success());
    let expected = format!(
        "0 {}\n0 {}\n",
        dir.path().display(),
        missing.display()
    );
    assert_eq!(String::from_utf8(output.stdout).unwrap(), expected);

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr.lines().count(), 1);
    assert!(stderr.contains(&format!(": {}: ", missing.display())));
}

#[test]
fn test_null_delimiter() {
    let dir = tempdir().unwrap();
    let odd = dir.path().join("line\nbreak");
    std::fs::create_dir(&odd).unwrap();

    let mut input = Vec::new();
    input.extend_from_slice(odd.as_os_str().as_bytes());
    input.push(0);
    input.extend_from_slice(b"/nonexistent/blksort-test\0");

    let output = blksort(&["-0", "-m", "fiemap"], &input);

    assert!(output.status.success());
    assert_eq!(output.stdout, input);
}

#[test]
fn test_help_exits_successfully() {
    let output = blksort(&["--help"], b"");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--show-block"));
}

#[test]
fn test_closed_stdout_exits_quietly() {
    let dir = tempdir().unwrap();
    let mut input = Vec::new();
    for _ in 0..1000 {
        input.extend_from_slice(dir.path().as_os_str().as_bytes());
        input.push(b'\n');
    }

    let mut child = Command::new(env!("CARGO_BIN_EXE_blksort"))
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    // Nothing is written to stdout before stdin is exhausted, so closing
    // the read end first guarantees the write hits a broken pipe.
    drop(child.stdout.take());
    child.stdin.take().unwrap().write_all(&input).unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert!(output.stderr.is_empty());
}
