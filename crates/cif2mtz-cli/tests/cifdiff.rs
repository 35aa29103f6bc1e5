//! End-to-end runs of the `cifdiff` binary.

use std::process::{Command, Output};

fn cifdiff(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cifdiff"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn compares_two_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.cif");
    let b = dir.path().join("b.cif");
    std::fs::write(&a, "data_x\nloop_\n_refln.index_h\n_refln.status\n1 o\n").unwrap();
    std::fs::write(&b, "data_x\nloop_\n_refln.index_h\n_refln.F_meas_au\n1 2.0\n2 3.0\n").unwrap();

    let output = cifdiff(&[a.to_str().unwrap(), b.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], format!("--- Reading {}", a.display()));
    assert_eq!(lines[1], format!("+++ Reading {}", b.display()));
    assert_eq!(
        &lines[2..],
        [
            "  block name: x",
            "  _refln.                               rows:     1  ->     2",
            "        index_h",
            "-       status",
            "+       F_meas_au",
        ]
    );
}

#[test]
fn lists_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.cif");
    std::fs::write(&a, "data_x\n_cell.length_a 1\nloop_\n_refln.index_h\n1\n").unwrap();

    let output = cifdiff(&["-n", "-q", a.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], format!("Reading {}", a.display()));
    assert_eq!(
        &lines[1..],
        [
            "  block name: x",
            "  _cell.                                rows:     1",
            "  _refln.                               rows:     1",
        ]
    );
}

#[test]
fn unreadable_file() {
    let output = cifdiff(&["-n", "/nonexistent/a.cif"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR"));
}
