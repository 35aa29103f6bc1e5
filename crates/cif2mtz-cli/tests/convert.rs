//! End-to-end runs of the `cif2mtz` binary.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use cif2mtz_mtz::read_mtz;

const SF: &str = "\
data_r1abcsf
_cell.length_a 40.0
_cell.length_b 50.0
_cell.length_c 60.0
_cell.angle_alpha 90.0
_cell.angle_beta 90.0
_cell.angle_gamma 90.0
_symmetry.space_group_name_H-M 'P 21 21 21'
loop_
_refln.index_h
_refln.index_k
_refln.index_l
_refln.status
_refln.F_meas_au
_refln.F_meas_sigma_au
1 0 0 o 120.5 3.1
2 0 0 f ? ?
3 1 0 o 80.0 2.5
#
data_r1abcAsf
loop_
_refln.index_h
_refln.index_l
_refln.F_meas_au
1 0 1.0
#
data_r1abcBsf
loop_
_diffrn_refln.index_h
_diffrn_refln.index_k
_diffrn_refln.index_l
_diffrn_refln.intensity_net
_diffrn_refln.intensity_sigma
-1 0 2 10.0 1.0
1 0 -2 12.0 1.1
";

fn cif2mtz(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cif2mtz"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write_input(dir: &Path) -> String {
    let path = dir.join("r1abcsf.ent");
    std::fs::write(&path, SF).unwrap();
    path.to_str().unwrap().to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn print_spec() {
    let output = cif2mtz(&["--print-spec"]);
    assert_eq!(output.status.code(), Some(0));
    let text = String::from_utf8(output.stdout).unwrap();
    insta::assert_snapshot!(text, @r"
    # Each line in the spec contains four words:
    # - tag (without category) from _refln or _diffrn_refln
    # - MTZ column label
    # - MTZ column type
    # - MTZ dataset for the column (must be 0 or 1)
    index_h H H 0
    index_k K H 0
    index_l L H 0
    pdbx_r_free_flag FreeR_flag I 0
    status FreeR_flag s 0
    intensity_meas I J 1
    intensity_net I J 1
    intensity_sigma SIGI Q 1
    pdbx_I_plus I(+) K 1
    pdbx_I_plus_sigma SIGI(+) M 1
    pdbx_I_minus I(-) K 1
    pdbx_I_minus_sigma SIGI(-) M 1
    F_meas_au FP F 1
    F_meas_sigma_au SIGFP Q 1
    pdbx_F_plus F(+) G 1
    pdbx_F_plus_sigma SIGF(+) L 1
    pdbx_F_minus F(-) G 1
    pdbx_F_minus_sigma SIGF(-) L 1
    pdbx_anom_difference DP D 1
    pdbx_anom_difference_sigma SIGDP Q 1
    F_calc FC F 1
    phase_calc PHIC P 1
    fom FOM W 1
    weight FOM W 1
    pdbx_HL_A_iso HLA A 1
    pdbx_HL_B_iso HLB A 1
    pdbx_HL_C_iso HLC A 1
    pdbx_HL_D_iso HLD A 1
    pdbx_FWT FWT F 1
    pdbx_PHWT PHWT P 1
    pdbx_DELFWT DELFWT F 1
    pdbx_DELPHWT DELPHWT P 1
    ");
}

#[test]
fn converts_first_block() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let out = dir.path().join("out.mtz");
    let output = cif2mtz(&[
        "--title",
        "1ABC",
        "-H",
        "From cif2mtz",
        &input,
        out.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    let mtz = read_mtz(&out).unwrap();
    let labels: Vec<&str> = mtz.columns.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["H", "K", "L", "FreeR_flag", "FP", "SIGFP"]);
    assert_eq!(mtz.title, "1ABC");
    assert_eq!(mtz.history, vec!["From cif2mtz"]);
    assert_eq!(mtz.nreflections, 3);
    assert_eq!(mtz.row(0), &[1.0, 0.0, 0.0, 1.0, 120.5, 3.1]);
    assert_eq!(mtz.row(1)[3], 0.0);
    assert!(mtz.row(1)[4].is_nan());
}

#[test]
fn converts_named_block_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("unmerged.mtz");
    let mut child = Command::new(env!("CARGO_BIN_EXE_cif2mtz"))
        .args(["-b", "r1abcBsf", "-", out.to_str().unwrap()])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(SF.as_bytes()).unwrap();
    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

    let mtz = read_mtz(&out).unwrap();
    let labels: Vec<&str> = mtz.columns.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["H", "K", "L", "M/ISYM", "BATCH", "I", "SIGI"]);
    assert_eq!(mtz.batches.len(), 1);
    // No space group: indices are reduced in P 1.
    assert_eq!(mtz.row(0), &[-1.0, 0.0, 2.0, 1.0, 1.0, 10.0, 1.0]);
    assert_eq!(mtz.row(1), &[-1.0, 0.0, 2.0, 2.0, 1.0, 12.0, 1.1]);
}

#[test]
fn unknown_block() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let out = dir.path().join("out.mtz");
    let output = cif2mtz(&["--block", "nope", &input, out.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("block not found: nope"));
    assert!(!out.exists());
}

#[test]
fn bad_spec_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let spec = dir.path().join("spec.txt");
    std::fs::write(&spec, "index_h H H 0\nindex_k K H 2\n").unwrap();
    let out = dir.path().join("out.mtz");
    let output = cif2mtz(&["--spec", spec.to_str().unwrap(), &input, out.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("index_k K H 2"));
    assert!(!out.exists());
}

#[test]
fn missing_input_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.mtz");
    let output = cif2mtz(&["/nonexistent/in.cif", out.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn write_failure_exits_3() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let out = dir.path().join("missing/out.mtz");
    let output = cif2mtz(&[&input, out.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("out.mtz"));
}

#[test]
fn dir_mode_continues_after_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let out_dir = dir.path().join("mtz");
    std::fs::create_dir(&out_dir).unwrap();
    let report = dir.path().join("report.json");
    let output = cif2mtz(&[
        &input,
        "--dir",
        out_dir.to_str().unwrap(),
        "--report",
        report.to_str().unwrap(),
        "-j",
        "2",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("_refln.index_k"));
    assert!(out_dir.join("r1abcsf.mtz").exists());
    assert!(!out_dir.join("r1abcAsf.mtz").exists());
    assert!(out_dir.join("r1abcBsf.mtz").exists());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    let blocks = json["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0]["block"], "r1abcsf");
    assert_eq!(blocks[1]["failure"], "conversion");
    assert_eq!(blocks[2]["unmerged"], true);
}

#[test]
fn spec_without_index_columns() {
    let dir = tempfile::tempdir().unwrap();
    let spec = dir.path().join("spec.txt");
    std::fs::write(&spec, "index_h H H 0\nindex_l L H 0\nF_meas_au FP F 1\n").unwrap();
    let input = write_input(dir.path());
    let out_dir = dir.path().join("mtz");
    std::fs::create_dir(&out_dir).unwrap();
    let output = cif2mtz(&[
        "--spec",
        spec.to_str().unwrap(),
        &input,
        "--dir",
        out_dir.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("must be H, K and L"));
    assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 0);
}

#[test]
fn block_conflicts_with_dir() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let output = cif2mtz(&[&input, "-b", "r1abcsf", "--dir", dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(!dir.path().join("r1abcsf.mtz").exists());
}

#[test]
fn dir_mode_rejects_block_names_outside_dir() {
    let dir = tempfile::tempdir().unwrap();
    let escape = dir.path().join("escaped");
    let input = dir.path().join("in.cif");
    let cif = format!(
        "data_{}\nloop_\n_refln.index_h\n_refln.index_k\n_refln.index_l\n1 0 0\n",
        escape.display()
    );
    std::fs::write(&input, cif).unwrap();
    let out_dir = dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();

    let output = cif2mtz(&[input.to_str().unwrap(), "--dir", out_dir.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot be used as an output file name"));
    assert!(!escape.with_extension("mtz").exists());
    assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 0);
}

#[test]
fn dir_mode_write_failures_exit_3() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("good.cif");
    std::fs::write(&input, SF.split("#\n").next().unwrap()).unwrap();
    let out_dir = dir.path().join("does-not-exist");
    let output = cif2mtz(&[input.to_str().unwrap(), "--dir", out_dir.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn summary_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let out = dir.path().join("out.mtz");
    let output = cif2mtz(&["--summary", &input, out.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("r1abcsf"));
    assert!(stdout.contains("TOTAL"));
}
