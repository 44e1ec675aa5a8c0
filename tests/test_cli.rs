// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::{fs, path::Path, process::Command};

const PROGRAM: &str = "\
(isolation routing)
G21
G90
G00 Z2
G00 X0 Y0
G01 Z-0.1 F60
G01 X20 Y0 F300
G01 X20 Y10
G00 Z2
M05
M02
";

fn ngc_level() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ngc-level"))
}

#[test]
fn test_cli_levels_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("board.ngc");
    let output = dir.path().join("board-leveled.ngc");
    fs::write(&input, PROGRAM).unwrap();

    let status = ngc_level().arg(&input).arg(&output).status().unwrap();
    assert!(status.success());

    let result = fs::read_to_string(&output).unwrap();
    assert!(result.starts_with("G21\n(height map probing, mm grid pitch 5)\n"));
    assert!(result.contains("O100 sub\n"));
    assert!(result.contains("#3=-0.1\t\t(route depth)\n"));
    assert!(result.ends_with("G00 Z2.0000\nM05\nM02\n"));
}

#[test]
fn test_cli_grid_size() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("board.ngc");
    fs::write(&input, PROGRAM).unwrap();

    let coarse = dir.path().join("coarse.ngc");
    let fine = dir.path().join("fine.ngc");
    let default = dir.path().join("default.ngc");
    assert!(ngc_level().arg("10").arg(&input).arg(&coarse).status().unwrap().success());
    assert!(ngc_level().arg("2.5").arg(&input).arg(&fine).status().unwrap().success());
    // zero selects the default
    assert!(ngc_level().arg("0").arg(&input).arg(&default).status().unwrap().success());

    let probes = |path: &Path| fs::read_to_string(path).unwrap().matches("O100 call").count();
    assert!(probes(&coarse) < probes(&fine));
    assert!(fs::read_to_string(&default).unwrap().contains("grid pitch 5)"));
}

#[test]
fn test_cli_errors() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.ngc");

    // missing input
    let result = ngc_level().arg(dir.path().join("missing.ngc")).arg(&output).output().unwrap();
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Unable to open file"));
    assert!(!output.exists());

    // syntax error, nothing is written
    let input = dir.path().join("bad.ngc");
    fs::write(&input, "G21\nG01 X1 $\n").unwrap();
    let result = ngc_level().arg(&input).arg(&output).output().unwrap();
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Error in line 2: Unknown symbol '$'"));
    assert!(!output.exists());

    // bad grid size
    let result = ngc_level().arg("fine").arg(&input).arg(&output).output().unwrap();
    assert!(!result.status.success());

    // wrong number of arguments
    assert!(!ngc_level().arg(&input).status().unwrap().success());
}
