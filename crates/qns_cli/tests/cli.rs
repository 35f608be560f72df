//! End-to-end checks on the compiled binary's argument handling.

use std::process::Command;

fn qns() -> Command {
    Command::new(env!("CARGO_BIN_EXE_qns"))
}

#[test]
fn test_missing_required_flag_exits_1() {
    let status = qns()
        .args(["--function", "2of5", "--num_lines", "5"])
        .status()
        .expect("failed to run qns binary");
    assert_eq!(status.code(), Some(1));
}

#[test]
fn test_unknown_function_exits_1() {
    let status = qns()
        .args([
            "--output",
            "/tmp/qns-test-unknown-function.out",
            "--function",
            "not-a-real-function",
            "--num_lines",
            "5",
            "--min_num_gates",
            "4",
            "--max_num_gates",
            "4",
            "--num_gates_increment",
            "4",
            "--num_survivors",
            "2",
            "--num_offspring",
            "3",
            "--batch_size",
            "4",
            "--optimizations_per_circuit",
            "1",
        ])
        .status()
        .expect("failed to run qns binary");
    assert_eq!(status.code(), Some(1));
}

#[test]
fn test_tiny_run_produces_output_file() {
    let out_path = std::env::temp_dir().join("qns-test-tiny-run.out");
    let status = qns()
        .args([
            "--output",
            out_path.to_str().unwrap(),
            "--function",
            "Id",
            "--num_lines",
            "2",
            "--min_num_gates",
            "2",
            "--max_num_gates",
            "2",
            "--num_gates_increment",
            "2",
            "--num_survivors",
            "2",
            "--num_offspring",
            "2",
            "--batch_size",
            "2",
            "--optimizations_per_circuit",
            "1",
            "--seed",
            "0",
        ])
        .status()
        .expect("failed to run qns binary");
    assert!(status.success());
    assert!(out_path.exists());
    std::fs::remove_file(&out_path).ok();
}
