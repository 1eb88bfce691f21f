// e2e/cli_integration.rs — CLI integration tests.
//
// Tests the `pxz` binary as a black-box tool using std::process::Command:
// argument handling, output-file derivation, keep/stdout/force behaviour,
// and exit codes.  Outputs are verified by an actual xz decode.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Locate the `pxz` binary produced by Cargo.
fn pxz_bin() -> PathBuf {
    // CARGO_BIN_EXE_pxz is set by Cargo when running integration tests.
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_pxz") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("pxz");
    p
}

fn decode_all(compressed: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    xz2::read::XzDecoder::new_multi_decoder(compressed)
        .read_to_end(&mut out)
        .expect("decode");
    out
}

/// Create a TempDir containing a mildly compressible input file.
fn make_temp_input(len: usize) -> (TempDir, PathBuf, Vec<u8>) {
    let dir = TempDir::new().unwrap();
    let input_path = dir.path().join("input.bin");
    let content: Vec<u8> = (0..len)
        .map(|i| if i % 5 == 0 { (i / 7) as u8 } else { b'x' })
        .collect();
    fs::write(&input_path, &content).unwrap();
    (dir, input_path, content)
}

// ── Compression basics ───────────────────────────────────────────────────────

#[test]
fn compress_derives_output_name_and_consumes_input() {
    let (dir, input, content) = make_temp_input(300_000);
    let output = dir.path().join("input.bin.xz");

    let status = Command::new(pxz_bin())
        .args(["-q", "-T2", input.to_str().unwrap()])
        .status()
        .expect("failed to run pxz");
    assert!(status.success());
    assert!(output.exists(), "derived .xz artifact should exist");
    assert!(!input.exists(), "input should be consumed by default");
    assert_eq!(decode_all(&fs::read(&output).unwrap()), content);
}

#[test]
fn keep_flag_preserves_input() {
    let (dir, input, content) = make_temp_input(50_000);
    let output = dir.path().join("input.bin.xz");

    let status = Command::new(pxz_bin())
        .args(["-qk", input.to_str().unwrap()])
        .status()
        .expect("failed to run pxz");
    assert!(status.success());
    assert!(input.exists());
    assert_eq!(decode_all(&fs::read(&output).unwrap()), content);
}

#[test]
fn stdout_mode_writes_stream_and_keeps_input() {
    let (_dir, input, content) = make_temp_input(50_000);

    let out = Command::new(pxz_bin())
        .args(["-qc", input.to_str().unwrap()])
        .stdout(Stdio::piped())
        .output()
        .expect("failed to run pxz");
    assert!(out.status.success());
    assert!(input.exists(), "stdout mode must not delete the input");
    assert_eq!(decode_all(&out.stdout), content);
}

#[test]
fn stdin_to_stdout_round_trip() {
    use std::io::Write;

    let content: Vec<u8> = b"pipe-fed input, size unknown ahead of time\n".repeat(2000);
    let mut child = Command::new(pxz_bin())
        .args(["-q", "-T2"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn pxz");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(&content)
        .expect("feed stdin");
    let out = child.wait_with_output().expect("wait");
    assert!(out.status.success());
    assert_eq!(decode_all(&out.stdout), content);
}

// ── Overwrite policy ─────────────────────────────────────────────────────────

#[test]
fn existing_output_refused_without_force() {
    let (dir, input, content) = make_temp_input(10_000);
    let output = dir.path().join("input.bin.xz");
    fs::write(&output, b"do not clobber").unwrap();

    let status = Command::new(pxz_bin())
        .args(["-qk", input.to_str().unwrap()])
        .status()
        .expect("failed to run pxz");
    assert!(!status.success());
    assert_eq!(fs::read(&output).unwrap(), b"do not clobber");

    // With -f the file is replaced.
    let status = Command::new(pxz_bin())
        .args(["-qkf", input.to_str().unwrap()])
        .status()
        .expect("failed to run pxz");
    assert!(status.success());
    assert_eq!(decode_all(&fs::read(&output).unwrap()), content);
}

// ── Options affecting the stream ─────────────────────────────────────────────

#[test]
fn check_kind_option_changes_artifact_bytes() {
    let (dir, input, content) = make_temp_input(100_000);
    let output = dir.path().join("input.bin.xz");

    let mut artifacts = Vec::new();
    for check in ["none", "sha256"] {
        let status = Command::new(pxz_bin())
            .args(["-qkf", "-C", check, input.to_str().unwrap()])
            .status()
            .expect("failed to run pxz");
        assert!(status.success());
        let bytes = fs::read(&output).unwrap();
        assert_eq!(decode_all(&bytes), content);
        artifacts.push(bytes);
    }
    assert_ne!(artifacts[0], artifacts[1]);
}

// ── Flags and exit codes ─────────────────────────────────────────────────────

#[test]
fn version_and_help_exit_zero() {
    let out = Command::new(pxz_bin())
        .arg("-V")
        .output()
        .expect("failed to run pxz");
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("pxz "));

    let status = Command::new(pxz_bin())
        .arg("--help")
        .status()
        .expect("failed to run pxz");
    assert!(status.success());
}

#[test]
fn bad_option_value_exits_nonzero() {
    let out = Command::new(pxz_bin())
        .args(["-C", "md5", "whatever"])
        .output()
        .expect("failed to run pxz");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("bad usage"));
}

#[test]
fn missing_input_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.bin");
    let status = Command::new(pxz_bin())
        .args(["-q", missing.to_str().unwrap()])
        .status()
        .expect("failed to run pxz");
    assert!(!status.success());
}
