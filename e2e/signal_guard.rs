// e2e/signal_guard.rs — signal-safety of the output artifact.
//
// Feeds the binary from a FIFO so the job stays blocked mid-round with the
// output artifact already created, then delivers a termination signal and
// verifies the partial artifact is deleted rather than left truncated.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::time::{Duration, Instant};

use nix::sys::signal::{kill, Signal};
use nix::sys::stat::Mode;
use nix::unistd::{mkfifo, Pid};
use tempfile::TempDir;

fn pxz_bin() -> String {
    std::env::var("CARGO_BIN_EXE_pxz").expect("built by cargo test")
}

fn wait_for<F: Fn() -> bool>(cond: F, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    cond()
}

#[test]
fn sigterm_mid_write_deletes_artifact() {
    let dir = TempDir::new().unwrap();
    let fifo = dir.path().join("stream.src");
    mkfifo(&fifo, Mode::from_bits_truncate(0o644)).expect("mkfifo");
    let artifact = dir.path().join("stream.src.xz");

    // The child blocks opening the FIFO until we open the write end, then
    // blocks again inside the first round's read while we hold it open.
    let mut child = Command::new(pxz_bin())
        .args(["-q", "-T2", fifo.to_str().unwrap()])
        .spawn()
        .expect("spawn pxz");

    let mut feeder = OpenOptions::new()
        .write(true)
        .open(&fifo)
        .expect("open fifo for writing");
    feeder.write_all(&vec![0x5au8; 64 * 1024]).expect("feed");
    feeder.flush().unwrap();

    // The artifact is created before the first read completes.
    assert!(
        wait_for(|| artifact.exists(), Duration::from_secs(10)),
        "artifact should have been created before the round completed"
    );

    // Give the child a moment to finish arming its handlers and settle into
    // the blocked read before interrupting it.
    std::thread::sleep(Duration::from_millis(300));

    kill(Pid::from_raw(child.id() as i32), Signal::SIGTERM).expect("kill");
    let status = child.wait().expect("wait");
    assert!(!status.success());

    assert!(
        wait_for(|| !artifact.exists(), Duration::from_secs(10)),
        "interrupted artifact must be deleted, found {:?}",
        artifact
    );
    drop(feeder);
    let _ = fs::remove_file(&fifo);
}

#[test]
fn completed_job_leaves_artifact_in_place() {
    // Control case: without a signal the same plumbing finishes normally and
    // the artifact survives the guard teardown.
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("small.bin");
    fs::write(&input, vec![0x5au8; 32 * 1024]).unwrap();
    let artifact = dir.path().join("small.bin.xz");

    let status = Command::new(pxz_bin())
        .args(["-q", "-T2", "-k", input.to_str().unwrap()])
        .status()
        .expect("run pxz");
    assert!(status.success());
    assert!(artifact.exists());
    assert!(Path::new(&input).exists());
}
