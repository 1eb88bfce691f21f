//! File I/O primitives for the compression pipeline.
//!
//! - [`open_src_file`] — resolves a path string to a `Box<dyn Read>`,
//!   handling the `"stdin"` sentinel and rejecting directories.
//! - [`open_dst_file`] — resolves a path string to a [`DstFile`], handling
//!   the `"stdout"` sentinel and enforcing the overwrite policy from
//!   [`Opts`].
//!
//! Sentinel string constants ([`STDIN_MARK`], [`STDOUT_MARK`]) are exported
//! so callers can compare against them without embedding magic strings.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use crate::io::opts::Opts;
use crate::util::is_directory;

// ---------------------------------------------------------------------------
// Sentinel strings
// ---------------------------------------------------------------------------

/// Sentinel: read from standard input.
pub const STDIN_MARK: &str = "stdin";

/// Sentinel: write to standard output.
pub const STDOUT_MARK: &str = "stdout";

#[inline]
fn is_stdin(s: &str) -> bool {
    s == STDIN_MARK
}

#[inline]
fn is_stdout(s: &str) -> bool {
    s == STDOUT_MARK
}

// ---------------------------------------------------------------------------
// Source file
// ---------------------------------------------------------------------------

/// Opens a source for reading, returning the reader and, for regular files,
/// the size reported by the filesystem (`None` for stdin or unsized inputs).
///
/// - If `path` is the sentinel `"stdin"`, returns standard input.
/// - If `path` is a directory, returns an [`io::ErrorKind::InvalidInput`] error.
/// - Otherwise opens the file and wraps it in a [`BufReader`].
pub fn open_src_file(path: &str) -> io::Result<(Box<dyn Read>, Option<u64>)> {
    if is_stdin(path) {
        return Ok((Box::new(io::stdin()), None));
    }

    if is_directory(Path::new(path)) {
        crate::displaylevel!(1, "pxz: {}: is a directory -- ignored\n", path);
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{}: is a directory", path),
        ));
    }

    let f = File::open(path).map_err(|e| {
        crate::displaylevel!(1, "pxz: {}: {}\n", path, e);
        e
    })?;
    let size = f.metadata().ok().filter(|m| m.is_file()).map(|m| m.len());
    Ok((Box::new(BufReader::new(f)), size))
}

// ---------------------------------------------------------------------------
// Destination file
// ---------------------------------------------------------------------------

/// A write-capable destination produced by [`open_dst_file`].
///
/// Wraps either a regular [`File`] or stdout.  `path` is `Some` only for
/// file-based destinations and is what the signal guard deletes on
/// interruption; stdout has nothing to clean up.
pub struct DstFile {
    inner: Box<dyn Write>,
    pub is_stdout: bool,
    pub path: Option<PathBuf>,
}

impl Write for DstFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Opens a destination for writing, returning a [`DstFile`].
///
/// - `"stdout"` → stdout (`is_stdout = true`, no cleanup path).
/// - For regular paths, refuses to clobber an existing file unless
///   `opts.force` is set.
pub fn open_dst_file(path: &str, opts: &Opts) -> io::Result<DstFile> {
    if is_stdout(path) {
        return Ok(DstFile {
            inner: Box::new(io::stdout()),
            is_stdout: true,
            path: None,
        });
    }

    if !opts.force && Path::new(path).exists() {
        crate::displaylevel!(1, "pxz: {}: already exists; not overwritten\n", path);
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{}: already exists; not overwritten", path),
        ));
    }

    let f = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| {
            crate::displaylevel!(1, "pxz: {}: {}\n", path, e);
            e
        })?;

    Ok(DstFile {
        inner: Box::new(f),
        is_stdout: false,
        path: Some(PathBuf::from(path)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_src_file_nonexistent_returns_err() {
        assert!(open_src_file("/nonexistent/path/that/cannot/exist.xz").is_err());
    }

    #[test]
    fn open_src_file_rejects_directory() {
        let dir = TempDir::new().unwrap();
        assert!(open_src_file(dir.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn open_src_file_reports_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input");
        std::fs::write(&path, b"12345").unwrap();
        let (_, size) = open_src_file(path.to_str().unwrap()).unwrap();
        assert_eq!(size, Some(5));
    }

    #[test]
    fn open_dst_file_stdout_sentinel() {
        let dst = open_dst_file(STDOUT_MARK, &Opts::default()).unwrap();
        assert!(dst.is_stdout);
        assert!(dst.path.is_none());
    }

    #[test]
    fn open_dst_file_refuses_existing_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.xz");
        std::fs::write(&path, b"existing").unwrap();

        let opts = Opts::default();
        assert!(open_dst_file(path.to_str().unwrap(), &opts).is_err());

        let mut forced = Opts::default();
        forced.force = true;
        let dst = open_dst_file(path.to_str().unwrap(), &forced).unwrap();
        assert!(!dst.is_stdout);
        assert_eq!(dst.path.as_deref(), Some(path.as_path()));
    }
}
