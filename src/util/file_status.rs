//! File status helpers: regular-file / directory tests and metadata
//! propagation from a source file onto its compressed artifact.

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use filetime::FileTime;

/// Returns `true` if `path` exists and is a regular file.
pub fn is_reg_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Returns `true` if `path` exists and is a directory.
pub fn is_directory(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Sets modification time, ownership, and permission bits on a regular file.
///
/// Returns `Err` if `path` is not a regular file.  Ownership changes
/// typically require privileges; the caller decides whether a failure is
/// fatal (for artifact finalization it is only a warning).
///
/// * `mtime` — desired last-modification time
/// * `uid`   — desired owner UID
/// * `gid`   — desired owner GID
/// * `mode`  — desired permission bits; lower 12 bits are applied
pub fn set_file_stat(
    path: &Path,
    mtime: SystemTime,
    uid: u32,
    gid: u32,
    mode: u32,
) -> io::Result<()> {
    if !is_reg_file(path) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "set_file_stat: not a regular file",
        ));
    }

    // atime is set to "now"; only mtime is propagated from the source.
    let atime = FileTime::from_system_time(SystemTime::now());
    let ft_mtime = FileTime::from_system_time(mtime);
    filetime::set_file_times(path, atime, ft_mtime)?;

    {
        use nix::unistd::{chown, Gid, Uid};
        chown(path, Some(Uid::from_raw(uid)), Some(Gid::from_raw(gid)))
            .map_err(io::Error::from)?;
    }

    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))?;
    }

    Ok(())
}

/// Copies mtime, uid/gid, and permission bits from `src` to `dst`.
pub fn copy_file_stat(src: &Path, dst: &Path) -> io::Result<()> {
    let m = fs::metadata(src)?;
    let mtime = m.modified().unwrap_or(SystemTime::UNIX_EPOCH);

    let (uid, gid, mode) = {
        use std::os::unix::fs::MetadataExt;
        (m.uid(), m.gid(), m.mode())
    };

    set_file_stat(dst, mtime, uid, gid, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn is_reg_file_and_is_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("f");
        fs::write(&file, b"x").unwrap();

        assert!(is_reg_file(&file));
        assert!(!is_reg_file(dir.path()));
        assert!(is_directory(dir.path()));
        assert!(!is_directory(&file));
        assert!(!is_reg_file(Path::new("/nonexistent/x")));
    }

    #[test]
    fn set_file_stat_rejects_directory() {
        let dir = TempDir::new().unwrap();
        let err = set_file_stat(dir.path(), SystemTime::now(), 0, 0, 0o644);
        assert!(err.is_err());
    }

    #[test]
    fn copy_file_stat_propagates_mtime_and_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        let dst = dir.path().join("dst");
        fs::write(&src, b"source").unwrap();
        fs::write(&dst, b"dest").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o640)).unwrap();

        copy_file_stat(&src, &dst).unwrap();

        let sm = fs::metadata(&src).unwrap();
        let dm = fs::metadata(&dst).unwrap();
        assert_eq!(dm.permissions().mode() & 0o7777, 0o640);
        // mtime propagated (second resolution is enough here).
        let s = sm.modified().unwrap();
        let d = dm.modified().unwrap();
        let delta = s
            .duration_since(d)
            .unwrap_or_else(|e| e.duration())
            .as_secs();
        assert!(delta <= 1);
    }
}
