//! Delegation of unsupported operation modes to the reference `xz` tool.

use std::ffi::CString;
use std::io;

use nix::unistd::execvp;

use crate::config::XZ_BINARY;

/// Replaces the current process with `xz`, passing `args` (everything after
/// argv[0]) through unchanged.
///
/// On success this function does not return.  The returned error therefore
/// always means the replacement itself failed (e.g. `xz` not installed).
pub fn delegate_to_xz(args: &[String]) -> io::Error {
    let prog = match CString::new(XZ_BINARY) {
        Ok(p) => p,
        Err(_) => return io::Error::new(io::ErrorKind::InvalidInput, "bad program name"),
    };

    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push(prog.clone());
    for arg in args {
        match CString::new(arg.as_str()) {
            Ok(a) => argv.push(a),
            Err(_) => {
                return io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("argument contains NUL: {:?}", arg),
                )
            }
        }
    }

    match execvp(&prog, &argv) {
        Ok(infallible) => match infallible {},
        Err(e) => io::Error::from(e),
    }
}
