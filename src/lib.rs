// pxz — parallel xz compression over independent chunked LZMA streams.

pub mod config;
pub mod util;
pub mod io;
pub mod cli;

// ── Version constants ─────────────────────────────────────────────────────────
pub const PXZ_VERSION_MAJOR: u32 = 0;
pub const PXZ_VERSION_MINOR: u32 = 1;
pub const PXZ_VERSION_RELEASE: u32 = 0;
pub const PXZ_VERSION_STRING: &str = "0.1.0";

/// Returns the runtime version string.
pub fn version_string() -> &'static str {
    PXZ_VERSION_STRING
}

/// Write a formatted message to stderr when the global notification level
/// is at least `$level`.  See [`io::opts::DISPLAY_LEVEL`].
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        $crate::io::opts::display_level($level, &format!($($arg)*))
    };
}
