// opts.rs — compression options and display globals.
//
// All tunables are gathered into one immutable `Opts` value built once from
// the parsed command line and passed by reference into the engine.  The only
// cross-module global is the notification level, which gates diagnostics
// printed from both the engine and the CLI layer.

use std::sync::atomic::{AtomicI32, Ordering};

use xz2::stream::Check;

use crate::config::{CONTEXT_FACTOR_DEFAULT, PRESET_DEFAULT, PRESET_EXTREME};
use crate::util::count_cores;

// ---------------------------------------------------------------------------
// Numeric constants
// ---------------------------------------------------------------------------
pub const KB: usize = 1 << 10;
pub const MB: usize = 1 << 20;

// ---------------------------------------------------------------------------
// Display / notification globals
// ---------------------------------------------------------------------------

/// Global notification level. 0 = silent, 1 = errors only, 2 = results +
/// warnings, 3 = progress, 4+ = verbose.
pub static DISPLAY_LEVEL: AtomicI32 = AtomicI32::new(2);

/// Write `msg` to stderr if the current notification level is ≥ `level`.
/// Flushes stderr when level ≥ 4.
#[inline]
pub fn display_level(level: i32, msg: &str) {
    if DISPLAY_LEVEL.load(Ordering::Relaxed) >= level {
        eprint!("{}", msg);
        if DISPLAY_LEVEL.load(Ordering::Relaxed) >= 4 {
            use std::io::Write;
            let _ = std::io::stderr().flush();
        }
    }
}

/// Sets the global notification level.
#[inline]
pub fn set_notification_level(level: i32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Returns the current notification level.
#[inline]
pub fn notification_level() -> i32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

// ---------------------------------------------------------------------------
// Integrity-check kind
// ---------------------------------------------------------------------------

/// Integrity-check algorithm embedded in each compressed stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckKind {
    None,
    Crc32,
    Crc64,
    Sha256,
}

impl CheckKind {
    /// Parses the user-visible spelling accepted by `--check`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(CheckKind::None),
            "crc32" => Some(CheckKind::Crc32),
            "crc64" => Some(CheckKind::Crc64),
            "sha256" => Some(CheckKind::Sha256),
            _ => None,
        }
    }

    /// The corresponding liblzma check constant.
    pub fn to_check(self) -> Check {
        match self {
            CheckKind::None => Check::None,
            CheckKind::Crc32 => Check::Crc32,
            CheckKind::Crc64 => Check::Crc64,
            CheckKind::Sha256 => Check::Sha256,
        }
    }
}

// ---------------------------------------------------------------------------
// Options struct
// ---------------------------------------------------------------------------

/// All tunable parameters for one compression job.
///
/// Constructed once by the CLI layer and never mutated afterwards; the
/// engine receives it by shared reference, so unit tests can run jobs with
/// arbitrary configurations side by side.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Compression preset, 0–9. Default: 6.
    pub preset: u32,
    /// Use the slower, higher-ratio "extreme" encoder variants. Default: false.
    pub extreme: bool,
    /// Per-stream integrity-check algorithm. Default: CRC64 (the xz default).
    pub check: CheckKind,
    /// Number of compression worker threads (≥ 1 once resolved).
    pub nb_workers: usize,
    /// Chunk size factor: each chunk covers `context_factor` dictionaries'
    /// worth of input, rounded up to the page size. Default: 3.0.
    pub context_factor: f64,
    /// Keep (do not delete) the input file after compression. Default: false.
    pub keep_src_file: bool,
    /// Overwrite an existing destination file without complaint. Default: false.
    pub force: bool,
    /// Write compressed output to stdout. Default: false.
    pub to_stdout: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Opts {
            preset: PRESET_DEFAULT,
            extreme: false,
            check: CheckKind::Crc64,
            nb_workers: count_cores(),
            context_factor: CONTEXT_FACTOR_DEFAULT,
            keep_src_file: false,
            force: false,
            to_stdout: false,
        }
    }
}

impl Opts {
    /// The preset word handed to the encoder, extreme flag included.
    #[inline]
    pub fn preset_word(&self) -> u32 {
        if self.extreme {
            self.preset | PRESET_EXTREME
        } else {
            self.preset
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_kind_spellings() {
        assert_eq!(CheckKind::from_name("none"), Some(CheckKind::None));
        assert_eq!(CheckKind::from_name("crc32"), Some(CheckKind::Crc32));
        assert_eq!(CheckKind::from_name("crc64"), Some(CheckKind::Crc64));
        assert_eq!(CheckKind::from_name("sha256"), Some(CheckKind::Sha256));
        assert_eq!(CheckKind::from_name("sha-256"), None);
        assert_eq!(CheckKind::from_name("CRC32"), None);
    }

    #[test]
    fn preset_word_carries_extreme_bit() {
        let mut opts = Opts::default();
        opts.preset = 9;
        assert_eq!(opts.preset_word(), 9);
        opts.extreme = true;
        assert_eq!(opts.preset_word(), 9 | PRESET_EXTREME);
    }

    #[test]
    fn defaults_are_sane() {
        let opts = Opts::default();
        assert_eq!(opts.preset, 6);
        assert_eq!(opts.check, CheckKind::Crc64);
        assert!(opts.nb_workers >= 1);
        assert!(opts.context_factor > 0.0);
    }
}
