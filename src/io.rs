//! Compression I/O engine.
//!
//! This module assembles the engine sub-modules and re-exports the symbols
//! consumed by the CLI layer.

pub mod compress_mt;
pub mod encoder;
pub mod file_io;
pub mod guard;
pub mod opts;

// ── Core type re-exports ─────────────────────────────────────────────────────
pub use opts::{CheckKind, Opts};

// ── Special I/O sentinels ────────────────────────────────────────────────────
pub use file_io::{STDIN_MARK, STDOUT_MARK};

// ── Notification level ───────────────────────────────────────────────────────
pub use opts::set_notification_level;

// ── Compression public API ───────────────────────────────────────────────────
pub use compress_mt::{compress_filename_mt, compress_stream};
pub use encoder::{chunk_size, preset_dict_size};
