//! Platform utility helpers: core counting, page-size query, and file
//! metadata propagation.
//!
//! Submodules:
//! - [`cores`]       — CPU core counting
//! - [`file_status`] — isRegFile / isDirectory / setFileStat equivalents
//! - [`page`]        — system page-size query

pub mod cores;
pub mod file_status;
pub mod page;

// ── Re-exports at `util::` level ─────────────────────────────────────────────

pub use cores::count_cores;

pub use file_status::{copy_file_stat, is_directory, is_reg_file, set_file_stat};

pub use page::page_size;
