//! Command-line front end: argument parsing, usage text, and delegation of
//! unsupported operation modes to the reference `xz` tool.

pub mod args;
pub mod delegate;
pub mod help;

pub use args::{parse_args, parse_args_from, ParsedArgs};
pub use delegate::delegate_to_xz;
