//! Command-line argument parsing for `pxz`.
//!
//! The entry points are [`parse_args`] (reads `std::env::args()`) and
//! [`parse_args_from`] (takes an explicit slice, suitable for unit-testing).
//! Both return a [`ParsedArgs`] value.
//!
//! Short options may be aggregated (e.g. `-9ekv`).  Long options use either
//! `--option=VALUE` or `--option VALUE` syntax.  A bare `--` marks the end
//! of options; all subsequent arguments are treated as file paths.
//!
//! This tool only compresses.  Operation modes it does not implement
//! (`-d`, `-t`, `-l` and their long forms) and options it does not
//! recognise set [`ParsedArgs::delegate`], and the caller replaces the
//! process with the reference `xz` tool carrying the original argv.
//!
//! Bad argument *values* (as opposed to unknown options) return an `Err`
//! with a message that begins with `"bad usage: "`.

use anyhow::{anyhow, Result};

use crate::cli::help::{print_usage, print_version};
use crate::config::NB_WORKERS_MAX;
use crate::io::opts::{set_notification_level, CheckKind, Opts};

// ── Public output type ────────────────────────────────────────────────────────

/// Complete set of options and filenames produced by the parsing loop.
#[derive(Debug)]
pub struct ParsedArgs {
    /// Compression options (thread count still unresolved when 0).
    pub opts: Opts,
    /// Input filenames, in command-line order.
    pub in_file_names: Vec<String>,
    /// Worker count as given (`0` = auto-detect; resolved by the caller).
    pub nb_workers_raw: usize,
    /// When `true`, the whole invocation is handed to the reference `xz`
    /// tool via process replacement.
    pub delegate: bool,
    /// When `true`, a `--help` / `--version` flag was processed; the caller
    /// should exit 0 without performing any I/O.
    pub exit_early: bool,
    /// Program name (argv[0] basename), used by help output.
    pub exe_name: String,
}

// ── Value parsing helpers ─────────────────────────────────────────────────────

fn parse_threads(value: &str) -> Result<usize> {
    let n: usize = value
        .parse()
        .map_err(|_| anyhow!("bad usage: invalid thread count '{}'", value))?;
    if n > NB_WORKERS_MAX {
        return Err(anyhow!(
            "bad usage: thread count {} exceeds maximum {}",
            n,
            NB_WORKERS_MAX
        ));
    }
    Ok(n)
}

fn parse_context_factor(value: &str) -> Result<f64> {
    let f: f64 = value
        .parse()
        .map_err(|_| anyhow!("bad usage: invalid context factor '{}'", value))?;
    if !f.is_finite() || f <= 0.0 {
        return Err(anyhow!("bad usage: context factor must be > 0"));
    }
    Ok(f)
}

fn parse_check(value: &str) -> Result<CheckKind> {
    CheckKind::from_name(value)
        .ok_or_else(|| anyhow!("bad usage: unknown check kind '{}'", value))
}

// ── Parsing loop ──────────────────────────────────────────────────────────────

/// Parses `std::env::args()`.
pub fn parse_args() -> Result<ParsedArgs> {
    let argv: Vec<String> = std::env::args().collect();
    parse_args_from(&argv)
}

/// Parses an explicit argv slice (`argv[0]` = program name).
pub fn parse_args_from(argv: &[String]) -> Result<ParsedArgs> {
    let exe_name = argv
        .first()
        .map(|s| {
            std::path::Path::new(s)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| s.clone())
        })
        .unwrap_or_else(|| "pxz".to_owned());

    let mut parsed = ParsedArgs {
        opts: Opts::default(),
        in_file_names: Vec::new(),
        nb_workers_raw: 0,
        delegate: false,
        exit_early: false,
        exe_name,
    };
    let mut verbosity: i32 = 2;
    let mut no_more_options = false;

    let mut iter = argv.iter().skip(1);
    while let Some(arg) = iter.next() {
        if no_more_options || !arg.starts_with('-') || arg == "-" {
            parsed.in_file_names.push(arg.clone());
            continue;
        }

        // ── Long options ────────────────────────────────────────────────────
        if let Some(long) = arg.strip_prefix("--") {
            if long.is_empty() {
                no_more_options = true;
                continue;
            }
            let (name, inline_value) = match long.split_once('=') {
                Some((n, v)) => (n, Some(v.to_owned())),
                None => (long, None),
            };
            match name {
                "extreme" => parsed.opts.extreme = true,
                "keep" => parsed.opts.keep_src_file = true,
                "stdout" | "to-stdout" => parsed.opts.to_stdout = true,
                "force" => parsed.opts.force = true,
                "quiet" => verbosity -= 1,
                "verbose" => verbosity += 1,
                "threads" | "context-factor" | "check" => {
                    let value = match inline_value {
                        Some(v) => v,
                        None => iter
                            .next()
                            .cloned()
                            .ok_or_else(|| anyhow!("bad usage: --{} requires a value", name))?,
                    };
                    match name {
                        "threads" => parsed.nb_workers_raw = parse_threads(&value)?,
                        "context-factor" => {
                            parsed.opts.context_factor = parse_context_factor(&value)?
                        }
                        _ => parsed.opts.check = parse_check(&value)?,
                    }
                }
                "compress" => {}
                "help" => {
                    print_usage(&parsed.exe_name);
                    parsed.exit_early = true;
                }
                "version" => {
                    print_version();
                    parsed.exit_early = true;
                }
                // Modes this tool does not implement, and anything it does
                // not recognise, go to the reference tool wholesale.
                _ => {
                    parsed.delegate = true;
                    break;
                }
            }
            continue;
        }

        // ── Aggregated short options ────────────────────────────────────────
        let mut chars = arg[1..].chars();
        'aggregate: while let Some(c) = chars.next() {
            match c {
                '0'..='9' => parsed.opts.preset = c as u32 - '0' as u32,
                'e' => parsed.opts.extreme = true,
                'k' => parsed.opts.keep_src_file = true,
                'c' => parsed.opts.to_stdout = true,
                'f' => parsed.opts.force = true,
                'q' => verbosity -= 1,
                'v' => verbosity += 1,
                'z' => {} // compress is the only mode anyway
                'h' => {
                    print_usage(&parsed.exe_name);
                    parsed.exit_early = true;
                }
                'V' => {
                    print_version();
                    parsed.exit_early = true;
                }
                // Value-carrying options: remainder of this argument, or the
                // next argument when the remainder is empty.
                'T' | 'D' | 'C' => {
                    let rest: String = chars.collect();
                    let value = if rest.is_empty() {
                        iter.next()
                            .cloned()
                            .ok_or_else(|| anyhow!("bad usage: -{} requires a value", c))?
                    } else {
                        rest
                    };
                    match c {
                        'T' => parsed.nb_workers_raw = parse_threads(&value)?,
                        'D' => parsed.opts.context_factor = parse_context_factor(&value)?,
                        _ => parsed.opts.check = parse_check(&value)?,
                    }
                    break 'aggregate;
                }
                // Unsupported modes and unknown flags delegate to `xz`.
                _ => {
                    parsed.delegate = true;
                    break 'aggregate;
                }
            }
        }
        if parsed.delegate {
            break;
        }
    }

    set_notification_level(verbosity);
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ParsedArgs {
        let mut argv = vec!["pxz".to_owned()];
        argv.extend(args.iter().map(|s| (*s).to_owned()));
        parse_args_from(&argv).unwrap()
    }

    #[test]
    fn defaults_with_one_file() {
        let p = parse(&["file.txt"]);
        assert_eq!(p.in_file_names, vec!["file.txt"]);
        assert_eq!(p.opts.preset, 6);
        assert!(!p.delegate);
        assert!(!p.exit_early);
        assert_eq!(p.nb_workers_raw, 0);
    }

    #[test]
    fn aggregated_short_options() {
        let p = parse(&["-9ekf", "file"]);
        assert_eq!(p.opts.preset, 9);
        assert!(p.opts.extreme);
        assert!(p.opts.keep_src_file);
        assert!(p.opts.force);
    }

    #[test]
    fn value_options_attached_and_detached() {
        let p = parse(&["-T4", "-D", "2.5", "-Ccrc32", "file"]);
        assert_eq!(p.nb_workers_raw, 4);
        assert_eq!(p.opts.context_factor, 2.5);
        assert_eq!(p.opts.check, CheckKind::Crc32);
    }

    #[test]
    fn long_options() {
        let p = parse(&[
            "--threads=8",
            "--context-factor", "1.5",
            "--check=sha256",
            "--keep",
            "--stdout",
            "file",
        ]);
        assert_eq!(p.nb_workers_raw, 8);
        assert_eq!(p.opts.context_factor, 1.5);
        assert_eq!(p.opts.check, CheckKind::Sha256);
        assert!(p.opts.keep_src_file);
        assert!(p.opts.to_stdout);
    }

    #[test]
    fn unsupported_modes_delegate() {
        assert!(parse(&["-d", "file.xz"]).delegate);
        assert!(parse(&["-t", "file.xz"]).delegate);
        assert!(parse(&["--list", "file.xz"]).delegate);
        assert!(parse(&["--robot"]).delegate);
    }

    #[test]
    fn double_dash_ends_options() {
        let p = parse(&["--", "-9weird-name"]);
        assert!(!p.delegate);
        assert_eq!(p.in_file_names, vec!["-9weird-name"]);
        assert_eq!(p.opts.preset, 6);
    }

    #[test]
    fn dash_is_a_file_operand() {
        let p = parse(&["-"]);
        assert_eq!(p.in_file_names, vec!["-"]);
    }

    #[test]
    fn bad_values_error_out() {
        let argv: Vec<String> = ["pxz", "-T", "many"].iter().map(|s| s.to_string()).collect();
        assert!(parse_args_from(&argv).is_err());
        let argv: Vec<String> = ["pxz", "-D", "-1"].iter().map(|s| s.to_string()).collect();
        assert!(parse_args_from(&argv).is_err());
        let argv: Vec<String> = ["pxz", "-C", "md5"].iter().map(|s| s.to_string()).collect();
        assert!(parse_args_from(&argv).is_err());
        let argv: Vec<String> = ["pxz", "-T", "100000"].iter().map(|s| s.to_string()).collect();
        assert!(parse_args_from(&argv).is_err());
    }
}
