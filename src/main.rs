//! Binary entry point for the `pxz` command-line tool.
//!
//! Handles post-parse validation (console refusals, worker-count
//! resolution), automatic output filename derivation, delegation of
//! unsupported modes to `xz`, and the per-file compression loop.

use std::io::IsTerminal;

use pxz::cli::{delegate_to_xz, parse_args, ParsedArgs};
use pxz::config::{NB_WORKERS_MAX, XZ_EXTENSION};
use pxz::io::{compress_filename_mt, STDIN_MARK, STDOUT_MARK};
use pxz::util::count_cores;

/// Execute the operations selected by argument parsing.
///
/// Returns the process exit code (0 = success, non-zero = error).
fn run(mut args: ParsedArgs) -> i32 {
    // ── Worker count resolution ─────────────────────────────────────────────
    let mut nb_workers = args.nb_workers_raw;
    if nb_workers == 0 {
        nb_workers = count_cores();
    }
    if nb_workers > NB_WORKERS_MAX {
        pxz::displaylevel!(
            3,
            "Requested {} threads too large => automatically reduced to {}\n",
            nb_workers,
            NB_WORKERS_MAX
        );
        nb_workers = NB_WORKERS_MAX;
    } else {
        pxz::displaylevel!(3, "Using {} threads for compression\n", nb_workers);
    }
    args.opts.nb_workers = nb_workers;
    let opts = args.opts;

    // ── Input list: default to stdin, map the "-" convention ────────────────
    if args.in_file_names.is_empty() {
        args.in_file_names.push(STDIN_MARK.to_owned());
    }
    for name in &mut args.in_file_names {
        if name == "-" {
            *name = STDIN_MARK.to_owned();
        }
    }

    for input_filename in &args.in_file_names {
        // ── Console refusals ────────────────────────────────────────────────
        if input_filename == STDIN_MARK && std::io::stdin().is_terminal() {
            pxz::displaylevel!(1, "pxz: refusing to read from a console\n");
            return 1;
        }

        let output_filename: String = if opts.to_stdout || input_filename == STDIN_MARK {
            STDOUT_MARK.to_owned()
        } else {
            let out = format!("{}{}", input_filename, XZ_EXTENSION);
            pxz::displaylevel!(3, "Compressed filename will be : {}\n", out);
            out
        };

        if output_filename == STDOUT_MARK && std::io::stdout().is_terminal() && !opts.force {
            pxz::displaylevel!(
                1,
                "pxz: refusing to write compressed data to a console; use -f to force\n"
            );
            return 1;
        }

        // ── Compression; a fatal error stops the batch ──────────────────────
        let mut in_stream_size = 0u64;
        if let Err(e) =
            compress_filename_mt(&mut in_stream_size, input_filename, &output_filename, &opts)
        {
            pxz::displaylevel!(1, "pxz: {}: {}\n", input_filename, e);
            return 1;
        }
    }

    0
}

fn main() {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("pxz: {}", e);
            std::process::exit(1);
        }
    };

    // Help / version flags were already printed; exit 0.
    if args.exit_early {
        std::process::exit(0);
    }

    // Modes this tool does not implement go to the reference xz wholesale.
    if args.delegate {
        let forwarded: Vec<String> = std::env::args().skip(1).collect();
        let err = delegate_to_xz(&forwarded);
        eprintln!("pxz: cannot run xz: {}", err);
        std::process::exit(1);
    }

    std::process::exit(run(args));
}
