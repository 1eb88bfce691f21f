// cli/help.rs — usage and version text.

use crate::config::{CONTEXT_FACTOR_DEFAULT, PRESET_DEFAULT};
use crate::PXZ_VERSION_STRING;

/// Print brief usage to stderr.
pub fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTION]... [FILE]...", program);
    eprintln!("Compress FILEs in the .xz format, using multiple cores.");
    eprintln!();
    eprintln!("  -0 ... -9          compression preset (default {})", PRESET_DEFAULT);
    eprintln!("  -e, --extreme      slower preset variant with better ratio");
    eprintln!("  -T, --threads=NUM  number of worker threads (0 = all cores)");
    eprintln!(
        "  -D, --context-factor=F  chunk size as a multiple of the dictionary (default {})",
        CONTEXT_FACTOR_DEFAULT
    );
    eprintln!("  -C, --check=KIND   integrity check: none, crc32, crc64, sha256");
    eprintln!("  -k, --keep         keep (don't delete) input files");
    eprintln!("  -c, --stdout       write to standard output, keep input files");
    eprintln!("  -f, --force        overwrite existing output files");
    eprintln!("  -q, --quiet        suppress warnings; -v, --verbose: more output");
    eprintln!("  -h, --help         display this help and exit");
    eprintln!("  -V, --version      display version and exit");
    eprintln!();
    eprintln!("With no FILE, or when FILE is -, read standard input.");
    eprintln!("Other modes (decompress, test, list) are handed over to xz.");
}

/// Print the version banner to stdout.
pub fn print_version() {
    println!("pxz {}", PXZ_VERSION_STRING);
}
