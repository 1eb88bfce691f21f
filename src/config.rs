// config.rs — Compile-time configuration constants.

// Default compression preset.  Matches the default of the reference xz tool;
// can be overridden by the -0 … -9 command-line flags.
pub const PRESET_DEFAULT: u32 = 6;

// Preset modifier requesting the slower, higher-ratio encoder variants.
// Bit 31 of the preset word, as liblzma defines LZMA_PRESET_EXTREME.
pub const PRESET_EXTREME: u32 = 1 << 31;

// Default context-size factor: each chunk covers this many dictionaries'
// worth of input, rounded up to the page size.  Larger values improve the
// compression ratio at the cost of per-round memory and latency.
// Can be overridden by the -D command-line flag.
pub const CONTEXT_FACTOR_DEFAULT: f64 = 3.0;

// Maximum number of compression worker threads selectable at runtime.
pub const NB_WORKERS_MAX: usize = 200;

// Extension appended to input filenames when no explicit output is given.
pub const XZ_EXTENSION: &str = ".xz";

// Reference sequential tool.  Unsupported operation modes (decompress,
// test, list, …) are delegated to it wholesale via process replacement.
pub const XZ_BINARY: &str = "xz";
