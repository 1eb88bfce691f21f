//! Per-chunk stream encoder.
//!
//! Each chunk of a round is compressed into a complete, self-terminating
//! `.xz` stream from a fresh encoder context: no dictionary is shared
//! between chunks, which is exactly what makes them safe to compress
//! concurrently.  A conforming xz decoder accepts the byte concatenation of
//! such streams as one logical decompression, so the assembled output stays
//! compatible with the sequential tool.

use std::io::{self, Write};

use xz2::stream::{Action, Status, Stream};

use crate::io::opts::{Opts, KB};
use crate::util::page::{page_size, round_up_to_page};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Input is fed to the encoder in blocks of this size.
const FEED_SIZE: usize = 64 * KB;

/// Encoder output is drained through a buffer of this size.
const DRAIN_SIZE: usize = 64 * KB;

// ---------------------------------------------------------------------------
// Preset-derived dictionary size
// ---------------------------------------------------------------------------

/// Returns the LZMA2 dictionary size selected by `preset` (0–9).
///
/// Mirrors liblzma's preset table; the extreme modifier bit is ignored
/// because it does not affect the dictionary size.
pub fn preset_dict_size(preset: u32) -> u64 {
    match preset & 0xFF {
        0 => 1 << 18,       // 256 KiB
        1 => 1 << 20,       // 1 MiB
        2 => 1 << 21,       // 2 MiB
        3 | 4 => 1 << 22,   // 4 MiB
        5 | 6 => 1 << 23,   // 8 MiB
        7 => 1 << 24,       // 16 MiB
        8 => 1 << 25,       // 32 MiB
        _ => 1 << 26,       // 64 MiB (preset 9)
    }
}

/// Returns the chunk size for a job: `context_factor` dictionaries' worth of
/// input rounded up to the page size, never less than one page.
///
/// Constant for the lifetime of a job once its preset is chosen.
pub fn chunk_size(opts: &Opts) -> usize {
    let page = page_size();
    let want = opts.context_factor * preset_dict_size(opts.preset) as f64;
    let bytes = round_up_to_page(want.ceil() as u64, page);
    (bytes as usize).max(page)
}

// ---------------------------------------------------------------------------
// Chunk compression
// ---------------------------------------------------------------------------

/// Compresses `data` as one self-contained `.xz` stream into `sink`.
///
/// A fresh easy-encoder context is created per invocation (preset plus
/// extreme bit, check kind from `opts`).  Input is fed in [`FEED_SIZE`]
/// blocks; whenever the encoder produces output it is drained to `sink`
/// immediately, so the encoder's internal buffering never grows beyond
/// [`DRAIN_SIZE`].  After the last input block, `Action::Finish` is issued
/// repeatedly until the encoder reports `Status::StreamEnd`.
///
/// Returns the number of compressed bytes written.  Encoder construction
/// failure and any unexpected codec status are reported as errors; the
/// caller treats them as fatal.
pub fn compress_chunk(data: &[u8], opts: &Opts, sink: &mut dyn Write) -> io::Result<u64> {
    let mut strm = Stream::new_easy_encoder(opts.preset_word(), opts.check.to_check())
        .map_err(|e| io::Error::other(format!("cannot create encoder context: {}", e)))?;

    let mut out = vec![0u8; DRAIN_SIZE];
    let mut pos = 0usize;
    let mut written: u64 = 0;

    loop {
        let action = if pos < data.len() {
            Action::Run
        } else {
            Action::Finish
        };
        let feed_end = (pos + FEED_SIZE).min(data.len());

        let in_before = strm.total_in();
        let out_before = strm.total_out();
        let status = strm
            .process(&data[pos..feed_end], &mut out, action)
            .map_err(|e| io::Error::other(format!("compression failed: {}", e)))?;
        pos += (strm.total_in() - in_before) as usize;
        let produced = (strm.total_out() - out_before) as usize;

        if produced > 0 {
            sink.write_all(&out[..produced])?;
            written += produced as u64;
        }

        match status {
            Status::Ok => {}
            Status::StreamEnd => break,
            other => {
                return Err(io::Error::other(format!(
                    "unexpected encoder status: {:?}",
                    other
                )))
            }
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    use crate::io::opts::CheckKind;
    use crate::util::page::page_size;

    fn decode_all(compressed: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        xz2::read::XzDecoder::new_multi_decoder(compressed)
            .read_to_end(&mut out)
            .expect("decode");
        out
    }

    #[test]
    fn dict_size_table_is_monotonic() {
        let mut prev = 0;
        for p in 0..=9 {
            let d = preset_dict_size(p);
            assert!(d >= prev, "preset {} shrank the dictionary", p);
            prev = d;
        }
        assert_eq!(preset_dict_size(6), 8 << 20);
        assert_eq!(preset_dict_size(9), 64 << 20);
        // Extreme bit leaves the dictionary untouched.
        assert_eq!(
            preset_dict_size(6 | crate::config::PRESET_EXTREME),
            preset_dict_size(6)
        );
    }

    #[test]
    fn chunk_size_is_page_rounded_and_constant() {
        let page = page_size();
        let mut opts = Opts::default();
        opts.preset = 6;
        opts.context_factor = 3.0;

        let cs = chunk_size(&opts);
        assert_eq!(cs % page, 0);
        assert_eq!(
            cs as u64,
            round_up_to_page(3 * preset_dict_size(6), page)
        );
        // Same opts → same chunk size.
        assert_eq!(cs, chunk_size(&opts));
    }

    #[test]
    fn chunk_size_never_below_one_page() {
        let mut opts = Opts::default();
        opts.preset = 0;
        opts.context_factor = 0.000001;
        assert_eq!(chunk_size(&opts), page_size());
    }

    #[test]
    fn compress_chunk_round_trips() {
        let mut opts = Opts::default();
        opts.preset = 1;
        let data: Vec<u8> = (0u8..=255).cycle().take(300 * KB).collect();

        let mut sink = Vec::new();
        let written = compress_chunk(&data, &opts, &mut sink).unwrap();
        assert_eq!(written as usize, sink.len());
        // xz stream magic.
        assert_eq!(&sink[..6], b"\xfd7zXZ\x00");
        assert_eq!(decode_all(&sink), data);
    }

    #[test]
    fn compress_chunk_empty_input_is_valid_stream() {
        let opts = Opts::default();
        let mut sink = Vec::new();
        compress_chunk(&[], &opts, &mut sink).unwrap();
        assert!(!sink.is_empty());
        assert!(decode_all(&sink).is_empty());
    }

    #[test]
    fn check_kind_changes_stream_bytes_not_plaintext() {
        let data = b"check kind comparison payload".repeat(512);
        let mut bytes = Vec::new();
        for kind in [CheckKind::None, CheckKind::Crc32, CheckKind::Sha256] {
            let mut opts = Opts::default();
            opts.preset = 1;
            opts.check = kind;
            let mut sink = Vec::new();
            compress_chunk(&data, &opts, &mut sink).unwrap();
            assert_eq!(decode_all(&sink), data);
            bytes.push(sink);
        }
        assert_ne!(bytes[0], bytes[1]);
        assert_ne!(bytes[1], bytes[2]);
    }

    #[test]
    fn concatenated_chunks_decode_as_one_stream() {
        let mut opts = Opts::default();
        opts.preset = 1;
        let a = b"first independent chunk ".repeat(100);
        let b = b"second independent chunk".repeat(100);

        let mut cat = Vec::new();
        compress_chunk(&a, &opts, &mut cat).unwrap();
        compress_chunk(&b, &opts, &mut cat).unwrap();

        let mut expect = a.clone();
        expect.extend_from_slice(&b);
        assert_eq!(decode_all(&cat), expect);
    }
}
