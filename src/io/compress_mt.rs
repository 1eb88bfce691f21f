//! Multi-threaded (MT) round-based compression pipeline.
//!
//! The engine processes its input in *rounds*, each bounded to
//! `nb_workers × chunk_size` bytes:
//!
//! 1. One round buffer is filled sequentially from the input source.
//! 2. The buffer is partitioned into contiguous chunks of `chunk_size`
//!    bytes (the last chunk of the last round may be shorter), and each
//!    chunk is compressed concurrently via [`rayon`] into its own anonymous
//!    temporary file — a complete, independently-decodable `.xz` stream.
//! 3. The temporary files are drained to the output in ascending
//!    chunk-index order, so the artifact is the exact concatenation of the
//!    per-chunk streams in input-byte order.
//!
//! Rounds are strictly sequential: the next read does not begin until the
//! current round's output is fully written, keeping peak memory at one
//! round buffer plus `nb_workers` open temporary files regardless of input
//! size.  Ordering is recovered entirely by chunk indexing, never by worker
//! completion order.
//!
//! Chunks share no dictionary, so the concatenated output trades some
//! compression ratio for fully independent parallel work; any conforming
//! xz decoder accepts the multi-stream concatenation.

use std::fs::{self, File};
use std::io::{self, Read, Seek, Write};

use rayon::prelude::*;

use crate::io::encoder::{chunk_size, compress_chunk};
use crate::io::file_io::{open_dst_file, open_src_file, STDIN_MARK};
use crate::io::guard::OutputGuard;
use crate::io::opts::{Opts, MB};
use crate::util::copy_file_stat;

// ---------------------------------------------------------------------------
// read_to_capacity — fills `buf` as fully as possible from `reader`.
// ---------------------------------------------------------------------------

/// Reads from `reader` until `buf` is full or the source is exhausted,
/// retrying on `Interrupted`.  Returns the number of bytes read; a short
/// count means end of input, 0 a clean end.
fn read_to_capacity(reader: &mut dyn Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

// ---------------------------------------------------------------------------
// compress_stream — the round loop
// ---------------------------------------------------------------------------

/// Compresses everything `reader` yields into `writer` using
/// `opts.nb_workers` parallel chunk encoders.
///
/// Returns `(bytes_read, bytes_written)`.  Any worker failure, read error,
/// or write error aborts the job immediately; the caller is responsible for
/// artifact cleanup.
pub fn compress_stream(
    reader: &mut dyn Read,
    writer: &mut dyn Write,
    opts: &Opts,
) -> io::Result<(u64, u64)> {
    let workers = opts.nb_workers.max(1);
    let cs = chunk_size(opts);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| io::Error::other(format!("cannot create worker pool: {}", e)))?;

    // One private sink per worker slot, reused across rounds.  Anonymous
    // temp files are reclaimed by the OS even on abnormal exit.
    let mut sinks: Vec<File> = (0..workers)
        .map(|_| tempfile::tempfile())
        .collect::<io::Result<_>>()?;

    let mut round_buf = vec![0u8; workers * cs];
    let mut total_in: u64 = 0;
    let mut total_out: u64 = 0;

    loop {
        let rd = read_to_capacity(reader, &mut round_buf)?;
        if rd == 0 {
            if total_in == 0 {
                // Empty input still produces one valid (empty) stream, like
                // the sequential tool.
                total_out += compress_chunk(&[], opts, writer)?;
            }
            break;
        }
        total_in += rd as u64;
        let nchunks = rd.div_ceil(cs);

        for sink in &mut sinks[..nchunks] {
            sink.set_len(0)?;
            sink.rewind()?;
        }

        // Fan out: one encoder per chunk, each against its own read-only
        // slice of the round buffer and its own private sink.  The round
        // buffer is immutable until every worker has joined.
        let buf = &round_buf[..rd];
        pool.install(|| {
            sinks[..nchunks]
                .par_iter_mut()
                .enumerate()
                .try_for_each(|(i, sink)| -> io::Result<()> {
                    let start = i * cs;
                    let end = ((i + 1) * cs).min(buf.len());
                    compress_chunk(&buf[start..end], opts, sink)?;
                    Ok(())
                })
        })?;

        // Reassemble: drain each private sink from its start, in ascending
        // chunk-index order.  This is the only stage that touches `writer`.
        for sink in &mut sinks[..nchunks] {
            sink.rewind()?;
            total_out += io::copy(sink, writer)?;
        }

        crate::displaylevel!(
            3,
            "\rRead : {} MiB   ==> {:.2}%   ",
            total_in >> 20,
            total_out as f64 / total_in as f64 * 100.0
        );

        // A partial round means the source is exhausted.
        if rd < round_buf.len() {
            break;
        }
    }

    Ok((total_in, total_out))
}

// ---------------------------------------------------------------------------
// compress_filename_mt — one compression job, end to end
// ---------------------------------------------------------------------------

/// Compresses `src_filename` into `dst_filename` (sentinels `"stdin"` /
/// `"stdout"` accepted) with `opts.nb_workers` parallel chunk encoders.
///
/// The output-writing window runs under an [`OutputGuard`], so termination
/// signals delete the partial artifact instead of leaving a truncated file
/// behind.  On success, file metadata is propagated onto a file-based
/// artifact (best effort) and the source file is removed unless `opts`
/// says otherwise.  `*in_stream_size` receives the number of uncompressed
/// bytes consumed.
pub fn compress_filename_mt(
    in_stream_size: &mut u64,
    src_filename: &str,
    dst_filename: &str,
    opts: &Opts,
) -> io::Result<()> {
    let (mut reader, src_size) = open_src_file(src_filename)?;
    let dst = open_dst_file(dst_filename, opts)?;
    let artifact = dst.path.clone();

    // Small known-size inputs need fewer worker slots than requested: the
    // final (only) round cannot contain more than ceil(size / chunk_size)
    // chunks, and the round buffer is sized from the worker count.
    let mut job_opts = opts.clone();
    if let Some(size) = src_size {
        let cs = chunk_size(opts) as u64;
        let useful = size.div_ceil(cs).max(1) as usize;
        if useful < job_opts.nb_workers {
            crate::displaylevel!(
                4,
                "pxz: {}: input smaller than {} chunks, using {}\n",
                src_filename,
                job_opts.nb_workers,
                useful
            );
            job_opts.nb_workers = useful;
        }
    }

    let guard = OutputGuard::install(artifact.as_deref())?;
    let mut writer: Box<dyn Write> = Box::new(dst);

    let result = compress_stream(&mut *reader, &mut *writer, &job_opts)
        .and_then(|totals| writer.flush().map(|_| totals));
    drop(writer);

    let (total_in, total_out) = match result {
        Ok(totals) => totals,
        Err(e) => {
            // No partial artifact is ever left in place on a failure path.
            if let Some(path) = &artifact {
                let _ = fs::remove_file(path);
            }
            drop(guard);
            return Err(e);
        }
    };

    // Writing is complete: restore the prior signal dispositions before
    // touching anything else.
    drop(guard);

    if let Some(path) = &artifact {
        if src_filename != STDIN_MARK {
            if let Err(e) = copy_file_stat(src_filename.as_ref(), path) {
                crate::displaylevel!(2, "pxz: {}: cannot copy file attributes: {}\n", dst_filename, e);
            }
        }
    }

    // xz semantics: the input is consumed unless told to keep it, and only
    // when the output went to a real file.
    if artifact.is_some() && !opts.keep_src_file && src_filename != STDIN_MARK {
        fs::remove_file(src_filename).map_err(|e| {
            io::Error::new(e.kind(), format!("{}: cannot remove: {}", src_filename, e))
        })?;
    }

    crate::displaylevel!(
        2,
        "{}: {:.1} MiB -> {:.1} MiB ({:.2}%)\n",
        src_filename,
        total_in as f64 / MB as f64,
        total_out as f64 / MB as f64,
        total_out as f64 / (total_in.max(1)) as f64 * 100.0
    );

    *in_stream_size = total_in;
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
