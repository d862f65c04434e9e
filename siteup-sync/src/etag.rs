//! Multipart-compatible etags for local files.
//!
//! S3 fingerprints a multipart object as the md5 of the concatenated raw
//! per-part digests, suffixed with `-` and the part count. Reproducing that
//! scheme locally, chunk for chunk, is the only way to tell whether a local
//! file already matches the stored object without downloading it. A chunk
//! size or hash mismatch never crashes; every comparison just misses and
//! every file re-uploads.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Part size shared by etag computation and multipart transfers.
pub const CHUNK_SIZE: usize = 8_388_608;

/// Computes the S3-style etag of the bytes produced by `reader`.
///
/// Single-chunk streams get the quoted hex digest of the chunk itself;
/// longer streams get the quoted hash-of-hashes form with the chunk count.
/// Returns `None` for an empty stream: there is no digest to compare, and
/// the engine uploads such files unconditionally.
pub fn etag_from_reader<R: Read>(mut reader: R) -> io::Result<Option<String>> {
    let mut digests: Vec<md5::Digest> = Vec::new();
    let mut buf = vec![0u8; CHUNK_SIZE];

    loop {
        let filled = fill_chunk(&mut reader, &mut buf)?;
        if filled == 0 {
            break;
        }
        digests.push(md5::compute(&buf[..filled]));
        if filled < CHUNK_SIZE {
            break;
        }
    }

    Ok(match digests.len() {
        0 => None,
        1 => Some(format!("\"{:x}\"", digests[0])),
        count => {
            let concatenated: Vec<u8> = digests.iter().flat_map(|digest| digest.0).collect();
            Some(format!("\"{:x}-{count}\"", md5::compute(&concatenated)))
        }
    })
}

/// Computes the etag of a file on disk, streaming one chunk at a time.
pub fn etag_for_path(path: &Path) -> io::Result<Option<String>> {
    etag_from_reader(File::open(path)?)
}

/// Reads until `buf` is full or the stream ends, returning the fill level.
///
/// `Read::read` may return short counts; chunk boundaries must land at
/// exactly `CHUNK_SIZE` bytes or the digest diverges from the remote one.
fn fill_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}
