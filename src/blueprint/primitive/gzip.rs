//! Gzip adapter used for the payload's inner compression layer.
//!
//! Wraps `flate2`'s `GzEncoder`/`GzDecoder` at the maximum practical
//! compression level. Unlike [`crate::blueprint::primitive::base64`], this
//! adapter is given a caller-owned output buffer to decompress into, so a
//! [`crate::blueprint::codec::Session`] can reuse one scratch allocation
//! across many blueprints instead of letting `flate2` grow its own `Vec`.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::blueprint::error::{BlueprintError, BlueprintResult};

/// Compresses `bytes` at the maximum practical gzip level.
///
/// # Errors
///
/// Returns [`BlueprintError::GzipBroken`] if the in-memory encoder fails —
/// this can only happen on allocation failure, since the input is already
/// fully in memory.
pub fn compress(bytes: &[u8]) -> BlueprintResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 2 + 32), Compression::best());
    encoder.write_all(bytes).map_err(|_| BlueprintError::GzipBroken)?;
    encoder.finish().map_err(|_| BlueprintError::GzipBroken)
}

/// Compresses `bytes` into `out_buf`, reusing its existing allocation rather
/// than starting a fresh `Vec` — the form a [`crate::blueprint::codec::Session`]
/// uses to amortize allocation across many blueprints.
///
/// # Errors
///
/// Returns [`BlueprintError::GzipBroken`] under the same conditions as
/// [`compress`].
pub fn compress_into(bytes: &[u8], out_buf: &mut Vec<u8>) -> BlueprintResult<()> {
    let mut scratch = std::mem::take(out_buf);
    scratch.clear();
    let mut encoder = GzEncoder::new(scratch, Compression::best());
    encoder.write_all(bytes).map_err(|_| BlueprintError::GzipBroken)?;
    *out_buf = encoder.finish().map_err(|_| BlueprintError::GzipBroken)?;
    Ok(())
}

/// Decompresses `bytes` into `out_buf`, returning the number of bytes
/// written.
///
/// `out_buf` is reused across calls by a [`crate::blueprint::codec::Session`]
/// rather than reallocated; it is truncated to the decompressed length on
/// return, but its capacity is left untouched.
///
/// # Errors
///
/// Returns [`BlueprintError::GzipBroken`] when `bytes` is not a structurally
/// valid gzip stream.
pub fn decompress(bytes: &[u8], out_buf: &mut Vec<u8>) -> BlueprintResult<usize> {
    out_buf.clear();
    let mut decoder = GzDecoder::new(bytes);
    decoder
        .read_to_end(out_buf)
        .map_err(|_| BlueprintError::GzipBroken)?;
    Ok(out_buf.len())
}

/// Reads the little-endian 32-bit ISIZE trailer field: the decompressed
/// length modulo 2^32, as declared by the gzip stream itself.
///
/// This is only a hint for sizing an output buffer ahead of a full
/// decompress — the actual decompressed length is re-checked by
/// [`decompress`], since ISIZE wraps for inputs over 4 GiB.
///
/// # Errors
///
/// Returns [`BlueprintError::GzipBroken`] if `bytes` is shorter than the
/// 8-byte gzip trailer.
pub fn declared_len(bytes: &[u8]) -> BlueprintResult<u32> {
    if bytes.len() < 8 {
        return Err(BlueprintError::GzipBroken);
    }
    let tail = &bytes[bytes.len() - 4..];
    Ok(u32::from_le_bytes([tail[0], tail[1], tail[2], tail[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_arbitrary_bytes() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(100);
        let compressed = compress(&data).unwrap();
        let mut out = Vec::new();
        let used = decompress(&compressed, &mut out).unwrap();
        assert_eq!(used, data.len());
        assert_eq!(out, data);
    }

    #[test]
    fn round_trips_empty_input() {
        let compressed = compress(b"").unwrap();
        let mut out = Vec::new();
        assert_eq!(decompress(&compressed, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn rejects_malformed_stream() {
        let mut out = Vec::new();
        assert!(decompress(b"not a gzip stream", &mut out).is_err());
    }

    #[test]
    fn declared_len_matches_actual_length_for_small_inputs() {
        let data = vec![7u8; 4096];
        let compressed = compress(&data).unwrap();
        assert_eq!(declared_len(&compressed).unwrap(), data.len() as u32);
    }

    #[test]
    fn declared_len_rejects_truncated_stream() {
        assert!(declared_len(b"short").is_err());
    }

    #[test]
    fn compress_into_matches_compress() {
        let data = b"reuse this buffer across calls".repeat(10);
        let mut buf = Vec::with_capacity(8192);
        compress_into(&data, &mut buf).unwrap();
        let mut out = Vec::new();
        decompress(&buf, &mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn out_buf_capacity_is_reused_across_calls() {
        let mut out = Vec::with_capacity(4096);
        let compressed = compress(b"hello").unwrap();
        decompress(&compressed, &mut out).unwrap();
        assert!(out.capacity() >= 4096);
    }
}
