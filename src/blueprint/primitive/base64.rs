//! Base64 adapter over the format's fixed alphabet: RFC 4648 standard,
//! mandatory `=` padding, no whitespace, no URL-safe substitution.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::blueprint::error::{BlueprintError, BlueprintResult};

/// Encodes `bytes` to base64 text using the format's fixed alphabet.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes base64 `text` encoded with the format's fixed alphabet.
///
/// # Errors
///
/// Returns [`BlueprintError::Base64Broken`] when `text` contains bytes
/// outside the standard alphabet or has malformed padding.
pub fn decode(text: &str) -> BlueprintResult<Vec<u8>> {
    STANDARD
        .decode(text.as_bytes())
        .map_err(|_| BlueprintError::Base64Broken)
}

/// Decodes `text` into `out_buf`, reusing its existing capacity rather than
/// allocating a fresh `Vec` — the form a [`crate::blueprint::codec::Session`]
/// uses to amortize allocation across many blueprints.
///
/// # Errors
///
/// Returns [`BlueprintError::Base64Broken`] under the same conditions as
/// [`decode`]. `out_buf` is left cleared on failure.
pub fn decode_into(text: &str, out_buf: &mut Vec<u8>) -> BlueprintResult<()> {
    out_buf.clear();
    STANDARD
        .decode_vec(text.as_bytes(), out_buf)
        .map_err(|_| BlueprintError::Base64Broken)
}

/// A tight upper bound on the decoded length of a base64 string of length
/// `text_len`, without performing the decode.
#[must_use]
pub const fn decoded_len(text_len: usize) -> usize {
    (text_len / 4 + 1) * 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_arbitrary_bytes() {
        let data = b"\x00\x01\x02BLUEPRINT\xff\xfe".to_vec();
        let encoded = encode(&data);
        assert_eq!(decode(&encoded).unwrap(), data);
    }

    #[test]
    fn empty_input_round_trips() {
        assert_eq!(encode(b""), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn rejects_invalid_alphabet() {
        assert!(decode("not valid base64!! @@").is_err());
    }

    #[test]
    fn rejects_malformed_padding() {
        assert!(decode("AB=").is_err());
    }

    #[test]
    fn decoded_len_is_an_upper_bound() {
        let data = vec![0xAB; 1000];
        let encoded = encode(&data);
        assert!(decode(&encoded).unwrap().len() <= decoded_len(encoded.len()));
    }

    #[test]
    fn decode_into_reuses_buffer_and_matches_decode() {
        let data = b"some bytes to round trip".to_vec();
        let encoded = encode(&data);
        let mut buf = Vec::with_capacity(4096);
        decode_into(&encoded, &mut buf).unwrap();
        assert_eq!(buf, data);
        assert!(buf.capacity() >= 4096);
    }

    #[test]
    fn decode_into_clears_on_failure() {
        let mut buf = vec![1, 2, 3];
        assert!(decode_into("not valid!!", &mut buf).is_err());
        assert!(buf.is_empty());
    }
}
