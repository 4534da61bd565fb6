//! Error types for blueprint codec operations.

use thiserror::Error;

/// Result type for blueprint codec operations.
pub type BlueprintResult<T> = Result<T, BlueprintError>;

/// Fatal errors that can occur while decoding or encoding a blueprint.
///
/// These are the six kinds named in the format's error handling design: each
/// one means decoding stopped before producing a value. Non-fatal conditions
/// (fingerprint mismatch, a dangling building reference, a geometry input
/// collapsing to a pole) are never represented here — they are logged via
/// `tracing` and do not interrupt the pipeline.
#[derive(Debug, Error)]
pub enum BlueprintError {
    /// The input is missing the `BLUEPRINT:` prefix, or is too short to be
    /// one.
    #[error("not a blueprint: missing 'BLUEPRINT:' prefix or input shorter than the envelope floor")]
    NotBlueprint,

    /// The head CSV segment parsed into fewer than 12 of its 13 expected
    /// fields.
    #[error("head broken: expected at least 12 comma-separated fields, got {found}")]
    HeadBroken {
        /// Number of fields actually parsed.
        found: usize,
    },

    /// The trailing 32-character fingerprint is not preceded by the closing
    /// quote of the payload.
    #[error("fingerprint framing broken: expected '\"' before the trailing 32-character fingerprint")]
    FingerprintFramingBroken,

    /// The quoted payload is not valid base64 for the format's alphabet.
    #[error("base64 broken: payload is not valid base64")]
    Base64Broken,

    /// The base64-decoded payload is not a structurally valid gzip stream.
    #[error("gzip broken: payload failed to decompress")]
    GzipBroken,

    /// The binary walk over the inflated payload read past the end of the
    /// buffer.
    #[error("payload truncated: attempted to read {needed} byte(s) at offset {offset}, but only {available} remained")]
    PayloadTruncated {
        /// Byte offset the read was attempted at.
        offset: usize,
        /// Number of bytes the read needed.
        needed: usize,
        /// Number of bytes actually available from that offset.
        available: usize,
    },
}

impl BlueprintError {
    /// Creates a [`BlueprintError::HeadBroken`].
    #[must_use]
    pub fn head_broken(found: usize) -> Self {
        Self::HeadBroken { found }
    }

    /// Creates a [`BlueprintError::PayloadTruncated`].
    #[must_use]
    pub fn payload_truncated(offset: usize, needed: usize, available: usize) -> Self {
        Self::PayloadTruncated {
            offset,
            needed,
            available,
        }
    }
}
