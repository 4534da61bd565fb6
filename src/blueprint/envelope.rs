//! Textual framing: `BLUEPRINT:<head-csv>"<base64>"<fingerprint>`.
//!
//! Parsing locates the first `"` as the head/payload boundary and confirms
//! the character 32 positions before the end is also `"`, splitting the
//! line into head, payload, and fingerprint. Formatting rebuilds the same
//! skeleton. Grounded on `blueprint_decode`'s quote-splitting in
//! `examples/original_source/lib/libdspbptk.c` (`strchr` for the opening
//! quote, `string_length - MD5F_LENGTH` for the fingerprint tail).

use tracing::warn;

use crate::blueprint::error::{BlueprintError, BlueprintResult};
use crate::blueprint::model::GameVersion;
use crate::blueprint::primitive::fingerprint::FINGERPRINT_LENGTH;

/// Literal prefix every blueprint line starts with.
pub const PREFIX: &str = "BLUEPRINT:";

/// Minimum input length below which the text cannot possibly be a
/// blueprint: the prefix itself, plus two quotes and a fingerprint.
const ENVELOPE_FLOOR: usize = PREFIX.len();

/// Number of comma-separated fields in the head-csv (see module docs):
/// marker, layout, 5 icons, marker, timestamp, version, short_desc, desc.
const HEAD_FIELD_COUNT: usize = 12;

/// The head-csv's parsed fields, ahead of building a full [`Blueprint`].
pub struct Head {
    pub head_marker_1: String,
    pub layout: i32,
    pub icons: [i32; 5],
    pub head_marker_2: String,
    pub timestamp: i64,
    pub game_version: GameVersion,
    pub short_desc: String,
    pub desc: String,
}

/// The three pieces an envelope line splits into.
pub struct Split<'a> {
    pub head: &'a str,
    pub payload: &'a str,
    pub fingerprint: &'a str,
}

/// Splits `line` into head-csv, base64 payload, and trailing fingerprint.
///
/// # Errors
///
/// Returns [`BlueprintError::NotBlueprint`] if `line` is too short or
/// missing the `BLUEPRINT:` prefix, or
/// [`BlueprintError::FingerprintFramingBroken`] if the trailing
/// `FINGERPRINT_LENGTH` characters are not preceded by the payload's
/// closing quote.
pub fn split(line: &str) -> BlueprintResult<Split<'_>> {
    if line.len() < ENVELOPE_FLOOR || !line.starts_with(PREFIX) {
        return Err(BlueprintError::NotBlueprint);
    }
    let rest = &line[PREFIX.len()..];

    let open_quote = rest.find('"').ok_or(BlueprintError::NotBlueprint)?;
    let head = &rest[..open_quote];
    let after_open = &rest[open_quote + 1..];

    if after_open.len() < FINGERPRINT_LENGTH + 1 {
        return Err(BlueprintError::FingerprintFramingBroken);
    }
    let close_quote = after_open.len() - FINGERPRINT_LENGTH - 1;
    if after_open.as_bytes()[close_quote] != b'"' {
        return Err(BlueprintError::FingerprintFramingBroken);
    }
    let payload = &after_open[..close_quote];
    let fingerprint = &after_open[close_quote + 1..];

    Ok(Split {
        head,
        payload,
        fingerprint,
    })
}

/// Parses a head-csv string (without the `BLUEPRINT:` prefix or quotes)
/// into its typed fields.
///
/// # Errors
///
/// Returns [`BlueprintError::HeadBroken`] if fewer than
/// [`HEAD_FIELD_COUNT`] comma-separated fields are present, or if a
/// numeric field fails to parse as an integer.
pub fn parse_head(head: &str) -> BlueprintResult<Head> {
    let fields: Vec<&str> = head.splitn(HEAD_FIELD_COUNT, ',').collect();
    if fields.len() < HEAD_FIELD_COUNT {
        return Err(BlueprintError::HeadBroken {
            found: fields.len(),
        });
    }

    let parse_i32 = |s: &str| -> BlueprintResult<i32> {
        s.parse().map_err(|_| BlueprintError::HeadBroken { found: fields.len() })
    };

    let icons = [
        parse_i32(fields[2])?,
        parse_i32(fields[3])?,
        parse_i32(fields[4])?,
        parse_i32(fields[5])?,
        parse_i32(fields[6])?,
    ];

    let version_parts: Vec<&str> = fields[9].splitn(4, '.').collect();
    if version_parts.len() != 4 {
        return Err(BlueprintError::HeadBroken {
            found: fields.len(),
        });
    }
    let game_version = GameVersion {
        major: parse_i32(version_parts[0])?,
        minor: parse_i32(version_parts[1])?,
        patch: parse_i32(version_parts[2])?,
        build: parse_i32(version_parts[3])?,
    };

    Ok(Head {
        head_marker_1: fields[0].to_string(),
        layout: parse_i32(fields[1])?,
        icons,
        head_marker_2: fields[7].to_string(),
        timestamp: fields[8]
            .parse()
            .map_err(|_| BlueprintError::HeadBroken { found: fields.len() })?,
        game_version,
        short_desc: fields[10].to_string(),
        desc: fields[11].to_string(),
    })
}

/// Formats a head-csv string from its typed fields, the inverse of
/// [`parse_head`]. Does not validate `short_desc`/`desc` — callers
/// (`codec.rs`) enforce the no-comma/no-quote constraints before calling.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn format_head(head: &Head) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{},{}.{}.{}.{},{},{}",
        head.head_marker_1,
        head.layout,
        head.icons[0],
        head.icons[1],
        head.icons[2],
        head.icons[3],
        head.icons[4],
        head.head_marker_2,
        head.timestamp,
        head.game_version.major,
        head.game_version.minor,
        head.game_version.patch,
        head.game_version.build,
        head.short_desc,
        head.desc,
    )
}

/// Checks a decoded envelope's fingerprint against the digest freshly
/// computed over `prefix` (head + opening quote + payload + closing
/// quote). A mismatch is a warning only — it never fails decoding.
pub fn check_fingerprint(prefix: &str, claimed: &str) {
    let computed = crate::blueprint::primitive::fingerprint::hex(prefix.as_bytes());
    if !computed.eq_ignore_ascii_case(claimed) {
        warn!(claimed, computed, "FingerprintMismatch");
    }
}
