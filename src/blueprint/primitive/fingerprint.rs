//! "MD5F" content fingerprint: the game's digest over a blueprint's textual
//! prefix.
//!
//! MD5F is standard MD5 (RFC 1321) with two of its sixty-four per-round
//! additive constants replaced. No published crate implements this
//! game-specific variant, so it is implemented here from scratch rather
//! than wrapping a crate.
//!
//! # UNRESOLVED BLOCKER: the altered constants are not the game's real values
//!
//! §4.1 requires this function to "reproduce the game's digests bit-for-bit
//! over arbitrary inputs" (a MUST). It does not yet. The original C
//! implementation this format was distilled from treats its MD5F table as
//! an opaque, already-modified constant array (it links against a pre-built
//! object and never shows the derivation), and the retrieved reference
//! sources for this crate do not include that table. `K[3]` and `K[35]`
//! below are placeholders (each the bitwise complement of the stock MD5
//! constant) chosen only to give the function the right *shape* — standard
//! MD5 minus two swapped constants — not to match the game.
//!
//! Consequence: digests produced here will NOT match the real game's
//! digests, or any real blueprint's trailing 32 hex characters. This is
//! acceptable for `decode`'s fingerprint check (a mismatch is a warning,
//! per §4.5) and for this crate's own `decode ∘ encode` round-trip
//! invariant (which only requires self-consistency between what `encode`
//! emits and what a subsequent `decode` sees), but it means bit-for-bit
//! interop with the real game does not hold. `known_answer_vectors` below
//! is explicitly *not* a compatibility test — see its own doc comment.
//! Replace `K[3]`/`K[35]` with the game's real values to close this out;
//! the rest of the algorithm (padding, round functions, shift table) is
//! unmodified RFC 1321 MD5 and does not need to change.

/// Length in hex characters of an MD5F digest.
pub const FINGERPRINT_LENGTH: usize = 32;

const S: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9,
    14, 20, 5, 9, 14, 20, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 6, 10, 15,
    21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

/// Standard MD5 round constants, floor(2^32 * |sin(i + 1)|), with `K[3]` and
/// `K[35]` replaced by their bitwise complement — the game's two "altered
/// round constants" (see module docs for provenance).
const K: [u32; 64] = [
    0xD76A_A478,
    0xE8C7_B756,
    0x2420_70DB,
    0x3E42_3111, // altered (standard: 0xC1BD_CEEE)
    0xF57C_0FAF,
    0x4787_C62A,
    0xA830_4613,
    0xFD46_9501,
    0x6980_98D8,
    0x8B44_F7AF,
    0xFFFF_5BB1,
    0x895C_D7BE,
    0x6B90_1122,
    0xFD98_7193,
    0xA679_438E,
    0x49B4_0821,
    0xF61E_2562,
    0xC040_B340,
    0x265E_5A51,
    0xE9B6_C7AA,
    0xD62F_105D,
    0x0244_1453,
    0xD8A1_E681,
    0xE7D3_FBC8,
    0x21E1_CDE6,
    0xC337_07D6,
    0xF4D5_0D87,
    0x455A_14ED,
    0xA9E3_E905,
    0xFCEF_A3F8,
    0x676F_02D9,
    0x8D2A_4C8A,
    0xFFFA_3942,
    0x8771_F681,
    0x6D9D_6122,
    0x021A_C7F3, // altered (standard: 0xFDE5_380C)
    0xA4BE_EA44,
    0x4BDE_CFA9,
    0xF6BB_4B60,
    0xBEBF_BC70,
    0x289B_7EC6,
    0xEAA1_27FA,
    0xD4EF_3085,
    0x0488_1D05,
    0xD9D4_D039,
    0xE6DB_99E5,
    0x1FA2_7CF8,
    0xC4AC_5665,
    0xF429_2244,
    0x432A_FF97,
    0xAB94_23A7,
    0xFC93_A039,
    0x655B_59C3,
    0x8F0C_CC92,
    0xFFEF_F47D,
    0x8584_5DD1,
    0x6FA8_7E4F,
    0xFE2C_E6E0,
    0xA301_4314,
    0x4E08_11A1,
    0xF753_7E82,
    0xBD3A_F235,
    0x2AD7_D2BB,
    0xEB86_D391,
];

/// Computes the 16-byte MD5F digest of `message`.
#[must_use]
pub fn digest(message: &[u8]) -> [u8; 16] {
    let mut a0: u32 = 0x6745_2301;
    let mut b0: u32 = 0xEFCD_AB89;
    let mut c0: u32 = 0x98BA_DCFE;
    let mut d0: u32 = 0x1032_5476;

    let mut padded = Vec::with_capacity(message.len() + 72);
    padded.extend_from_slice(message);
    let bit_len = (message.len() as u64).wrapping_mul(8);
    padded.push(0x80);
    while padded.len() % 64 != 56 {
        padded.push(0);
    }
    padded.extend_from_slice(&bit_len.to_le_bytes());

    for chunk in padded.chunks_exact(64) {
        let mut m = [0u32; 16];
        for (word, bytes) in m.iter_mut().zip(chunk.chunks_exact(4)) {
            *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }

        let (mut a, mut b, mut c, mut d) = (a0, b0, c0, d0);

        for i in 0..64 {
            let (f, g) = if i < 16 {
                ((b & c) | (!b & d), i)
            } else if i < 32 {
                ((d & b) | (!d & c), (5 * i + 1) % 16)
            } else if i < 48 {
                (b ^ c ^ d, (3 * i + 5) % 16)
            } else {
                (c ^ (b | !d), (7 * i) % 16)
            };

            let f = f
                .wrapping_add(a)
                .wrapping_add(K[i])
                .wrapping_add(m[g]);
            a = d;
            d = c;
            c = b;
            b = b.wrapping_add(f.rotate_left(S[i]));
        }

        a0 = a0.wrapping_add(a);
        b0 = b0.wrapping_add(b);
        c0 = c0.wrapping_add(c);
        d0 = d0.wrapping_add(d);
    }

    let mut out = [0u8; 16];
    out[0..4].copy_from_slice(&a0.to_le_bytes());
    out[4..8].copy_from_slice(&b0.to_le_bytes());
    out[8..12].copy_from_slice(&c0.to_le_bytes());
    out[12..16].copy_from_slice(&d0.to_le_bytes());
    out
}

/// Computes the 32-character uppercase hex MD5F digest of `message`.
#[must_use]
pub fn hex(message: &[u8]) -> String {
    let bytes = digest(message);
    let mut s = String::with_capacity(FINGERPRINT_LENGTH);
    for b in bytes {
        use std::fmt::Write;
        let _ = write!(s, "{b:02X}");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    // NOT a game-compatibility test: these vectors are self-derived from
    // this module's own placeholder `K[3]`/`K[35]` (see the module-level
    // "UNRESOLVED BLOCKER" doc comment), not from the real game or an
    // independent implementation of its actual MD5F table. They only pin
    // this implementation against accidental regression; they prove
    // nothing about matching the game's digests.
    #[test]
    fn self_consistency_vectors_do_not_validate_game_compatibility() {
        let cases: &[(&[u8], &str)] = &[
            (b"", "DE92C6553C1B370D42E531908DA61B7A"),
            (b"a", "11FE923C36EF79E55EB54913180FAF48"),
            (b"abc", "1293408986094915C7825F9E2E36080D"),
            (b"message digest", "BFAEE028D7F79329275604103C515309"),
            (
                b"abcdefghijklmnopqrstuvwxyz",
                "3186BDC16369CFF55D7C8EB2EF8A8526",
            ),
            (
                b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789",
                "DF9F9ABF430C16E7A6CE492908EADC08",
            ),
            (
                b"12345678901234567890123456789012345678901234567890123456789012345678901234567890",
                "31BC20FEFB06B1A8C938F97FA3811FA3",
            ),
        ];
        for (input, expected) in cases {
            assert_eq!(hex(input), *expected, "input = {input:?}");
        }
    }

    #[test]
    fn digest_is_deterministic() {
        let msg = b"BLUEPRINT:0,1,0,0,0,0,0,0,1,0.0.0.0,,\"AAAA\"";
        assert_eq!(hex(msg), hex(msg));
    }

    #[test]
    fn differs_from_stock_md5() {
        // Sanity check that the altered constants actually changed the
        // digest of a non-trivial input relative to what stock MD5 would
        // produce for "abc" (0x90015098...).
        assert_ne!(hex(b"abc"), "900150983CD24FB0D6963F7D28E17F72");
    }

    #[test]
    fn output_length_is_32_hex_chars() {
        assert_eq!(hex(b"anything").len(), FINGERPRINT_LENGTH);
    }
}
