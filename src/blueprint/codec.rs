//! The codec façade: a reusable [`Session`] owning the scratch buffers and
//! primitive handles that `decode`/`encode` share across many blueprints.
//!
//! Mirrors `dspbptk_coder_t`'s `buffer0`/`buffer1` pair in
//! `examples/original_source/lib/libdspbptk.c`: one large allocation
//! amortized across a batch, rather than one per call. `decode` and
//! `encode` are non-reentrant on a given session (both take `&mut self`),
//! matching §5's "no concurrent calls on one session" contract.

use tracing::{debug, info};

use crate::blueprint::error::{BlueprintError, BlueprintResult};
use crate::blueprint::envelope::{self, Head};
use crate::blueprint::model::{Blueprint, Building};
use crate::blueprint::primitive::{base64, fingerprint, gzip};
use crate::blueprint::reference::IndexTable;
use crate::blueprint::schema;
use crate::config::SessionConfig;

/// Default scratch-buffer ceiling, per the format's own blueprint size cap.
pub const DEFAULT_MAX_BLUEPRINT_BYTES: usize = 256 * 1024 * 1024;

/// A reusable codec session: owns the two scratch buffers `decode`/`encode`
/// share, so processing many blueprints in sequence costs one large
/// allocation, not `N`.
///
/// Not `Sync`-friendly by construction: every operation takes `&mut self`,
/// so the borrow checker — not a runtime check — enforces "one session per
/// thread, no concurrent calls."
pub struct Session {
    max_blueprint_bytes: usize,
    compressed_scratch: Vec<u8>,
    binary_scratch: Vec<u8>,
}

impl Session {
    /// Creates a session with the default 256 MiB scratch ceiling.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&SessionConfig::default())
    }

    /// Creates a session sized per `config`'s `max_blueprint_bytes`.
    ///
    /// Both scratch buffers are reserved to the full ceiling up front — the
    /// point of a session is to pay that allocation once, not once per
    /// `decode`/`encode` call.
    #[must_use]
    pub fn with_config(config: &SessionConfig) -> Self {
        Self {
            max_blueprint_bytes: config.max_blueprint_bytes,
            compressed_scratch: Vec::with_capacity(config.max_blueprint_bytes),
            binary_scratch: Vec::with_capacity(config.max_blueprint_bytes),
        }
    }

    /// The scratch-buffer ceiling this session was constructed with.
    #[must_use]
    pub const fn max_blueprint_bytes(&self) -> usize {
        self.max_blueprint_bytes
    }

    /// Decodes a blueprint text line into a [`Blueprint`].
    ///
    /// Fails early at the first broken pipeline stage (§4.6): envelope
    /// framing, head-csv parse, base64, gzip, then the binary walk. A
    /// fingerprint mismatch is logged as a warning and does not fail
    /// decoding.
    ///
    /// # Errors
    ///
    /// Returns the first [`BlueprintError`] encountered in the pipeline.
    pub fn decode(&mut self, line: &str) -> BlueprintResult<Blueprint> {
        let split = envelope::split(line)?;
        let head = envelope::parse_head(split.head)?;

        base64::decode_into(split.payload, &mut self.compressed_scratch)?;
        if self.compressed_scratch.len() > self.max_blueprint_bytes {
            return Err(BlueprintError::GzipBroken);
        }
        gzip::decompress(&self.compressed_scratch, &mut self.binary_scratch)?;
        if self.binary_scratch.len() > self.max_blueprint_bytes {
            return Err(BlueprintError::PayloadTruncated {
                offset: 0,
                needed: self.binary_scratch.len(),
                available: self.max_blueprint_bytes,
            });
        }

        let data = &self.binary_scratch;
        let (header, mut offset) = schema::read_header(data, 0)?;
        debug!(num_areas = header.num_areas, "read payload header");

        let mut areas = Vec::with_capacity(header.num_areas as usize);
        for _ in 0..header.num_areas {
            let (area, len) = schema::read_area(data, offset)?;
            offset += len;
            areas.push(area);
        }

        let num_buildings = schema::read_u32(data, offset)?;
        offset += 4;

        // `num_buildings` comes straight off the wire; cap the eager
        // allocation so a crafted huge count can't force an OOM before the
        // subsequent `read_building` calls fail with `PayloadTruncated`.
        let mut buildings = Vec::with_capacity((num_buildings as usize).min(4096));
        for _ in 0..num_buildings {
            let (building, len) = schema::read_building(data, offset)?;
            offset += len;
            buildings.push(building);
        }

        let blueprint = Blueprint {
            head_marker_1: head.head_marker_1,
            head_marker_2: head.head_marker_2,
            layout: head.layout,
            icons: head.icons,
            timestamp: head.timestamp,
            game_version: head.game_version,
            payload_version: header.payload_version,
            short_desc: head.short_desc,
            desc: head.desc,
            cursor_offset_x: header.cursor_offset_x,
            cursor_offset_y: header.cursor_offset_y,
            cursor_target_area: header.cursor_target_area,
            drag_box_size_x: header.drag_box_size_x,
            drag_box_size_y: header.drag_box_size_y,
            primary_area_idx: header.primary_area_idx,
            areas,
            buildings,
            fingerprint: split.fingerprint.to_string(),
        };

        let prefix = format!("{}{}\"{}\"", envelope::PREFIX, split.head, split.payload);
        envelope::check_fingerprint(&prefix, split.fingerprint);

        info!(
            areas = blueprint.areas.len(),
            buildings = blueprint.buildings.len(),
            "decoded blueprint"
        );
        Ok(blueprint)
    }

    /// Encodes a [`Blueprint`] back into a blueprint text line.
    ///
    /// Building cross-references (`index`, `temp_output_obj_idx`,
    /// `temp_input_obj_idx`) are rewritten to array positions via the
    /// [`IndexTable`] (§4.4), and homogeneous offsets are normalized to
    /// `w = 1` (§3), before anything is written. The fingerprint is
    /// computed fresh over the emitted prefix and appended last.
    #[must_use]
    pub fn encode(&mut self, blueprint: &Blueprint) -> String {
        let table = IndexTable::build(&blueprint.buildings);

        self.binary_scratch.clear();
        let buf = &mut self.binary_scratch;

        let header = schema::Header {
            payload_version: blueprint.payload_version,
            cursor_offset_x: blueprint.cursor_offset_x,
            cursor_offset_y: blueprint.cursor_offset_y,
            cursor_target_area: blueprint.cursor_target_area,
            drag_box_size_x: blueprint.drag_box_size_x,
            drag_box_size_y: blueprint.drag_box_size_y,
            primary_area_idx: blueprint.primary_area_idx,
            num_areas: blueprint.areas.len() as u8,
        };
        schema::write_header(buf, &header);
        for area in &blueprint.areas {
            schema::write_area(buf, area);
        }
        schema::write_u32(buf, blueprint.buildings.len() as u32);
        for building in &blueprint.buildings {
            let rewritten = rewrite_for_encode(building, &table);
            schema::write_building(buf, &rewritten);
        }

        gzip::compress_into(&self.binary_scratch, &mut self.compressed_scratch)
            .expect("in-memory gzip compression cannot fail");
        let payload = base64::encode(&self.compressed_scratch);

        let head = Head {
            head_marker_1: blueprint.head_marker_1.clone(),
            layout: blueprint.layout,
            icons: blueprint.icons,
            head_marker_2: blueprint.head_marker_2.clone(),
            timestamp: blueprint.timestamp,
            game_version: blueprint.game_version,
            short_desc: blueprint.short_desc.clone(),
            desc: blueprint.desc.clone(),
        };
        let head_csv = envelope::format_head(&head);

        let mut line = String::with_capacity(
            envelope::PREFIX.len() + head_csv.len() + payload.len() + fingerprint::FINGERPRINT_LENGTH + 2,
        );
        line.push_str(envelope::PREFIX);
        line.push_str(&head_csv);
        line.push('"');
        line.push_str(&payload);
        line.push('"');
        let digest = fingerprint::hex(line.as_bytes());
        line.push_str(&digest);

        info!(
            areas = blueprint.areas.len(),
            buildings = blueprint.buildings.len(),
            encoded_len = line.len(),
            "encoded blueprint"
        );
        line
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the encode-time copy of `building` with its cross-references
/// resolved to array positions and its offsets' `w` normalized to `1.0`.
fn rewrite_for_encode(building: &Building, table: &IndexTable) -> Building {
    let mut rewritten = building.clone();
    rewritten.local_offset.normalize_w();
    rewritten.local_offset_2.normalize_w();
    rewritten.index = match table.position_of(building.index) {
        Some(pos) => crate::blueprint::model::BuildingId(pos),
        None => building.index,
    };
    rewritten.temp_output_obj_idx = table.resolve(building.temp_output_obj_idx);
    rewritten.temp_input_obj_idx = table.resolve(building.temp_input_obj_idx);
    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::model::{Area, Offset4, Reference};

    fn empty_blueprint() -> Blueprint {
        let mut bp = Blueprint::new();
        bp.short_desc = "short".to_string();
        bp.desc = "a description".to_string();
        bp
    }

    #[test]
    fn round_trips_empty_blueprint() {
        let mut session = Session::new();
        let bp = empty_blueprint();
        let text = session.encode(&bp);
        let decoded = session.decode(&text).unwrap();
        assert_eq!(decoded.areas.len(), 0);
        assert_eq!(decoded.buildings.len(), 0);
        assert_eq!(decoded.short_desc, "short");
        assert_eq!(decoded.desc, "a description");
        assert_eq!(decoded.fingerprint.len(), fingerprint::FINGERPRINT_LENGTH);
    }

    #[test]
    fn encode_emits_matching_fingerprint() {
        let mut session = Session::new();
        let bp = empty_blueprint();
        let text = session.encode(&bp);
        let decoded = session.decode(&text).unwrap();
        let prefix = &text[..text.len() - fingerprint::FINGERPRINT_LENGTH];
        assert_eq!(fingerprint::hex(prefix.as_bytes()), decoded.fingerprint);
    }

    #[test]
    fn decode_of_flipped_fingerprint_still_succeeds_with_warning() {
        let mut session = Session::new();
        let bp = empty_blueprint();
        let text = session.encode(&bp);
        let mut bytes = text.into_bytes();
        let last = bytes.len() - 1;
        bytes[last] = if bytes[last] == b'0' { b'1' } else { b'0' };
        let text = String::from_utf8(bytes).unwrap();
        let decoded = session.decode(&text).unwrap();
        let reencoded = session.encode(&decoded);
        let redecoded = session.decode(&reencoded).unwrap();
        assert_eq!(
            reencoded[reencoded.len() - fingerprint::FINGERPRINT_LENGTH..],
            redecoded.fingerprint
        );
    }

    #[test]
    fn scenario_cross_reference_becomes_array_position_after_encode() {
        fn building(index: u32) -> Building {
            Building {
                index: crate::blueprint::model::BuildingId(index),
                area_index: 0,
                local_offset: Offset4::new(0.0, 0.0, 0.0),
                local_offset_2: Offset4::new(0.0, 0.0, 0.0),
                yaw: 0.0,
                yaw_2: 0.0,
                item_id: 0,
                model_index: 0,
                recipe_id: 0,
                filter_id: 0,
                temp_output_obj_idx: Reference::None,
                temp_input_obj_idx: Reference::None,
                output_to_slot: 0,
                input_from_slot: 0,
                output_from_slot: 0,
                input_to_slot: 0,
                output_offset: 0,
                input_offset: 0,
                parameters: Vec::new(),
            }
        }

        let mut bp = empty_blueprint();
        let mut b0 = building(0);
        b0.temp_output_obj_idx = Reference::Some(crate::blueprint::model::BuildingId(7));
        let b1 = building(7);
        bp.buildings = vec![b0, b1];

        let mut session = Session::new();
        let text = session.encode(&bp);
        let decoded = session.decode(&text).unwrap();
        assert_eq!(
            decoded.buildings[0].temp_output_obj_idx,
            Reference::Some(crate::blueprint::model::BuildingId(1))
        );
    }

    #[test]
    fn zero_areas_zero_buildings_payload_is_header_plus_num_buildings() {
        let mut session = Session::new();
        let bp = empty_blueprint();
        let _ = session.encode(&bp);
        assert_eq!(session.binary_scratch.len(), schema::HEADER_LEN + 4);
    }

    #[test]
    fn building_with_area_round_trips() {
        let mut bp = empty_blueprint();
        bp.areas.push(Area {
            index: 0,
            parent_index: -1,
            tropic_anchor: 0,
            area_segments: 4,
            anchor_local_offset_x: 0,
            anchor_local_offset_y: 0,
            width: 64,
            height: 64,
        });
        let mut session = Session::new();
        let text = session.encode(&bp);
        let decoded = session.decode(&text).unwrap();
        assert_eq!(decoded.areas.len(), 1);
        assert_eq!(decoded.areas[0].area_segments, 4);
    }
}
