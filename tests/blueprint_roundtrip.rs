//! Integration tests for the full envelope ⇄ model round trip, covering the
//! concrete scenarios and boundary behaviors named in the format's testable
//! properties.

use dspbp_codec::blueprint::codec::Session;
use dspbp_codec::blueprint::model::{Area, Building, BuildingId, GameVersion, Offset4, Reference};
use dspbp_codec::Blueprint;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .try_init();
}

fn minimal_blueprint() -> Blueprint {
    let mut bp = Blueprint::new();
    bp.layout = 0;
    bp.game_version = GameVersion {
        major: 0,
        minor: 10,
        patch: 28,
        build: 23416,
    };
    bp
}

fn sample_building(index: u32) -> Building {
    Building {
        index: BuildingId(index),
        area_index: 0,
        local_offset: Offset4::new(12.5, -30.0, 0.0),
        local_offset_2: Offset4::new(0.0, 0.0, 0.0),
        yaw: 90.0,
        yaw_2: 0.0,
        item_id: 2011,
        model_index: 38,
        recipe_id: -1,
        filter_id: -1,
        temp_output_obj_idx: Reference::None,
        temp_input_obj_idx: Reference::None,
        output_to_slot: -1,
        input_from_slot: -1,
        output_from_slot: 0,
        input_to_slot: 0,
        output_offset: 0,
        input_offset: 0,
        parameters: vec![1, 2, 3],
    }
}

#[test]
fn scenario_1_minimal_envelope_round_trips_byte_for_byte() {
    init_tracing();
    let mut session = Session::new();
    let bp = minimal_blueprint();
    let text = session.encode(&bp);
    let decoded = session.decode(&text).unwrap();
    let reencoded = session.encode(&decoded);
    assert_eq!(text, reencoded);
}

#[test]
fn scenario_2_flipped_fingerprint_warns_but_decodes_and_reencode_is_correct() {
    init_tracing();
    let mut session = Session::new();
    let bp = minimal_blueprint();
    let text = session.encode(&bp);

    let mut bytes = text.into_bytes();
    let last = bytes.len() - 1;
    bytes[last] = if bytes[last].is_ascii_digit() { b'F' } else { b'0' };
    let tampered = String::from_utf8(bytes).unwrap();

    // Decoding a blueprint with a mismatched fingerprint still succeeds —
    // the mismatch is a warning, not a fatal error.
    let decoded = session.decode(&tampered).unwrap();
    let reencoded = session.encode(&decoded);
    let expected_fp = &reencoded[reencoded.len() - 32..];
    let recomputed = dspbp_codec::blueprint::primitive::fingerprint::hex(
        reencoded[..reencoded.len() - 32].as_bytes(),
    );
    assert_eq!(expected_fp, recomputed);
}

#[test]
fn scenario_3_cross_reference_resolves_to_array_position() {
    init_tracing();
    let mut session = Session::new();
    let mut bp = minimal_blueprint();
    let mut b0 = sample_building(0);
    b0.temp_output_obj_idx = Reference::Some(BuildingId(7));
    let b1 = sample_building(7);
    bp.buildings = vec![b0, b1];

    let text = session.encode(&bp);
    let decoded = session.decode(&text).unwrap();
    assert_eq!(
        decoded.buildings[0].temp_output_obj_idx,
        Reference::Some(BuildingId(1))
    );
}

#[test]
fn full_round_trip_preserves_structure_modulo_fingerprint_and_w() {
    init_tracing();
    let mut session = Session::new();
    let mut bp = minimal_blueprint();
    bp.short_desc = "base layout".to_string();
    bp.desc = "a handcrafted test blueprint".to_string();
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
    bp.buildings = vec![sample_building(0), sample_building(1)];

    let text = session.encode(&bp);
    let decoded = session.decode(&text).unwrap();

    assert_eq!(decoded.layout, bp.layout);
    assert_eq!(decoded.game_version, bp.game_version);
    assert_eq!(decoded.short_desc, bp.short_desc);
    assert_eq!(decoded.desc, bp.desc);
    assert_eq!(decoded.areas, bp.areas);
    assert_eq!(decoded.buildings.len(), bp.buildings.len());
    for (original, round_tripped) in bp.buildings.iter().zip(decoded.buildings.iter()) {
        assert_eq!(original.index, round_tripped.index);
        assert_eq!(original.local_offset.x, round_tripped.local_offset.x);
        assert_eq!(original.local_offset.y, round_tripped.local_offset.y);
        assert_eq!(round_tripped.local_offset.w, 1.0);
    }
}

#[test]
fn decode_encode_decode_equals_decode() {
    init_tracing();
    let mut session = Session::new();
    let mut bp = minimal_blueprint();
    bp.buildings = vec![sample_building(0)];
    let text = session.encode(&bp);

    let once = session.decode(&text).unwrap();
    let reencoded = session.encode(&once);
    let twice = session.decode(&reencoded).unwrap();

    assert_eq!(once.buildings, twice.buildings);
    assert_eq!(once.areas, twice.areas);
    assert_eq!(once.layout, twice.layout);
}

#[test]
fn boundary_zero_areas_zero_buildings_is_valid() {
    init_tracing();
    let mut session = Session::new();
    let bp = minimal_blueprint();
    let text = session.encode(&bp);
    let decoded = session.decode(&text).unwrap();
    assert!(decoded.areas.is_empty());
    assert!(decoded.buildings.is_empty());
}

#[test]
fn boundary_building_with_no_parameters_round_trips() {
    init_tracing();
    let mut session = Session::new();
    let mut bp = minimal_blueprint();
    let mut b = sample_building(0);
    b.parameters.clear();
    bp.buildings = vec![b];

    let text = session.encode(&bp);
    let decoded = session.decode(&text).unwrap();
    assert!(decoded.buildings[0].parameters.is_empty());
}

#[test]
fn rejects_input_without_blueprint_prefix() {
    init_tracing();
    let mut session = Session::new();
    assert!(session.decode("not a blueprint at all").is_err());
}

#[test]
fn rejects_truncated_fingerprint_framing() {
    init_tracing();
    let mut session = Session::new();
    assert!(session.decode("BLUEPRINT:0\"abc\"short").is_err());
}
