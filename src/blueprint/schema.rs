//! The binary payload's fixed-offset record schema: header, area, and
//! building records, little-endian throughout. Each record kind exposes a
//! named offset table, a `read` function that fills a model node from a
//! byte cursor and returns the number of bytes consumed, and a `write`
//! function that is its exact inverse.

use crate::blueprint::error::{BlueprintError, BlueprintResult};
use crate::blueprint::model::{Area, Building, BuildingId, Offset4, Reference};

pub(crate) fn need(data: &[u8], offset: usize, len: usize) -> BlueprintResult<()> {
    let fits = match offset.checked_add(len) {
        Some(end) => end <= data.len(),
        None => false,
    };
    if !fits {
        return Err(BlueprintError::payload_truncated(
            offset,
            len,
            data.len().saturating_sub(offset),
        ));
    }
    Ok(())
}

fn read_u8(data: &[u8], offset: usize) -> BlueprintResult<u8> {
    need(data, offset, 1)?;
    Ok(data[offset])
}

fn read_i8(data: &[u8], offset: usize) -> BlueprintResult<i8> {
    Ok(read_u8(data, offset)? as i8)
}

fn read_i16(data: &[u8], offset: usize) -> BlueprintResult<i16> {
    need(data, offset, 2)?;
    Ok(i16::from_le_bytes([data[offset], data[offset + 1]]))
}

fn read_u16(data: &[u8], offset: usize) -> BlueprintResult<u16> {
    need(data, offset, 2)?;
    Ok(u16::from_le_bytes([data[offset], data[offset + 1]]))
}

fn read_i32(data: &[u8], offset: usize) -> BlueprintResult<i32> {
    need(data, offset, 4)?;
    Ok(i32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ]))
}

pub(crate) fn read_u32(data: &[u8], offset: usize) -> BlueprintResult<u32> {
    need(data, offset, 4)?;
    Ok(u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ]))
}

fn read_f32_widened(data: &[u8], offset: usize) -> BlueprintResult<f64> {
    need(data, offset, 4)?;
    Ok(f32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ]) as f64)
}

fn write_i8(buf: &mut Vec<u8>, v: i8) {
    buf.push(v as u8);
}

fn write_i16(buf: &mut Vec<u8>, v: i16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn write_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn write_i32(buf: &mut Vec<u8>, v: i32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

pub(crate) fn write_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn write_f32_narrowed(buf: &mut Vec<u8>, v: f64) {
    buf.extend_from_slice(&(v as f32).to_le_bytes());
}

/// Header fixed-offset fields (excludes `numAreas`, which has its own
/// constant since it doubles as "how many area records follow").
pub mod header_offsets {
    pub const VERSION: usize = 0;
    pub const CURSOR_OFFSET_X: usize = 4;
    pub const CURSOR_OFFSET_Y: usize = 8;
    pub const CURSOR_TARGET_AREA: usize = 12;
    pub const DRAG_BOX_SIZE_X: usize = 16;
    pub const DRAG_BOX_SIZE_Y: usize = 20;
    pub const PRIMARY_AREA_IDX: usize = 24;
    pub const NUM_AREAS: usize = 28;
}

/// Header record length: seven 32-bit fields plus the trailing `numAreas`
/// byte. The area array begins immediately after, at this offset.
pub const HEADER_LEN: usize = 29;

/// The header fields this module reads/writes, independent of the areas and
/// buildings that follow it in the payload.
pub struct Header {
    pub payload_version: i32,
    pub cursor_offset_x: i32,
    pub cursor_offset_y: i32,
    pub cursor_target_area: i32,
    pub drag_box_size_x: i32,
    pub drag_box_size_y: i32,
    pub primary_area_idx: i32,
    pub num_areas: u8,
}

/// Reads the header at `offset`, returning it and the number of bytes
/// consumed (always [`HEADER_LEN`] on success).
pub fn read_header(data: &[u8], offset: usize) -> BlueprintResult<(Header, usize)> {
    need(data, offset, HEADER_LEN)?;
    let header = Header {
        payload_version: read_i32(data, offset + header_offsets::VERSION)?,
        cursor_offset_x: read_i32(data, offset + header_offsets::CURSOR_OFFSET_X)?,
        cursor_offset_y: read_i32(data, offset + header_offsets::CURSOR_OFFSET_Y)?,
        cursor_target_area: read_i32(data, offset + header_offsets::CURSOR_TARGET_AREA)?,
        drag_box_size_x: read_i32(data, offset + header_offsets::DRAG_BOX_SIZE_X)?,
        drag_box_size_y: read_i32(data, offset + header_offsets::DRAG_BOX_SIZE_Y)?,
        primary_area_idx: read_i32(data, offset + header_offsets::PRIMARY_AREA_IDX)?,
        num_areas: read_u8(data, offset + header_offsets::NUM_AREAS)?,
    };
    Ok((header, HEADER_LEN))
}

/// Writes the header fields to `buf`, returning the number of bytes
/// written (always [`HEADER_LEN`]).
pub fn write_header(buf: &mut Vec<u8>, header: &Header) -> usize {
    let start = buf.len();
    write_i32(buf, header.payload_version);
    write_i32(buf, header.cursor_offset_x);
    write_i32(buf, header.cursor_offset_y);
    write_i32(buf, header.cursor_target_area);
    write_i32(buf, header.drag_box_size_x);
    write_i32(buf, header.drag_box_size_y);
    write_i32(buf, header.primary_area_idx);
    buf.push(header.num_areas);
    buf.len() - start
}

/// Area record length.
pub const AREA_LEN: usize = 14;

mod area_offsets {
    pub const INDEX: usize = 0;
    pub const PARENT_INDEX: usize = 1;
    pub const TROPIC_ANCHOR: usize = 2;
    pub const AREA_SEGMENTS: usize = 4;
    pub const ANCHOR_LOCAL_OFFSET_X: usize = 6;
    pub const ANCHOR_LOCAL_OFFSET_Y: usize = 8;
    pub const WIDTH: usize = 10;
    pub const HEIGHT: usize = 12;
}

/// Reads one area record at `offset`, returning it and [`AREA_LEN`].
pub fn read_area(data: &[u8], offset: usize) -> BlueprintResult<(Area, usize)> {
    need(data, offset, AREA_LEN)?;
    let area = Area {
        index: read_i8(data, offset + area_offsets::INDEX)?,
        parent_index: read_i8(data, offset + area_offsets::PARENT_INDEX)?,
        tropic_anchor: read_i16(data, offset + area_offsets::TROPIC_ANCHOR)?,
        area_segments: read_i16(data, offset + area_offsets::AREA_SEGMENTS)?,
        anchor_local_offset_x: read_i16(data, offset + area_offsets::ANCHOR_LOCAL_OFFSET_X)?,
        anchor_local_offset_y: read_i16(data, offset + area_offsets::ANCHOR_LOCAL_OFFSET_Y)?,
        width: read_i16(data, offset + area_offsets::WIDTH)?,
        height: read_i16(data, offset + area_offsets::HEIGHT)?,
    };
    Ok((area, AREA_LEN))
}

/// Writes one area record to `buf`, returning [`AREA_LEN`].
pub fn write_area(buf: &mut Vec<u8>, area: &Area) -> usize {
    let start = buf.len();
    write_i8(buf, area.index);
    write_i8(buf, area.parent_index);
    write_i16(buf, area.tropic_anchor);
    write_i16(buf, area.area_segments);
    write_i16(buf, area.anchor_local_offset_x);
    write_i16(buf, area.anchor_local_offset_y);
    write_i16(buf, area.width);
    write_i16(buf, area.height);
    buf.len() - start
}

/// Length of a building record's fixed portion, before the `parameters`
/// tail (`4 * numParameters` additional bytes follow).
pub const BUILDING_FIXED_LEN: usize = 61;

mod building_offsets {
    pub const INDEX: usize = 0;
    pub const AREA_INDEX: usize = 4;
    pub const LOCAL_OFFSET_X: usize = 5;
    pub const LOCAL_OFFSET_Y: usize = 9;
    pub const LOCAL_OFFSET_Z: usize = 13;
    pub const LOCAL_OFFSET2_X: usize = 17;
    pub const LOCAL_OFFSET2_Y: usize = 21;
    pub const LOCAL_OFFSET2_Z: usize = 25;
    pub const YAW: usize = 29;
    pub const YAW2: usize = 33;
    pub const ITEM_ID: usize = 37;
    pub const MODEL_INDEX: usize = 39;
    pub const TEMP_OUTPUT_OBJ_IDX: usize = 41;
    pub const TEMP_INPUT_OBJ_IDX: usize = 45;
    pub const OUTPUT_TO_SLOT: usize = 49;
    pub const INPUT_FROM_SLOT: usize = 50;
    pub const OUTPUT_FROM_SLOT: usize = 51;
    pub const INPUT_TO_SLOT: usize = 52;
    pub const OUTPUT_OFFSET: usize = 53;
    pub const INPUT_OFFSET: usize = 54;
    pub const RECIPE_ID: usize = 55;
    pub const FILTER_ID: usize = 57;
    pub const NUM_PARAMETERS: usize = 59;
    pub const PARAMETERS: usize = 61;
}

/// Reads one building record (fixed portion plus its `parameters` tail) at
/// `offset`, returning it and the total bytes consumed (`BUILDING_FIXED_LEN
/// + 4 * numParameters`).
///
/// Cross-reference fields (`index`, `temp_output_obj_idx`,
/// `temp_input_obj_idx`) are stored as the raw stable identifiers read from
/// the wire — resolving them to array positions is the index remapper's
/// job, not this module's.
pub fn read_building(data: &[u8], offset: usize) -> BlueprintResult<(Building, usize)> {
    need(data, offset, BUILDING_FIXED_LEN)?;
    use building_offsets as o;

    let index = read_u32(data, offset + o::INDEX)?;
    let area_index = read_i8(data, offset + o::AREA_INDEX)?;
    let local_offset = Offset4::new(
        read_f32_widened(data, offset + o::LOCAL_OFFSET_X)?,
        read_f32_widened(data, offset + o::LOCAL_OFFSET_Y)?,
        read_f32_widened(data, offset + o::LOCAL_OFFSET_Z)?,
    );
    let local_offset_2 = Offset4::new(
        read_f32_widened(data, offset + o::LOCAL_OFFSET2_X)?,
        read_f32_widened(data, offset + o::LOCAL_OFFSET2_Y)?,
        read_f32_widened(data, offset + o::LOCAL_OFFSET2_Z)?,
    );
    let yaw = read_f32_widened(data, offset + o::YAW)?;
    let yaw_2 = read_f32_widened(data, offset + o::YAW2)?;
    let item_id = read_i16(data, offset + o::ITEM_ID)?;
    let model_index = read_i16(data, offset + o::MODEL_INDEX)?;
    let temp_output_obj_idx = Reference::from_wire(read_i32(data, offset + o::TEMP_OUTPUT_OBJ_IDX)?);
    let temp_input_obj_idx = Reference::from_wire(read_i32(data, offset + o::TEMP_INPUT_OBJ_IDX)?);
    let output_to_slot = read_i8(data, offset + o::OUTPUT_TO_SLOT)?;
    let input_from_slot = read_i8(data, offset + o::INPUT_FROM_SLOT)?;
    let output_from_slot = read_i8(data, offset + o::OUTPUT_FROM_SLOT)?;
    let input_to_slot = read_i8(data, offset + o::INPUT_TO_SLOT)?;
    let output_offset = read_i8(data, offset + o::OUTPUT_OFFSET)?;
    let input_offset = read_i8(data, offset + o::INPUT_OFFSET)?;
    let recipe_id = read_i16(data, offset + o::RECIPE_ID)?;
    let filter_id = read_i16(data, offset + o::FILTER_ID)?;
    let num_parameters = read_u16(data, offset + o::NUM_PARAMETERS)? as usize;

    let params_offset = offset + o::PARAMETERS;
    let params_len = num_parameters
        .checked_mul(4)
        .expect("numParameters from a 16-bit field cannot overflow usize");
    need(data, params_offset, params_len)?;
    let mut parameters = Vec::with_capacity(num_parameters);
    for i in 0..num_parameters {
        parameters.push(read_i32(data, params_offset + i * 4)?);
    }

    let building = Building {
        index: BuildingId(index),
        area_index,
        local_offset,
        local_offset_2,
        yaw,
        yaw_2,
        item_id,
        model_index,
        recipe_id,
        filter_id,
        temp_output_obj_idx,
        temp_input_obj_idx,
        output_to_slot,
        input_from_slot,
        output_from_slot,
        input_to_slot,
        output_offset,
        input_offset,
        parameters,
    };
    Ok((building, BUILDING_FIXED_LEN + params_len))
}

/// Writes one building record to `buf`, returning the total bytes written.
///
/// `index`, `temp_output_obj_idx`, and `temp_input_obj_idx` are written
/// exactly as given on `building` — callers (the codec façade, via the
/// index remapper) must already have rewritten these to array positions
/// before calling this.
pub fn write_building(buf: &mut Vec<u8>, building: &Building) -> usize {
    let start = buf.len();
    write_u32(buf, building.index.0);
    write_i8(buf, building.area_index);
    write_f32_narrowed(buf, building.local_offset.x);
    write_f32_narrowed(buf, building.local_offset.y);
    write_f32_narrowed(buf, building.local_offset.z);
    write_f32_narrowed(buf, building.local_offset_2.x);
    write_f32_narrowed(buf, building.local_offset_2.y);
    write_f32_narrowed(buf, building.local_offset_2.z);
    write_f32_narrowed(buf, building.yaw);
    write_f32_narrowed(buf, building.yaw_2);
    write_i16(buf, building.item_id);
    write_i16(buf, building.model_index);
    write_i32(buf, building.temp_output_obj_idx.to_wire());
    write_i32(buf, building.temp_input_obj_idx.to_wire());
    write_i8(buf, building.output_to_slot);
    write_i8(buf, building.input_from_slot);
    write_i8(buf, building.output_from_slot);
    write_i8(buf, building.input_to_slot);
    write_i8(buf, building.output_offset);
    write_i8(buf, building.input_offset);
    write_i16(buf, building.recipe_id);
    write_i16(buf, building.filter_id);
    write_u16(buf, building.parameters.len() as u16);
    for &p in &building.parameters {
        write_i32(buf, p);
    }
    buf.len() - start
}
