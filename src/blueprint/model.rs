//! The in-memory blueprint model: [`Blueprint`], [`Area`], [`Building`], and
//! the small value types they're built from.

use serde::{Deserialize, Serialize};

/// A building's stable identifier.
///
/// This is the wire's 32-bit identifier, carried as-is on decode and
/// rewritten to the building's array position only at encode time (see
/// [`crate::blueprint::reference`]). It is never an array index on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub u32);

/// A cross-reference to another building by [`BuildingId`], or none.
///
/// Replaces the wire's `-1` sentinel with a proper sum type; the sentinel
/// only exists at the [`crate::blueprint::schema`] read/write boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reference {
    /// No referenced building (wire value `-1`).
    None,
    /// References the building with this stable identifier.
    Some(BuildingId),
}

impl Reference {
    /// Converts a raw wire value (`-1` meaning none) to a [`Reference`].
    #[must_use]
    pub fn from_wire(value: i32) -> Self {
        if value < 0 {
            Reference::None
        } else {
            Reference::Some(BuildingId(value as u32))
        }
    }

    /// Converts back to the raw wire representation (`-1` for none).
    #[must_use]
    pub fn to_wire(self) -> i32 {
        match self {
            Reference::None => -1,
            Reference::Some(id) => id.0 as i32,
        }
    }

    /// Returns `true` if this is [`Reference::None`].
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Reference::None)
    }
}

/// A homogeneous 3-D offset, `(x, y, z, w)`.
///
/// The wire format only ever stores `x`, `y`, `z` as 32-bit floats; `w` is
/// kept at 64-bit precision internally as scratch space for geometry
/// transforms and must equal `1.0` before encode (the codec divides
/// `x`/`y`/`z` by `w` and emits `w = 1` implicitly, per the format's
/// normalization rule).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset4 {
    /// Longitude-ish surface coordinate (range roughly `[-500, 500]`).
    pub x: f64,
    /// Latitude-ish surface coordinate (range roughly `[-250, 250]`).
    pub y: f64,
    /// Altitude component; not touched by spherical/cartesian conversion.
    pub z: f64,
    /// Homogeneous weight; must be `1.0` before encode.
    pub w: f64,
}

impl Offset4 {
    /// Creates an offset with `w = 1.0`.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, w: 1.0 }
    }

    /// Normalizes `w` to `1.0`, dividing `x`/`y`/`z` accordingly.
    ///
    /// A no-op when `w` is already `1.0`. `w == 0.0` would be a
    /// caller error (a degenerate homogeneous coordinate); this leaves the
    /// offset unchanged rather than dividing by zero, since spec does not
    /// define behavior for that case.
    pub fn normalize_w(&mut self) {
        if self.w == 1.0 || self.w == 0.0 {
            self.w = 1.0;
            return;
        }
        self.x /= self.w;
        self.y /= self.w;
        self.z /= self.w;
        self.w = 1.0;
    }
}

impl Default for Offset4 {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// A planar sub-region on the sphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    /// Area index (8-bit on the wire).
    pub index: i8,
    /// Parent area index; `-1` means none.
    pub parent_index: i8,
    /// Anchor latitude band.
    pub tropic_anchor: i16,
    /// Number of segments in the area.
    pub area_segments: i16,
    /// Anchor-local X offset.
    pub anchor_local_offset_x: i16,
    /// Anchor-local Y offset.
    pub anchor_local_offset_y: i16,
    /// Area width.
    pub width: i16,
    /// Area height.
    pub height: i16,
}

/// A placed structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Stable identifier, unique within the blueprint.
    pub index: BuildingId,
    /// Index of the area this building belongs to.
    pub area_index: i8,
    /// Primary local offset.
    pub local_offset: Offset4,
    /// Secondary local offset (e.g. a belt's far endpoint).
    pub local_offset_2: Offset4,
    /// Primary yaw, in degrees.
    pub yaw: f64,
    /// Secondary yaw, in degrees.
    pub yaw_2: f64,
    /// Item id of the building.
    pub item_id: i16,
    /// Model/prefab index.
    pub model_index: i16,
    /// Recipe id, if any.
    pub recipe_id: i16,
    /// Filter id, if any (e.g. a sorter's filtered item).
    pub filter_id: i16,
    /// Reference to the building this one outputs to.
    pub temp_output_obj_idx: Reference,
    /// Reference to the building this one inputs from.
    pub temp_input_obj_idx: Reference,
    /// Output slot index on the target building.
    pub output_to_slot: i8,
    /// Input slot index on the source building.
    pub input_from_slot: i8,
    /// Output slot index on this building.
    pub output_from_slot: i8,
    /// Input slot index on this building.
    pub input_to_slot: i8,
    /// Output-side belt offset.
    pub output_offset: i8,
    /// Input-side belt offset.
    pub input_offset: i8,
    /// Free-form parameter tail (e.g. recipe/sorter parameters).
    ///
    /// An empty `Vec` carries no backing allocation, matching the wire
    /// format's "zero parameters, no tail bytes" rule.
    pub parameters: Vec<i32>,
}

impl Building {
    /// Returns the number of parameters, as the wire's 16-bit `numParameters`
    /// field would encode it.
    #[must_use]
    pub fn num_parameters(&self) -> usize {
        self.parameters.len()
    }
}

/// The four-part game version recorded in a blueprint's header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameVersion {
    /// Major version.
    pub major: i32,
    /// Minor version.
    pub minor: i32,
    /// Patch version.
    pub patch: i32,
    /// Build number.
    pub build: i32,
}

/// The five icon ids shown on a blueprint's preview.
pub type Icons = [i32; 5];

/// The top-level blueprint aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    /// The head-csv's first field, always observed as the literal text
    /// `"0"`. Its meaning is undocumented upstream; kept verbatim rather
    /// than hardcoded so decode/encode round-trips exactly regardless.
    pub head_marker_1: String,
    /// The head-csv's eighth field (between the icon list and the
    /// timestamp), same treatment as `head_marker_1`.
    pub head_marker_2: String,
    /// Layout tag; meaning is opaque to this crate.
    pub layout: i32,
    /// Five icon ids.
    pub icons: Icons,
    /// Creation timestamp.
    pub timestamp: i64,
    /// Game version that created this blueprint (from the textual head-csv,
    /// not the binary payload).
    pub game_version: GameVersion,
    /// The binary payload header's own `version` field. Distinct from
    /// `game_version`: this one lives inside the gzip payload, not the
    /// head-csv, and this crate treats it as an opaque integer round-tripped
    /// verbatim.
    pub payload_version: i32,
    /// Short description; must not contain commas (enforced on encode).
    pub short_desc: String,
    /// Full description; must not contain double quotes (enforced on
    /// encode).
    pub desc: String,
    /// Cursor X offset at the time the blueprint was captured.
    pub cursor_offset_x: i32,
    /// Cursor Y offset at the time the blueprint was captured.
    pub cursor_offset_y: i32,
    /// Area the cursor was over at capture time.
    pub cursor_target_area: i32,
    /// Drag-box width.
    pub drag_box_size_x: i32,
    /// Drag-box height.
    pub drag_box_size_y: i32,
    /// Index of the primary area.
    pub primary_area_idx: i32,
    /// Layout areas.
    pub areas: Vec<Area>,
    /// Placed buildings.
    pub buildings: Vec<Building>,
    /// The 32-character uppercase hex fingerprint.
    ///
    /// After `decode`, this is the input's trailing fingerprint verbatim.
    /// Before `encode` it is ignored and recomputed fresh over the newly
    /// built prefix.
    pub fingerprint: String,
}

impl Blueprint {
    /// Allocates an empty blueprint with all header fields zeroed.
    ///
    /// Matches the model API's "allocate/initialize" operation: `areas` and
    /// `buildings` start empty, descriptor strings start empty, and
    /// `fingerprint` starts empty (callers get one from `decode`, or
    /// `encode` fills it in).
    #[must_use]
    pub fn new() -> Self {
        Self {
            head_marker_1: "0".to_string(),
            head_marker_2: "0".to_string(),
            layout: 0,
            icons: [0; 5],
            timestamp: 0,
            game_version: GameVersion {
                major: 0,
                minor: 0,
                patch: 0,
                build: 0,
            },
            payload_version: 0,
            short_desc: String::new(),
            desc: String::new(),
            cursor_offset_x: 0,
            cursor_offset_y: 0,
            cursor_target_area: 0,
            drag_box_size_x: 0,
            drag_box_size_y: 0,
            primary_area_idx: 0,
            areas: Vec::new(),
            buildings: Vec::new(),
            fingerprint: String::new(),
        }
    }
}

impl Default for Blueprint {
    fn default() -> Self {
        Self::new()
    }
}
