//! The model API: lifecycle and editing operations composed by external
//! tools between `decode` and `encode` (§4.7).
//!
//! Rust ownership replaces the original's manual allocate/resize/free
//! lifecycle (`examples/original_source/app/IFL.c`): there is no explicit
//! `free` here, since `Blueprint`/`Building`/`Vec<i32>` `Drop` impls release
//! their storage for free. The operations that remain are the ones with
//! actual editing semantics: resizing the building array, deep-copying a
//! building with an identifier offset, and delegating translate/rotate to
//! [`crate::blueprint::geometry`].

use tracing::debug;

use crate::blueprint::geometry;
use crate::blueprint::model::{Blueprint, Building, BuildingId, Reference};

impl Blueprint {
    /// Resizes `buildings` to `len`, growing with filler buildings produced
    /// by `make_filler` or truncating if `len` is shorter than the current
    /// length.
    ///
    /// Mirrors the original's "grow with uninitialized tail" semantics
    /// (§4.7): new slots start as whatever `make_filler` returns, and the
    /// contract is still that callers populate them with real data before
    /// `encode`. Rust's ownership rules forbid an actually-uninitialized
    /// tail, so a filler constructor is required instead.
    pub fn resize_buildings(&mut self, len: usize, make_filler: impl Fn() -> Building) {
        if len <= self.buildings.len() {
            self.buildings.truncate(len);
            return;
        }
        self.buildings.reserve(len - self.buildings.len());
        while self.buildings.len() < len {
            self.buildings.push(make_filler());
        }
    }

    /// Returns a rough estimate of this blueprint's encoded text length,
    /// without actually encoding it: the fixed per-building wire size times
    /// the building count, plus the area and header records, widened by the
    /// base64/gzip expansion the original's batch-edit logging reported as
    /// a before/after length ratio (`examples/original_source/app/IFL.c`'s
    /// `"strlen_o = %zu (%.3lf%%)"` log line). Useful for editing tools that
    /// want to report size growth without retaining the pre-edit text.
    #[must_use]
    pub fn estimated_encoded_len(&self) -> usize {
        use crate::blueprint::schema::{AREA_LEN, BUILDING_FIXED_LEN, HEADER_LEN};
        let binary_len = HEADER_LEN
            + self.areas.len() * AREA_LEN
            + 4
            + self
                .buildings
                .iter()
                .map(|b| BUILDING_FIXED_LEN + 4 * b.parameters.len())
                .sum::<usize>();
        // gzip+base64 roughly inflates compressed-binary by base64's 4/3
        // ratio; compression itself is data-dependent, so this is a rough
        // upper bound rather than an exact prediction.
        (binary_len * 4 / 3) + self.short_desc.len() + self.desc.len() + 64
    }

    /// Re-zeroes a single building's offsets to the origin.
    ///
    /// Grounded on `examples/original_source/app/IFL.c`'s single-building
    /// auto-centering step ("单建筑蓝图，坐标已归正至原点"): before
    /// duplicating a single-building blueprint across a coordinate list,
    /// the original re-zeroes that building's position so the duplicate
    /// offsets in [`Building::deep_copy_with_offset`]'s caller are relative
    /// to the origin rather than wherever the building happened to sit.
    /// Named as its own operation rather than folded into duplication,
    /// since the model API treats duplication and translation as distinct
    /// composable primitives.
    ///
    /// No-op if `buildings` does not have exactly one element.
    pub fn recenter_single_building(&mut self) {
        if self.buildings.len() != 1 {
            return;
        }
        let building = &mut self.buildings[0];
        building.local_offset.x = 0.0;
        building.local_offset.y = 0.0;
        building.local_offset_2.x = 0.0;
        building.local_offset_2.y = 0.0;
        debug!("recentered single-building blueprint to origin");
    }
}

impl Building {
    /// Clones this building into an independent copy, with `index` and both
    /// references (`temp_output_obj_idx`, `temp_input_obj_idx`) offset by
    /// `id_offset` (except [`Reference::None`], which always passes through
    /// unchanged — invariant 6).
    ///
    /// The `parameters` tail is cloned into its own allocation — per §9,
    /// a shallow copy across duplication would alias the tail between
    /// source and destination and double-free on teardown. `Vec::clone`
    /// already gives this for free.
    #[must_use]
    pub fn deep_copy_with_offset(&self, id_offset: i32) -> Self {
        let offset_id = |id: BuildingId| -> BuildingId {
            BuildingId((id.0 as i64 + i64::from(id_offset)).max(0) as u32)
        };
        let offset_reference = |r: Reference| -> Reference {
            match r {
                Reference::None => Reference::None,
                Reference::Some(id) => Reference::Some(offset_id(id)),
            }
        };

        Self {
            index: offset_id(self.index),
            temp_output_obj_idx: offset_reference(self.temp_output_obj_idx),
            temp_input_obj_idx: offset_reference(self.temp_input_obj_idx),
            parameters: self.parameters.clone(),
            ..self.clone()
        }
    }

    /// Translates this building's primary and secondary local offsets by
    /// `(dx, dy)` on the flat `x`/`y` surface coordinates. Altitude (`z`) is
    /// untouched.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.local_offset.x += dx;
        self.local_offset.y += dy;
        self.local_offset_2.x += dx;
        self.local_offset_2.y += dy;
    }

    /// Rotates this building so a neutral equator-anchored building would be
    /// carried to Cartesian direction `target`. Delegates to
    /// [`geometry::rotation_matrix_from_target`] and
    /// [`geometry::rotate_offset`].
    pub fn rotate_to(&mut self, target: [f64; 3]) {
        let matrix = geometry::rotation_matrix_from_target(target);
        geometry::rotate_offset(&mut self.local_offset, matrix);
        geometry::rotate_offset(&mut self.local_offset_2, matrix);
    }
}
