//! Stable-identifier → array-position remapping.
//!
//! Built once per encode over the building array's *current* order, then
//! used to rewrite every outgoing identifier (a building's own `index` and
//! its `temp_output_obj_idx` / `temp_input_obj_idx`) to the array position
//! of the referent. A sorted `Vec` plus binary search, not a `HashMap`:
//! identifiers are dense and small, per `generate_lut`/`get_idx` in
//! `examples/original_source/lib/libdspbptk.c`.

use tracing::warn;

use crate::blueprint::model::{Building, BuildingId, Reference};

/// A lookup from stable [`BuildingId`] to current array position, valid for
/// one encode pass.
pub struct IndexTable {
    sorted: Vec<(BuildingId, u32)>,
}

impl IndexTable {
    /// Builds the table from `buildings`' current order.
    #[must_use]
    pub fn build(buildings: &[Building]) -> Self {
        let mut sorted: Vec<(BuildingId, u32)> = buildings
            .iter()
            .enumerate()
            .map(|(pos, b)| (b.index, pos as u32))
            .collect();
        sorted.sort_unstable_by_key(|&(id, _)| id);
        Self { sorted }
    }

    /// Returns the array position of the building with stable identifier
    /// `id`, or `None` if no such building exists.
    #[must_use]
    pub fn position_of(&self, id: BuildingId) -> Option<u32> {
        self.sorted
            .binary_search_by_key(&id, |&(k, _)| k)
            .ok()
            .map(|i| self.sorted[i].1)
    }

    /// Resolves a [`Reference`] to its encode-time form: the referent's
    /// array position, or [`Reference::None`] if the reference was already
    /// none or dangles (logged as a `DanglingReference` warning — never a
    /// fatal error).
    #[must_use]
    pub fn resolve(&self, reference: Reference) -> Reference {
        match reference {
            Reference::None => Reference::None,
            Reference::Some(id) => match self.position_of(id) {
                Some(pos) => Reference::Some(BuildingId(pos)),
                None => {
                    warn!(stable_id = id.0, "DanglingReference");
                    Reference::None
                }
            },
        }
    }
}
