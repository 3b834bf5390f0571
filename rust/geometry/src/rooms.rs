// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interior room derivation (LoD4).
//!
//! Every space element becomes one Room: its mesh is partitioned into
//! planar facets, classified by normal direction into floor, ceiling and
//! interior wall surfaces, and closure-checked as a solid.

use crate::facets::cluster_facets;
use crate::solid::{check_closed, Room, Solid, Surface, SurfaceKind};
use citylift_model::ElementGeometry;

/// Normal z-component above which a facet counts as horizontal.
const HORIZONTAL_NORMAL: f64 = 0.7;

/// Derive room solids from interior space geometry.
///
/// Spaces without any planar facet are skipped; the caller records the
/// missing-rooms warning when the result is empty.
pub fn derive_rooms(items: &[ElementGeometry]) -> Vec<Room> {
    let mut rooms = Vec::with_capacity(items.len());

    for item in items {
        let facets = cluster_facets(&item.mesh);
        if facets.is_empty() {
            continue;
        }

        let mut surfaces = Vec::with_capacity(facets.len());
        for facet in facets {
            let kind = if facet.plane.normal.z <= -HORIZONTAL_NORMAL {
                SurfaceKind::Floor
            } else if facet.plane.normal.z >= HORIZONTAL_NORMAL {
                SurfaceKind::Ceiling
            } else {
                SurfaceKind::InteriorWall
            };
            surfaces.push(Surface::new(kind, facet.outline).with_source(item.id));
        }

        let mut solid = Solid::new(surfaces);
        if !check_closed(&solid) {
            solid.mark_missing(SurfaceKind::InteriorWall);
        }
        rooms.push(Room {
            source_id: item.id,
            name: item.name.clone(),
            solid,
        });
    }
    rooms
}
