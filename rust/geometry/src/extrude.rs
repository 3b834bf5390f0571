// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Block-model extrusion (LoD1): footprint × height → base, roof and wall
//! surfaces of a closed solid.

use crate::ring::Ring;
use crate::solid::{Solid, Surface, SurfaceKind};
use nalgebra::Point3;

/// Extrude the footprint by the building height into a block solid.
///
/// The ground surface is the reversed footprint ring (facing down), the
/// roof is the ring lifted by `height` (facing up), and every footprint
/// edge carries one vertical wall quad.
pub fn build_block_solid(footprint: &Ring, height: f64) -> Solid {
    // Footprint rings are counter-clockwise seen from above; the ground
    // surface faces down
    let ground = footprint.reversed();
    let roof = footprint.translated_z(height);

    let mut surfaces = Vec::with_capacity(2 + footprint.len());
    surfaces.push(Surface::new(SurfaceKind::Ground, ground));
    surfaces.push(Surface::new(SurfaceKind::Roof, roof));

    for (p1, p2) in footprint.edges() {
        let quad = Ring::new(vec![
            p1,
            Point3::new(p1.x, p1.y, p1.z + height),
            Point3::new(p2.x, p2.y, p2.z + height),
            p2,
        ]);
        if let Ok(ring) = quad {
            surfaces.push(Surface::new(SurfaceKind::Wall, ring));
        }
    }

    Solid::new(surfaces)
}
