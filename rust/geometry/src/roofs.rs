// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Differentiated roof derivation (LoD2+).
//!
//! Partitions the roof geometry into planar facets and keeps the upward
//! sheets as one RoofSurface per facet. Facets can afterwards be clipped to
//! the footprint outline so roof overhangs do not break the solid boundary.

use crate::bool2d;
use crate::facets::cluster_facets;
use crate::ring::Ring;
use crate::solid::{Surface, SurfaceKind};
use citylift_model::ElementGeometry;

/// Minimum upward normal component for a facet to count as a roof sheet;
/// filters fascia and the underside sheets.
const MIN_UPWARD_NORMAL: f64 = 0.01;

/// One RoofSurface per upward planar facet of the roof geometry.
pub fn derive_roof_surfaces(items: &[ElementGeometry]) -> Vec<Surface> {
    let mut surfaces = Vec::new();
    for item in items {
        for facet in cluster_facets(&item.mesh) {
            if facet.plane.normal.z <= MIN_UPWARD_NORMAL {
                continue;
            }
            surfaces.push(Surface::new(SurfaceKind::Roof, facet.outline).with_source(item.id));
        }
    }
    surfaces
}

/// Clip roof facets to the footprint outline in plan; z is re-derived from
/// each facet's plane. Facets entirely outside the footprint disappear,
/// facets crossing the outline may split into several pieces.
pub fn clip_roofs_to_footprint(roofs: Vec<Surface>, footprint: &Ring) -> Vec<Surface> {
    let outline = footprint.to_plan();
    let mut clipped = Vec::with_capacity(roofs.len());

    for surface in roofs {
        let Some(plane) = surface.ring.plane() else {
            continue;
        };
        let plan = surface.ring.to_plan();
        for piece in bool2d::intersect_contours(&plan, &outline) {
            let lifted: Option<Vec<_>> = piece
                .outer
                .iter()
                .map(|q| {
                    plane
                        .z_at(q.x, q.y)
                        .ok()
                        .map(|z| nalgebra::Point3::new(q.x, q.y, z))
                })
                .collect();
            let Some(points) = lifted else { continue };
            if let Ok(ring) = Ring::new(points) {
                let mut out = Surface::new(SurfaceKind::Roof, ring);
                out.source_id = surface.source_id;
                clipped.push(out);
            }
        }
    }
    clipped
}
