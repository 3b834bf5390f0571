// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Footprint and roof-edge projection.
//!
//! Projects slab or roof geometry to the plan, unions the triangle shadows
//! into one outline and lifts it to the lowest (footprint) or highest
//! (roof edge) z of the source geometry. When the union stays fragmented,
//! a growing-buffer fallback bridges sliver gaps between slab pieces and
//! is undone afterwards.

use crate::bool2d::{self, Shape2D};
use crate::ring::Ring;
use crate::SNAP_TOLERANCE;
use citylift_model::ElementGeometry;
use nalgebra::Point2;

/// Buffer radii for the union fallback, in meters.
const BUFFER_STEPS: [f64; 5] = [0.001, 0.005, 0.01, 0.05, 0.1];

enum LiftTo {
    MinZ,
    MaxZ,
}

/// Footprint of the base-slab geometry: plan outline at the lowest z.
///
/// Returns `None` when there is no base geometry or no outline can be
/// derived; the caller records the missing-baseslab warning.
pub fn extract_footprint(items: &[ElementGeometry]) -> Option<Ring> {
    planar_outline(items, LiftTo::MinZ)
}

/// Roof edge: plan outline of the roof geometry at the highest z.
pub fn extract_roof_edge(items: &[ElementGeometry]) -> Option<Ring> {
    planar_outline(items, LiftTo::MaxZ)
}

fn planar_outline(items: &[ElementGeometry], lift: LiftTo) -> Option<Ring> {
    let mut contours: Vec<Vec<Point2<f64>>> = Vec::new();
    let mut z_extreme: Option<f64> = None;

    for item in items {
        for tri in item.mesh.triangles() {
            let shadow: Vec<Point2<f64>> = tri
                .iter()
                .map(|p| Point2::new(p[0], p[1]))
                .collect();
            if !bool2d::is_valid_contour(&shadow) {
                continue; // vertical triangle has no plan shadow
            }
            contours.push(shadow);
        }
        let z_item = match lift {
            LiftTo::MinZ => item.mesh.min_z(),
            LiftTo::MaxZ => item.mesh.max_z(),
        };
        if let Some(z) = z_item {
            z_extreme = Some(match (z_extreme, &lift) {
                (Some(acc), LiftTo::MinZ) => acc.min(z),
                (Some(acc), LiftTo::MaxZ) => acc.max(z),
                (None, _) => z,
            });
        }
    }

    if contours.is_empty() {
        return None;
    }
    let z = z_extreme?;

    let outline = unified_outline(&contours)?;
    let simplified = bool2d::simplify_contour(&outline, SNAP_TOLERANCE);
    Ring::from_2d(&bool2d::ensure_ccw(&simplified), z).ok()
}

/// Union the shadows; when more than one piece remains, retry with growing
/// buffers and shrink the winner back.
fn unified_outline(contours: &[Vec<Point2<f64>>]) -> Option<Vec<Point2<f64>>> {
    let shapes = bool2d::union_contours(contours);
    match shapes.len() {
        0 => None,
        1 => Some(shapes.into_iter().next()?.outer),
        _ => {
            for radius in BUFFER_STEPS {
                let buffered: Vec<Vec<Point2<f64>>> = shapes
                    .iter()
                    .filter_map(|s| bool2d::buffer_contour(&s.outer, radius))
                    .collect();
                let merged = bool2d::union_contours(&buffered);
                if merged.len() == 1 {
                    let Shape2D { outer, .. } = merged.into_iter().next()?;
                    return bool2d::buffer_contour(&outer, -radius);
                }
            }
            // Still fragmented: keep the dominant piece
            bool2d::largest_shape(shapes).map(|s| s.outer)
        }
    }
}
