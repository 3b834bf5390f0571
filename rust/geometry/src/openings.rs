// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door and window openings (LoD3).
//!
//! Openings are recovered as the dominant planar facet of each door/window
//! element, assigned to the unique wall whose polygon contains them
//! in-plane, and finally subtracted from the host wall ring as holes.

use crate::bool2d::{self, Shape2D};
use crate::facets::cluster_facets;
use crate::ring::{point_in_contour, Ring};
use crate::solid::{Opening, OpeningKind, Surface};
use crate::ASSIGN_TOLERANCE;
use citylift_model::ElementGeometry;
use nalgebra::Point2;

/// Derive opening polygons from door or window elements.
///
/// A door/window element is a thin box; its largest planar facet is the
/// panel polygon. Elements without a usable facet are skipped.
pub fn derive_openings(items: &[ElementGeometry], kind: OpeningKind) -> Vec<Opening> {
    let mut openings = Vec::with_capacity(items.len());
    for item in items {
        let facet = cluster_facets(&item.mesh)
            .into_iter()
            .max_by(|a, b| a.area().total_cmp(&b.area()));
        if let Some(facet) = facet {
            openings.push(Opening {
                id: item.id,
                kind,
                name: item.name.clone(),
                ring: facet.outline,
            });
        }
    }
    openings
}

/// Assign each opening to the wall containing it in-plane.
///
/// The opening ring is projected onto the host wall's plane so the later
/// subtraction is exact. Openings matching no wall are dropped; the number
/// of dropped openings is returned for warning bookkeeping.
pub fn assign_openings_to_walls(openings: Vec<Opening>, walls: &mut [Surface]) -> usize {
    let mut dropped = 0;

    for opening in openings {
        let centroid = opening.ring.centroid();

        let mut best: Option<(usize, f64, crate::ring::PlaneBasis)> = None;
        for (wi, wall) in walls.iter().enumerate() {
            let Some(plane) = wall.ring.plane() else {
                continue;
            };
            let dist = plane.distance(&centroid).abs();
            if dist > ASSIGN_TOLERANCE {
                continue;
            }
            let basis = plane.basis(wall.ring.points()[0]);
            let outline: Vec<Point2<f64>> =
                wall.ring.points().iter().map(|p| basis.project(p)).collect();
            if !point_in_contour(&basis.project(&centroid), &outline) {
                continue;
            }
            if best.map_or(true, |(_, d, _)| dist < d) {
                best = Some((wi, dist, basis));
            }
        }

        match best {
            Some((wi, _, basis)) => {
                // Project the opening into the wall plane
                let projected = opening
                    .ring
                    .map_points(|p| basis.lift(&basis.project(p)));
                match projected {
                    Ok(ring) => walls[wi].openings.push(Opening { ring, ..opening }),
                    Err(_) => dropped += 1,
                }
            }
            None => dropped += 1,
        }
    }
    dropped
}

/// Subtract every assigned opening from its host wall ring.
///
/// Openings are clamped to the wall polygon first, then cut as holes; the
/// stored opening rings are replaced by the clamped contours so hole and
/// opening boundaries match edge for edge.
pub fn adjust_wall_and_opening_surfaces(walls: &mut [Surface]) {
    for wall in walls.iter_mut() {
        if wall.openings.is_empty() {
            continue;
        }
        let Some(plane) = wall.ring.plane() else {
            continue;
        };
        let basis = plane.basis(wall.ring.points()[0]);
        let outline: Vec<Point2<f64>> =
            wall.ring.points().iter().map(|p| basis.project(p)).collect();

        // Clamp openings to the wall polygon
        let mut clamped: Vec<Vec<Point2<f64>>> = Vec::with_capacity(wall.openings.len());
        let mut kept = Vec::with_capacity(wall.openings.len());
        for opening in wall.openings.drain(..) {
            let contour: Vec<Point2<f64>> =
                opening.ring.points().iter().map(|p| basis.project(p)).collect();
            let piece = bool2d::largest_shape(bool2d::intersect_contours(&contour, &outline));
            let Some(Shape2D { outer, .. }) = piece else {
                continue; // opening sits outside its wall after all
            };
            let lifted = outer.iter().map(|q| basis.lift(q)).collect();
            let Ok(ring) = Ring::new(lifted) else { continue };
            clamped.push(outer);
            kept.push(Opening { ring, ..opening });
        }
        wall.openings = kept;

        if clamped.is_empty() {
            continue;
        }

        let shape = Shape2D {
            outer: outline,
            holes: Vec::new(),
        };
        let Ok(result) = bool2d::subtract_contours(&shape, &clamped) else {
            continue;
        };
        let outer_points = result.outer.iter().map(|q| basis.lift(q)).collect();
        if let Ok(ring) = Ring::new(outer_points) {
            wall.ring = ring;
        }
        wall.holes = result
            .holes
            .iter()
            .filter_map(|h| Ring::new(h.iter().map(|q| basis.lift(q)).collect()).ok())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solid::SurfaceKind;
    use approx::assert_relative_eq;
    use citylift_model::TriangleMesh;

    fn wall_10x3() -> Surface {
        Surface::new(
            SurfaceKind::Wall,
            Ring::from_coords(&[
                [0.0, 0.0, 0.0],
                [0.0, 0.0, 3.0],
                [10.0, 0.0, 3.0],
                [10.0, 0.0, 0.0],
            ])
            .unwrap(),
        )
    }

    /// Window panel at y = 0.1 (inside the wall thickness).
    fn window_element(id: u64, x0: f64, z0: f64, w: f64, h: f64) -> ElementGeometry {
        ElementGeometry::new(
            id,
            TriangleMesh::new(
                vec![
                    [x0, 0.1, z0],
                    [x0 + w, 0.1, z0],
                    [x0 + w, 0.1, z0 + h],
                    [x0, 0.1, z0 + h],
                ],
                vec![[0, 1, 2], [0, 2, 3]],
            ),
        )
    }

    #[test]
    fn test_derive_opening_polygon() {
        let openings = derive_openings(&[window_element(11, 2.0, 1.0, 1.2, 1.4)], OpeningKind::Window);
        assert_eq!(openings.len(), 1);
        assert_relative_eq!(openings[0].ring.area(), 1.2 * 1.4, epsilon = 1e-9);
        assert_eq!(openings[0].kind, OpeningKind::Window);
    }

    #[test]
    fn test_assignment_projects_onto_wall_plane() {
        let mut walls = vec![wall_10x3()];
        let openings = derive_openings(&[window_element(11, 2.0, 1.0, 1.2, 1.4)], OpeningKind::Window);
        let dropped = assign_openings_to_walls(openings, &mut walls);
        assert_eq!(dropped, 0);
        assert_eq!(walls[0].openings.len(), 1);
        // Projected into the wall plane y = 0
        assert!(walls[0].openings[0]
            .ring
            .points()
            .iter()
            .all(|p| p.y.abs() < 1e-9));
    }

    #[test]
    fn test_unmatched_opening_is_dropped() {
        let mut walls = vec![wall_10x3()];
        // Far outside any wall
        let stray = derive_openings(&[window_element(12, 50.0, 1.0, 1.0, 1.0)], OpeningKind::Door);
        let dropped = assign_openings_to_walls(stray, &mut walls);
        assert_eq!(dropped, 1);
        assert!(walls[0].openings.is_empty());
    }

    #[test]
    fn test_subtraction_cuts_matching_hole() {
        let mut walls = vec![wall_10x3()];
        let openings = derive_openings(&[window_element(11, 2.0, 1.0, 1.2, 1.4)], OpeningKind::Window);
        assign_openings_to_walls(openings, &mut walls);
        adjust_wall_and_opening_surfaces(&mut walls);

        let wall = &walls[0];
        assert_eq!(wall.holes.len(), 1);
        assert_relative_eq!(wall.holes[0].area(), 1.2 * 1.4, epsilon = 1e-9);
        // Hole and opening cover the same polygon
        assert_relative_eq!(
            wall.holes[0].area(),
            wall.openings[0].ring.area(),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            (wall.holes[0].centroid() - wall.openings[0].ring.centroid()).norm(),
            0.0,
            epsilon = 1e-9
        );
        // Outer boundary is untouched for an interior opening
        assert_relative_eq!(wall.ring.area(), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_two_openings_one_wall() {
        let mut walls = vec![wall_10x3()];
        let mut openings =
            derive_openings(&[window_element(1, 1.0, 1.0, 1.0, 1.0)], OpeningKind::Window);
        openings.extend(derive_openings(
            &[window_element(2, 6.0, 0.0, 1.0, 2.1)],
            OpeningKind::Door,
        ));
        assign_openings_to_walls(openings, &mut walls);
        adjust_wall_and_opening_surfaces(&mut walls);
        // The door touches the wall bottom edge and becomes a notch, the
        // window stays an interior hole
        let wall = &walls[0];
        assert_eq!(wall.openings.len(), 2);
        assert!(wall.holes.len() >= 1);
    }
}
