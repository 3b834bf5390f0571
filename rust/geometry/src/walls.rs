// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall derivation for the differentiated building boundary (LoD2+).
//!
//! For every footprint edge a vertical wall is built, bounded below by the
//! edge and above by the roof facets covering it in plan. A sub-segment
//! covered by no roof is omitted and reported; where two roof facets meet
//! at different heights, a wall between roofs closes the gap.

use crate::ring::{point_in_contour, point_on_contour, Plane, Ring};
use crate::solid::{Surface, SurfaceKind};
use crate::SNAP_TOLERANCE;
use nalgebra::{Point2, Point3};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Result of the per-edge wall derivation.
#[derive(Debug, Default)]
pub struct WallDerivation {
    pub walls: Vec<Surface>,
    /// Footprint sub-segments covered by no roof (each one was omitted)
    pub uncovered_segments: usize,
}

/// Coverage intervals of the parameterized segment a→b inside a polygon.
fn segment_coverage(
    a: &Point2<f64>,
    b: &Point2<f64>,
    poly: &[Point2<f64>],
) -> SmallVec<[(f64, f64); 4]> {
    let d = b - a;
    let len2 = d.norm_squared();
    if len2 < 1e-18 {
        return SmallVec::new();
    }

    let mut ts: SmallVec<[f64; 16]> = SmallVec::new();
    ts.push(0.0);
    ts.push(1.0);

    let n = poly.len();
    for i in 0..n {
        let e1 = poly[i];
        let e2 = poly[(i + 1) % n];
        let s = e2 - e1;
        let qp = e1 - a;
        let denom = d.x * s.y - d.y * s.x;
        if denom.abs() > 1e-12 {
            let t = (qp.x * s.y - qp.y * s.x) / denom;
            let u = (qp.x * d.y - qp.y * d.x) / denom;
            if t > 0.0 && t < 1.0 && (-1e-9..=1.0 + 1e-9).contains(&u) {
                ts.push(t);
            }
        } else {
            // Parallel edges: collinear overlap contributes its endpoints
            let cross = qp.x * d.y - qp.y * d.x;
            if cross.abs() < 1e-9 * len2.sqrt().max(1.0) {
                for e in [e1, e2] {
                    let t = (e - a).dot(&d) / len2;
                    if t > 0.0 && t < 1.0 {
                        ts.push(t);
                    }
                }
            }
        }
    }
    ts.sort_by(f64::total_cmp);

    let mut intervals: SmallVec<[(f64, f64); 4]> = SmallVec::new();
    for w in ts.windows(2) {
        let (t0, t1) = (w[0], w[1]);
        if t1 - t0 < 1e-9 {
            continue;
        }
        let mid = a + d * ((t0 + t1) / 2.0);
        if point_in_contour(&mid, poly) || point_on_contour(&mid, poly, SNAP_TOLERANCE) {
            match intervals.last_mut() {
                Some(last) if (last.1 - t0).abs() < 1e-9 => last.1 = t1,
                _ => intervals.push((t0, t1)),
            }
        }
    }
    intervals
}

/// Derive the vertical walls under the given roof facets.
pub fn derive_wall_surfaces(footprint: &Ring, roofs: &[Surface]) -> WallDerivation {
    let roof_data: Vec<(Vec<Point2<f64>>, Plane)> = roofs
        .iter()
        .filter_map(|s| s.ring.plane().map(|p| (s.ring.to_plan(), p)))
        .collect();

    let mut result = WallDerivation::default();

    for (p1, p2) in footprint.edges() {
        let a = Point2::new(p1.x, p1.y);
        let b = Point2::new(p2.x, p2.y);
        let edge_len = (b - a).norm();
        if edge_len < SNAP_TOLERANCE {
            continue;
        }

        // Subdivide the edge at every roof-coverage boundary
        let mut cuts: Vec<f64> = vec![0.0, 1.0];
        let mut coverage: Vec<(usize, f64, f64)> = Vec::new();
        for (ri, (outline, _)) in roof_data.iter().enumerate() {
            for (t0, t1) in segment_coverage(&a, &b, outline) {
                cuts.push(t0);
                cuts.push(t1);
                coverage.push((ri, t0, t1));
            }
        }
        cuts.sort_by(f64::total_cmp);
        cuts.dedup_by(|x, y| (*x - *y).abs() < 1e-9);

        // Per cell, the covering roof with the highest surface wins
        let mut cells: Vec<(f64, f64, Option<usize>)> = Vec::new();
        for w in cuts.windows(2) {
            let (t0, t1) = (w[0], w[1]);
            let t_mid = (t0 + t1) / 2.0;
            let mid = a + (b - a) * t_mid;
            let pick = coverage
                .iter()
                .filter(|(_, c0, c1)| *c0 <= t_mid + 1e-9 && t_mid <= *c1 + 1e-9)
                .filter_map(|(ri, _, _)| {
                    roof_data[*ri].1.z_at(mid.x, mid.y).ok().map(|z| (*ri, z))
                })
                .max_by(|(_, z1), (_, z2)| z1.total_cmp(z2))
                .map(|(ri, _)| ri);
            cells.push((t0, t1, pick));
        }

        // One wall polygon per maximal covered run
        let mut run: Vec<(f64, f64, usize)> = Vec::new();
        let mut flush = |run: &mut Vec<(f64, f64, usize)>, result: &mut WallDerivation| {
            if run.is_empty() {
                return;
            }
            if let Some(wall) = wall_from_run(p1, p2, run, &roof_data) {
                result.walls.push(wall);
            }
            run.clear();
        };

        for (t0, t1, pick) in cells {
            match pick {
                Some(ri) => run.push((t0, t1, ri)),
                None => {
                    if (t1 - t0) * edge_len > SNAP_TOLERANCE {
                        result.uncovered_segments += 1;
                    }
                    flush(&mut run, &mut result);
                }
            }
        }
        flush(&mut run, &mut result);
    }

    result
}

/// Build one wall polygon over a run of covered cells: bottom along the
/// footprint edge, top following the covering roof planes (with vertical
/// jogs where the covering facet changes).
fn wall_from_run(
    p1: Point3<f64>,
    p2: Point3<f64>,
    run: &[(f64, f64, usize)],
    roof_data: &[(Vec<Point2<f64>>, Plane)],
) -> Option<Surface> {
    let at = |t: f64| -> Point3<f64> { p1 + (p2 - p1) * t };
    let t_start = run.first()?.0;
    let t_end = run.last()?.1;

    let mut points: Vec<Point3<f64>> = Vec::with_capacity(run.len() * 2 + 2);
    points.push(at(t_start));

    for &(t0, t1, ri) in run {
        let plane = &roof_data[ri].1;
        for t in [t0, t1] {
            let q = at(t);
            let z = plane.z_at(q.x, q.y).ok()?;
            points.push(Point3::new(q.x, q.y, z));
        }
    }

    points.push(at(t_end));
    Ring::new(points)
        .ok()
        .map(|ring| Surface::new(SurfaceKind::Wall, ring))
}

/// Walls between adjoining roof facets that meet at different heights.
///
/// Shared plan-boundary segments of two facets are found by collinear edge
/// overlap; where the two planes disagree in z beyond tolerance, a vertical
/// quad closes the step.
pub fn derive_between_roof_walls(roofs: &[Surface]) -> Vec<Surface> {
    let roof_data: Vec<(Vec<Point2<f64>>, Plane)> = roofs
        .iter()
        .filter_map(|s| s.ring.plane().map(|p| (s.ring.to_plan(), p)))
        .collect();

    let mut walls = Vec::new();
    for i in 0..roof_data.len() {
        for j in (i + 1)..roof_data.len() {
            let (outline_i, plane_i) = &roof_data[i];
            let (outline_j, plane_j) = &roof_data[j];
            for seg in shared_boundary_segments(outline_i, outline_j) {
                let (q0, q1) = seg;
                let (Ok(zi0), Ok(zj0)) = (plane_i.z_at(q0.x, q0.y), plane_j.z_at(q0.x, q0.y))
                else {
                    continue;
                };
                let (Ok(zi1), Ok(zj1)) = (plane_i.z_at(q1.x, q1.y), plane_j.z_at(q1.x, q1.y))
                else {
                    continue;
                };
                if (zi0 - zj0).abs() <= SNAP_TOLERANCE && (zi1 - zj1).abs() <= SNAP_TOLERANCE {
                    continue; // facets already meet
                }
                let ring = Ring::new(vec![
                    Point3::new(q0.x, q0.y, zi0.min(zj0)),
                    Point3::new(q0.x, q0.y, zi0.max(zj0)),
                    Point3::new(q1.x, q1.y, zi1.max(zj1)),
                    Point3::new(q1.x, q1.y, zi1.min(zj1)),
                ]);
                if let Ok(ring) = ring {
                    walls.push(Surface::new(SurfaceKind::WallBetweenRoofs, ring));
                }
            }
        }
    }
    walls
}

/// Collinear overlap segments between the edges of two plan outlines.
fn shared_boundary_segments(
    a: &[Point2<f64>],
    b: &[Point2<f64>],
) -> Vec<(Point2<f64>, Point2<f64>)> {
    let mut segments = Vec::new();
    let na = a.len();
    let nb = b.len();
    for i in 0..na {
        let a1 = a[i];
        let a2 = a[(i + 1) % na];
        let d = a2 - a1;
        let len2 = d.norm_squared();
        if len2 < 1e-18 {
            continue;
        }
        for j in 0..nb {
            let b1 = b[j];
            let b2 = b[(j + 1) % nb];
            // Both endpoints of b's edge must lie on the line of a's edge
            let cross1 = (b1 - a1).x * d.y - (b1 - a1).y * d.x;
            let cross2 = (b2 - a1).x * d.y - (b2 - a1).y * d.x;
            let line_tol = SNAP_TOLERANCE * len2.sqrt();
            if cross1.abs() > line_tol || cross2.abs() > line_tol {
                continue;
            }
            let t1 = (b1 - a1).dot(&d) / len2;
            let t2 = (b2 - a1).dot(&d) / len2;
            let (lo, hi) = (t1.min(t2).max(0.0), t1.max(t2).min(1.0));
            if hi - lo > SNAP_TOLERANCE / len2.sqrt() {
                segments.push((a1 + d * lo, a1 + d * hi));
            }
        }
    }
    segments
}

/// Weld boundary vertices of adjoining surfaces onto common coordinates.
///
/// Every vertex within [`SNAP_TOLERANCE`] of an earlier one is replaced by
/// that earlier coordinate, making shared edges bitwise identical. Surfaces
/// that collapse under welding are dropped.
pub fn adjust_roof_and_wall_surfaces(surfaces: Vec<Surface>) -> Vec<Surface> {
    let mut canonical: FxHashMap<(i64, i64, i64), Point3<f64>> = FxHashMap::default();
    let mut canon = |p: &Point3<f64>| -> Point3<f64> {
        let key = (
            (p.x / SNAP_TOLERANCE).round() as i64,
            (p.y / SNAP_TOLERANCE).round() as i64,
            (p.z / SNAP_TOLERANCE).round() as i64,
        );
        *canonical.entry(key).or_insert(*p)
    };

    let mut welded = Vec::with_capacity(surfaces.len());
    for surface in surfaces {
        let Ok(ring) = surface.ring.map_points(|p| canon(p)) else {
            continue;
        };
        let holes = surface
            .holes
            .iter()
            .filter_map(|h| h.map_points(|p| canon(p)).ok())
            .collect();
        welded.push(Surface {
            ring,
            holes,
            ..surface
        });
    }
    welded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solid::{check_closed, Solid};
    use approx::assert_relative_eq;

    fn footprint_10x8() -> Ring {
        Ring::from_coords(&[
            [0.0, 0.0, 0.0],
            [10.0, 0.0, 0.0],
            [10.0, 8.0, 0.0],
            [0.0, 8.0, 0.0],
        ])
        .unwrap()
    }

    fn gable_facets() -> Vec<Surface> {
        vec![
            Surface::new(
                SurfaceKind::Roof,
                Ring::from_coords(&[
                    [0.0, 0.0, 3.0],
                    [5.0, 0.0, 5.0],
                    [5.0, 8.0, 5.0],
                    [0.0, 8.0, 3.0],
                ])
                .unwrap(),
            ),
            Surface::new(
                SurfaceKind::Roof,
                Ring::from_coords(&[
                    [5.0, 0.0, 5.0],
                    [10.0, 0.0, 3.0],
                    [10.0, 8.0, 3.0],
                    [5.0, 8.0, 5.0],
                ])
                .unwrap(),
            ),
        ]
    }

    #[test]
    fn test_gable_walls_cover_perimeter() {
        let derivation = derive_wall_surfaces(&footprint_10x8(), &gable_facets());
        assert_eq!(derivation.uncovered_segments, 0);
        assert_eq!(derivation.walls.len(), 4);

        // The gable-end wall at y=0 is a pentagon up to the ridge
        let south = derivation
            .walls
            .iter()
            .find(|w| w.ring.points().iter().all(|p| p.y.abs() < 1e-9))
            .unwrap();
        assert_eq!(south.ring.len(), 5);
        assert_relative_eq!(south.ring.max_z(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_gable_lod2_shell_is_watertight() {
        let footprint = footprint_10x8();
        let roofs = gable_facets();
        let derivation = derive_wall_surfaces(&footprint, &roofs);

        let mut surfaces = vec![Surface::new(SurfaceKind::Ground, footprint.reversed())];
        surfaces.extend(roofs);
        surfaces.extend(derivation.walls);
        let welded = adjust_roof_and_wall_surfaces(surfaces);

        assert!(check_closed(&Solid::new(welded)));
    }

    #[test]
    fn test_uncovered_segment_is_omitted() {
        // Roof covers only the west half of the footprint
        let half_roof = vec![Surface::new(
            SurfaceKind::Roof,
            Ring::from_coords(&[
                [0.0, 0.0, 4.0],
                [5.0, 0.0, 4.0],
                [5.0, 8.0, 4.0],
                [0.0, 8.0, 4.0],
            ])
            .unwrap(),
        )];
        let derivation = derive_wall_surfaces(&footprint_10x8(), &half_roof);
        // South and north edges are half-covered, the east edge fully
        // uncovered: three omitted segments
        assert_eq!(derivation.uncovered_segments, 3);
        // West edge + covered halves of south and north
        assert_eq!(derivation.walls.len(), 3);
        for wall in &derivation.walls {
            assert!(wall.ring.points().iter().all(|p| p.x <= 5.0 + 1e-9));
        }
    }

    #[test]
    fn test_between_roof_wall_closes_step() {
        // Two flat roofs at different heights sharing the x=5 boundary
        let roofs = vec![
            Surface::new(
                SurfaceKind::Roof,
                Ring::from_coords(&[
                    [0.0, 0.0, 6.0],
                    [5.0, 0.0, 6.0],
                    [5.0, 8.0, 6.0],
                    [0.0, 8.0, 6.0],
                ])
                .unwrap(),
            ),
            Surface::new(
                SurfaceKind::Roof,
                Ring::from_coords(&[
                    [5.0, 0.0, 4.0],
                    [10.0, 0.0, 4.0],
                    [10.0, 8.0, 4.0],
                    [5.0, 8.0, 4.0],
                ])
                .unwrap(),
            ),
        ];
        let between = derive_between_roof_walls(&roofs);
        assert_eq!(between.len(), 1);
        let wall = &between[0];
        assert_eq!(wall.kind, SurfaceKind::WallBetweenRoofs);
        assert_relative_eq!(wall.ring.min_z(), 4.0, epsilon = 1e-9);
        assert_relative_eq!(wall.ring.max_z(), 6.0, epsilon = 1e-9);
        assert!(wall.ring.points().iter().all(|p| (p.x - 5.0).abs() < 1e-9));
    }

    #[test]
    fn test_matching_roofs_need_no_wall() {
        let between = derive_between_roof_walls(&gable_facets());
        assert!(between.is_empty());
    }

    #[test]
    fn test_welding_snaps_near_vertices() {
        let jitter = SNAP_TOLERANCE * 0.4;
        let surfaces = vec![
            Surface::new(
                SurfaceKind::Roof,
                Ring::from_coords(&[
                    [0.0, 0.0, 3.0],
                    [5.0, 0.0, 3.0],
                    [5.0, 8.0, 3.0],
                    [0.0, 8.0, 3.0],
                ])
                .unwrap(),
            ),
            Surface::new(
                SurfaceKind::Wall,
                Ring::from_coords(&[
                    [0.0, 0.0, 0.0],
                    [jitter, 0.0, 3.0 + jitter],
                    [5.0 - jitter, 0.0, 3.0],
                    [5.0, 0.0, 0.0],
                ])
                .unwrap(),
            ),
        ];
        let welded = adjust_roof_and_wall_surfaces(surfaces);
        let roof_pts: Vec<_> = welded[0].ring.points().to_vec();
        let wall_pts: Vec<_> = welded[1].ring.points().to_vec();
        // The wall's top corners now coincide bitwise with the roof corners
        assert!(wall_pts.contains(&roof_pts[0]));
        assert!(wall_pts.contains(&roof_pts[1]));
    }
}
