// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar facet extraction from triangle meshes.
//!
//! Groups mesh triangles into coplanar clusters (normal direction and plane
//! offset within tolerance) and unions every cluster in-plane into one or
//! more boundary polygons. This is how multi-planar roofs become one surface
//! per facet and how door/window panels are recovered from thin boxes.

use crate::bool2d::{self, Shape2D};
use crate::ring::{Plane, Ring};
use crate::{ANGLE_TOLERANCE, SNAP_TOLERANCE};
use citylift_model::TriangleMesh;
use nalgebra::{Point2, Point3};

/// One planar facet of a mesh: carrier plane plus boundary outline.
#[derive(Debug, Clone)]
pub struct Facet {
    pub plane: Plane,
    pub outline: Ring,
}

impl Facet {
    pub fn area(&self) -> f64 {
        self.outline.area()
    }
}

struct Cluster {
    plane: Plane,
    anchor: Point3<f64>,
    triangles: Vec<[Point3<f64>; 3]>,
}

/// Cluster the mesh into coplanar facets.
///
/// Normal comparison is direction-sensitive, so the upper and lower sheets
/// of a slab land in different clusters.
pub fn cluster_facets(mesh: &TriangleMesh) -> Vec<Facet> {
    let mut clusters: Vec<Cluster> = Vec::new();

    for tri in mesh.triangles() {
        let a = Point3::new(tri[0][0], tri[0][1], tri[0][2]);
        let b = Point3::new(tri[1][0], tri[1][1], tri[1][2]);
        let c = Point3::new(tri[2][0], tri[2][1], tri[2][2]);
        let Some(plane) = Plane::from_points(&a, &b, &c) else {
            continue; // degenerate triangle
        };

        let cos_tol = 1.0 - ANGLE_TOLERANCE * ANGLE_TOLERANCE / 2.0;
        let existing = clusters.iter_mut().find(|cl| {
            cl.plane.normal.dot(&plane.normal) > cos_tol
                && cl.plane.distance(&a).abs() < SNAP_TOLERANCE
                && cl.plane.distance(&b).abs() < SNAP_TOLERANCE
                && cl.plane.distance(&c).abs() < SNAP_TOLERANCE
        });

        match existing {
            Some(cl) => cl.triangles.push([a, b, c]),
            None => clusters.push(Cluster {
                plane,
                anchor: a,
                triangles: vec![[a, b, c]],
            }),
        }
    }

    let mut facets = Vec::with_capacity(clusters.len());
    for cl in clusters {
        facets.extend(cluster_to_facets(&cl));
    }
    facets
}

/// Union one cluster's triangles in-plane and lift the outlines back to 3D.
fn cluster_to_facets(cluster: &Cluster) -> Vec<Facet> {
    let basis = cluster.plane.basis(cluster.anchor);

    let contours: Vec<Vec<Point2<f64>>> = cluster
        .triangles
        .iter()
        .map(|tri| tri.iter().map(|p| basis.project(p)).collect())
        .collect();

    let shapes = bool2d::union_contours(&contours);

    shapes
        .into_iter()
        .filter_map(|Shape2D { outer, .. }| {
            let simplified = bool2d::simplify_contour(&outer, SNAP_TOLERANCE);
            let points = simplified.iter().map(|q| basis.lift(q)).collect();
            Ring::new(points).ok().map(|outline| Facet {
                plane: cluster.plane,
                outline,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Gable roof: two sloped quads meeting at a ridge along y.
    fn gable_mesh() -> TriangleMesh {
        TriangleMesh::new(
            vec![
                // west eave, ridge, east eave at two y positions
                [0.0, 0.0, 3.0],
                [5.0, 0.0, 5.0],
                [10.0, 0.0, 3.0],
                [0.0, 8.0, 3.0],
                [5.0, 8.0, 5.0],
                [10.0, 8.0, 3.0],
            ],
            vec![
                // west slope (two triangles)
                [0, 1, 4],
                [0, 4, 3],
                // east slope
                [1, 2, 5],
                [1, 5, 4],
            ],
        )
    }

    #[test]
    fn test_gable_yields_two_facets() {
        let facets = cluster_facets(&gable_mesh());
        assert_eq!(facets.len(), 2);
        for facet in &facets {
            // Each slope: 8m deep, sqrt(5²+2²) wide
            let expected = 8.0 * (25.0f64 + 4.0).sqrt();
            assert_relative_eq!(facet.area(), expected, epsilon = 1e-6);
            assert!(facet.plane.normal.z > 0.0);
        }
    }

    #[test]
    fn test_flat_slab_top_and_bottom_split() {
        let mesh = TriangleMesh::new(
            vec![
                [0.0, 0.0, 0.0],
                [4.0, 0.0, 0.0],
                [4.0, 4.0, 0.0],
                [0.0, 4.0, 0.0],
                [0.0, 0.0, 0.3],
                [4.0, 0.0, 0.3],
                [4.0, 4.0, 0.3],
                [0.0, 4.0, 0.3],
            ],
            vec![
                // bottom (facing down)
                [0, 2, 1],
                [0, 3, 2],
                // top (facing up)
                [4, 5, 6],
                [4, 6, 7],
            ],
        );
        let facets = cluster_facets(&mesh);
        assert_eq!(facets.len(), 2);
        let up: Vec<_> = facets.iter().filter(|f| f.plane.normal.z > 0.5).collect();
        assert_eq!(up.len(), 1);
        assert_relative_eq!(up[0].outline.min_z(), 0.3, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_mesh() {
        assert!(cluster_facets(&TriangleMesh::default()).is_empty());
    }
}
