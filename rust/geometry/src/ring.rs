// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar polygon rings and plane math.
//!
//! A [`Ring`] is an ordered loop of 3D points; the closing edge back to the
//! first point is implicit. Normals follow Newell's method, so the ring works
//! for any planar polygon, convex or concave.

use crate::error::{Error, Result};
use crate::SNAP_TOLERANCE;
use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Ordered loop of 3D points (implicitly closed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    points: Vec<Point3<f64>>,
}

impl Ring {
    /// Create a ring from a point loop.
    ///
    /// Consecutive duplicates (within [`SNAP_TOLERANCE`]) and an explicit
    /// closing point are dropped. Fails on fewer than 3 distinct points.
    pub fn new(points: Vec<Point3<f64>>) -> Result<Self> {
        let mut cleaned: Vec<Point3<f64>> = Vec::with_capacity(points.len());
        for p in points {
            if let Some(last) = cleaned.last() {
                if (p - last).norm() < SNAP_TOLERANCE {
                    continue;
                }
            }
            cleaned.push(p);
        }
        // Drop an explicit closing point
        if cleaned.len() > 1 {
            let first = cleaned[0];
            if let Some(last) = cleaned.last() {
                if (first - last).norm() < SNAP_TOLERANCE {
                    cleaned.pop();
                }
            }
        }
        if cleaned.len() < 3 {
            return Err(Error::DegenerateRing(format!(
                "{} distinct points",
                cleaned.len()
            )));
        }
        Ok(Self { points: cleaned })
    }

    /// Ring from raw `[x, y, z]` coordinates.
    pub fn from_coords(coords: &[[f64; 3]]) -> Result<Self> {
        Self::new(
            coords
                .iter()
                .map(|c| Point3::new(c[0], c[1], c[2]))
                .collect(),
        )
    }

    /// Ring from 2D points at a constant height.
    pub fn from_2d(contour: &[Point2<f64>], z: f64) -> Result<Self> {
        Self::new(
            contour
                .iter()
                .map(|p| Point3::new(p.x, p.y, z))
                .collect(),
        )
    }

    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Edges of the ring, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point3<f64>, Point3<f64>)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Polygon normal by Newell's method, normalized.
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let mut normal: Vector3<f64> = Vector3::zeros();
        let n = self.points.len();
        for i in 0..n {
            let curr = &self.points[i];
            let next = &self.points[(i + 1) % n];
            normal.x += (curr.y - next.y) * (curr.z + next.z);
            normal.y += (curr.z - next.z) * (curr.x + next.x);
            normal.z += (curr.x - next.x) * (curr.y + next.y);
        }
        let len = normal.norm();
        if len < 1e-12 {
            return None; // degenerate
        }
        Some(normal / len)
    }

    /// Polygon area (half the Newell vector magnitude).
    pub fn area(&self) -> f64 {
        let mut total = Vector3::zeros();
        let p0 = self.points[0];
        for i in 1..self.points.len() - 1 {
            let v1 = self.points[i] - p0;
            let v2 = self.points[i + 1] - p0;
            total += v1.cross(&v2);
        }
        total.norm() / 2.0
    }

    /// Vertex centroid.
    pub fn centroid(&self) -> Point3<f64> {
        let mut sum = Vector3::zeros();
        for p in &self.points {
            sum += p.coords;
        }
        Point3::from(sum / self.points.len() as f64)
    }

    /// The carrier plane, when the ring has a usable normal.
    pub fn plane(&self) -> Option<Plane> {
        let normal = self.normal()?;
        let d = -normal.dot(&self.points[0].coords);
        Some(Plane { normal, d })
    }

    /// Maximum distance of any vertex from the carrier plane.
    pub fn planarity_deviation(&self) -> f64 {
        match self.plane() {
            Some(plane) => self
                .points
                .iter()
                .map(|p| plane.distance(p).abs())
                .fold(0.0, f64::max),
            None => f64::INFINITY,
        }
    }

    /// Reversed orientation (flips the normal).
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Copy shifted along z.
    pub fn translated_z(&self, dz: f64) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| Point3::new(p.x, p.y, p.z + dz))
                .collect(),
        }
    }

    pub fn min_z(&self) -> f64 {
        self.points.iter().map(|p| p.z).fold(f64::INFINITY, f64::min)
    }

    pub fn max_z(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.z)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Plan (XY) projection of the ring.
    pub fn to_plan(&self) -> Vec<Point2<f64>> {
        self.points.iter().map(|p| Point2::new(p.x, p.y)).collect()
    }

    /// Replace every point via `f`, dropping duplicates the mapping creates.
    pub(crate) fn map_points(&self, mut f: impl FnMut(&Point3<f64>) -> Point3<f64>) -> Result<Self> {
        Self::new(self.points.iter().map(f).collect())
    }
}

/// Infinite plane `normal · p + d = 0` with unit normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vector3<f64>,
    pub d: f64,
}

impl Plane {
    /// Plane through three points; `None` for collinear input.
    pub fn from_points(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<Self> {
        let normal = (b - a).cross(&(c - a));
        let len = normal.norm();
        if len < 1e-12 {
            return None;
        }
        let normal = normal / len;
        Some(Self {
            normal,
            d: -normal.dot(&a.coords),
        })
    }

    /// Signed distance of a point from the plane.
    #[inline]
    pub fn distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&p.coords) + self.d
    }

    /// Height of the plane over plan coordinates; fails for near-vertical
    /// planes.
    pub fn z_at(&self, x: f64, y: f64) -> Result<f64> {
        if self.normal.z.abs() < 1e-9 {
            return Err(Error::VerticalPlane);
        }
        Ok(-(self.normal.x * x + self.normal.y * y + self.d) / self.normal.z)
    }

    /// Whether the plane is parallel to another within `angle_tol` radians.
    pub fn is_parallel(&self, other: &Plane, angle_tol: f64) -> bool {
        self.normal.dot(&other.normal).abs() > (1.0 - angle_tol * angle_tol / 2.0)
    }

    /// Orthonormal in-plane basis for 2D projection.
    pub fn basis(&self, origin: Point3<f64>) -> PlaneBasis {
        // Pick the world axis least aligned with the normal as the seed
        let seed = if self.normal.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let u = (seed - self.normal * seed.dot(&self.normal)).normalize();
        let v = self.normal.cross(&u);
        PlaneBasis {
            origin,
            u,
            v,
            normal: self.normal,
        }
    }
}

/// Orthonormal frame of a plane for round-tripping between 3D points and
/// in-plane 2D coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PlaneBasis {
    pub origin: Point3<f64>,
    pub u: Vector3<f64>,
    pub v: Vector3<f64>,
    pub normal: Vector3<f64>,
}

impl PlaneBasis {
    /// Project a 3D point into plane coordinates (dropping normal offset).
    #[inline]
    pub fn project(&self, p: &Point3<f64>) -> Point2<f64> {
        let rel = p - self.origin;
        Point2::new(rel.dot(&self.u), rel.dot(&self.v))
    }

    /// Lift a plane coordinate back to 3D.
    #[inline]
    pub fn lift(&self, q: &Point2<f64>) -> Point3<f64> {
        self.origin + self.u * q.x + self.v * q.y
    }
}

/// Whether a 2D point lies on the contour boundary within `tol`.
///
/// The even-odd test is half-open and misses points exactly on the far
/// boundary; coverage checks combine both predicates.
pub fn point_on_contour(pt: &Point2<f64>, contour: &[Point2<f64>], tol: f64) -> bool {
    let n = contour.len();
    if n < 2 {
        return false;
    }
    for i in 0..n {
        let a = contour[i];
        let b = contour[(i + 1) % n];
        let ab = b - a;
        let len2 = ab.norm_squared();
        let t = if len2 > 1e-18 {
            ((pt - a).dot(&ab) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let closest = a + ab * t;
        if (pt - closest).norm() <= tol {
            return true;
        }
    }
    false
}

/// Even-odd containment test of a 2D point in a contour.
pub fn point_in_contour(pt: &Point2<f64>, contour: &[Point2<f64>]) -> bool {
    let n = contour.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = &contour[i];
        let pj = &contour[j];
        if ((pi.y > pt.y) != (pj.y > pt.y))
            && (pt.x < (pj.x - pi.x) * (pt.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
