// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D boolean operations on polygon contours.
//!
//! Thin wrappers over the i_overlay crate: union for footprint derivation,
//! difference for opening subtraction, intersection for clipping roofs to
//! the footprint. All contours are open point loops (no explicit closure).

use crate::error::{Error, Result};
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

/// Polygons smaller than this are considered degenerate
const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// A 2D shape: outer contour plus holes.
#[derive(Debug, Clone)]
pub struct Shape2D {
    pub outer: Vec<Point2<f64>>,
    pub holes: Vec<Vec<Point2<f64>>>,
}

/// Signed area of a contour. Positive = counter-clockwise.
pub fn signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    let n = contour.len();
    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }
    area * 0.5
}

/// Ensure counter-clockwise winding (positive area).
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if signed_area(contour) < 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Ensure clockwise winding (for holes).
pub fn ensure_cw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if signed_area(contour) > 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Whether a contour has usable area.
pub fn is_valid_contour(contour: &[Point2<f64>]) -> bool {
    contour.len() >= 3 && signed_area(contour).abs() > MIN_AREA_THRESHOLD
}

fn contour_to_path(contour: &[Point2<f64>]) -> Vec<[f64; 2]> {
    contour.iter().map(|p| [p.x, p.y]).collect()
}

fn path_to_contour(path: &[[f64; 2]]) -> Vec<Point2<f64>> {
    path.iter().map(|p| Point2::new(p[0], p[1])).collect()
}

fn shapes_from_overlay(result: Vec<Vec<Vec<[f64; 2]>>>) -> Vec<Shape2D> {
    let mut shapes = Vec::with_capacity(result.len());
    for shape in result {
        let mut contours = shape.iter().map(|c| path_to_contour(c));
        let Some(outer) = contours.next() else {
            continue;
        };
        if !is_valid_contour(&outer) {
            continue;
        }
        shapes.push(Shape2D {
            outer,
            holes: contours.filter(|c| c.len() >= 3).collect(),
        });
    }
    shapes
}

/// Union a set of contours into merged shapes.
pub fn union_contours(contours: &[Vec<Point2<f64>>]) -> Vec<Shape2D> {
    let valid: Vec<&Vec<Point2<f64>>> = contours.iter().filter(|c| is_valid_contour(c)).collect();
    match valid.len() {
        0 => Vec::new(),
        1 => vec![Shape2D {
            outer: ensure_ccw(valid[0]),
            holes: Vec::new(),
        }],
        _ => {
            let subject: Vec<Vec<[f64; 2]>> = vec![contour_to_path(&ensure_ccw(valid[0]))];
            let clip: Vec<Vec<[f64; 2]>> = valid[1..]
                .iter()
                .map(|c| contour_to_path(&ensure_ccw(c)))
                .collect();
            shapes_from_overlay(subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero))
        }
    }
}

/// Subtract clip contours from a shape; returns the largest remaining shape.
pub fn subtract_contours(
    shape: &Shape2D,
    clips: &[Vec<Point2<f64>>],
) -> Result<Shape2D> {
    let valid: Vec<&Vec<Point2<f64>>> = clips.iter().filter(|c| is_valid_contour(c)).collect();
    if valid.is_empty() {
        return Ok(shape.clone());
    }

    let mut subject: Vec<Vec<[f64; 2]>> = Vec::with_capacity(1 + shape.holes.len());
    subject.push(contour_to_path(&ensure_ccw(&shape.outer)));
    for hole in &shape.holes {
        subject.push(contour_to_path(&ensure_cw(hole)));
    }
    let clip: Vec<Vec<[f64; 2]>> = valid
        .iter()
        .map(|c| contour_to_path(&ensure_ccw(c)))
        .collect();

    let shapes = shapes_from_overlay(subject.overlay(
        &clip,
        OverlayRule::Difference,
        FillRule::EvenOdd,
    ));
    largest_shape(shapes).ok_or_else(|| {
        Error::BooleanFailed("difference resulted in empty geometry".to_string())
    })
}

/// Intersect two contours; may produce several pieces.
pub fn intersect_contours(
    a: &[Point2<f64>],
    b: &[Point2<f64>],
) -> Vec<Shape2D> {
    if !is_valid_contour(a) || !is_valid_contour(b) {
        return Vec::new();
    }
    let subject = vec![contour_to_path(&ensure_ccw(a))];
    let clip = vec![contour_to_path(&ensure_ccw(b))];
    shapes_from_overlay(subject.overlay(&clip, OverlayRule::Intersect, FillRule::EvenOdd))
}

/// The shape with the largest outer area, when any.
pub fn largest_shape(shapes: Vec<Shape2D>) -> Option<Shape2D> {
    shapes.into_iter().fold(None, |best: Option<Shape2D>, s| {
        let area = signed_area(&s.outer).abs();
        match &best {
            Some(b) if signed_area(&b.outer).abs() >= area => best,
            _ => Some(s),
        }
    })
}

/// Remove collinear and near-duplicate points from a contour.
pub fn simplify_contour(contour: &[Point2<f64>], dist_tol: f64) -> Vec<Point2<f64>> {
    if contour.len() <= 3 {
        return contour.to_vec();
    }
    let n = contour.len();
    let mut result = Vec::with_capacity(n);
    for i in 0..n {
        let prev = &contour[(i + n - 1) % n];
        let curr = &contour[i];
        let next = &contour[(i + 1) % n];

        if (curr - prev).norm() < dist_tol {
            continue;
        }
        // Collinearity via cross product against edge lengths
        let v1 = curr - prev;
        let v2 = next - curr;
        let cross = v1.x * v2.y - v1.y * v2.x;
        if cross.abs() < dist_tol * (v1.norm() + v2.norm()).max(1e-12) {
            continue;
        }
        result.push(*curr);
    }
    if result.len() < 3 {
        contour.to_vec()
    } else {
        result
    }
}

/// Miter-offset a contour outward by `dist` (negative shrinks).
///
/// Used by the footprint union fallback to bridge sliver gaps between slab
/// pieces; the offset is undone after the union succeeds.
pub fn buffer_contour(contour: &[Point2<f64>], dist: f64) -> Option<Vec<Point2<f64>>> {
    if contour.len() < 3 {
        return None;
    }
    let ccw = ensure_ccw(contour);
    let n = ccw.len();
    let mut result = Vec::with_capacity(n);
    for i in 0..n {
        let prev = &ccw[(i + n - 1) % n];
        let curr = &ccw[i];
        let next = &ccw[(i + 1) % n];

        let Some(d1) = (curr - prev).try_normalize(1e-12) else {
            continue; // duplicate point
        };
        let Some(d2) = (next - curr).try_normalize(1e-12) else {
            continue;
        };
        // Outward normals of a CCW contour point right of the direction
        let n1 = Point2::new(d1.y, -d1.x) - Point2::origin();
        let n2 = Point2::new(d2.y, -d2.x) - Point2::origin();
        let bisector = n1 + n2;
        let len2 = bisector.norm_squared();
        if len2 < 1e-18 {
            return None; // spike: edges fold back on themselves
        }
        // Miter length so both edges are offset exactly by dist
        let offset = bisector * (2.0 * dist / len2);
        result.push(curr + offset);
    }
    if is_valid_contour(&result) {
        Some(result)
    } else {
        None
    }
}
