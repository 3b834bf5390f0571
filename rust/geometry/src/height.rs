// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building height derivation.
//!
//! Fallback chain, in order:
//! 1. vertical extent from base-slab bottom to roof top,
//! 2. the explicit building height quantity,
//! 3. storey-height sum, extrapolating storeys without a height with the
//!    per-storey average (above and below ground handled separately).

use citylift_model::{Building, GeometryCategory};

/// Derive the building height in meters, `None` when every source fails.
pub fn derive_height(building: &Building) -> Option<f64> {
    if let Some(h) = height_from_geometry(building) {
        return Some(h);
    }
    if let Some(h) = building.height_attribute {
        if h > 0.0 {
            return Some(h);
        }
    }
    height_from_storeys(building)
}

/// Base-slab bottom to roof top, when both categories carry geometry.
fn height_from_geometry(building: &Building) -> Option<f64> {
    let base_min = building
        .base_geometry()
        .iter()
        .filter_map(|e| e.mesh.min_z())
        .fold(None, |acc: Option<f64>, z| {
            Some(acc.map_or(z, |m| m.min(z)))
        })?;
    let roof_max = building
        .geometry(GeometryCategory::Roof)
        .iter()
        .filter_map(|e| e.mesh.max_z())
        .fold(None, |acc: Option<f64>, z| {
            Some(acc.map_or(z, |m| m.max(z)))
        })?;
    let height = roof_max - base_min;
    (height > 0.0).then_some(height)
}

/// Storey-sum estimate with missing-height extrapolation.
fn height_from_storeys(building: &Building) -> Option<f64> {
    let mut sum_ag = 0.0;
    let mut sum_bg = 0.0;
    let mut known_ag = 0usize;
    let mut known_bg = 0usize;
    let mut missing_ag = 0usize;
    let mut missing_bg = 0usize;

    for storey in &building.storeys {
        let above = storey.is_above_ground();
        match storey.gross_height {
            Some(h) if h > 0.0 => {
                if above {
                    sum_ag += h;
                    known_ag += 1;
                } else {
                    sum_bg += h;
                    known_bg += 1;
                }
            }
            _ => {
                if above {
                    missing_ag += 1;
                } else {
                    missing_bg += 1;
                }
            }
        }
    }

    if known_ag == 0 && known_bg == 0 {
        return None;
    }

    let est_ag = if known_ag > 0 {
        sum_ag + missing_ag as f64 * (sum_ag / known_ag as f64)
    } else {
        0.0
    };
    let est_bg = if known_bg > 0 {
        sum_bg + missing_bg as f64 * (sum_bg / known_bg as f64)
    } else {
        0.0
    };
    let height = est_ag + est_bg;
    (height > 0.0).then_some(height)
}
