// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary representation: typed surfaces, solids and the closure check.

use crate::ring::Ring;
use crate::SNAP_TOLERANCE;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// CityGML semantic surface types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceKind {
    Ground,
    Roof,
    Wall,
    WallBetweenRoofs,
    Door,
    Window,
    /// Interior room boundary, facing down
    Floor,
    /// Interior room boundary, facing up
    Ceiling,
    InteriorWall,
}

impl SurfaceKind {
    /// CityGML element name of the surface type.
    pub fn citygml_name(&self) -> &'static str {
        match self {
            SurfaceKind::Ground => "GroundSurface",
            SurfaceKind::Roof => "RoofSurface",
            SurfaceKind::Wall | SurfaceKind::WallBetweenRoofs => "WallSurface",
            SurfaceKind::Door => "Door",
            SurfaceKind::Window => "Window",
            SurfaceKind::Floor => "FloorSurface",
            SurfaceKind::Ceiling => "CeilingSurface",
            SurfaceKind::InteriorWall => "InteriorWallSurface",
        }
    }
}

/// Door/window distinction for openings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpeningKind {
    Door,
    Window,
}

impl OpeningKind {
    pub fn surface_kind(&self) -> SurfaceKind {
        match self {
            OpeningKind::Door => SurfaceKind::Door,
            OpeningKind::Window => SurfaceKind::Window,
        }
    }
}

/// A door or window polygon, assigned to exactly one host wall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opening {
    /// Source element id
    pub id: u64,
    pub kind: OpeningKind,
    pub name: Option<String>,
    pub ring: Ring,
}

/// A planar boundary polygon with semantic type, optional holes and the
/// openings cut into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surface {
    pub kind: SurfaceKind,
    pub ring: Ring,
    /// Interior rings (one per subtracted opening)
    pub holes: Vec<Ring>,
    /// Openings hosted by this surface
    pub openings: Vec<Opening>,
    /// Source element id, when the surface stems from one element
    pub source_id: Option<u64>,
}

impl Surface {
    pub fn new(kind: SurfaceKind, ring: Ring) -> Self {
        Self {
            kind,
            ring,
            holes: Vec::new(),
            openings: Vec::new(),
            source_id: None,
        }
    }

    pub fn with_source(mut self, id: u64) -> Self {
        self.source_id = Some(id);
        self
    }
}

/// Boundary representation of a volume.
///
/// A solid handed to the serializer is either watertight or explicitly
/// flagged incomplete via [`Solid::missing`]; incomplete solids are never
/// silently treated as closed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Solid {
    pub surfaces: Vec<Surface>,
    /// Surface categories known to be absent from the boundary
    pub missing: Vec<SurfaceKind>,
}

impl Solid {
    pub fn new(surfaces: Vec<Surface>) -> Self {
        Self {
            surfaces,
            missing: Vec::new(),
        }
    }

    /// Record an absent boundary category.
    pub fn mark_missing(&mut self, kind: SurfaceKind) {
        if !self.missing.contains(&kind) {
            self.missing.push(kind);
        }
    }

    pub fn is_incomplete(&self) -> bool {
        !self.missing.is_empty()
    }

    pub fn surfaces_of(&self, kind: SurfaceKind) -> impl Iterator<Item = &Surface> {
        self.surfaces.iter().filter(move |s| s.kind == kind)
    }
}

/// LoD4 interior room: a solid bounded by interior surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Source space element id
    pub source_id: u64,
    pub name: Option<String>,
    pub solid: Solid,
}

/// Tolerance-quantized vertex key for edge matching.
type VertexKey = (i64, i64, i64);

#[inline]
fn quantize(p: &nalgebra::Point3<f64>) -> VertexKey {
    (
        (p.x / SNAP_TOLERANCE).round() as i64,
        (p.y / SNAP_TOLERANCE).round() as i64,
        (p.z / SNAP_TOLERANCE).round() as i64,
    )
}

/// Watertightness check: every undirected boundary edge must be shared by
/// exactly two surfaces. Opening surfaces count against their host wall's
/// hole rings. Diagnostics only; never blocks output.
pub fn check_closed(solid: &Solid) -> bool {
    if solid.surfaces.is_empty() {
        return false;
    }
    let mut edge_counts: FxHashMap<(VertexKey, VertexKey), u32> = FxHashMap::default();

    let mut count_ring = |ring: &Ring, edge_counts: &mut FxHashMap<(VertexKey, VertexKey), u32>| {
        for (a, b) in ring.edges() {
            let (ka, kb) = (quantize(&a), quantize(&b));
            if ka == kb {
                continue; // collapsed edge under tolerance
            }
            let key = if ka < kb { (ka, kb) } else { (kb, ka) };
            *edge_counts.entry(key).or_insert(0) += 1;
        }
    };

    for surface in &solid.surfaces {
        count_ring(&surface.ring, &mut edge_counts);
        for hole in &surface.holes {
            count_ring(hole, &mut edge_counts);
        }
        for opening in &surface.openings {
            count_ring(&opening.ring, &mut edge_counts);
        }
    }

    edge_counts.values().all(|&c| c == 2)
}
