// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CityLift Geometry
//!
//! Geometry kernel for CityGML boundary derivation: reconstructs footprints,
//! roofs, walls, openings and room volumes as boundary representations from
//! heterogeneous, often-incomplete building geometry.
//!
//! All operations are pure functions over in-memory structures. A missing
//! precursor never raises an error; the operation returns `None` (or an
//! empty set) and the caller records the warning. Errors are reserved for
//! genuinely unexpected conditions (degenerate rings, failed boolean ops).

pub mod bool2d;
pub mod error;
pub mod extrude;
pub mod facets;
pub mod footprint;
pub mod height;
pub mod openings;
pub mod ring;
pub mod roofs;
pub mod rooms;
pub mod solid;
pub mod walls;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use error::{Error, Result};
pub use extrude::build_block_solid;
pub use facets::{cluster_facets, Facet};
pub use footprint::{extract_footprint, extract_roof_edge};
pub use height::derive_height;
pub use openings::{
    adjust_wall_and_opening_surfaces, assign_openings_to_walls, derive_openings,
};
pub use ring::{point_in_contour, Plane, PlaneBasis, Ring};
pub use roofs::{clip_roofs_to_footprint, derive_roof_surfaces};
pub use rooms::derive_rooms;
pub use solid::{check_closed, Opening, OpeningKind, Room, Solid, Surface, SurfaceKind};
pub use walls::{
    adjust_roof_and_wall_surfaces, derive_between_roof_walls, derive_wall_surfaces,
    WallDerivation,
};

/// Vertex-welding and edge-matching tolerance: one millimetre at the meter
/// scale of building coordinates. Verified by the solid watertightness tests.
pub const SNAP_TOLERANCE: f64 = 1e-3;

/// Angular tolerance (radians) for coplanarity clustering.
pub const ANGLE_TOLERANCE: f64 = 1e-3;

/// Plane-membership distance for opening-to-wall assignment. Looser than
/// [`SNAP_TOLERANCE`] because opening panels sit inside the wall thickness.
pub const ASSIGN_TOLERANCE: f64 = 0.5;
