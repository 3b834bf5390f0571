// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The validated building graph handed over by the external IFC analyzer.

use crate::attributes::{
    AddressSource, ConstructionSet, Storey, ThermalSet, UsageSet, WeatherSet,
};
use crate::units::LengthUnit;
use crate::validation::{Georeferencing, Validation};

/// Geometry categories the conversion core consumes.
///
/// The analyzer maps IFC element types onto these buckets
/// (IfcSlab/BASESLAB → `BaseSlab`, IfcSlab/FLOOR → `FloorSlab`,
/// IfcSlab/ROOF and IfcRoof → `Roof`, IfcWall → `Wall`, IfcDoor → `Door`,
/// IfcWindow → `Window`, IfcSpace → `Space`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeometryCategory {
    BaseSlab,
    FloorSlab,
    Roof,
    Wall,
    Door,
    Window,
    Space,
}

impl GeometryCategory {
    /// Parse an analyzer category tag.
    pub fn parse(name: &str) -> crate::error::Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "baseslab" => Ok(GeometryCategory::BaseSlab),
            "floor" | "floorslab" => Ok(GeometryCategory::FloorSlab),
            "roof" => Ok(GeometryCategory::Roof),
            "wall" => Ok(GeometryCategory::Wall),
            "door" => Ok(GeometryCategory::Door),
            "window" => Ok(GeometryCategory::Window),
            "space" => Ok(GeometryCategory::Space),
            other => Err(crate::error::Error::UnknownCategory(other.to_string())),
        }
    }

    /// All categories, in analyzer emission order.
    pub const ALL: [GeometryCategory; 7] = [
        GeometryCategory::BaseSlab,
        GeometryCategory::FloorSlab,
        GeometryCategory::Roof,
        GeometryCategory::Wall,
        GeometryCategory::Door,
        GeometryCategory::Window,
        GeometryCategory::Space,
    ];
}

/// Indexed triangle mesh with f64 vertices in model coordinates (meters,
/// already georeferenced by the analyzer).
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriangleMesh {
    /// Vertex positions
    pub verts: Vec<[f64; 3]>,
    /// Triangle vertex indices
    pub faces: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn new(verts: Vec<[f64; 3]>, faces: Vec<[u32; 3]>) -> Self {
        Self { verts, faces }
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Iterate triangles as vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = [[f64; 3]; 3]> + '_ {
        self.faces.iter().map(move |f| {
            [
                self.verts[f[0] as usize],
                self.verts[f[1] as usize],
                self.verts[f[2] as usize],
            ]
        })
    }

    /// Lowest z coordinate of any vertex, if the mesh has vertices.
    pub fn min_z(&self) -> Option<f64> {
        self.verts.iter().map(|v| v[2]).fold(None, |acc, z| match acc {
            Some(m) if m <= z => Some(m),
            _ => Some(z),
        })
    }

    /// Highest z coordinate of any vertex, if the mesh has vertices.
    pub fn max_z(&self) -> Option<f64> {
        self.verts.iter().map(|v| v[2]).fold(None, |acc, z| match acc {
            Some(m) if m >= z => Some(m),
            _ => Some(z),
        })
    }

    /// Axis-aligned bounds as (min, max) corners.
    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        let first = *self.verts.first()?;
        let mut min = first;
        let mut max = first;
        for v in &self.verts {
            for i in 0..3 {
                min[i] = min[i].min(v[i]);
                max[i] = max[i].max(v[i]);
            }
        }
        Some((min, max))
    }
}

/// One building element with resolved world-coordinate geometry.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementGeometry {
    /// Stable element id from the source model
    pub id: u64,
    /// Element name, when the source carries one
    pub name: Option<String>,
    pub mesh: TriangleMesh,
}

impl ElementGeometry {
    pub fn new(id: u64, mesh: TriangleMesh) -> Self {
        Self {
            id,
            name: None,
            mesh,
        }
    }
}

/// One building of the validated graph.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Building {
    /// Source global id
    pub global_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub long_name: Option<String>,
    pub object_type: Option<String>,
    /// Occupancy hint from Pset_BuildingCommon / Pset_BuildingUse
    pub occupancy_type: Option<String>,
    pub year_of_construction: Option<String>,
    /// Predefined roof types of the building's roof elements
    pub roof_types: Vec<String>,
    /// Explicit height quantity (Gross/Net height chain, meters)
    pub height_attribute: Option<f64>,
    /// Representation-context length unit when it differs from the model's
    pub unit_override: Option<crate::units::LengthUnit>,
    pub storeys: Vec<Storey>,
    pub address: Option<AddressSource>,
    pub thermal: Option<ThermalSet>,
    pub usage: Option<UsageSet>,
    /// Material layer sets of the building's boundary elements
    pub constructions: Vec<ConstructionSet>,

    base_slabs: Vec<ElementGeometry>,
    floor_slabs: Vec<ElementGeometry>,
    roofs: Vec<ElementGeometry>,
    walls: Vec<ElementGeometry>,
    doors: Vec<ElementGeometry>,
    windows: Vec<ElementGeometry>,
    spaces: Vec<ElementGeometry>,
}

impl Building {
    pub fn new(global_id: impl Into<String>) -> Self {
        Self {
            global_id: global_id.into(),
            ..Self::default()
        }
    }

    /// Geometry of one category.
    pub fn geometry(&self, category: GeometryCategory) -> &[ElementGeometry] {
        match category {
            GeometryCategory::BaseSlab => &self.base_slabs,
            GeometryCategory::FloorSlab => &self.floor_slabs,
            GeometryCategory::Roof => &self.roofs,
            GeometryCategory::Wall => &self.walls,
            GeometryCategory::Door => &self.doors,
            GeometryCategory::Window => &self.windows,
            GeometryCategory::Space => &self.spaces,
        }
    }

    pub fn add_geometry(&mut self, category: GeometryCategory, element: ElementGeometry) {
        let bucket = match category {
            GeometryCategory::BaseSlab => &mut self.base_slabs,
            GeometryCategory::FloorSlab => &mut self.floor_slabs,
            GeometryCategory::Roof => &mut self.roofs,
            GeometryCategory::Wall => &mut self.walls,
            GeometryCategory::Door => &mut self.doors,
            GeometryCategory::Window => &mut self.windows,
            GeometryCategory::Space => &mut self.spaces,
        };
        bucket.push(element);
    }

    /// Base geometry: BASESLAB slabs, or FLOOR slabs when no dedicated
    /// base slab exists.
    pub fn base_geometry(&self) -> &[ElementGeometry] {
        if self.base_slabs.is_empty() {
            &self.floor_slabs
        } else {
            &self.base_slabs
        }
    }

    /// True when no category carries any triangles.
    pub fn has_no_topology(&self) -> bool {
        GeometryCategory::ALL
            .iter()
            .all(|&c| self.geometry(c).iter().all(|e| e.mesh.is_empty()))
    }
}

/// The validated model: an ordered sequence of buildings plus model-level
/// metadata from the analyzer.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildingModel {
    /// Source schema version (e.g. "IFC4")
    pub schema: String,
    /// Model name (taken from the output file stem by the caller)
    pub name: String,
    pub validation: Validation,
    pub georeferencing: Georeferencing,
    pub length_unit: LengthUnit,
    /// Site weather property set, when present
    pub site_weather: Option<WeatherSet>,
    /// Site address fallback, when present
    pub site_address: Option<AddressSource>,
    pub buildings: Vec<Building>,
}

impl BuildingModel {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            validation: Validation::Valid,
            georeferencing: Georeferencing::default(),
            length_unit: LengthUnit::default(),
            site_weather: None,
            site_address: None,
            buildings: Vec::new(),
        }
    }
}
