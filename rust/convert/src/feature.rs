// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The in-memory CityGML feature model handed to the external serializer.
//!
//! The serializer walks these structs and emits CityGML 2.0 (plus the
//! EnergyADE 1.0 namespace); nothing here performs XML work.

use crate::eade::EnergyAde;
use crate::warnings::Warning;
use citylift_geometry::{Ring, Room, Solid};
use serde::{Deserialize, Serialize};

/// Axis-aligned 3D bounding box of the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Envelope {
    pub fn midpoint(&self) -> [f64; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    /// Grow to include another envelope.
    pub fn expand(&mut self, other: &Envelope) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(other.min[i]);
            self.max[i] = self.max[i].max(other.max[i]);
        }
    }
}

/// core:relativeToTerrain classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelativeToTerrain {
    EntirelyAboveTerrain,
    EntirelyBelowTerrain,
    SubstantiallyAboveAndBelowTerrain,
    SubstantiallyAboveTerrain,
    SubstantiallyBelowTerrain,
}

/// Semantic building attributes for the CityGML building element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildingAttributes {
    pub name: Option<String>,
    pub description: Option<String>,
    /// bldg:class code
    pub class_code: Option<u16>,
    /// bldg:function code
    pub function_code: Option<u16>,
    /// bldg:usage code
    pub usage_code: Option<u16>,
    pub year_of_construction: Option<String>,
    /// bldg:roofType code
    pub roof_type_code: Option<u16>,
    /// bldg:measuredHeight in meters
    pub measured_height: Option<f64>,
    pub storeys_above_ground: u32,
    pub storeys_below_ground: u32,
    /// Average storey height above ground, when any storey quantifies it
    pub storey_height_above_ground: Option<f64>,
    pub storey_height_below_ground: Option<f64>,
    pub relative_to_terrain: Option<RelativeToTerrain>,
}

/// Postal address of a building.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub number: Option<String>,
    pub town: Option<String>,
    pub postal_code: Option<String>,
}

/// One converted building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingFeature {
    /// Generated GML id
    pub gml_id: String,
    /// Source global id
    pub global_id: String,
    /// LoD the feature was converted at
    pub lod: u8,
    pub attributes: BuildingAttributes,
    pub address: Option<Address>,
    /// LoD0 footprint (absent at other LoDs and when the base slab is missing)
    pub footprint: Option<Ring>,
    /// LoD0 roof edge
    pub roof_edge: Option<Ring>,
    /// Boundary solid (LoD1+)
    pub solid: Option<Solid>,
    /// Interior rooms (LoD4)
    pub rooms: Vec<Room>,
    /// EnergyADE bundle, when enrichment is enabled
    pub energy: Option<EnergyAde>,
    pub warnings: Vec<Warning>,
}

impl BuildingFeature {
    pub fn new(gml_id: String, global_id: String, lod: u8) -> Self {
        Self {
            gml_id,
            global_id,
            lod,
            attributes: BuildingAttributes::default(),
            address: None,
            footprint: None,
            roof_edge: None,
            solid: None,
            rooms: Vec::new(),
            energy: None,
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, warning: Warning) {
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }
}

/// Per-building conversion outcome kept in source order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BuildingOutcome {
    Converted(Box<BuildingFeature>),
    /// Units/topology failure scoped to this building
    Failed { global_id: String, reason: String },
}

impl BuildingOutcome {
    pub fn feature(&self) -> Option<&BuildingFeature> {
        match self {
            BuildingOutcome::Converted(feature) => Some(feature),
            BuildingOutcome::Failed { .. } => None,
        }
    }
}

/// The converted city model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityModel {
    pub name: String,
    pub envelope: Option<Envelope>,
    pub members: Vec<BuildingOutcome>,
}
