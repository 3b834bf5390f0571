// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structured per-building warnings.
//!
//! Every recoverable geometry absence is recorded as a warning on the
//! building feature; the rendered text follows the progress-message catalog
//! the host UI localizes.

use citylift_geometry::SurfaceKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scoped, non-fatal conditions recorded while converting one building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warning {
    /// LoD0: no base slab, footprint omitted
    MissingBaseslabFootprint,
    /// LoD1+: no base slab, the whole building geometry is omitted
    MissingBaseslab,
    /// LoD0: no roof geometry, roof edge omitted
    MissingRoofEdge,
    /// LoD2+: no roof geometry, roof-dependent surfaces omitted
    MissingRoof,
    /// LoD1: the height fallback chain came up empty
    MissingHeight,
    /// Wall sub-segments covered by no roof were omitted
    WallHeightUnknown { segments: usize },
    /// Openings matching no wall surface were dropped
    OpeningsUnassigned { count: usize },
    /// No address data on building or site
    MissingAddress,
    /// LoD4: no interior space geometry
    MissingRooms,
    /// EnergyADE: no site weather property set
    MissingWeatherData,
    /// EnergyADE: no solid, thermal zone omitted
    MissingThermalData,
    /// EnergyADE: no solid, usage zone omitted
    MissingUsageData,
    /// The solid misses a boundary category and is flagged, not closed
    IncompleteSolid { missing: SurfaceKind },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingBaseslabFootprint => {
                write!(f, "due to the missing baseslab, no footprint geometry can be calculated")
            }
            Warning::MissingBaseslab => {
                write!(f, "due to the missing baseslab, no building geometry can be calculated")
            }
            Warning::MissingRoofEdge => {
                write!(f, "due to the missing roof, no roof edge geometry can be calculated")
            }
            Warning::MissingRoof => {
                write!(f, "due to the missing roof, it will also be missing in CityGML")
            }
            Warning::MissingHeight => write!(
                f,
                "due to the missing height and roof, no building geometry can be calculated"
            ),
            Warning::WallHeightUnknown { segments } => write!(
                f,
                "due to a missing roof, a wall height can't be calculated ({segments} segments omitted)"
            ),
            Warning::OpeningsUnassigned { count } => {
                write!(f, "{count} openings match no wall surface and were skipped")
            }
            Warning::MissingAddress => write!(f, "no address details existing"),
            Warning::MissingRooms => {
                write!(f, "due to the missing rooms, they will also be missing in CityGML")
            }
            Warning::MissingWeatherData => {
                write!(f, "due to the missing weather data, it will also be missing in CityGML")
            }
            Warning::MissingThermalData => {
                write!(f, "due to the missing geometry, no thermal zone can be calculated")
            }
            Warning::MissingUsageData => {
                write!(f, "due to the missing geometry, no usage zone can be calculated")
            }
            Warning::IncompleteSolid { missing } => {
                write!(f, "building solid is incomplete: {} missing", missing.citygml_name())
            }
        }
    }
}
