// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Semantic property sets carried by the validated building graph.
//!
//! These mirror what the analyzer extracts from the source property sets
//! (Pset_BuildingCommon, Pset_BuildingStoreyCommon, Pset_Address,
//! Pset_SiteWeather and the thermal/usage/material quantities).

/// One building storey.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Storey {
    /// AboveGround flag from the storey pset; `None` when undecidable
    pub above_ground: Option<bool>,
    /// Storey elevation in meters
    pub elevation: Option<f64>,
    /// Gross/Net storey height in meters
    pub gross_height: Option<f64>,
}

impl Storey {
    /// Whether the storey counts as above ground: explicit flag, then
    /// elevation >= -1 m, then true.
    pub fn is_above_ground(&self) -> bool {
        match (self.above_ground, self.elevation) {
            (Some(flag), _) => flag,
            (None, Some(elev)) => elev >= -1.0,
            (None, None) => true,
        }
    }
}

/// Raw address data as the source carries it.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddressSource {
    /// Free-form address lines ("Musterstraße 12")
    pub address_lines: Vec<String>,
    pub town: Option<String>,
    pub postal_code: Option<String>,
}

/// Site weather property set (Pset_SiteWeather).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeatherSet {
    /// Maximum ambient temperature
    pub max_ambient_temp: f64,
    /// Minimum ambient temperature
    pub min_ambient_temp: f64,
    /// True when the model's temperature unit is Kelvin rather than Celsius
    pub kelvin: bool,
}

/// Thermal demands and setpoints for the EnergyADE thermal/usage zones.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThermalSet {
    pub is_heated: bool,
    pub is_cooled: bool,
    /// Heating setpoint temperature in °C
    pub heating_setpoint: Option<f64>,
    /// Cooling setpoint temperature in °C
    pub cooling_setpoint: Option<f64>,
}

/// Occupancy data for the EnergyADE usage zone.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UsageSet {
    /// Number of occupants
    pub occupants: Option<u32>,
    /// Occupied hours per day
    pub occupancy_hours: Option<f64>,
}

/// One layer of a material layer set.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialLayer {
    pub material: MaterialProperties,
    /// Layer thickness in meters
    pub thickness: f64,
}

/// Material properties as far as the source carries them.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaterialProperties {
    pub name: String,
    /// kg/m³
    pub density: Option<f64>,
    /// W/(m·K)
    pub conductivity: Option<f64>,
    /// J/(kg·K)
    pub specific_heat: Option<f64>,
}

/// A material layer set of one boundary element category, the source of an
/// EnergyADE construction.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstructionSet {
    /// Name of the layer set ("Exterior wall 36.5")
    pub name: String,
    /// Element ids this layer set applies to
    pub element_ids: Vec<u64>,
    pub layers: Vec<MaterialLayer>,
    /// Thermal transmittance in W/(m²·K), when quantified
    pub u_value: Option<f64>,
}

impl ConstructionSet {
    /// Total thickness of all layers in meters.
    pub fn total_thickness(&self) -> f64 {
        self.layers.iter().map(|l| l.thickness).sum()
    }
}
