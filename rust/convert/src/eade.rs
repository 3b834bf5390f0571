// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! EnergyADE enrichment (LoD 1+).
//!
//! Attaches thermal/energy semantics to an already-converted building.
//! Every stage is independently skippable: weather is attribute-only,
//! thermal and usage zones require the solid, constructions and materials
//! (LoD 2+) derive from the boundary elements' material layer sets. The
//! absence of one element never removes another.

use crate::feature::Envelope;
use crate::mapper;
use citylift_geometry::{Ring, Solid, SurfaceKind};
use citylift_model::{Building, GmlIdGen, WeatherSet};
use serde::{Deserialize, Serialize};

/// The EnergyADE bundle attached to one building feature.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnergyAde {
    pub weather: Option<WeatherData>,
    pub attributes: Option<EnergyAttributes>,
    pub thermal_zone: Option<ThermalZone>,
    pub usage_zone: Option<UsageZone>,
    pub constructions: Vec<Construction>,
    pub materials: Vec<Material>,
}

/// Regular air-temperature time series positioned at the model midpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    /// energy:weatherDataType
    pub kind: String,
    /// Alternating min/max ambient temperatures
    pub values: Vec<f64>,
    /// "C" or "K"
    pub uom: String,
    pub begin: String,
    pub end: String,
    /// Time step of the series in months
    pub interval_months: u32,
    pub position: [f64; 3],
}

/// Building-level EnergyADE attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyAttributes {
    /// energy:constructionWeight class
    pub construction_weight: Option<String>,
    /// energy:referencePoint
    pub reference_point: [f64; 3],
    /// energy:floorArea in m²
    pub floor_area: Option<f64>,
    /// energy:volume (gross) in m³
    pub gross_volume: Option<f64>,
}

/// Thermal boundary categories of the EnergyADE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThermalBoundaryKind {
    GroundSlab,
    Roof,
    OuterWall,
}

/// One thermal boundary of the zone, referencing the bounded surface and
/// its construction by index into [`EnergyAde::constructions`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalBoundary {
    pub kind: ThermalBoundaryKind,
    /// Boundary area in m²
    pub area: f64,
    pub construction: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalZone {
    pub gml_id: String,
    pub is_heated: bool,
    pub is_cooled: bool,
    /// Zone volume in m³
    pub volume: Option<f64>,
    pub boundaries: Vec<ThermalBoundary>,
}

/// Constant setpoint schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub name: String,
    /// Setpoint temperature in °C
    pub setpoint: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occupancy {
    pub occupants: u32,
    pub hours_per_day: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageZone {
    pub gml_id: String,
    /// energy:usageZoneType
    pub usage_type: String,
    pub heating_schedule: Option<Schedule>,
    pub cooling_schedule: Option<Schedule>,
    pub occupancy: Option<Occupancy>,
}

/// One material layer referencing [`EnergyAde::materials`] by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Thickness in meters
    pub thickness: f64,
    pub material: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Construction {
    pub gml_id: String,
    pub name: String,
    /// Thermal transmittance in W/(m²·K)
    pub u_value: Option<f64>,
    pub layers: Vec<Layer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub gml_id: String,
    pub name: String,
    pub density: Option<f64>,
    pub conductivity: Option<f64>,
    pub specific_heat: Option<f64>,
}

/// Weather series layout: six half-year steps of min/max ambient
/// temperature.
const SERIES_STEPS: usize = 6;

/// Build the weather time series from the site weather set.
pub fn convert_weather(weather: &WeatherSet, envelope: Option<&Envelope>) -> WeatherData {
    let mut values = Vec::with_capacity(SERIES_STEPS * 2);
    for _ in 0..SERIES_STEPS {
        values.push(weather.min_ambient_temp);
        values.push(weather.max_ambient_temp);
    }
    WeatherData {
        kind: "airTemperature".to_string(),
        values,
        uom: if weather.kelvin { "K" } else { "C" }.to_string(),
        begin: "2020-01-01T00:00:00".to_string(),
        end: "2025-12-31T23:59:59".to_string(),
        interval_months: 6,
        position: envelope.map(|e| e.midpoint()).unwrap_or_default(),
    }
}

/// Building-level EnergyADE attributes from footprint and height.
pub fn convert_energy_attributes(
    building: &Building,
    footprint: Option<&Ring>,
    height: Option<f64>,
    storeys_above_ground: u32,
    envelope: Option<&Envelope>,
) -> EnergyAttributes {
    let area = footprint.map(|f| f.area());
    let reference_point = footprint
        .map(|f| {
            let c = f.centroid();
            [c.x, c.y, c.z]
        })
        .or_else(|| envelope.map(|e| e.midpoint()))
        .unwrap_or_default();

    let construction_weight = building
        .constructions
        .iter()
        .map(|c| c.total_thickness())
        .max_by(f64::total_cmp)
        .map(|t| mapper::construction_weight(t).to_string());

    EnergyAttributes {
        construction_weight,
        reference_point,
        floor_area: area.map(|a| a * storeys_above_ground.max(1) as f64),
        gross_volume: match (area, height) {
            (Some(a), Some(h)) => Some(a * h),
            _ => None,
        },
    }
}

/// Thermal zone over the building solid.
pub fn convert_thermal_zone(
    building: &Building,
    solid: &Solid,
    footprint: Option<&Ring>,
    height: Option<f64>,
    ids: &GmlIdGen,
) -> ThermalZone {
    let (is_heated, is_cooled) = match &building.thermal {
        Some(set) => (set.is_heated, set.is_cooled),
        None => (true, false),
    };

    let mut boundaries = Vec::new();
    for surface in &solid.surfaces {
        let kind = match surface.kind {
            SurfaceKind::Ground => ThermalBoundaryKind::GroundSlab,
            SurfaceKind::Roof => ThermalBoundaryKind::Roof,
            SurfaceKind::Wall | SurfaceKind::WallBetweenRoofs => ThermalBoundaryKind::OuterWall,
            _ => continue,
        };
        let construction = surface.source_id.and_then(|sid| {
            building
                .constructions
                .iter()
                .position(|c| c.element_ids.contains(&sid))
        });
        boundaries.push(ThermalBoundary {
            kind,
            area: surface.ring.area(),
            construction,
        });
    }

    ThermalZone {
        gml_id: ids.next_gml(),
        is_heated,
        is_cooled,
        volume: match (footprint, height) {
            (Some(f), Some(h)) => Some(f.area() * h),
            _ => None,
        },
        boundaries,
    }
}

/// Usage zone from the building function and occupancy data.
pub fn convert_usage_zone(
    building: &Building,
    class_code: Option<u16>,
    ids: &GmlIdGen,
) -> UsageZone {
    let usage_type = class_code
        .map(mapper::usage_zone_type)
        .unwrap_or("residential")
        .to_string();

    let (heating_schedule, cooling_schedule) = match &building.thermal {
        Some(set) => (
            set.heating_setpoint.map(|t| Schedule {
                name: "Heating schedule".to_string(),
                setpoint: t,
            }),
            set.cooling_setpoint.map(|t| Schedule {
                name: "Cooling schedule".to_string(),
                setpoint: t,
            }),
        ),
        None => (None, None),
    };

    let occupancy = building.usage.as_ref().and_then(|set| {
        set.occupants.map(|n| Occupancy {
            occupants: n,
            hours_per_day: set.occupancy_hours.unwrap_or(8.0),
        })
    });

    UsageZone {
        gml_id: ids.next_gml(),
        usage_type,
        heating_schedule,
        cooling_schedule,
        occupancy,
    }
}

/// Constructions and deduplicated materials from the material layer sets.
pub fn convert_constructions(
    building: &Building,
    ids: &GmlIdGen,
) -> (Vec<Construction>, Vec<Material>) {
    let mut materials: Vec<Material> = Vec::new();
    let mut constructions = Vec::with_capacity(building.constructions.len());

    for set in &building.constructions {
        let mut layers = Vec::with_capacity(set.layers.len());
        for layer in &set.layers {
            let index = match materials.iter().position(|m| m.name == layer.material.name) {
                Some(i) => i,
                None => {
                    materials.push(Material {
                        gml_id: ids.next_gml(),
                        name: layer.material.name.clone(),
                        density: layer.material.density,
                        conductivity: layer.material.conductivity,
                        specific_heat: layer.material.specific_heat,
                    });
                    materials.len() - 1
                }
            };
            layers.push(Layer {
                thickness: layer.thickness,
                material: index,
            });
        }
        constructions.push(Construction {
            gml_id: ids.next_gml(),
            name: set.name.clone(),
            u_value: set.u_value,
            layers,
        });
    }
    (constructions, materials)
}
