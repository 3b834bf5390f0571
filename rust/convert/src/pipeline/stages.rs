// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stage implementations of the conversion pipeline.

use super::{BuildingContext, Stage};
use crate::attributes::{extract_address, extract_attributes};
use crate::eade;
use crate::error::Result;
use crate::warnings::Warning;
use citylift_geometry as kernel;
use citylift_geometry::{OpeningKind, Solid, Surface, SurfaceKind};
use citylift_model::{GeometryCategory, TargetLod};
use tracing::debug;

/// Semantic building attributes and the height derivation.
pub struct AttributesStage;

impl Stage for AttributesStage {
    fn name(&self) -> &'static str {
        "building attributes are extracted"
    }

    fn run(&self, cx: &mut BuildingContext<'_>) -> Result<()> {
        let mut attrs = extract_attributes(cx.building);
        cx.height = kernel::derive_height(cx.building);
        attrs.measured_height = cx.height;
        cx.feature.attributes = attrs;
        Ok(())
    }
}

/// Postal address; independent of all geometry.
pub struct AddressStage;

impl Stage for AddressStage {
    fn name(&self) -> &'static str {
        "building address is extracted"
    }

    fn run(&self, cx: &mut BuildingContext<'_>) -> Result<()> {
        match extract_address(cx.building, cx.model.site_address.as_ref()) {
            Some(address) => cx.feature.address = Some(address),
            None => cx.warn(Warning::MissingAddress),
        }
        Ok(())
    }
}

/// Footprint projection. Emits the LoD0 footprint element; at LoD1+ the
/// ring is kept as the intermediate every boundary stage builds on.
pub struct FootprintStage;

impl Stage for FootprintStage {
    fn name(&self) -> &'static str {
        "building footprint is calculated"
    }

    fn run(&self, cx: &mut BuildingContext<'_>) -> Result<()> {
        match kernel::extract_footprint(cx.building.base_geometry()) {
            Some(ring) => {
                if cx.config.lod == TargetLod::Lod0 {
                    cx.feature.footprint = Some(ring.clone());
                }
                cx.footprint = Some(ring);
            }
            None => {
                let warning = if cx.config.lod == TargetLod::Lod0 {
                    Warning::MissingBaseslabFootprint
                } else {
                    Warning::MissingBaseslab
                };
                cx.warn(warning);
            }
        }
        Ok(())
    }
}

/// LoD0 roof edge; independent of the footprint.
pub struct RoofEdgeStage;

impl Stage for RoofEdgeStage {
    fn name(&self) -> &'static str {
        "building roofedge is calculated"
    }

    fn run(&self, cx: &mut BuildingContext<'_>) -> Result<()> {
        match kernel::extract_roof_edge(cx.building.geometry(GeometryCategory::Roof)) {
            Some(ring) => cx.feature.roof_edge = Some(ring),
            None => cx.warn(Warning::MissingRoofEdge),
        }
        Ok(())
    }
}

/// LoD1 block solid from footprint and height.
pub struct BlockSolidStage;

impl Stage for BlockSolidStage {
    fn name(&self) -> &'static str {
        "building solid is calculated"
    }

    fn run(&self, cx: &mut BuildingContext<'_>) -> Result<()> {
        let Some(height) = cx.height else {
            cx.warn(Warning::MissingHeight);
            return Ok(());
        };
        let Some(footprint) = cx.footprint.clone() else {
            // FootprintStage already recorded the baseslab warning
            return Ok(());
        };
        let solid = kernel::build_block_solid(&footprint, height);
        debug!(
            building = %cx.building.global_id,
            closed = kernel::check_closed(&solid),
            "block solid assembled"
        );
        cx.feature.solid = Some(solid);
        Ok(())
    }
}

/// LoD2+ roof facets.
pub struct RoofSurfacesStage;

impl Stage for RoofSurfacesStage {
    fn name(&self) -> &'static str {
        "roof surfaces are extracted"
    }

    fn run(&self, cx: &mut BuildingContext<'_>) -> Result<()> {
        let roofs = kernel::derive_roof_surfaces(cx.building.geometry(GeometryCategory::Roof));
        if roofs.is_empty() {
            cx.warn(Warning::MissingRoof);
        }
        cx.roofs = roofs;
        Ok(())
    }
}

/// LoD2+ walls under the roof facets, plus the walls between roofs.
///
/// With no roof at LoD3+, walls fall back to flat caps at the derived
/// height so the opening stages still find host surfaces (the roof warning
/// is already recorded).
pub struct WallSurfacesStage;

impl Stage for WallSurfacesStage {
    fn name(&self) -> &'static str {
        "wall surfaces are calculated"
    }

    fn run(&self, cx: &mut BuildingContext<'_>) -> Result<()> {
        let Some(footprint) = cx.footprint.clone() else {
            return Ok(()); // baseslab warning already recorded
        };

        if cx.roofs.is_empty() {
            if cx.config.lod >= TargetLod::Lod3 {
                if let Some(height) = cx.height {
                    let block = kernel::build_block_solid(&footprint, height);
                    cx.walls = block
                        .surfaces
                        .into_iter()
                        .filter(|s| s.kind == SurfaceKind::Wall)
                        .collect();
                }
            }
            return Ok(());
        }

        let derivation = kernel::derive_wall_surfaces(&footprint, &cx.roofs);
        if derivation.uncovered_segments > 0 {
            cx.warn(Warning::WallHeightUnknown {
                segments: derivation.uncovered_segments,
            });
        }
        cx.walls = derivation.walls;
        cx.walls.extend(kernel::derive_between_roof_walls(&cx.roofs));
        Ok(())
    }
}

/// LoD3+ door and window openings: derive, assign, subtract.
pub struct OpeningsStage;

impl Stage for OpeningsStage {
    fn name(&self) -> &'static str {
        "openings are assigned to walls"
    }

    fn run(&self, cx: &mut BuildingContext<'_>) -> Result<()> {
        let mut openings =
            kernel::derive_openings(cx.building.geometry(GeometryCategory::Door), OpeningKind::Door);
        openings.extend(kernel::derive_openings(
            cx.building.geometry(GeometryCategory::Window),
            OpeningKind::Window,
        ));
        if openings.is_empty() {
            return Ok(());
        }

        let dropped = kernel::assign_openings_to_walls(openings, &mut cx.walls);
        if dropped > 0 {
            cx.warn(Warning::OpeningsUnassigned { count: dropped });
        }
        kernel::adjust_wall_and_opening_surfaces(&mut cx.walls);
        Ok(())
    }
}

/// Final boundary assembly for LoD2+: clip roofs to the footprint, weld
/// shared vertices, assemble the solid and flag absent categories.
pub struct AssembleSolidStage;

impl Stage for AssembleSolidStage {
    fn name(&self) -> &'static str {
        "roof and wall surfaces are adjusted"
    }

    fn run(&self, cx: &mut BuildingContext<'_>) -> Result<()> {
        let mut surfaces: Vec<Surface> = Vec::new();

        if let Some(footprint) = &cx.footprint {
            surfaces.push(Surface::new(SurfaceKind::Ground, footprint.reversed()));
            cx.roofs = kernel::clip_roofs_to_footprint(std::mem::take(&mut cx.roofs), footprint);
        }
        surfaces.append(&mut cx.roofs);
        surfaces.append(&mut cx.walls);

        if surfaces.is_empty() {
            return Ok(()); // nothing derivable; warnings already recorded
        }

        let mut solid = Solid::new(kernel::adjust_roof_and_wall_surfaces(surfaces));
        if cx.footprint.is_none() {
            solid.mark_missing(SurfaceKind::Ground);
        }
        if solid.surfaces_of(SurfaceKind::Roof).count() == 0 {
            solid.mark_missing(SurfaceKind::Roof);
        }
        if solid
            .surfaces
            .iter()
            .filter(|s| {
                matches!(s.kind, SurfaceKind::Wall | SurfaceKind::WallBetweenRoofs)
            })
            .count()
            == 0
        {
            solid.mark_missing(SurfaceKind::Wall);
        }

        for kind in solid.missing.clone() {
            cx.warn(Warning::IncompleteSolid { missing: kind });
        }
        debug!(
            building = %cx.building.global_id,
            closed = kernel::check_closed(&solid),
            surfaces = solid.surfaces.len(),
            "boundary solid assembled"
        );
        cx.feature.solid = Some(solid);
        Ok(())
    }
}

/// LoD4 interior rooms.
pub struct RoomsStage;

impl Stage for RoomsStage {
    fn name(&self) -> &'static str {
        "rooms are calculated"
    }

    fn run(&self, cx: &mut BuildingContext<'_>) -> Result<()> {
        let rooms = kernel::derive_rooms(cx.building.geometry(GeometryCategory::Space));
        if rooms.is_empty() {
            cx.warn(Warning::MissingRooms);
        }
        cx.feature.rooms = rooms;
        Ok(())
    }
}

fn energy_mut<'a>(cx: &'a mut BuildingContext<'_>) -> &'a mut eade::EnergyAde {
    cx.feature.energy.get_or_insert_with(Default::default)
}

/// EnergyADE weather time series (attribute-only, no geometry dependency).
pub struct EadeWeatherStage;

impl Stage for EadeWeatherStage {
    fn name(&self) -> &'static str {
        "energy ade: weather data is extracted"
    }

    fn run(&self, cx: &mut BuildingContext<'_>) -> Result<()> {
        match cx.model.site_weather.clone() {
            Some(set) => {
                let data = eade::convert_weather(&set, cx.envelope.as_ref());
                energy_mut(cx).weather = Some(data);
            }
            None => cx.warn(Warning::MissingWeatherData),
        }
        Ok(())
    }
}

/// EnergyADE building attributes.
pub struct EadeAttributesStage;

impl Stage for EadeAttributesStage {
    fn name(&self) -> &'static str {
        "energy ade: building attributes are extracted"
    }

    fn run(&self, cx: &mut BuildingContext<'_>) -> Result<()> {
        let attrs = eade::convert_energy_attributes(
            cx.building,
            cx.footprint.as_ref(),
            cx.height,
            cx.feature.attributes.storeys_above_ground,
            cx.envelope.as_ref(),
        );
        energy_mut(cx).attributes = Some(attrs);
        Ok(())
    }
}

/// EnergyADE thermal zone; requires the solid.
pub struct EadeThermalZoneStage;

impl Stage for EadeThermalZoneStage {
    fn name(&self) -> &'static str {
        "energy ade: thermal zone is calculated"
    }

    fn run(&self, cx: &mut BuildingContext<'_>) -> Result<()> {
        let Some(solid) = cx.feature.solid.clone() else {
            cx.warn(Warning::MissingThermalData);
            return Ok(());
        };
        let zone = eade::convert_thermal_zone(
            cx.building,
            &solid,
            cx.footprint.as_ref(),
            cx.height,
            &cx.ids,
        );
        energy_mut(cx).thermal_zone = Some(zone);
        Ok(())
    }
}

/// EnergyADE usage zone; requires the solid.
pub struct EadeUsageZoneStage;

impl Stage for EadeUsageZoneStage {
    fn name(&self) -> &'static str {
        "energy ade: usage zone is calculated"
    }

    fn run(&self, cx: &mut BuildingContext<'_>) -> Result<()> {
        if cx.feature.solid.is_none() {
            cx.warn(Warning::MissingUsageData);
            return Ok(());
        }
        let zone = eade::convert_usage_zone(cx.building, cx.feature.attributes.class_code, &cx.ids);
        energy_mut(cx).usage_zone = Some(zone);
        Ok(())
    }
}

/// EnergyADE constructions and materials (LoD2+).
pub struct EadeConstructionsStage;

impl Stage for EadeConstructionsStage {
    fn name(&self) -> &'static str {
        "energy ade: construction is calculated"
    }

    fn run(&self, cx: &mut BuildingContext<'_>) -> Result<()> {
        let (constructions, materials) = eade::convert_constructions(cx.building, &cx.ids);
        let energy = energy_mut(cx);
        energy.constructions = constructions;
        energy.materials = materials;
        Ok(())
    }
}
