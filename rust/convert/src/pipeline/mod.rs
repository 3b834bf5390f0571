// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The LoD conversion pipeline.
//!
//! One ordered list of [`Stage`] objects per target LoD replaces the five
//! near-duplicate per-LoD converters of classic IFC→CityGML tools: the
//! higher tiers extend the lower ones by appending stages, and all stages
//! share the geometry kernel.

pub(crate) mod stages;

#[cfg(test)]
pub(crate) mod tests;

use crate::error::Result;
use crate::feature::{BuildingFeature, Envelope};
use crate::warnings::Warning;
use citylift_geometry::{Ring, Surface};
use citylift_model::{Building, BuildingModel, ConversionConfig, GmlIdGen, TargetLod};
use tracing::debug;

use stages::{
    AddressStage, AssembleSolidStage, AttributesStage, BlockSolidStage, EadeAttributesStage,
    EadeConstructionsStage, EadeThermalZoneStage, EadeUsageZoneStage, EadeWeatherStage,
    FootprintStage, OpeningsStage, RoofEdgeStage, RoofSurfacesStage, RoomsStage,
    WallSurfacesStage,
};

/// Mutable per-building state threaded through the stages.
pub struct BuildingContext<'a> {
    pub model: &'a BuildingModel,
    pub building: &'a Building,
    pub config: ConversionConfig,
    pub envelope: Option<Envelope>,
    pub ids: GmlIdGen,
    /// The feature under construction
    pub feature: BuildingFeature,
    /// Derived height (intermediate, also emitted as measuredHeight)
    pub height: Option<f64>,
    /// Footprint ring (intermediate above LoD0)
    pub footprint: Option<Ring>,
    /// Roof surfaces awaiting assembly (LoD2+)
    pub roofs: Vec<Surface>,
    /// Wall surfaces awaiting assembly (LoD2+)
    pub walls: Vec<Surface>,
}

impl<'a> BuildingContext<'a> {
    pub fn new(
        model: &'a BuildingModel,
        building: &'a Building,
        config: ConversionConfig,
        ids: GmlIdGen,
        envelope: Option<Envelope>,
    ) -> Self {
        let feature = BuildingFeature::new(
            ids.next_gml(),
            building.global_id.clone(),
            config.lod.level(),
        );
        Self {
            model,
            building,
            config,
            envelope,
            ids,
            feature,
            height: None,
            footprint: None,
            roofs: Vec::new(),
            walls: Vec::new(),
        }
    }

    pub fn warn(&mut self, warning: Warning) {
        debug!(building = %self.building.global_id, %warning, "geometry absence");
        self.feature.warn(warning);
    }
}

/// One pipeline step. Stages record warnings for the defined geometry
/// absences; an `Err` is reserved for unexpected failures and crashes the
/// whole run. Stages are stateless (`Send + Sync`) so one stage list serves
/// all workers of the parallel driver.
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;
    fn run(&self, cx: &mut BuildingContext<'_>) -> Result<()>;
}

/// The ordered stage list for a target LoD.
pub fn stages_for(config: ConversionConfig) -> Vec<Box<dyn Stage>> {
    let lod = config.lod;
    let mut stages: Vec<Box<dyn Stage>> = vec![Box::new(AttributesStage)];

    stages.push(Box::new(FootprintStage));
    if lod == TargetLod::Lod0 {
        stages.push(Box::new(RoofEdgeStage));
    }
    stages.push(Box::new(AddressStage));

    if lod == TargetLod::Lod1 {
        stages.push(Box::new(BlockSolidStage));
    }
    if lod >= TargetLod::Lod2 {
        stages.push(Box::new(RoofSurfacesStage));
        stages.push(Box::new(WallSurfacesStage));
    }
    if lod >= TargetLod::Lod3 {
        stages.push(Box::new(OpeningsStage));
    }
    if lod >= TargetLod::Lod2 {
        stages.push(Box::new(AssembleSolidStage));
    }
    if lod >= TargetLod::Lod4 {
        stages.push(Box::new(RoomsStage));
    }

    if config.energy_ade && lod.has_solid() {
        stages.push(Box::new(EadeWeatherStage));
        stages.push(Box::new(EadeAttributesStage));
        stages.push(Box::new(EadeThermalZoneStage));
        stages.push(Box::new(EadeUsageZoneStage));
        if lod >= TargetLod::Lod2 {
            stages.push(Box::new(EadeConstructionsStage));
        }
    }
    stages
}

/// Convert one building through the stage list for its configuration.
pub fn convert_building(
    model: &BuildingModel,
    building: &Building,
    config: ConversionConfig,
    ids: GmlIdGen,
    envelope: Option<Envelope>,
) -> Result<BuildingFeature> {
    convert_building_with(model, building, config, ids, envelope, &stages_for(config))
}

/// Convert one building through an explicit stage list.
pub(crate) fn convert_building_with(
    model: &BuildingModel,
    building: &Building,
    config: ConversionConfig,
    ids: GmlIdGen,
    envelope: Option<Envelope>,
    stages: &[Box<dyn Stage>],
) -> Result<BuildingFeature> {
    let mut cx = BuildingContext::new(model, building, config, ids, envelope);
    for stage in stages {
        stage.run(&mut cx)?;
        debug!(
            building = %building.global_id,
            stage = stage.name(),
            "stage completed"
        );
    }
    Ok(cx.feature)
}
