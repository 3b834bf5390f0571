// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The conversion driver.
//!
//! Walks the ordered building sequence, dispatches every building through
//! the LoD stage pipeline, aggregates per-building outcomes and reports
//! progress through an injected observer. State machine per run:
//! `NotStarted → Running → { Completed | Crashed }`. Cancellation is
//! cooperative and checked only at building boundaries, so an in-flight
//! building is always either fully produced or fully abandoned.

use crate::error::{Error, Result};
use crate::feature::{BuildingOutcome, CityModel, Envelope};
use crate::pipeline::{stages_for, BuildingContext, Stage};
use citylift_model::{
    Building, BuildingModel, ConversionConfig, GmlIdGen, InvalidModel, TargetLod,
};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Driver state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Completed,
    Crashed,
}

/// Cooperative cancellation flag, checked between buildings.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Run progress after a building completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Buildings in the input model
    pub total: usize,
    /// Buildings processed so far (converted or failed)
    pub analyzed: usize,
    /// Buildings converted successfully
    pub converted: usize,
}

/// Injected progress sink. Implementations must not block the driver;
/// reporting is fire-and-forget.
pub trait ProgressObserver: Send + Sync {
    fn on_stage_completed(&self, _building_index: usize, _stage: &'static str) {}
    fn on_building_converted(&self, _progress: Progress) {}
}

/// Default no-op observer.
pub struct NullObserver;

impl ProgressObserver for NullObserver {}

/// Converts a validated building model into a CityGML feature model.
pub struct ConversionDriver {
    config: ConversionConfig,
    state: RunState,
    observer: Arc<dyn ProgressObserver>,
    cancel: CancelToken,
    ids: GmlIdGen,
}

impl ConversionDriver {
    pub fn new(config: ConversionConfig) -> Self {
        Self {
            config,
            state: RunState::NotStarted,
            observer: Arc::new(NullObserver),
            cancel: CancelToken::default(),
            ids: GmlIdGen::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Token for cancelling this run from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Convert sequentially in source order.
    pub fn convert(&mut self, model: &BuildingModel) -> Result<CityModel> {
        let stages = stages_for(self.config);
        self.convert_with_stages(model, &stages)
    }

    pub(crate) fn convert_with_stages(
        &mut self,
        model: &BuildingModel,
        stages: &[Box<dyn Stage>],
    ) -> Result<CityModel> {
        self.preflight(model)?;
        self.state = RunState::Running;
        info!(
            buildings = model.buildings.len(),
            lod = self.config.lod.level(),
            energy_ade = self.config.energy_ade,
            "conversion started"
        );

        let envelope = model_envelope(model);
        let total = model.buildings.len();
        let mut members = Vec::with_capacity(total);
        let mut converted = 0usize;

        for (index, building) in model.buildings.iter().enumerate() {
            if self.cancel.is_cancelled() {
                info!(analyzed = index, "conversion cancelled");
                break;
            }
            match self.building_outcome(model, building, index, envelope, stages) {
                Ok(outcome) => {
                    if matches!(outcome, BuildingOutcome::Converted(_)) {
                        converted += 1;
                    }
                    members.push(outcome);
                }
                Err(err) => {
                    self.state = RunState::Crashed;
                    error!(building = %building.global_id, %err, "conversion crashed");
                    return Err(err);
                }
            }
            self.observer.on_building_converted(Progress {
                total,
                analyzed: index + 1,
                converted,
            });
        }

        self.state = RunState::Completed;
        info!(converted, total, "conversion completed");
        Ok(CityModel {
            name: model.name.clone(),
            envelope,
            members,
        })
    }

    /// Convert with one rayon task per building. Buildings are independent;
    /// the shared ID counter is atomic, so features keep unique ids while
    /// the member order stays the source order.
    pub fn convert_parallel(&mut self, model: &BuildingModel) -> Result<CityModel> {
        self.preflight(model)?;
        self.state = RunState::Running;

        let stages = stages_for(self.config);
        let envelope = model_envelope(model);
        let total = model.buildings.len();
        let analyzed = AtomicUsize::new(0);
        let converted = AtomicUsize::new(0);

        let results: Vec<Result<Option<BuildingOutcome>>> = model
            .buildings
            .par_iter()
            .enumerate()
            .map(|(index, building)| {
                if self.cancel.is_cancelled() {
                    return Ok(None);
                }
                let outcome =
                    self.building_outcome(model, building, index, envelope, &stages)?;
                let converted_now = match &outcome {
                    BuildingOutcome::Converted(_) => {
                        converted.fetch_add(1, Ordering::Relaxed) + 1
                    }
                    BuildingOutcome::Failed { .. } => converted.load(Ordering::Relaxed),
                };
                self.observer.on_building_converted(Progress {
                    total,
                    analyzed: analyzed.fetch_add(1, Ordering::Relaxed) + 1,
                    converted: converted_now,
                });
                Ok(Some(outcome))
            })
            .collect();

        let mut members = Vec::with_capacity(total);
        for result in results {
            match result {
                Ok(Some(outcome)) => members.push(outcome),
                Ok(None) => {}
                Err(err) => {
                    self.state = RunState::Crashed;
                    error!(%err, "conversion crashed");
                    return Err(err);
                }
            }
        }

        self.state = RunState::Completed;
        Ok(CityModel {
            name: model.name.clone(),
            envelope,
            members,
        })
    }

    fn preflight(&self, model: &BuildingModel) -> Result<()> {
        if let citylift_model::Validation::Invalid(reason) = model.validation {
            return Err(Error::Validation(reason));
        }
        if model.buildings.is_empty() {
            return Err(Error::Validation(InvalidModel::NoBuildings));
        }
        Ok(())
    }

    fn building_outcome(
        &self,
        model: &BuildingModel,
        building: &Building,
        index: usize,
        envelope: Option<Envelope>,
        stages: &[Box<dyn Stage>],
    ) -> Result<BuildingOutcome> {
        if let Some(reason) = self.units_topology_failure(model, building) {
            warn!(building = %building.global_id, %reason, "building failed");
            return Ok(BuildingOutcome::Failed {
                global_id: building.global_id.clone(),
                reason: reason.to_string(),
            });
        }

        let mut cx = BuildingContext::new(
            model,
            building,
            self.config,
            self.ids.clone(),
            envelope,
        );
        for stage in stages {
            stage.run(&mut cx)?;
            self.observer.on_stage_completed(index, stage.name());
        }
        debug!(building = %building.global_id, warnings = cx.feature.warnings.len(), "building converted");
        Ok(BuildingOutcome::Converted(Box::new(cx.feature)))
    }

    /// Non-metric units or missing topology prevent even the LoD0 footprint;
    /// other LoDs degrade through the regular warning path.
    fn units_topology_failure(&self, model: &BuildingModel, building: &Building) -> Option<Error> {
        if self.config.lod != TargetLod::Lod0 {
            return None;
        }
        let unit = building.unit_override.unwrap_or(model.length_unit);
        if !unit.is_metric() {
            return Some(Error::UnitsOrTopology(
                "non-metric length unit".to_string(),
            ));
        }
        if building.has_no_topology() {
            return Some(Error::UnitsOrTopology(
                "no topological geometry".to_string(),
            ));
        }
        None
    }
}

/// Axis-aligned bounds over all building geometry.
pub fn model_envelope(model: &BuildingModel) -> Option<Envelope> {
    let mut envelope: Option<Envelope> = None;
    for building in &model.buildings {
        for category in citylift_model::GeometryCategory::ALL {
            for element in building.geometry(category) {
                if let Some((min, max)) = element.mesh.bounds() {
                    let other = Envelope { min, max };
                    match envelope.as_mut() {
                        Some(env) => env.expand(&other),
                        None => envelope = Some(other),
                    }
                }
            }
        }
    }
    envelope
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result as ConvResult;
    use crate::pipeline::tests::fixtures;
    use crate::pipeline::{BuildingContext, Stage};
    use citylift_model::{LengthUnit, Validation};
    use std::sync::Mutex;

    fn config(lod: u8) -> ConversionConfig {
        ConversionConfig::new(TargetLod::from_level(lod).unwrap())
    }

    #[test]
    fn test_state_machine_happy_path() {
        let model = fixtures::two_building_model();
        let mut driver = ConversionDriver::new(config(1));
        assert_eq!(driver.state(), RunState::NotStarted);
        let city = driver.convert(&model).unwrap();
        assert_eq!(driver.state(), RunState::Completed);
        assert_eq!(city.members.len(), 2);
        assert!(city.envelope.is_some());
    }

    #[test]
    fn test_invalid_model_blocks_run() {
        let mut model = fixtures::two_building_model();
        model.validation = Validation::Invalid(InvalidModel::NoGeoreference);
        let mut driver = ConversionDriver::new(config(1));
        assert!(matches!(
            driver.convert(&model),
            Err(Error::Validation(InvalidModel::NoGeoreference))
        ));
        assert_eq!(driver.state(), RunState::NotStarted);
    }

    #[test]
    fn test_empty_model_blocks_run() {
        let mut model = fixtures::two_building_model();
        model.buildings.clear();
        let mut driver = ConversionDriver::new(config(0));
        assert!(matches!(
            driver.convert(&model),
            Err(Error::Validation(InvalidModel::NoBuildings))
        ));
    }

    #[test]
    fn test_units_failure_scoped_to_one_building() {
        // Scenario C: the non-metric building fails, its neighbor converts
        let mut model = fixtures::two_building_model();
        model.buildings[0].unit_override = Some(LengthUnit::imperial(0.3048));
        let mut driver = ConversionDriver::new(config(0));
        let city = driver.convert(&model).unwrap();
        assert_eq!(driver.state(), RunState::Completed);
        assert!(matches!(
            &city.members[0],
            BuildingOutcome::Failed { reason, .. } if reason.contains("non-metric")
        ));
        assert!(city.members[1].feature().is_some());
    }

    #[test]
    fn test_topology_failure_scoped_to_one_building() {
        let mut model = fixtures::two_building_model();
        model.buildings[0] = Building::new("empty");
        let mut driver = ConversionDriver::new(config(0));
        let city = driver.convert(&model).unwrap();
        assert!(matches!(
            &city.members[0],
            BuildingOutcome::Failed { reason, .. } if reason.contains("topolog")
        ));
        assert!(city.members[1].feature().is_some());
    }

    #[test]
    fn test_cancellation_at_building_boundary() {
        let model = fixtures::two_building_model();
        let mut driver = ConversionDriver::new(config(1));
        driver.cancel_token().cancel();
        let city = driver.convert(&model).unwrap();
        assert_eq!(driver.state(), RunState::Completed);
        assert!(city.members.is_empty());
    }

    struct FailingStage;

    impl Stage for FailingStage {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn run(&self, _cx: &mut BuildingContext<'_>) -> ConvResult<()> {
            Err(Error::Crashed(citylift_geometry::Error::BooleanFailed(
                "synthetic".to_string(),
            )))
        }
    }

    #[test]
    fn test_unexpected_error_crashes_run() {
        let model = fixtures::two_building_model();
        let mut driver = ConversionDriver::new(config(1));
        let stages: Vec<Box<dyn Stage>> = vec![Box::new(FailingStage)];
        assert!(matches!(
            driver.convert_with_stages(&model, &stages),
            Err(Error::Crashed(_))
        ));
        assert_eq!(driver.state(), RunState::Crashed);
    }

    #[derive(Default)]
    struct RecordingObserver {
        stages: Mutex<Vec<&'static str>>,
        progress: Mutex<Vec<Progress>>,
    }

    impl ProgressObserver for RecordingObserver {
        fn on_stage_completed(&self, _index: usize, stage: &'static str) {
            self.stages.lock().unwrap().push(stage);
        }

        fn on_building_converted(&self, progress: Progress) {
            self.progress.lock().unwrap().push(progress);
        }
    }

    #[test]
    fn test_progress_reporting() {
        let model = fixtures::two_building_model();
        let observer = Arc::new(RecordingObserver::default());
        let mut driver =
            ConversionDriver::new(config(1)).with_observer(observer.clone());
        driver.convert(&model).unwrap();

        let progress = observer.progress.lock().unwrap();
        assert_eq!(progress.len(), 2);
        assert_eq!(
            *progress.last().unwrap(),
            Progress {
                total: 2,
                analyzed: 2,
                converted: 2
            }
        );
        assert!(!observer.stages.lock().unwrap().is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let model = fixtures::two_building_model();
        let sequential = ConversionDriver::new(config(2)).convert(&model).unwrap();
        let parallel = ConversionDriver::new(config(2))
            .convert_parallel(&model)
            .unwrap();

        assert_eq!(sequential.members.len(), parallel.members.len());
        for (s, p) in sequential.members.iter().zip(&parallel.members) {
            let (s, p) = (s.feature().unwrap(), p.feature().unwrap());
            assert_eq!(s.global_id, p.global_id);
            assert_eq!(s.warnings, p.warnings);
            assert_eq!(
                s.solid.as_ref().map(|x| x.surfaces.len()),
                p.solid.as_ref().map(|x| x.surfaces.len())
            );
        }
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let model = fixtures::two_building_model();
        let first = ConversionDriver::new(config(2)).convert(&model).unwrap();
        let second = ConversionDriver::new(config(2)).convert(&model).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_model_envelope() {
        let model = fixtures::two_building_model();
        let envelope = model_envelope(&model).unwrap();
        assert!(envelope.max[0] > envelope.min[0]);
        assert!(envelope.max[2] > envelope.min[2]);
    }
}
