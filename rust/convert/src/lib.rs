// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CityLift Convert
//!
//! The conversion layer: a single LoD-driven stage pipeline over the
//! geometry kernel, the optional EnergyADE enricher, and the conversion
//! driver that walks the validated building graph and produces the
//! in-memory CityGML feature model handed to the external serializer.
//!
//! Degrade, never crash: per-building geometry absences are recovered
//! locally and recorded as structured [`Warning`]s on the building feature;
//! only analyzer-reported model-level validation failures and genuinely
//! unexpected errors terminate a run.

pub mod attributes;
pub mod driver;
pub mod eade;
pub mod error;
pub mod feature;
pub mod mapper;
pub mod pipeline;
pub mod warnings;

pub use driver::{
    CancelToken, ConversionDriver, NullObserver, Progress, ProgressObserver, RunState,
};
pub use error::{Error, Result};
pub use feature::{
    Address, BuildingAttributes, BuildingFeature, BuildingOutcome, CityModel, Envelope,
    RelativeToTerrain,
};
pub use warnings::Warning;
