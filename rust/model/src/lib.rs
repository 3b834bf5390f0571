// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # CityLift Model
//!
//! Typed, validated input building graph for the CityGML derivation core.
//!
//! The external IFC analyzer parses and validates the source file and hands
//! this crate's [`BuildingModel`] to the converter. Geometry is exposed
//! strictly by [`GeometryCategory`] (base slab, roof, wall, door, window,
//! space) so the geometry kernel never sees IFC schema-version variance.
//!
//! ## Overview
//!
//! - **Building graph**: [`BuildingModel`], [`Building`], [`ElementGeometry`]
//! - **Semantic data**: storeys, quantities, address, weather and energy
//!   property sets
//! - **Run configuration**: [`TargetLod`], [`ConversionConfig`]
//! - **Validation**: analyzer outcome and georeferencing status
//! - **ID generation**: atomic [`GmlIdGen`] shared across workers
//!
//! ## Feature Flags
//!
//! - `serde`: enable serialization support for the model types

pub mod attributes;
pub mod building;
pub mod config;
pub mod error;
pub mod ids;
pub mod units;
pub mod validation;

pub use attributes::{
    AddressSource, ConstructionSet, MaterialLayer, MaterialProperties, Storey, ThermalSet,
    UsageSet, WeatherSet,
};
pub use building::{Building, BuildingModel, ElementGeometry, GeometryCategory, TriangleMesh};
pub use config::{ConversionConfig, TargetLod};
pub use error::{Error, Result};
pub use ids::GmlIdGen;
pub use units::LengthUnit;
pub use validation::{Georeferencing, InvalidModel, Validation};
