// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Length unit handling.
//!
//! The analyzer resolves the source model's SI unit assignment; the core
//! only needs the scale to meters and whether the model is metric at all
//! (imperial sources cannot be converted without topology-aware rescaling
//! and fail the footprint stage).

/// SI prefix multipliers as defined in the IFC specification.
#[inline]
pub fn si_prefix_multiplier(prefix: &str) -> f64 {
    match prefix {
        "NANO" => 1e-9,
        "MICRO" => 1e-6,
        "MILLI" => 1e-3, // Most common: millimeters
        "CENTI" => 1e-2,
        "DECI" => 1e-1,
        "DECA" => 1e1,
        "HECTO" => 1e2,
        "KILO" => 1e3,
        _ => 1.0, // No prefix or unknown = base unit (meters)
    }
}

/// The model's length unit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LengthUnit {
    /// Multiplier to convert model coordinates to meters
    pub scale_to_meters: f64,
    /// False for non-SI sources (feet, inches)
    pub metric: bool,
}

impl Default for LengthUnit {
    fn default() -> Self {
        Self::meters()
    }
}

impl LengthUnit {
    pub fn meters() -> Self {
        Self {
            scale_to_meters: 1.0,
            metric: true,
        }
    }

    /// SI unit with the given prefix ("MILLI", "CENTI", ...).
    pub fn si(prefix: &str) -> Self {
        Self {
            scale_to_meters: si_prefix_multiplier(prefix),
            metric: true,
        }
    }

    /// Non-SI unit with a known conversion factor (0.3048 for feet).
    pub fn imperial(scale_to_meters: f64) -> Self {
        Self {
            scale_to_meters,
            metric: false,
        }
    }

    #[inline]
    pub fn is_metric(&self) -> bool {
        self.metric
    }
}
