// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Analyzer validation outcome and georeferencing status.

use std::fmt;

/// Model-level conditions that block a conversion run before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvalidModel {
    /// The source contains no buildings
    NoBuildings,
    /// The site carries no georeferencing
    NoGeoreference,
    /// The model context carries no true-north alignment
    NoNorthAlignment,
}

impl fmt::Display for InvalidModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidModel::NoBuildings => write!(f, "there are no buildings in the source model"),
            InvalidModel::NoGeoreference => write!(f, "the source model is not georeferenced"),
            InvalidModel::NoNorthAlignment => {
                write!(f, "the source model has no true-north alignment")
            }
        }
    }
}

/// Outcome of the external analyzer's validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Validation {
    Valid,
    /// Schema errors were found but the model is usable
    ConditionallyValid { error_count: usize },
    Invalid(InvalidModel),
}

impl Validation {
    /// Whether conversion may start on this model.
    #[inline]
    pub fn is_convertible(&self) -> bool {
        !matches!(self, Validation::Invalid(_))
    }
}

/// Georeferencing status resolved by the analyzer.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Georeferencing {
    /// CRS name (e.g. "EPSG:32632"), when resolved
    pub crs_name: Option<String>,
    /// World origin of the model coordinates (easting, northing, height)
    pub origin: [f64; 3],
}

impl Georeferencing {
    #[inline]
    pub fn has_georef(&self) -> bool {
        self.crs_name.is_some()
            || self.origin[0] != 0.0
            || self.origin[1] != 0.0
            || self.origin[2] != 0.0
    }
}
