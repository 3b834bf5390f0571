// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use citylift_model::InvalidModel;
use thiserror::Error;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that terminate a conversion run or fail a single building.
#[derive(Error, Debug)]
pub enum Error {
    /// Model-level validation failure reported before conversion starts
    #[error("model validation failed: {0}")]
    Validation(InvalidModel),

    /// Non-metric units or missing topology; fails one building, not the run
    #[error("units or topology prevent footprint derivation: {0}")]
    UnitsOrTopology(String),

    /// Unexpected failure outside the defined geometry-absence conditions;
    /// fatal to the whole run
    #[error("conversion crashed: {0}")]
    Crashed(#[from] citylift_geometry::Error),
}
