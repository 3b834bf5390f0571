// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during boundary derivation.
///
/// These are *unexpected* conditions, not geometry absences; absences are
/// `None`/empty returns handled by the conversion pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Degenerate ring: {0}")]
    DegenerateRing(String),

    #[error("Boolean operation failed: {0}")]
    BooleanFailed(String),

    #[error("Plane is vertical, no z for plan coordinates")]
    VerticalPlane,
}
