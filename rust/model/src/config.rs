// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run configuration consumed by the conversion core.

use crate::error::{Error, Result};

/// CityGML level of detail, 0–4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetLod {
    Lod0,
    Lod1,
    Lod2,
    Lod3,
    Lod4,
}

impl TargetLod {
    pub fn from_level(level: u8) -> Result<Self> {
        match level {
            0 => Ok(TargetLod::Lod0),
            1 => Ok(TargetLod::Lod1),
            2 => Ok(TargetLod::Lod2),
            3 => Ok(TargetLod::Lod3),
            4 => Ok(TargetLod::Lod4),
            other => Err(Error::InvalidLod(other)),
        }
    }

    #[inline]
    pub fn level(&self) -> u8 {
        match self {
            TargetLod::Lod0 => 0,
            TargetLod::Lod1 => 1,
            TargetLod::Lod2 => 2,
            TargetLod::Lod3 => 3,
            TargetLod::Lod4 => 4,
        }
    }

    /// Whether solids exist at this LoD (anything above the 2D footprint tier).
    #[inline]
    pub fn has_solid(&self) -> bool {
        *self >= TargetLod::Lod1
    }
}

/// Configuration surface of one conversion run.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConversionConfig {
    pub lod: TargetLod,
    /// Attach EnergyADE thermal/energy semantics (LoD 1+)
    pub energy_ade: bool,
}

impl ConversionConfig {
    pub fn new(lod: TargetLod) -> Self {
        Self {
            lod,
            energy_ade: false,
        }
    }

    pub fn with_energy_ade(mut self, enabled: bool) -> Self {
        self.energy_ade = enabled;
        self
    }
}
