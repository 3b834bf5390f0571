// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Output feature ID generation.
//!
//! A single atomic counter shared by all converter stages (and, in the
//! parallel driver, by all workers). Sequential ids keep re-runs on the
//! same input deterministic.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generator for GML object and polygon ids.
#[derive(Debug, Clone, Default)]
pub struct GmlIdGen {
    next: Arc<AtomicU64>,
}

impl GmlIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next feature id ("GML_7").
    pub fn next_gml(&self) -> String {
        format!("GML_{}", self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Next polygon id ("Poly_8").
    pub fn next_poly(&self) -> String {
        format!("Poly_{}", self.next.fetch_add(1, Ordering::Relaxed))
    }
}
