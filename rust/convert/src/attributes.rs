// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building attribute and address extraction.
//!
//! Pure mapping from the validated building graph onto CityGML semantic
//! attributes; independent of any geometry and never blocking.

use crate::feature::{Address, BuildingAttributes, RelativeToTerrain};
use crate::mapper;
use citylift_model::{AddressSource, Building};
use rustc_hash::FxHashMap;

/// Extract the CityGML building attributes.
///
/// `measured_height` is filled by the caller from the height derivation so
/// the attribute reflects the same value the geometry uses.
pub fn extract_attributes(building: &Building) -> BuildingAttributes {
    let mut attrs = BuildingAttributes {
        name: building.name.clone(),
        description: building.description.clone(),
        year_of_construction: building.year_of_construction.clone(),
        ..Default::default()
    };

    // Function code from the first resolvable occupancy hint
    let hints = [
        building.occupancy_type.as_deref(),
        building.object_type.as_deref(),
        building.description.as_deref(),
        building.long_name.as_deref(),
        building.name.as_deref(),
    ];
    if let Some(function) = hints
        .into_iter()
        .flatten()
        .find_map(mapper::convert_function_usage)
    {
        attrs.function_code = Some(function);
        attrs.usage_code = Some(function);
        attrs.class_code = mapper::class_of_function(function);
    }

    // Roof type: the most common defined predefined type wins
    let mut type_counts: FxHashMap<&str, usize> = FxHashMap::default();
    for roof_type in &building.roof_types {
        if roof_type != "NOTDEFINED" {
            *type_counts.entry(roof_type.as_str()).or_insert(0) += 1;
        }
    }
    attrs.roof_type_code = type_counts
        .into_iter()
        .max_by_key(|&(_, count)| count)
        .and_then(|(name, _)| mapper::roof_type_code(name));

    extract_storeys(building, &mut attrs);
    attrs
}

fn extract_storeys(building: &Building, attrs: &mut BuildingAttributes) {
    let mut above = 0u32;
    let mut below = 0u32;
    let mut sum_above = 0.0;
    let mut sum_below = 0.0;
    let mut known_above = 0u32;
    let mut known_below = 0u32;

    for storey in &building.storeys {
        let is_above = storey.is_above_ground();
        if is_above {
            above += 1;
        } else {
            below += 1;
        }
        if let Some(h) = storey.gross_height {
            if h > 0.0 {
                if is_above {
                    sum_above += h;
                    known_above += 1;
                } else {
                    sum_below += h;
                    known_below += 1;
                }
            }
        }
    }

    attrs.storeys_above_ground = above;
    attrs.storeys_below_ground = below;
    if known_above > 0 {
        attrs.storey_height_above_ground = Some(sum_above / known_above as f64);
    }
    if known_below > 0 {
        attrs.storey_height_below_ground = Some(sum_below / known_below as f64);
    }

    attrs.relative_to_terrain = if building.storeys.is_empty() {
        None
    } else if below == 0 {
        Some(RelativeToTerrain::EntirelyAboveTerrain)
    } else if above == 0 {
        Some(RelativeToTerrain::EntirelyBelowTerrain)
    } else if above == below {
        Some(RelativeToTerrain::SubstantiallyAboveAndBelowTerrain)
    } else if above > below {
        Some(RelativeToTerrain::SubstantiallyAboveTerrain)
    } else {
        Some(RelativeToTerrain::SubstantiallyBelowTerrain)
    };
}

/// Extract the address, falling back from the building to the site.
pub fn extract_address(
    building: &Building,
    site_fallback: Option<&AddressSource>,
) -> Option<Address> {
    let source = building.address.as_ref().or(site_fallback)?;

    let mut address = Address {
        town: source.town.clone(),
        postal_code: source.postal_code.clone(),
        ..Default::default()
    };

    if let Some(line) = source.address_lines.first() {
        let (street, number) = split_address_line(line);
        address.street = Some(street);
        if !number.is_empty() {
            address.number = Some(number);
        }
    }

    if address.street.is_none() && address.town.is_none() && address.postal_code.is_none() {
        return None;
    }
    Some(address)
}

/// Split one address line into street and house number.
///
/// A leading digit means "number street" order, a trailing digit means
/// "street number"; otherwise the whole line is the street.
fn split_address_line(line: &str) -> (String, String) {
    let trimmed = line.trim();
    let mut chars = trimmed.chars();
    let first_is_digit = chars.next().is_some_and(|c| c.is_ascii_digit());
    let last_is_digit = trimmed.chars().last().is_some_and(|c| c.is_ascii_digit());

    if first_is_digit {
        match trimmed.find(' ') {
            Some(sep) => (
                trimmed[sep + 1..].to_string(),
                trimmed[..sep].to_string(),
            ),
            None => (trimmed.to_string(), String::new()),
        }
    } else if last_is_digit {
        match trimmed.rfind(' ') {
            Some(sep) => (
                trimmed[..sep].to_string(),
                trimmed[sep + 1..].to_string(),
            ),
            None => (trimmed.to_string(), String::new()),
        }
    } else {
        (trimmed.to_string(), String::new())
    }
}
