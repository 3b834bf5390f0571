// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Code-list mappings: free-text and predefined types onto the CityGML 2.0
//! building code lists and the EnergyADE enumerations.

/// Roof type code (_AbstractBuilding_roofType) from the predefined roof type.
pub fn roof_type_code(predefined: &str) -> Option<u16> {
    let code = match predefined {
        "FLAT_ROOF" => 1000,
        "SHED_ROOF" | "BUTTERFLY_ROOF" => 1010,
        "GABLE_ROOF" | "GAMBREL_ROOF" => 1030,
        "HIP_ROOF" => 1040,
        "HIPPED_GABLE_ROOF" => 1050,
        "MANSARD_ROOF" => 1060,
        "PAVILION_ROOF" => 1070,
        "DOME_ROOF" => 1090,
        "BARREL_ROOF" | "RAINBOW_ROOF" => 1100,
        "FREEFORM" | "USERDEFINED" => 1130,
        _ => return None,
    };
    Some(code)
}

/// Function code (_AbstractBuilding_function) for one lower-cased keyword.
pub fn function_usage_keyword(word: &str) -> Option<u16> {
    let code = match word {
        "res" | "family" | "townhome" | "residential" => 1000,
        "tenement" => 1010,
        "hostel" => 1020,
        "office" => 1120,
        "bank" | "credit institution" => 1130,
        "insurance" => 1140,
        "business" => 1150,
        "store" => 1160,
        "retail" | "shopping" => 1170,
        "kiosk" => 1180,
        "pharmacy" => 1190,
        "pavilion" => 1200,
        "hotel" => 1210,
        "restaurant" => 1240,
        "cantine" => 1250,
        "recreation" | "recreational" => 1260,
        "cinema" => 1280,
        "casino" => 1300,
        "industrial" => 1310,
        "factory" => 1320,
        "workshop" => 1330,
        "petrol" | "gas station" => 1340,
        "depot" => 1370,
        "research" => 1380,
        "parking" | "parking level" => 1620,
        "garage" => 1630,
        "supply" => 1660,
        "waterworks" => 1670,
        "power" => 1700,
        "transformer" => 1710,
        "telecommunication" => 1760,
        "gas" => 1770,
        "heat" => 1780,
        "disposal" => 1800,
        "barn" => 1880,
        "administration" => 1960,
        "parliament" => 1970,
        "post" => 2000,
        "court" => 2020,
        "education" => 2070,
        "school" => 2080,
        "college" | "university" => 2100,
        "culture" | "cultural" => 2120,
        "castle" => 2130,
        "theatre" | "opera" => 2140,
        "concert" => 2150,
        "museum" => 2160,
        "library" => 2190,
        "religious" => 2210,
        "church" => 2220,
        "synagogue" => 2230,
        "chapel" => 2240,
        "mosque" => 2270,
        "temple" => 2280,
        "hospital" => 2310,
        "health" | "clinic" | "medical" => 2330,
        "kindergarten" | "nursery" => 2380,
        "police" => 2400,
        "fire" => 2410,
        "barracks" => 2420,
        "prison" | "penitentiary" => 2440,
        "cemetery" => 2450,
        "train station" => 2480,
        "airport" => 2490,
        "sports" => 2550,
        "sports hall" => 2560,
        "swimming" => 2580,
        "swimming pool" => 2590,
        "zoo" => 2610,
        "botanical" => 2630,
        _ => return None,
    };
    Some(code)
}

/// Class code (_AbstractBuilding_class) from the function code.
pub fn class_of_function(function: u16) -> Option<u16> {
    let class = match function {
        1000..=1110 => 1000, // habitation
        1120..=1300 => 1030, // business and trade
        1310..=1460 => 1160, // industry
        1470..=1650 => 1170, // traffic
        1660..=1850 => 1110, // supply and disposal
        1860..=1950 => 1090, // agriculture and forestry
        1960..=2060 => 1020, // administration
        2070..=2110 => 1100, // education and research
        2120..=2210 => 1070, // culture
        2220..=2290 => 1080, // church
        2300..=2390 => 1120, // healthcare
        2400..=2440 => 1140, // security
        2450..=2470 => 1180, // general function
        2480..=2540 => 1170, // traffic
        2550..=2650 => 1060, // sport
        _ => return None,
    };
    Some(class)
}

/// EnergyADE usage-zone type from the building class code.
pub fn usage_zone_type(class: u16) -> &'static str {
    match class {
        1000 => "residential",
        1010 | 1170 | 1180 => "ancillary",
        1090 => "agriculture",
        1160 => "industry",
        _ => "commerceAndServices",
    }
}

/// EnergyADE construction-weight class from the total layer thickness in
/// meters.
pub fn construction_weight(total_thickness: f64) -> &'static str {
    if total_thickness >= 0.4 {
        "heavy"
    } else if total_thickness >= 0.25 {
        "medium"
    } else if total_thickness >= 0.1 {
        "light"
    } else {
        "veryLight"
    }
}

/// Resolve a free-text occupancy/type hint to a function code.
///
/// First looks for an embedded four-digit code (1000–2700, full decades),
/// then for a known keyword, then for known keywords among the separated
/// words of the hint.
pub fn convert_function_usage(hint: &str) -> Option<u16> {
    let lower = hint.to_lowercase();

    // An embedded code wins
    let mut digits = String::new();
    for ch in lower.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else if digits.len() == 4 {
            break;
        } else {
            digits.clear();
        }
    }
    if digits.len() >= 4 {
        if let Ok(code) = digits[..4].parse::<u16>() {
            if (1000..=2700).contains(&code) && code % 10 == 0 {
                return Some(code);
            }
        }
    }

    if let Some(code) = function_usage_keyword(lower.trim()) {
        return Some(code);
    }

    let separated = lower
        .replace(['_', '-', ',', ';'], " ");
    separated
        .split_whitespace()
        .find_map(function_usage_keyword)
}
