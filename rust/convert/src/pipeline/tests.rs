// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::convert_building;
use crate::warnings::Warning;
use citylift_geometry::{check_closed, point_in_contour, OpeningKind, SurfaceKind};
use citylift_model::{ConversionConfig, GmlIdGen, TargetLod};

pub(crate) mod fixtures {
    use citylift_model::{
        Building, BuildingModel, ConstructionSet, ElementGeometry, GeometryCategory,
        MaterialLayer, MaterialProperties, Storey, ThermalSet, TriangleMesh, UsageSet,
        WeatherSet,
    };

    /// Axis-aligned box with outward-facing triangles.
    pub fn box_mesh(origin: [f64; 3], size: [f64; 3]) -> TriangleMesh {
        let [x, y, z] = origin;
        let [w, d, h] = size;
        let verts = vec![
            [x, y, z],
            [x + w, y, z],
            [x + w, y + d, z],
            [x, y + d, z],
            [x, y, z + h],
            [x + w, y, z + h],
            [x + w, y + d, z + h],
            [x, y + d, z + h],
        ];
        let faces = vec![
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [1, 2, 6],
            [1, 6, 5],
            [2, 3, 7],
            [2, 7, 6],
            [3, 0, 4],
            [3, 4, 7],
        ];
        TriangleMesh::new(verts, faces)
    }

    /// Gable roof sheets over a 10×8 plan: eaves at z=3, ridge at z=5.
    pub fn gable_roof_mesh(dx: f64) -> TriangleMesh {
        TriangleMesh::new(
            vec![
                [dx, 0.0, 3.0],
                [dx + 5.0, 0.0, 5.0],
                [dx + 10.0, 0.0, 3.0],
                [dx, 8.0, 3.0],
                [dx + 5.0, 8.0, 5.0],
                [dx + 10.0, 8.0, 3.0],
            ],
            vec![[0, 1, 4], [0, 4, 3], [1, 2, 5], [1, 5, 4]],
        )
    }

    /// A complete building: base slab, gable roof, two windows, one door,
    /// one interior space, semantic attributes and energy property sets.
    pub fn full_building(global_id: &str, dx: f64) -> Building {
        let mut bldg = Building::new(global_id);
        bldg.name = Some("Residential house".into());
        bldg.occupancy_type = Some("residential".into());
        bldg.year_of_construction = Some("1987".into());
        bldg.roof_types = vec!["GABLE_ROOF".into()];
        bldg.storeys = vec![
            Storey {
                above_ground: Some(true),
                elevation: Some(0.0),
                gross_height: Some(2.6),
            },
            Storey {
                above_ground: Some(true),
                elevation: Some(2.6),
                gross_height: Some(2.6),
            },
        ];
        bldg.address = Some(citylift_model::AddressSource {
            address_lines: vec!["Harbour Road 3".into()],
            town: Some("Oldenburg".into()),
            postal_code: Some("26122".into()),
        });
        bldg.thermal = Some(ThermalSet {
            is_heated: true,
            is_cooled: false,
            heating_setpoint: Some(20.0),
            cooling_setpoint: None,
        });
        bldg.usage = Some(UsageSet {
            occupants: Some(4),
            occupancy_hours: Some(14.0),
        });
        bldg.constructions = vec![ConstructionSet {
            name: "Roof construction".into(),
            element_ids: vec![2],
            layers: vec![MaterialLayer {
                material: MaterialProperties {
                    name: "Brick".into(),
                    density: Some(1800.0),
                    conductivity: Some(0.8),
                    specific_heat: Some(900.0),
                },
                thickness: 0.2,
            }],
            u_value: Some(0.35),
        }];

        bldg.add_geometry(
            GeometryCategory::BaseSlab,
            ElementGeometry::new(1, box_mesh([dx, 0.0, -0.3], [10.0, 8.0, 0.3])),
        );
        bldg.add_geometry(
            GeometryCategory::Roof,
            ElementGeometry::new(2, gable_roof_mesh(dx)),
        );
        // Window panels inside the south wall (y = 0)
        bldg.add_geometry(
            GeometryCategory::Window,
            ElementGeometry::new(3, box_mesh([dx + 2.0, -0.05, 1.0], [1.2, 0.15, 1.4])),
        );
        bldg.add_geometry(
            GeometryCategory::Window,
            ElementGeometry::new(4, box_mesh([dx + 7.5, -0.05, 1.0], [1.2, 0.15, 1.4])),
        );
        bldg.add_geometry(
            GeometryCategory::Door,
            ElementGeometry::new(5, box_mesh([dx + 4.5, -0.05, -0.3], [1.0, 0.15, 2.1])),
        );
        bldg.add_geometry(
            GeometryCategory::Space,
            ElementGeometry::new(6, box_mesh([dx + 0.3, 0.3, 0.0], [9.4, 7.4, 2.6])),
        );
        bldg
    }

    /// Scenario B building: no roof geometry, explicit height instead.
    pub fn building_without_roof(global_id: &str) -> Building {
        let source = full_building(global_id, 0.0);
        let mut out = Building::new(global_id);
        out.name = source.name.clone();
        out.height_attribute = Some(6.0);
        for category in [
            GeometryCategory::BaseSlab,
            GeometryCategory::Window,
            GeometryCategory::Door,
            GeometryCategory::Space,
        ] {
            for element in source.geometry(category) {
                out.add_geometry(category, element.clone());
            }
        }
        out
    }

    pub fn model_of(buildings: Vec<Building>) -> BuildingModel {
        let mut model = BuildingModel::new("IFC4", "sample");
        model.site_weather = Some(WeatherSet {
            max_ambient_temp: 31.0,
            min_ambient_temp: -8.0,
            kelvin: false,
        });
        model.georeferencing.crs_name = Some("EPSG:32632".into());
        model.buildings = buildings;
        model
    }

    pub fn two_building_model() -> BuildingModel {
        model_of(vec![full_building("b1", 0.0), full_building("b2", 20.0)])
    }
}

fn convert_at(lod: u8, energy_ade: bool, building: &citylift_model::Building) -> crate::BuildingFeature {
    let model = fixtures::model_of(vec![building.clone()]);
    let config = ConversionConfig::new(TargetLod::from_level(lod).unwrap()).with_energy_ade(energy_ade);
    convert_building(
        &model,
        &model.buildings[0],
        config,
        GmlIdGen::new(),
        crate::driver::model_envelope(&model),
    )
    .unwrap()
}

#[test]
fn test_lod0_footprint_and_roof_edge() {
    let feature = convert_at(0, false, &fixtures::full_building("b1", 0.0));
    let footprint = feature.footprint.as_ref().unwrap();
    assert!((footprint.area() - 80.0).abs() < 1e-6);
    assert!((footprint.min_z() - -0.3).abs() < 1e-9);
    let roof_edge = feature.roof_edge.as_ref().unwrap();
    assert!((roof_edge.min_z() - 5.0).abs() < 1e-9);
    assert!(feature.solid.is_none());
    assert!(feature.warnings.is_empty());

    // Attributes and address came along
    assert_eq!(feature.attributes.function_code, Some(1000));
    assert_eq!(feature.attributes.roof_type_code, Some(1030));
    assert_eq!(feature.attributes.storeys_above_ground, 2);
    assert_eq!(feature.address.as_ref().unwrap().number.as_deref(), Some("3"));
}

#[test]
fn test_lod0_missing_baseslab_keeps_roof_edge() {
    let mut building = fixtures::full_building("b1", 0.0);
    let mut bare = citylift_model::Building::new("b1");
    for element in building.geometry(citylift_model::GeometryCategory::Roof) {
        bare.add_geometry(citylift_model::GeometryCategory::Roof, element.clone());
    }
    building = bare;

    let feature = convert_at(0, false, &building);
    assert!(feature.footprint.is_none());
    assert!(feature.roof_edge.is_some());
    assert!(feature.warnings.contains(&Warning::MissingBaseslabFootprint));
}

#[test]
fn test_lod1_block_solid_closed() {
    let feature = convert_at(1, false, &fixtures::full_building("b1", 0.0));
    let solid = feature.solid.as_ref().unwrap();
    assert!(check_closed(solid));
    assert!(!solid.is_incomplete());
    assert_eq!(solid.surfaces_of(SurfaceKind::Ground).count(), 1);
    assert_eq!(solid.surfaces_of(SurfaceKind::Roof).count(), 1);
    assert_eq!(solid.surfaces_of(SurfaceKind::Wall).count(), 4);
    // Geometry height: slab bottom -0.3 to ridge 5.0
    assert!((feature.attributes.measured_height.unwrap() - 5.3).abs() < 1e-9);
}

#[test]
fn test_lod1_no_geometry_still_emits_attributes() {
    let mut building = citylift_model::Building::new("b1");
    building.name = Some("Office block".into());
    let feature = convert_at(1, false, &building);
    assert!(feature.solid.is_none());
    assert!(feature.warnings.contains(&Warning::MissingHeight));
    assert!(feature.warnings.contains(&Warning::MissingBaseslab));
    assert_eq!(feature.attributes.function_code, Some(1120));
}

#[test]
fn test_scenario_a_lod2_differentiated_boundary() {
    let feature = convert_at(2, false, &fixtures::full_building("b1", 0.0));
    let solid = feature.solid.as_ref().unwrap();

    assert_eq!(solid.surfaces_of(SurfaceKind::Ground).count(), 1);
    assert_eq!(solid.surfaces_of(SurfaceKind::Roof).count(), 2);
    // One wall per footprint edge, none omitted
    assert_eq!(solid.surfaces_of(SurfaceKind::Wall).count(), 4);
    assert!(!feature
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::WallHeightUnknown { .. })));
    // Welded shared boundaries close the shell
    assert!(check_closed(solid));
}

#[test]
fn test_lod2_missing_roof_keeps_base() {
    let building = fixtures::building_without_roof("b1");
    let feature = convert_at(2, false, &building);
    assert!(feature.warnings.contains(&Warning::MissingRoof));
    let solid = feature.solid.as_ref().unwrap();
    assert_eq!(solid.surfaces_of(SurfaceKind::Ground).count(), 1);
    assert_eq!(solid.surfaces_of(SurfaceKind::Roof).count(), 0);
    assert!(solid.is_incomplete());
    assert!(solid.missing.contains(&SurfaceKind::Roof));
}

#[test]
fn test_lod3_openings_cut_into_walls() {
    let feature = convert_at(3, false, &fixtures::full_building("b1", 0.0));
    let solid = feature.solid.as_ref().unwrap();

    let south_wall = solid
        .surfaces
        .iter()
        .find(|s| s.kind == SurfaceKind::Wall && !s.openings.is_empty())
        .expect("south wall carries the openings");
    assert_eq!(south_wall.openings.len(), 3);
    // The two windows are interior holes; the door is a bottom notch
    assert_eq!(south_wall.holes.len(), 2);

    // Containment: every opening lies in the wall plane and inside its ring
    let plane = south_wall.ring.plane().unwrap();
    let basis = plane.basis(south_wall.ring.points()[0]);
    let outline: Vec<_> = south_wall
        .ring
        .points()
        .iter()
        .map(|p| basis.project(p))
        .collect();
    for opening in &south_wall.openings {
        for p in opening.ring.points() {
            assert!(plane.distance(p).abs() < 1e-6);
        }
        if opening.kind == OpeningKind::Window {
            let c = basis.project(&opening.ring.centroid());
            assert!(point_in_contour(&c, &outline) || south_wall.holes.iter().any(|h| {
                (h.centroid() - opening.ring.centroid()).norm() < 1e-6
            }));
        }
    }
    assert!(!feature
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::OpeningsUnassigned { .. })));
}

#[test]
fn test_scenario_b_lod3_without_roof() {
    let building = fixtures::building_without_roof("b1");
    let feature = convert_at(3, false, &building);

    assert!(feature.warnings.contains(&Warning::MissingRoof));
    let solid = feature.solid.as_ref().unwrap();
    // Ground and height-capped walls are still present
    assert_eq!(solid.surfaces_of(SurfaceKind::Ground).count(), 1);
    let walls: Vec<_> = solid.surfaces_of(SurfaceKind::Wall).collect();
    assert_eq!(walls.len(), 4);
    for wall in &walls {
        assert!((wall.ring.max_z() - 5.7).abs() < 1e-6); // -0.3 + 6.0
    }
    // Opening stages were still attempted on the capped walls
    assert!(walls.iter().any(|w| !w.openings.is_empty()));
}

#[test]
fn test_scenario_d_lod4_without_spaces() {
    let mut building = fixtures::full_building("b1", 0.0);
    let mut without_spaces = citylift_model::Building::new("b1");
    for category in [
        citylift_model::GeometryCategory::BaseSlab,
        citylift_model::GeometryCategory::Roof,
        citylift_model::GeometryCategory::Window,
        citylift_model::GeometryCategory::Door,
    ] {
        for element in building.geometry(category) {
            without_spaces.add_geometry(category, element.clone());
        }
    }
    building = without_spaces;

    let lod4 = convert_at(4, false, &building);
    let lod3 = convert_at(3, false, &building);

    assert!(lod4.rooms.is_empty());
    assert!(lod4.warnings.contains(&Warning::MissingRooms));
    // The shell equals the LoD3 result
    assert_eq!(
        lod4.solid.as_ref().unwrap().surfaces.len(),
        lod3.solid.as_ref().unwrap().surfaces.len()
    );
}

#[test]
fn test_lod4_rooms_derived() {
    let feature = convert_at(4, false, &fixtures::full_building("b1", 0.0));
    assert_eq!(feature.rooms.len(), 1);
    let room = &feature.rooms[0];
    assert!(check_closed(&room.solid));
    assert_eq!(room.solid.surfaces_of(SurfaceKind::Floor).count(), 1);
    assert_eq!(room.solid.surfaces_of(SurfaceKind::Ceiling).count(), 1);
}

#[test]
fn test_eade_lod1_zones_and_weather() {
    let feature = convert_at(1, true, &fixtures::full_building("b1", 0.0));
    let energy = feature.energy.as_ref().unwrap();

    let weather = energy.weather.as_ref().unwrap();
    assert_eq!(weather.values.len(), 12);
    assert_eq!(weather.uom, "C");

    let thermal = energy.thermal_zone.as_ref().unwrap();
    assert!(thermal.is_heated);
    assert!(!thermal.is_cooled);
    assert!(thermal.volume.unwrap() > 0.0);
    assert!(!thermal.boundaries.is_empty());

    let usage = energy.usage_zone.as_ref().unwrap();
    assert_eq!(usage.usage_type, "residential");
    assert_eq!(usage.heating_schedule.as_ref().unwrap().setpoint, 20.0);
    assert_eq!(usage.occupancy.as_ref().unwrap().occupants, 4);

    // Constructions are LoD2+ only
    assert!(energy.constructions.is_empty());
}

#[test]
fn test_eade_lod2_constructions_and_boundary_link() {
    let feature = convert_at(2, true, &fixtures::full_building("b1", 0.0));
    let energy = feature.energy.as_ref().unwrap();

    assert_eq!(energy.constructions.len(), 1);
    assert_eq!(energy.materials.len(), 1);
    assert_eq!(energy.constructions[0].u_value, Some(0.35));

    // Roof boundaries link the roof construction by index
    let thermal = energy.thermal_zone.as_ref().unwrap();
    let roof_boundary = thermal
        .boundaries
        .iter()
        .find(|b| b.kind == crate::eade::ThermalBoundaryKind::Roof)
        .unwrap();
    assert_eq!(roof_boundary.construction, Some(0));
}

#[test]
fn test_eade_missing_weather_keeps_other_stages() {
    let building = fixtures::full_building("b1", 0.0);
    let mut model = fixtures::model_of(vec![building]);
    model.site_weather = None;
    let config = ConversionConfig::new(TargetLod::Lod2).with_energy_ade(true);
    let feature = convert_building(
        &model,
        &model.buildings[0],
        config,
        GmlIdGen::new(),
        crate::driver::model_envelope(&model),
    )
    .unwrap();

    assert!(feature.warnings.contains(&Warning::MissingWeatherData));
    let energy = feature.energy.as_ref().unwrap();
    assert!(energy.weather.is_none());
    assert!(energy.thermal_zone.is_some());
    assert!(!energy.constructions.is_empty());
}

#[test]
fn test_eade_zones_need_solid() {
    // No geometry at all: thermal/usage zones are skipped with warnings,
    // weather still works
    let mut building = citylift_model::Building::new("b1");
    building.thermal = Some(citylift_model::ThermalSet::default());
    let feature = convert_at(1, true, &building);

    assert!(feature.warnings.contains(&Warning::MissingThermalData));
    assert!(feature.warnings.contains(&Warning::MissingUsageData));
    let energy = feature.energy.as_ref().unwrap();
    assert!(energy.thermal_zone.is_none());
    assert!(energy.usage_zone.is_none());
    assert!(energy.weather.is_some());
}

#[test]
fn test_converter_rerun_geometrically_identical() {
    let building = fixtures::full_building("b1", 0.0);
    let first = convert_at(2, false, &building);
    let second = convert_at(2, false, &building);

    let (a, b) = (first.solid.unwrap(), second.solid.unwrap());
    assert_eq!(a.surfaces.len(), b.surfaces.len());
    for (sa, sb) in a.surfaces.iter().zip(&b.surfaces) {
        assert_eq!(sa.kind, sb.kind);
        assert_eq!(sa.ring.points(), sb.ring.points());
    }
}
