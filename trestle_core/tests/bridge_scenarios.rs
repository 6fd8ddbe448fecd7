//! End-to-end checks of the analysis engine through its public API.

use approx::assert_relative_eq;

use trestle_core::calculations::{BeamModel, BeamState};
use trestle_core::file_io::{load_project, save_project};
use trestle_core::loads::{MovingLoad, SweepDirection};
use trestle_core::project::Project;
use trestle_core::section::{CompositeCrossSection, GeometryRecord, JointOrientation, RectangularElement};

fn supports() -> Vec<String> {
    vec!["A".to_string(), "B".to_string()]
}

fn t_section() -> CompositeCrossSection {
    let mut section = CompositeCrossSection::new();
    section.add_element(RectangularElement::new(100.0, 10.0, 0.0));
    section.add_element(RectangularElement::new(10.0, 100.0, 10.0).at_x(45.0));
    section
}

#[test]
fn loads_on_both_supports() {
    let load = MovingLoad::new(800.0, vec![0.0, 1200.0], 0.0).unwrap();
    let beam = BeamModel::new(1200.0, supports(), load, None).unwrap();

    let r = beam.reactions();
    assert_relative_eq!(r.left_n, 400.0);
    assert_relative_eq!(r.right_n, 400.0);

    let shear = &beam.diagrams().shear_n;
    assert!(shear[..1200].iter().all(|v| *v == 0.0));
}

#[test]
fn single_load_at_midspan() {
    let load = MovingLoad::new(400.0, vec![600.0], 0.0).unwrap();
    let beam = BeamModel::new(1200.0, supports(), load, None).unwrap();

    assert_relative_eq!(beam.reactions().left_n, 200.0);
    assert_relative_eq!(beam.reactions().right_n, 200.0);

    let d = beam.diagrams();
    assert_eq!(d.len(), 1201);
    assert_eq!(d.shear_n[0], 200.0);
    assert_eq!(d.shear_n[599], 200.0);
    assert_eq!(d.shear_n[600], -200.0);
    assert_eq!(d.moment_nmm[600], 120_000.0);
    assert_eq!(d.moment_nmm[0], 0.0);
    assert_eq!(d.moment_nmm[1200], 0.0);
}

#[test]
fn flange_and_web_centroid_leans_to_flange() {
    let mut section = CompositeCrossSection::new();
    section.add_element(RectangularElement::new(100.0, 10.0, 0.0));
    section.add_element(RectangularElement::new(10.0, 100.0, 10.0));

    // Equal areas here, so the split is even; widen the flange to check the lean
    assert_relative_eq!(section.centroid_y(), 32.5);

    let mut section = CompositeCrossSection::new();
    section.add_element(RectangularElement::new(200.0, 10.0, 0.0));
    section.add_element(RectangularElement::new(10.0, 100.0, 10.0));
    let c = section.centroid_y();
    assert!(c > 5.0 && c < 60.0);
    assert!(c - 5.0 < 60.0 - c);
}

#[test]
fn joint_without_shared_edge_is_rejected() {
    let mut section = CompositeCrossSection::new();
    let a = section.add_element(RectangularElement::new(100.0, 10.0, 0.0));
    let b = section.add_element(RectangularElement::new(10.0, 100.0, 50.0));
    section.add_adhesive_joint(a, b, JointOrientation::Horizontal, 1.0);

    let load = MovingLoad::new(400.0, vec![600.0], 0.0).unwrap();
    let beam = BeamModel::new(1200.0, supports(), load, Some(section)).unwrap();
    let err = beam.adhesive_joint_shear(0).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_GEOMETRY");
    assert!(beam.analyze().is_err());
}

#[test]
fn geometry_record_round_trip() {
    let mut section = t_section();
    section.add_adhesive_joint(
        trestle_core::section::ElementId(1),
        trestle_core::section::ElementId(0),
        JointOrientation::Horizontal,
        10.0,
    );

    let json = section.to_record().unwrap().to_json().unwrap();
    let rebuilt = CompositeCrossSection::from_record(&GeometryRecord::from_json(&json).unwrap());

    assert_eq!(rebuilt.total_area().to_bits(), section.total_area().to_bits());
    assert_eq!(rebuilt.centroid_y().to_bits(), section.centroid_y().to_bits());
    assert_eq!(rebuilt.moment_of_inertia().to_bits(), section.moment_of_inertia().to_bits());
    assert_eq!(rebuilt.joints(), section.joints());
}

#[test]
fn standard_train_sweep_envelope() {
    let train = MovingLoad::standard_train(400.0, 0.0).unwrap();
    let mut beam = BeamModel::new(1200.0, supports(), train, Some(t_section())).unwrap();
    let result = beam.sweep(SweepDirection::LeftToRight).unwrap();

    assert_eq!(result.envelope.max_moment_nmm.len(), 1201);
    assert_eq!(result.characteristic.len(), 1201 + 856);

    // Every station is unloaded at the ends of the pass
    assert!(result.envelope.min_moment_nmm.iter().all(|m| *m <= 0.1));
    let peak = result.envelope.max_moment().unwrap();
    assert!(peak.value > 0.0);
    assert!(peak.index > 0 && peak.index < 1200);

    assert_eq!(beam.state(), BeamState::Swept(SweepDirection::LeftToRight));
    let report = beam.analyze().unwrap();
    assert!(report.bending.max_compression_mpa > 0.0);
    assert_eq!(report.buckling.len(), 4);
}

#[test]
fn editing_a_rectangle_updates_properties() {
    let mut section = t_section();
    let before = section.moment_of_inertia();

    let web = section.element_mut(trestle_core::section::ElementId(1)).unwrap();
    web.height_mm = 150.0;

    let after = section.properties().unwrap();
    assert!(after.moment_of_inertia_mm4 > before);
    assert_relative_eq!(after.area_mm2, 1000.0 + 1500.0);
}

#[test]
fn project_file_drives_analysis() {
    let path = std::env::temp_dir().join(format!("trestle_scenario_{}.json", std::process::id()));

    let mut project = Project::new("Engineer", "25-007", "Course");
    project.set_geometry(&t_section()).unwrap();
    save_project(&project, &path).unwrap();

    let loaded = load_project(&path).unwrap();
    let mut beam = loaded.build_model().unwrap();
    beam.sweep(SweepDirection::RightToLeft).unwrap();
    let report = beam.analyze().unwrap();

    assert_eq!(report.direction(), Some(SweepDirection::RightToLeft));
    assert!(report.safety_factors.contains_key("tension"));
    assert!(!report.safety_factors.contains_key("glue"));

    let _ = std::fs::remove_file(&path);
}
