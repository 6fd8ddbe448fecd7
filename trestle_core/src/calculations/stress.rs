//! Stresses and Safety Factors
//!
//! Bending, centroidal shear, adhesive joint shear and plate buckling
//! checks for a [`BeamModel`] that owns a cross-section. Every check reads
//! the governing forces, so it uses the envelope after a sweep and the
//! current-position diagram before one.

use serde::{Deserialize, Serialize};

use crate::equations::beam::{bending_stress, factor_of_safety, shear_flow_stress};
use crate::equations::section::first_moment;
use crate::errors::{CalcError, CalcResult};
use crate::section::{AdhesiveJoint, BucklingCheck, JointOrientation, RectangularElement};

use super::beam_model::BeamModel;

/// Tolerance for deciding that two rectangle edges coincide (mm).
const EDGE_TOLERANCE_MM: f64 = 1e-6;

/// Flexural stresses under the governing sagging and hogging moments (MPa).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BendingStress {
    /// Sagging moment, compression at the top fibre
    pub top_compression_mpa: f64,
    /// Sagging moment, tension at the bottom fibre
    pub bottom_tension_mpa: f64,
    /// Hogging moment, tension at the top fibre
    pub top_tension_mpa: f64,
    /// Hogging moment, compression at the bottom fibre
    pub bottom_compression_mpa: f64,
    pub max_tension_mpa: f64,
    pub max_compression_mpa: f64,
    pub tension_safety_factor: f64,
    pub compression_safety_factor: f64,
}

/// Shear stress on the horizontal plane through the neutral axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentroidalShear {
    pub shear_n: f64,
    /// First moment of the area below the neutral axis (mm³)
    pub first_moment_mm3: f64,
    /// Material width cut by the neutral axis (mm)
    pub width_mm: f64,
    pub stress_mpa: f64,
    pub safety_factor: f64,
}

/// Shear stress in one adhesive joint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlueStress {
    pub joint: AdhesiveJoint,
    /// Reporting name, e.g. `glue_1_0_horizontal`
    pub key: String,
    /// Height of the shared edge above the datum (mm)
    pub edge_mm: f64,
    /// First moment of the area beyond the joint (mm³)
    pub first_moment_mm3: f64,
    pub stress_mpa: f64,
    pub safety_factor: f64,
}

/// Q and cut width at the neutral axis.
///
/// Rectangles wholly below the axis contribute `A·|ȳ − c|`. A rectangle the
/// axis passes through (bottom at or below it, top above it) contributes the
/// part below the axis and its full width to `b`.
///
/// A rectangle whose top lies exactly on the axis counts as wholly below and
/// adds nothing to `b`. The straddling part's lever arm is `h_below / 2`,
/// measured from the axis, not `|h_below / 2 − ȳ|`.
pub fn centroidal_first_moment<'a, I>(elements: I, centroid_y: f64) -> (f64, f64)
where
    I: IntoIterator<Item = &'a RectangularElement>,
{
    elements.into_iter().fold((0.0, 0.0), |(q, b), rect| {
        if rect.top() <= centroid_y {
            (q + first_moment(rect.area(), rect.centroid_y(), centroid_y), b)
        } else if rect.position_mm <= centroid_y {
            let below = centroid_y - rect.position_mm;
            let area_below = rect.width_mm * below;
            (q + area_below * below / 2.0, b + rect.width_mm)
        } else {
            (q, b)
        }
    })
}

/// Q of the material beyond a horizontal cut at `edge_y`, on the side away
/// from the neutral axis.
pub fn first_moment_beyond<'a, I>(elements: I, edge_y: f64, centroid_y: f64) -> f64
where
    I: IntoIterator<Item = &'a RectangularElement>,
{
    let beyond = |rect: &RectangularElement| {
        if edge_y > centroid_y {
            rect.position_mm >= edge_y - EDGE_TOLERANCE_MM
        } else {
            rect.top() <= edge_y + EDGE_TOLERANCE_MM
        }
    };
    elements
        .into_iter()
        .filter(|rect| beyond(rect))
        .map(|rect| first_moment(rect.area(), rect.centroid_y(), centroid_y))
        .sum()
}

/// Height of the edge where one rectangle sits on the other, if any.
fn shared_horizontal_edge(a: &RectangularElement, b: &RectangularElement) -> Option<f64> {
    if (a.position_mm - b.top()).abs() <= EDGE_TOLERANCE_MM {
        Some(a.position_mm)
    } else if (b.position_mm - a.top()).abs() <= EDGE_TOLERANCE_MM {
        Some(b.position_mm)
    } else {
        None
    }
}

impl BeamModel {
    /// Bending stresses at the extreme fibres and the tension/compression
    /// safety factors.
    pub fn max_stress(&self) -> CalcResult<BendingStress> {
        let props = self.require_section()?.properties()?;
        let forces = self.governing_forces();
        let material = &self.settings().material;
        let i = props.moment_of_inertia_mm4;

        let sagging = forces.positive_moment_nmm;
        let hogging = forces.negative_moment_nmm.abs();

        let top_compression_mpa = bending_stress(sagging, props.y_top_mm, i);
        let bottom_tension_mpa = bending_stress(sagging, props.y_bottom_mm, i);
        let top_tension_mpa = bending_stress(hogging, props.y_top_mm, i);
        let bottom_compression_mpa = bending_stress(hogging, props.y_bottom_mm, i);

        let max_tension_mpa = bottom_tension_mpa.max(top_tension_mpa);
        let max_compression_mpa = top_compression_mpa.max(bottom_compression_mpa);

        Ok(BendingStress {
            top_compression_mpa,
            bottom_tension_mpa,
            top_tension_mpa,
            bottom_compression_mpa,
            max_tension_mpa,
            max_compression_mpa,
            tension_safety_factor: factor_of_safety(material.tensile_strength_mpa, max_tension_mpa),
            compression_safety_factor: factor_of_safety(
                material.compressive_strength_mpa,
                max_compression_mpa,
            ),
        })
    }

    /// Shear stress at the neutral axis: τ = V·Q / (I·b).
    ///
    /// Fails with a degenerate-section error when no material crosses the
    /// neutral axis.
    pub fn shear_stress_at_centroid(&self) -> CalcResult<CentroidalShear> {
        let section = self.require_section()?;
        let props = section.properties()?;
        let (q, b) = centroidal_first_moment(section.elements().map(|(_, r)| r), props.centroid_y_mm);
        if b <= 0.0 {
            return Err(CalcError::degenerate_section(format!(
                "no material crosses the neutral axis at y = {:.3} mm",
                props.centroid_y_mm
            )));
        }

        let shear_n = self.governing_forces().design_shear_n;
        let stress_mpa = shear_flow_stress(shear_n, q, props.moment_of_inertia_mm4, b);
        Ok(CentroidalShear {
            shear_n,
            first_moment_mm3: q,
            width_mm: b,
            stress_mpa,
            safety_factor: factor_of_safety(self.settings().material.shear_strength_mpa, stress_mpa),
        })
    }

    /// Shear stress in the joint at `index` in the section's joint list.
    pub fn adhesive_joint_shear(&self, index: usize) -> CalcResult<GlueStress> {
        let section = self.require_section()?;
        let joint = section.joints().get(index).copied().ok_or_else(|| {
            CalcError::invalid_geometry(format!(
                "adhesive joint {} does not exist ({} declared)",
                index,
                section.joints().len()
            ))
        })?;

        let a = section.element(joint.rect_a)?;
        let b = section.element(joint.rect_b)?;
        if joint.orientation == JointOrientation::Vertical {
            return Err(CalcError::unsupported("vertical adhesive joints"));
        }
        if joint.thickness_mm <= 0.0 {
            return Err(CalcError::invalid_input(
                "thickness_mm",
                joint.thickness_mm.to_string(),
                "Glue thickness must be positive",
            ));
        }

        let edge_mm = shared_horizontal_edge(a, b).ok_or_else(|| {
            CalcError::invalid_geometry(format!(
                "rectangles {} and {} do not share a horizontal edge",
                joint.rect_a, joint.rect_b
            ))
        })?;

        let props = section.properties()?;
        let q = first_moment_beyond(section.elements().map(|(_, r)| r), edge_mm, props.centroid_y_mm);
        let shear_n = self.governing_forces().design_shear_n;
        let stress_mpa = shear_flow_stress(shear_n, q, props.moment_of_inertia_mm4, joint.thickness_mm);

        log::debug!(
            "{}: edge at {:.3} mm, Q = {:.1} mm³, τ = {:.4} MPa",
            joint.key(),
            edge_mm,
            q,
            stress_mpa
        );

        Ok(GlueStress {
            key: joint.key(),
            joint,
            edge_mm,
            first_moment_mm3: q,
            stress_mpa,
            safety_factor: factor_of_safety(self.settings().material.glue_shear_strength_mpa, stress_mpa),
        })
    }

    /// Stresses in every declared joint, in declaration order.
    pub fn adhesive_joint_stresses(&self) -> CalcResult<Vec<GlueStress>> {
        let count = self.require_section()?.joints().len();
        (0..count).map(|i| self.adhesive_joint_shear(i)).collect()
    }

    /// Smallest glue safety factor over all joints; `None` without joints.
    pub fn glue_safety_factor(&self) -> CalcResult<Option<f64>> {
        Ok(self
            .adhesive_joint_stresses()?
            .iter()
            .map(|g| g.safety_factor)
            .reduce(f64::min))
    }

    /// Plate buckling checks for cases 1-4 against the governing
    /// compressive and centroidal shear stresses.
    pub fn buckling_checks(&self) -> CalcResult<Vec<BucklingCheck>> {
        let section = self.require_section()?;
        let bending = self.max_stress()?;
        let shear = self.shear_stress_at_centroid()?;
        let settings = self.settings();
        Ok(section.buckling_capacity(
            &settings.material,
            settings.diaphragm_spacing_mm,
            bending.max_compression_mpa,
            shear.stress_mpa,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::{MovingLoad, SweepDirection};
    use crate::section::{CompositeCrossSection, ElementId};
    use approx::assert_relative_eq;

    /// 100 x 10 flange with a 10 x 100 web on top.
    fn t_section() -> CompositeCrossSection {
        let mut section = CompositeCrossSection::new();
        let flange = section.add_element(RectangularElement::new(100.0, 10.0, 0.0));
        let web = section.add_element(RectangularElement::new(10.0, 100.0, 10.0).at_x(45.0));
        section.add_adhesive_joint(web, flange, JointOrientation::Horizontal, 10.0);
        section
    }

    fn midspan_beam(section: CompositeCrossSection) -> BeamModel {
        let load = MovingLoad::new(400.0, vec![600.0], 0.0).unwrap();
        BeamModel::new(1200.0, vec!["A".into(), "B".into()], load, Some(section)).unwrap()
    }

    #[test]
    fn test_bending_stress_sagging_only() {
        let beam = midspan_beam(t_section());
        let props = beam.section().unwrap().properties().unwrap();
        let s = beam.max_stress().unwrap();

        let i = props.moment_of_inertia_mm4;
        assert_relative_eq!(s.top_compression_mpa, 120_000.0 * props.y_top_mm / i);
        assert_relative_eq!(s.bottom_tension_mpa, 120_000.0 * props.y_bottom_mm / i);
        assert_eq!(s.top_tension_mpa, 0.0);
        assert_eq!(s.bottom_compression_mpa, 0.0);
        assert_relative_eq!(s.compression_safety_factor, 6.0 / s.top_compression_mpa);
        assert_relative_eq!(s.tension_safety_factor, 30.0 / s.bottom_tension_mpa);
    }

    #[test]
    fn test_stress_needs_section() {
        let load = MovingLoad::new(400.0, vec![600.0], 0.0).unwrap();
        let beam = BeamModel::new(1200.0, vec!["A".into(), "B".into()], load, None).unwrap();
        assert_eq!(beam.max_stress().unwrap_err().error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_centroidal_first_moment_of_rectangle() {
        // Single 20 x 60 rectangle: Q = b·(h/2)²/2, cut width = b
        let rect = RectangularElement::new(20.0, 60.0, 0.0);
        let (q, b) = centroidal_first_moment([&rect], 30.0);
        assert_relative_eq!(q, 20.0 * 30.0 * 15.0);
        assert_relative_eq!(b, 20.0);
    }

    #[test]
    fn test_rectangle_topped_at_axis_counts_below() {
        // Two stacked 10 x 10 squares; the axis is on their shared edge
        let lower = RectangularElement::new(10.0, 10.0, 0.0);
        let upper = RectangularElement::new(10.0, 10.0, 10.0);
        let (q, b) = centroidal_first_moment([&lower, &upper], 10.0);
        assert_relative_eq!(q, 100.0 * 5.0);
        assert_relative_eq!(b, 10.0);
    }

    #[test]
    fn test_straddling_lever_arm_measured_from_axis() {
        // Lifting the rectangle off the datum leaves Q unchanged
        let rect = RectangularElement::new(20.0, 60.0, 500.0);
        let (q, _) = centroidal_first_moment([&rect], 530.0);
        assert_relative_eq!(q, 20.0 * 30.0 * 15.0);
    }

    #[test]
    fn test_centroidal_shear_of_rectangle_matches_closed_form() {
        let mut section = CompositeCrossSection::new();
        section.add_element(RectangularElement::new(20.0, 60.0, 0.0));
        let beam = midspan_beam(section);
        let shear = beam.shear_stress_at_centroid().unwrap();
        // τ = 1.5·V/A
        assert_relative_eq!(shear.stress_mpa, 1.5 * 200.0 / 1200.0, epsilon = 1e-12);
        assert_relative_eq!(shear.safety_factor, 4.0 / shear.stress_mpa);
    }

    #[test]
    fn test_stacked_rectangles_cut_at_interface() {
        let mut section = CompositeCrossSection::new();
        section.add_element(RectangularElement::new(20.0, 30.0, 0.0));
        section.add_element(RectangularElement::new(20.0, 30.0, 30.0));
        let beam = midspan_beam(section);
        let shear = beam.shear_stress_at_centroid().unwrap();
        assert_relative_eq!(shear.width_mm, 20.0);
        assert_relative_eq!(shear.first_moment_mm3, 20.0 * 30.0 * 15.0);
    }

    #[test]
    fn test_zero_width_at_neutral_axis_is_degenerate() {
        // Two flanges with a gap at the neutral axis
        let mut section = CompositeCrossSection::new();
        section.add_element(RectangularElement::new(50.0, 10.0, 0.0));
        section.add_element(RectangularElement::new(50.0, 10.0, 90.0));
        let beam = midspan_beam(section);
        let err = beam.shear_stress_at_centroid().unwrap_err();
        assert_eq!(err.error_code(), "DEGENERATE_SECTION");
    }

    #[test]
    fn test_glue_joint_shear() {
        let beam = midspan_beam(t_section());
        let props = beam.section().unwrap().properties().unwrap();
        let glue = beam.adhesive_joint_shear(0).unwrap();

        assert_eq!(glue.key, "glue_1_0_horizontal");
        assert_relative_eq!(glue.edge_mm, 10.0);
        // Edge lies below the neutral axis, so Q is the flange
        let q = 1000.0 * (props.centroid_y_mm - 5.0);
        assert_relative_eq!(glue.first_moment_mm3, q, epsilon = 1e-9);
        assert_relative_eq!(glue.stress_mpa, 200.0 * q / (props.moment_of_inertia_mm4 * 10.0), epsilon = 1e-12);
        assert_eq!(beam.glue_safety_factor().unwrap(), Some(glue.safety_factor));
    }

    #[test]
    fn test_glue_without_shared_edge_is_invalid() {
        let mut section = CompositeCrossSection::new();
        let low = section.add_element(RectangularElement::new(100.0, 10.0, 0.0));
        let high = section.add_element(RectangularElement::new(10.0, 100.0, 20.0));
        section.add_adhesive_joint(high, low, JointOrientation::Horizontal, 1.0);
        let beam = midspan_beam(section);
        assert_eq!(beam.adhesive_joint_shear(0).unwrap_err().error_code(), "INVALID_GEOMETRY");
    }

    #[test]
    fn test_glue_error_conditions() {
        let mut section = t_section();
        section.add_adhesive_joint(ElementId(0), ElementId(1), JointOrientation::Vertical, 1.0);
        section.add_adhesive_joint(ElementId(0), ElementId(7), JointOrientation::Horizontal, 1.0);
        section.add_adhesive_joint(ElementId(1), ElementId(0), JointOrientation::Horizontal, 0.0);
        let beam = midspan_beam(section);

        assert_eq!(beam.adhesive_joint_shear(1).unwrap_err().error_code(), "UNSUPPORTED");
        assert_eq!(beam.adhesive_joint_shear(2).unwrap_err().error_code(), "INVALID_GEOMETRY");
        assert_eq!(beam.adhesive_joint_shear(3).unwrap_err().error_code(), "INVALID_INPUT");
        assert_eq!(beam.adhesive_joint_shear(9).unwrap_err().error_code(), "INVALID_GEOMETRY");
        assert!(beam.glue_safety_factor().is_err());
    }

    #[test]
    fn test_glue_errors_check_rectangles_then_orientation() {
        let mut section = t_section();
        section.add_adhesive_joint(ElementId(0), ElementId(7), JointOrientation::Vertical, 1.0);
        section.add_adhesive_joint(ElementId(0), ElementId(1), JointOrientation::Vertical, 0.0);
        let beam = midspan_beam(section);

        assert_eq!(beam.adhesive_joint_shear(1).unwrap_err().error_code(), "INVALID_GEOMETRY");
        assert_eq!(beam.adhesive_joint_shear(2).unwrap_err().error_code(), "UNSUPPORTED");
    }

    #[test]
    fn test_no_joints_means_no_glue_factor() {
        let mut section = CompositeCrossSection::new();
        section.add_element(RectangularElement::new(20.0, 60.0, 0.0));
        let beam = midspan_beam(section);
        assert_eq!(beam.glue_safety_factor().unwrap(), None);
    }

    #[test]
    fn test_stress_uses_envelope_after_sweep() {
        let mut beam = midspan_beam(t_section());
        let before = beam.max_stress().unwrap();
        beam.sweep(SweepDirection::LeftToRight).unwrap();
        let after = beam.max_stress().unwrap();
        // A single wheel gives the same peak wherever it starts from
        assert_relative_eq!(before.top_compression_mpa, after.top_compression_mpa);
    }

    #[test]
    fn test_buckling_checks_cover_all_cases() {
        let beam = midspan_beam(t_section());
        let checks = beam.buckling_checks().unwrap();
        assert_eq!(checks.len(), 4);
        assert_eq!(checks[3].case.id(), 4);
    }
}
