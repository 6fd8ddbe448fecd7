//! # Local Buckling Classification
//!
//! Sorts the compression-zone plates of a built-up section into plate
//! buckling cases and evaluates a critical stress for each case.
//!
//! ```text
//!   ┌──────────────────────────────┐  ← case 2: flange tip, one edge free
//!   │    ┌──┐──────────────┌──┐    │  ← case 1: between webs, both edges held
//!        │  │              │  │       ← case 3: web above the neutral axis
//!   ─ ─ ─│─ │─ ─ ─ ─ ─ ─ ─ │─ │─ ─ ─   neutral axis
//!        │  │              │  │       ← case 4: web shear between diaphragms
//!        └──┴──────────────┴──┘
//! ```
//!
//! The classification assumes a section symmetric about its vertical
//! centroidal axis and only looks at the left half. It is order dependent:
//! the first interior flange plate found seeds the merged case-1 plate. The
//! rules are kept exactly as stated below, since changing them changes
//! results for existing designs.

use serde::{Deserialize, Serialize};

use crate::equations::factor_of_safety;
use crate::equations::plate::{
    plate_buckling_stress, shear_buckling_stress, K_BOTH_EDGES, K_ONE_EDGE, K_WEB_FLEXURE, K_WEB_SHEAR,
};
use crate::materials::MaterialProperties;

use super::cross_section::CompositeCrossSection;
use super::rectangle::RectangularElement;

/// Edge contact is decided with this tolerance (mm).
const EDGE_TOLERANCE_MM: f64 = 1e-9;

/// Plate buckling case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BucklingCase {
    /// Case 1: flange plate held along both long edges
    BoundedBothSides,
    /// Case 2: flange tip with one free edge
    BoundedOneSide,
    /// Case 3: web above the neutral axis, free towards the compression edge
    FreeEdge,
    /// Case 4: web shear buckling between diaphragms
    WebShear,
}

impl BucklingCase {
    pub const ALL: [BucklingCase; 4] = [
        BucklingCase::BoundedBothSides,
        BucklingCase::BoundedOneSide,
        BucklingCase::FreeEdge,
        BucklingCase::WebShear,
    ];

    /// Case number 1-4
    pub fn id(&self) -> u8 {
        match self {
            BucklingCase::BoundedBothSides => 1,
            BucklingCase::BoundedOneSide => 2,
            BucklingCase::FreeEdge => 3,
            BucklingCase::WebShear => 4,
        }
    }

    pub fn coefficient(&self) -> f64 {
        match self {
            BucklingCase::BoundedBothSides => K_BOTH_EDGES,
            BucklingCase::BoundedOneSide => K_ONE_EDGE,
            BucklingCase::FreeEdge => K_WEB_FLEXURE,
            BucklingCase::WebShear => K_WEB_SHEAR,
        }
    }

    /// Name used in safety-factor tables, e.g. `buckling_case_2`
    pub fn key(&self) -> String {
        format!("buckling_case_{}", self.id())
    }
}

/// A plate entering the buckling formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucklingPlate {
    /// Index of the originating rectangle in the classified snapshot
    pub source: usize,
    pub case: BucklingCase,
    /// Geometry after clipping at the neutral axis (and merging, for case 1)
    pub plate: RectangularElement,
    /// Width used as `b` for cases 1 and 2
    pub effective_width_mm: f64,
}

impl BucklingPlate {
    /// (t, b) for the plate formula
    pub fn slenderness(&self) -> (f64, f64) {
        match self.case {
            BucklingCase::FreeEdge => (self.plate.width_mm, self.plate.height_mm),
            _ => (self.plate.height_mm, self.effective_width_mm),
        }
    }
}

/// Result of [`classify_buckling_regions`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucklingRegions {
    /// One tag per input rectangle; `None` when it was discarded or fits no case
    pub tags: Vec<Option<BucklingCase>>,
    /// Plates that enter the buckling formulas
    pub plates: Vec<BucklingPlate>,
}

impl BucklingRegions {
    pub fn plates_in(&self, case: BucklingCase) -> impl Iterator<Item = &BucklingPlate> + '_ {
        self.plates.iter().filter(move |p| p.case == case)
    }
}

/// Classify compression-zone plates into buckling cases 1-3.
///
/// Works on the rectangles passed in and never touches the owning section:
///
/// 1. Rectangles whose centroid is below `centroid_y`, or whose left edge is
///    at or right of `centroid_x`, are dropped.
/// 2. A rectangle straddling the neutral axis keeps only the part above it.
/// 3. The first rectangle touching the left edge is case 2. Wider-than-tall
///    plates clear of both vertical edges are case 1 and merge into the first
///    one found (heights add). Taller-than-wide plates are case 3.
/// 4. The case-2 width excludes the case-1 width: `(w − w₁)/2`.
pub fn classify_buckling_regions(
    elements: &[RectangularElement],
    centroid_y: f64,
    centroid_x: f64,
) -> BucklingRegions {
    let mut regions = BucklingRegions {
        tags: vec![None; elements.len()],
        plates: Vec::new(),
    };
    let Some(left_edge) = elements.iter().map(|r| r.position_x_mm).reduce(f64::min) else {
        return regions;
    };
    let right_edge = elements
        .iter()
        .map(|r| r.right())
        .fold(f64::NEG_INFINITY, f64::max);

    let mut one_side: Option<(usize, RectangularElement)> = None;
    let mut both_sides: Option<(usize, RectangularElement)> = None;
    let mut free_edge: Vec<(usize, RectangularElement)> = Vec::new();

    for (index, original) in elements.iter().enumerate() {
        if original.centroid_y() < centroid_y || original.position_x_mm >= centroid_x {
            continue;
        }

        let mut plate = *original;
        if plate.position_mm < centroid_y {
            plate.height_mm -= (centroid_y - plate.position_mm).abs();
            plate.position_mm = centroid_y;
        }

        let at_left = (plate.position_x_mm - left_edge).abs() <= EDGE_TOLERANCE_MM;
        let at_right = (plate.right() - right_edge).abs() <= EDGE_TOLERANCE_MM;

        let case = if at_left {
            if one_side.is_some() {
                log::debug!("rectangle {} also touches the left edge; not classified", index);
                continue;
            }
            one_side = Some((index, plate));
            BucklingCase::BoundedOneSide
        } else if plate.width_mm > plate.height_mm && !at_right {
            match both_sides.as_mut() {
                Some((_, seed)) => seed.height_mm += plate.height_mm,
                None => both_sides = Some((index, plate)),
            }
            BucklingCase::BoundedBothSides
        } else if plate.height_mm > plate.width_mm {
            free_edge.push((index, plate));
            BucklingCase::FreeEdge
        } else {
            log::debug!("rectangle {} fits no buckling case", index);
            continue;
        };
        regions.tags[index] = Some(case);
    }

    let inner_width = both_sides.map(|(_, p)| p.width_mm);

    if let Some((source, plate)) = both_sides {
        regions.plates.push(BucklingPlate {
            source,
            case: BucklingCase::BoundedBothSides,
            plate,
            effective_width_mm: plate.width_mm,
        });
    }
    if let Some((source, plate)) = one_side {
        let effective_width_mm = match inner_width {
            Some(w) => (plate.width_mm - w) / 2.0,
            None => plate.width_mm,
        };
        regions.plates.push(BucklingPlate {
            source,
            case: BucklingCase::BoundedOneSide,
            plate,
            effective_width_mm,
        });
    }
    regions
        .plates
        .extend(free_edge.into_iter().map(|(source, plate)| BucklingPlate {
            source,
            case: BucklingCase::FreeEdge,
            plate,
            effective_width_mm: plate.width_mm,
        }));

    regions
}

/// Critical stress and safety factor for one buckling case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucklingCheck {
    pub case: BucklingCase,
    /// Critical stress (MPa); 0 when no plate qualifies for the case
    pub critical_stress_mpa: f64,
    /// Compressive stress for cases 1-3, centroidal shear stress for case 4
    pub applied_stress_mpa: f64,
    /// Critical over applied; `None` when no plate qualifies
    pub safety_factor: Option<f64>,
}

impl BucklingCheck {
    fn new(case: BucklingCase, critical_stress_mpa: f64, applied_stress_mpa: f64) -> Self {
        let safety_factor =
            (critical_stress_mpa > 0.0).then(|| factor_of_safety(critical_stress_mpa, applied_stress_mpa));
        BucklingCheck {
            case,
            critical_stress_mpa,
            applied_stress_mpa,
            safety_factor,
        }
    }
}

impl CompositeCrossSection {
    /// Classify this section's current rectangles. See [`classify_buckling_regions`].
    pub fn classify_buckling_regions(&self) -> BucklingRegions {
        classify_buckling_regions(&self.snapshot(), self.centroid_y(), self.centroid_x())
    }

    /// Critical buckling stresses for cases 1-4 and their safety factors.
    ///
    /// Cases 1-3 take the largest critical stress over the plates in the
    /// case and are compared with `compressive_stress_mpa`. Case 4 treats the
    /// tallest rectangle as the web (t = width, h = height) and is compared
    /// with `centroidal_shear_stress_mpa`.
    pub fn buckling_capacity(
        &self,
        material: &MaterialProperties,
        diaphragm_spacing_mm: f64,
        compressive_stress_mpa: f64,
        centroidal_shear_stress_mpa: f64,
    ) -> Vec<BucklingCheck> {
        let regions = self.classify_buckling_regions();
        let e = material.elastic_modulus_mpa;
        let nu = material.poisson_ratio;

        let mut checks: Vec<BucklingCheck> = [
            BucklingCase::BoundedBothSides,
            BucklingCase::BoundedOneSide,
            BucklingCase::FreeEdge,
        ]
        .into_iter()
        .map(|case| {
            let critical = regions
                .plates_in(case)
                .filter_map(|plate| {
                    let (t, b) = plate.slenderness();
                    if b <= 0.0 {
                        log::warn!(
                            "buckling case {}: rectangle {} has non-positive loaded width {:.3} mm, skipped",
                            case.id(),
                            plate.source,
                            b
                        );
                        return None;
                    }
                    Some(plate_buckling_stress(case.coefficient(), e, nu, t, b))
                })
                .fold(0.0, f64::max);
            BucklingCheck::new(case, critical, compressive_stress_mpa)
        })
        .collect();

        let shear_critical = self
            .tallest_element()
            .map(|(_, web)| shear_buckling_stress(e, nu, web.width_mm, diaphragm_spacing_mm, web.height_mm))
            .unwrap_or(0.0);
        checks.push(BucklingCheck::new(
            BucklingCase::WebShear,
            shear_critical,
            centroidal_shear_stress_mpa,
        ));

        for check in &checks {
            match check.safety_factor {
                Some(fos) => log::debug!(
                    "buckling case {}: critical {:.3} MPa, applied {:.3} MPa, FOS {:.2}",
                    check.case.id(),
                    check.critical_stress_mpa,
                    check.applied_stress_mpa,
                    fos
                ),
                None => log::debug!("buckling case {}: no plate qualifies", check.case.id()),
            }
        }
        checks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::plate::plate_stiffness;
    use approx::assert_relative_eq;

    /// Box girder: top flange, glue tabs, two webs, bottom flange.
    fn box_girder() -> CompositeCrossSection {
        let mut section = CompositeCrossSection::new();
        section.add_element(RectangularElement::new(100.0, 1.27, 75.0)); // 0 top flange
        section.add_element(RectangularElement::new(5.0, 1.27, 73.73).at_x(10.0)); // 1 left tab
        section.add_element(RectangularElement::new(5.0, 1.27, 73.73).at_x(85.0)); // 2 right tab
        section.add_element(RectangularElement::new(1.27, 73.73, 0.0).at_x(10.0)); // 3 left web
        section.add_element(RectangularElement::new(1.27, 73.73, 0.0).at_x(88.73)); // 4 right web
        section.add_element(RectangularElement::new(80.0, 6.0, 0.0).at_x(10.0)); // 5 bottom flange
        section
    }

    #[test]
    fn test_classification_tags() {
        let section = box_girder();
        let regions = section.classify_buckling_regions();
        assert_eq!(
            regions.tags,
            vec![
                Some(BucklingCase::BoundedOneSide),
                Some(BucklingCase::BoundedBothSides),
                None,
                Some(BucklingCase::FreeEdge),
                None,
                None,
            ]
        );
    }

    #[test]
    fn test_classification_does_not_touch_section() {
        let section = box_girder();
        let before = section.clone();
        let _ = section.classify_buckling_regions();
        assert_eq!(section, before);
    }

    #[test]
    fn test_web_is_clipped_at_neutral_axis() {
        let section = box_girder();
        let centroid = section.centroid_y();
        let regions = section.classify_buckling_regions();
        let web = regions.plates_in(BucklingCase::FreeEdge).next().unwrap();
        assert_relative_eq!(web.plate.position_mm, centroid);
        assert_relative_eq!(web.plate.height_mm, 73.73 - centroid, epsilon = 1e-9);
    }

    #[test]
    fn test_one_side_width_excludes_inner_plate() {
        let regions = box_girder().classify_buckling_regions();
        let tip = regions.plates_in(BucklingCase::BoundedOneSide).next().unwrap();
        assert_relative_eq!(tip.effective_width_mm, (100.0 - 5.0) / 2.0);
    }

    #[test]
    fn test_inner_plates_merge_into_first() {
        let mut section = CompositeCrossSection::new();
        section.add_element(RectangularElement::new(100.0, 2.0, 100.0)); // left edge, case 2
        section.add_element(RectangularElement::new(40.0, 2.0, 98.0).at_x(20.0));
        section.add_element(RectangularElement::new(40.0, 3.0, 95.0).at_x(20.0));
        section.add_element(RectangularElement::new(2.0, 100.0, 0.0).at_x(20.0));
        section.add_element(RectangularElement::new(2.0, 100.0, 0.0).at_x(78.0));
        section.add_element(RectangularElement::new(100.0, 2.0, -2.0)); // bottom
        let regions = section.classify_buckling_regions();
        let merged: Vec<_> = regions.plates_in(BucklingCase::BoundedBothSides).collect();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, 1);
        assert_relative_eq!(merged[0].plate.height_mm, 5.0);
        assert_relative_eq!(merged[0].plate.width_mm, 40.0);
    }

    #[test]
    fn test_one_side_width_without_inner_plate() {
        let mut section = CompositeCrossSection::new();
        section.add_element(RectangularElement::new(100.0, 2.0, 100.0));
        section.add_element(RectangularElement::new(2.0, 100.0, 0.0).at_x(49.0));
        let regions = section.classify_buckling_regions();
        let tip = regions.plates_in(BucklingCase::BoundedOneSide).next().unwrap();
        assert_relative_eq!(tip.effective_width_mm, 100.0);
    }

    #[test]
    fn test_capacity_values() {
        let section = box_girder();
        let material = MaterialProperties::default();
        let checks = section.buckling_capacity(&material, 400.0, 2.0, 0.5);
        assert_eq!(checks.len(), 4);
        let k = plate_stiffness(material.elastic_modulus_mpa, material.poisson_ratio);

        let case1 = checks[0];
        assert_eq!(case1.case, BucklingCase::BoundedBothSides);
        assert_relative_eq!(case1.critical_stress_mpa, 4.0 * k * (1.27f64 / 5.0).powi(2));
        assert_relative_eq!(case1.safety_factor.unwrap(), case1.critical_stress_mpa / 2.0);

        let case2 = checks[1];
        assert_relative_eq!(case2.critical_stress_mpa, 0.425 * k * (1.27f64 / 47.5).powi(2));

        let case3 = checks[2];
        assert_eq!(case3.case, BucklingCase::FreeEdge);
        let clipped = 73.73 - section.centroid_y();
        assert_relative_eq!(
            case3.critical_stress_mpa,
            6.0 * k * (1.27f64 / clipped).powi(2),
            max_relative = 1e-12
        );

        let case4 = checks[3];
        assert_eq!(case4.case, BucklingCase::WebShear);
        assert_relative_eq!(
            case4.critical_stress_mpa,
            5.0 * k * ((1.27f64 / 400.0).powi(2) + (1.27f64 / 73.73).powi(2))
        );
        assert_relative_eq!(case4.safety_factor.unwrap(), case4.critical_stress_mpa / 0.5);
    }

    #[test]
    fn test_free_edge_takes_stockiest_web() {
        let mut section = CompositeCrossSection::new();
        section.add_element(RectangularElement::new(100.0, 2.0, 100.0));
        section.add_element(RectangularElement::new(2.0, 100.0, 0.0).at_x(20.0));
        section.add_element(RectangularElement::new(4.0, 100.0, 0.0).at_x(30.0));
        section.add_element(RectangularElement::new(100.0, 10.0, -10.0));

        let regions = section.classify_buckling_regions();
        assert_eq!(regions.plates_in(BucklingCase::FreeEdge).count(), 2);

        let material = MaterialProperties::default();
        let k = plate_stiffness(material.elastic_modulus_mpa, material.poisson_ratio);
        let clipped = 100.0 - section.centroid_y();
        let checks = section.buckling_capacity(&material, 400.0, 2.0, 0.5);
        assert_relative_eq!(
            checks[2].critical_stress_mpa,
            6.0 * k * (4.0f64 / clipped).powi(2),
            max_relative = 1e-12
        );
        assert!(checks[2].critical_stress_mpa > 6.0 * k * (2.0f64 / clipped).powi(2));
    }

    #[test]
    fn test_section_without_inner_flange_has_no_case_1_factor() {
        let mut section = CompositeCrossSection::new();
        section.add_element(RectangularElement::new(100.0, 2.0, 100.0));
        section.add_element(RectangularElement::new(2.0, 100.0, 0.0).at_x(49.0));
        let checks = section.buckling_capacity(&MaterialProperties::default(), 400.0, 2.0, 0.5);

        assert_eq!(checks[0].case, BucklingCase::BoundedBothSides);
        assert_eq!(checks[0].critical_stress_mpa, 0.0);
        assert_eq!(checks[0].safety_factor, None);
        assert!(checks[1].safety_factor.is_some_and(|fos| fos > 0.0));
    }

    #[test]
    fn test_empty_cases_report_zero() {
        let section = CompositeCrossSection::new();
        let checks = section.buckling_capacity(&MaterialProperties::default(), 400.0, 2.0, 0.5);
        assert!(checks.iter().all(|c| c.critical_stress_mpa == 0.0 && c.safety_factor.is_none()));
    }
}
