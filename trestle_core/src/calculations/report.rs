//! Analysis Report
//!
//! Collects every check for a beam into one serializable result, with
//! flat name→value maps for tabular display.
//!
//! Stress keys: `centroid`, `glue_{a}_{b}_{direction}`.
//! Safety factor keys: `tension`, `compression`, `shear`, `glue`,
//! `buckling_case_{n}`.
//!
//! A safety factor with no demand behind it is infinite and serializes to
//! JSON `null`. Buckling cases with no qualifying plate have no factor and
//! are left out of the map, so they never govern.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::loads::SweepDirection;
use crate::section::{BucklingCheck, SectionProperties};

use super::beam_model::{BeamModel, BeamState, GoverningForces, Reactions};
use super::stress::{BendingStress, CentroidalShear, GlueStress};

/// All results for one beam, section and load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub span_mm: f64,
    pub supports: Vec<String>,
    pub state: BeamState,
    pub reactions: Reactions,
    pub governing: GoverningForces,
    pub section: SectionProperties,
    pub bending: BendingStress,
    pub centroidal_shear: CentroidalShear,
    pub glue: Vec<GlueStress>,
    pub glue_safety_factor: Option<f64>,
    pub buckling: Vec<BucklingCheck>,
    pub stresses: BTreeMap<String, f64>,
    pub safety_factors: BTreeMap<String, f64>,
}

impl AnalysisReport {
    /// Direction of the sweep the forces came from, if any.
    pub fn direction(&self) -> Option<SweepDirection> {
        match self.state {
            BeamState::Swept(direction) => Some(direction),
            BeamState::Constructed => None,
        }
    }

    /// The failure mode with the smallest safety factor.
    pub fn governing_condition(&self) -> Option<(&str, f64)> {
        self.safety_factors
            .iter()
            .map(|(name, fos)| (name.as_str(), *fos))
            .reduce(|best, next| if next.1 < best.1 { next } else { best })
    }

    /// True when every safety factor is at least 1.
    pub fn passes(&self) -> bool {
        self.safety_factors.values().all(|fos| *fos >= 1.0)
    }
}

impl BeamModel {
    /// Run every check with the current governing forces.
    pub fn analyze(&self) -> CalcResult<AnalysisReport> {
        let section = self.require_section()?.properties()?;
        let bending = self.max_stress()?;
        let centroidal_shear = self.shear_stress_at_centroid()?;
        let glue = self.adhesive_joint_stresses()?;
        let glue_safety_factor = glue.iter().map(|g| g.safety_factor).reduce(f64::min);
        let buckling = self.buckling_checks()?;

        let mut stresses = BTreeMap::new();
        stresses.insert("centroid".to_string(), centroidal_shear.stress_mpa);
        for g in &glue {
            stresses.insert(g.key.clone(), g.stress_mpa);
        }

        let mut safety_factors = BTreeMap::new();
        safety_factors.insert("tension".to_string(), bending.tension_safety_factor);
        safety_factors.insert("compression".to_string(), bending.compression_safety_factor);
        safety_factors.insert("shear".to_string(), centroidal_shear.safety_factor);
        if let Some(fos) = glue_safety_factor {
            safety_factors.insert("glue".to_string(), fos);
        }
        for check in &buckling {
            if let Some(fos) = check.safety_factor {
                safety_factors.insert(check.case.key(), fos);
            }
        }

        let report = AnalysisReport {
            span_mm: self.span_mm(),
            supports: self.supports().to_vec(),
            state: self.state(),
            reactions: self.reactions(),
            governing: self.governing_forces(),
            section,
            bending,
            centroidal_shear,
            glue,
            glue_safety_factor,
            buckling,
            stresses,
            safety_factors,
        };

        if let Some((name, fos)) = report.governing_condition() {
            log::info!("analysis complete: governing {} with FOS {:.2}", name, fos);
        }
        Ok(report)
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Span {} mm between supports {}",
            self.span_mm,
            self.supports.join(" and ")
        )?;
        match self.direction() {
            Some(direction) => writeln!(f, "Forces from envelope, load moving {}", direction.display_name())?,
            None => writeln!(f, "Forces at the current load position (no sweep)")?,
        }
        writeln!(
            f,
            "Reactions: {:.2} N, {:.2} N",
            self.reactions.left_n, self.reactions.right_n
        )?;
        writeln!(
            f,
            "Shear: max {:.1} N, min {:.1} N",
            self.governing.max_shear_n, self.governing.min_shear_n
        )?;
        writeln!(
            f,
            "Moment: max {:.1} N·mm, min {:.1} N·mm",
            self.governing.positive_moment_nmm, self.governing.negative_moment_nmm
        )?;
        writeln!(
            f,
            "Section: A = {:.1} mm², ȳ = {:.3} mm, I = {:.1} mm⁴",
            self.section.area_mm2, self.section.centroid_y_mm, self.section.moment_of_inertia_mm4
        )?;

        writeln!(f)?;
        writeln!(f, "{:<22} {:>12}", "Stress", "MPa")?;
        writeln!(f, "{:<22} {:>12.4}", "bending tension", self.bending.max_tension_mpa)?;
        writeln!(f, "{:<22} {:>12.4}", "bending compression", self.bending.max_compression_mpa)?;
        for (name, stress) in &self.stresses {
            writeln!(f, "{:<22} {:>12.4}", name, stress)?;
        }

        writeln!(f)?;
        writeln!(f, "{:<22} {:>12}", "Safety factor", "FOS")?;
        for (name, fos) in &self.safety_factors {
            let flag = if *fos < 1.0 { "  FAIL" } else { "" };
            writeln!(f, "{:<22} {:>12.3}{}", name, fos, flag)?;
        }
        for check in self.buckling.iter().filter(|c| c.safety_factor.is_none()) {
            writeln!(f, "{:<22} {:>12}", check.case.key(), "no plate")?;
        }

        writeln!(f)?;
        match self.governing_condition() {
            Some((name, fos)) => write!(
                f,
                "Governing: {} (FOS {:.3}) - {}",
                name,
                fos,
                if self.passes() { "PASS" } else { "FAIL" }
            ),
            None => write!(f, "No checks ran"),
        }
    }
}
