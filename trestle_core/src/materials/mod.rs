//! # Material Properties
//!
//! Strength and stiffness values the stress and buckling checks compare
//! against. The defaults describe the matboard used for model bridges; any
//! value can be overridden through the project settings.
//!
//! ## Example
//!
//! ```rust
//! use trestle_core::materials::MaterialProperties;
//!
//! let matboard = MaterialProperties::default();
//! assert_eq!(matboard.compressive_strength_mpa, 6.0);
//!
//! // Partial JSON falls back to defaults for missing fields
//! let stiffer: MaterialProperties = serde_json::from_str(r#"{"elastic_modulus_mpa": 5000.0}"#).unwrap();
//! assert_eq!(stiffer.elastic_modulus_mpa, 5000.0);
//! assert_eq!(stiffer.tensile_strength_mpa, 30.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Elastic and strength properties of the section material (MPa).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialProperties {
    /// Display name
    pub name: String,
    /// Modulus of elasticity E
    pub elastic_modulus_mpa: f64,
    /// Poisson's ratio ν
    pub poisson_ratio: f64,
    /// Ultimate tensile strength
    pub tensile_strength_mpa: f64,
    /// Ultimate compressive strength
    pub compressive_strength_mpa: f64,
    /// Shear strength of the material
    pub shear_strength_mpa: f64,
    /// Shear strength of the adhesive
    pub glue_shear_strength_mpa: f64,
}

impl MaterialProperties {
    /// Matboard with contact cement joints
    pub fn matboard() -> Self {
        MaterialProperties {
            name: "Matboard".to_string(),
            elastic_modulus_mpa: 4000.0,
            poisson_ratio: 0.2,
            tensile_strength_mpa: 30.0,
            compressive_strength_mpa: 6.0,
            shear_strength_mpa: 4.0,
            glue_shear_strength_mpa: 2.0,
        }
    }

    /// Reject values that would make the checks meaningless.
    pub fn validate(&self) -> CalcResult<()> {
        let positive = [
            ("elastic_modulus_mpa", self.elastic_modulus_mpa),
            ("tensile_strength_mpa", self.tensile_strength_mpa),
            ("compressive_strength_mpa", self.compressive_strength_mpa),
            ("shear_strength_mpa", self.shear_strength_mpa),
            ("glue_shear_strength_mpa", self.glue_shear_strength_mpa),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(CalcError::invalid_input(field, value.to_string(), "Must be positive"));
            }
        }
        if !(0.0..0.5).contains(&self.poisson_ratio) {
            return Err(CalcError::invalid_input(
                "poisson_ratio",
                self.poisson_ratio.to_string(),
                "Must be in [0, 0.5)",
            ));
        }
        Ok(())
    }
}

impl Default for MaterialProperties {
    fn default() -> Self {
        MaterialProperties::matboard()
    }
}
