//! # Project Data Structures
//!
//! The `Project` struct is the root container for one bridge analysis.
//! Projects serialize to human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (id, version, engineer, job info, timestamps)
//! ├── settings: AnalysisSettings (material, diaphragm spacing)
//! ├── bridge: BridgeInput (span, supports, train)
//! └── geometry: GeometryRecord (rectangles, glue connections)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use trestle_core::project::Project;
//!
//! let project = Project::new("Jane Engineer", "25-042", "Civil 101");
//!
//! // Serialize to JSON (see file_io for atomic saves)
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("\"span_mm\": 1200.0"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::BeamModel;
use crate::errors::{CalcError, CalcResult};
use crate::loads::{MovingLoad, STANDARD_TRAIN_WEIGHT_N};
use crate::materials::MaterialProperties;
use crate::section::{CompositeCrossSection, GeometryRecord};

/// Current schema version for project files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Default spacing of the diaphragms that brace the webs (mm)
pub const DEFAULT_DIAPHRAGM_SPACING_MM: f64 = 400.0;

/// Default span (mm)
pub const DEFAULT_SPAN_MM: f64 = 1200.0;

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (id, version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Material and bracing used by the checks
    #[serde(default)]
    pub settings: AnalysisSettings,

    /// Span, supports and load group
    #[serde(default)]
    pub bridge: BridgeInput,

    /// Cross-section in the geometry interchange format
    #[serde(default)]
    pub geometry: GeometryRecord,
}

impl Project {
    /// Create a project with default settings, the standard train and an
    /// empty cross-section.
    ///
    /// # Example
    ///
    /// ```rust
    /// use trestle_core::project::Project;
    ///
    /// let project = Project::new("John Doe", "25-001", "Civil 101");
    /// assert_eq!(project.meta.engineer, "John Doe");
    /// assert!(project.geometry.is_empty());
    /// ```
    pub fn new(engineer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                id: Uuid::new_v4(),
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: AnalysisSettings::default(),
            bridge: BridgeInput::default(),
            geometry: GeometryRecord::default(),
        }
    }

    /// Replace the cross-section geometry.
    pub fn set_geometry(&mut self, section: &CompositeCrossSection) -> CalcResult<()> {
        self.geometry = section.to_record()?;
        self.touch();
        Ok(())
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Assemble a beam model from the stored inputs.
    ///
    /// An empty geometry record gives a beam without a section, which
    /// supports statics and sweeps but not stress checks.
    pub fn build_model(&self) -> CalcResult<BeamModel> {
        let load = self.bridge.train.to_moving_load()?;
        let section = if self.geometry.rectangles.is_empty() {
            None
        } else {
            Some(CompositeCrossSection::from_record(&self.geometry))
        };
        BeamModel::new(self.bridge.span_mm, self.bridge.supports.clone(), load, section)?
            .with_settings(self.settings.clone())
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Stable identifier of this project
    pub id: Uuid,

    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client or course name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Material and bracing parameters for the stress and buckling checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub material: MaterialProperties,
    /// Distance between diaphragms, the panel length for web shear buckling (mm)
    pub diaphragm_spacing_mm: f64,
}

impl AnalysisSettings {
    pub fn validate(&self) -> CalcResult<()> {
        self.material.validate()?;
        if !self.diaphragm_spacing_mm.is_finite() || self.diaphragm_spacing_mm <= 0.0 {
            return Err(CalcError::invalid_input(
                "diaphragm_spacing_mm",
                self.diaphragm_spacing_mm.to_string(),
                "Must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            material: MaterialProperties::default(),
            diaphragm_spacing_mm: DEFAULT_DIAPHRAGM_SPACING_MM,
        }
    }
}

/// Span, supports and the load that crosses them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeInput {
    pub span_mm: f64,
    /// Support labels, left then right
    pub supports: Vec<String>,
    pub train: TrainInput,
}

impl Default for BridgeInput {
    fn default() -> Self {
        BridgeInput {
            span_mm: DEFAULT_SPAN_MM,
            supports: vec!["A".to_string(), "B".to_string()],
            train: TrainInput::default(),
        }
    }
}

/// The load group as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainInput {
    pub total_weight_n: f64,
    pub reference_position_mm: f64,
    /// Wheel spacings; the standard train when absent
    pub spacings_mm: Option<Vec<f64>>,
    /// One weight per wheel; an even split when absent
    pub wheel_weights_n: Option<Vec<f64>>,
}

impl TrainInput {
    pub fn to_moving_load(&self) -> CalcResult<MovingLoad> {
        let load = match &self.spacings_mm {
            Some(spacings) => MovingLoad::new(self.total_weight_n, spacings.clone(), self.reference_position_mm)?,
            None => MovingLoad::standard_train(self.total_weight_n, self.reference_position_mm)?,
        };
        match &self.wheel_weights_n {
            Some(weights) => load.with_wheel_weights(weights.clone()),
            None => Ok(load),
        }
    }
}

impl Default for TrainInput {
    fn default() -> Self {
        TrainInput {
            total_weight_n: STANDARD_TRAIN_WEIGHT_N,
            reference_position_mm: 0.0,
            spacings_mm: None,
            wheel_weights_n: None,
        }
    }
}
