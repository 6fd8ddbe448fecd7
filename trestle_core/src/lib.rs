//! # trestle_core - Moving-Load Beam Analysis Engine
//!
//! `trestle_core` checks a simply-supported beam with a built-up
//! rectangular cross-section against a wheel group rolling across it.
//! It computes support reactions, shear and moment diagrams, force
//! envelopes over every load position, and the bending, shear, glue and
//! plate buckling stresses with their safety factors.
//!
//! ## Design Philosophy
//!
//! - **Pure recomputation**: section properties are derived on every query
//! - **JSON-First**: inputs and results implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use trestle_core::calculations::BeamModel;
//! use trestle_core::loads::{MovingLoad, SweepDirection};
//! use trestle_core::section::{CompositeCrossSection, JointOrientation, RectangularElement};
//!
//! let mut section = CompositeCrossSection::new();
//! let flange = section.add_element(RectangularElement::new(100.0, 10.0, 0.0));
//! let web = section.add_element(RectangularElement::new(10.0, 100.0, 10.0).at_x(45.0));
//! section.add_adhesive_joint(web, flange, JointOrientation::Horizontal, 10.0);
//!
//! let train = MovingLoad::standard_train(400.0, 0.0).unwrap();
//! let mut beam = BeamModel::new(1200.0, vec!["A".into(), "B".into()], train, Some(section)).unwrap();
//! beam.sweep(SweepDirection::LeftToRight).unwrap();
//!
//! let report = beam.analyze().unwrap();
//! println!("{}", report);
//! ```
//!
//! ## Modules
//!
//! - [`section`] - Rectangles, composite sections, buckling classification
//! - [`loads`] - Point loads and the moving wheel group
//! - [`calculations`] - Beam model, sweep, stresses and the analysis report
//! - [`equations`] - The closed-form formulas everything else calls
//! - [`materials`] - Material strengths and stiffness
//! - [`project`] - Project container, metadata and settings
//! - [`errors`] - Structured error types
//! - [`file_io`] - File operations with atomic saves and locking

pub mod calculations;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod loads;
pub mod materials;
pub mod project;
pub mod section;

// Re-export commonly used types at crate root for convenience
pub use calculations::{AnalysisReport, BeamModel};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_geometry, load_project, save_geometry, save_project, FileLock};
pub use loads::{MovingLoad, SweepDirection};
pub use project::{AnalysisSettings, Project, ProjectMetadata};
pub use section::{CompositeCrossSection, RectangularElement};
