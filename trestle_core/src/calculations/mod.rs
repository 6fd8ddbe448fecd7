//! # Beam Calculations
//!
//! Each part follows the same pattern: a model method that returns a
//! JSON-serializable result or a structured [`CalcError`](crate::errors::CalcError).
//!
//! - [`beam_model`] - Reactions, diagrams and the envelope sweep
//! - [`stress`] - Bending, shear, glue and buckling checks
//! - [`report`] - Every check gathered into an [`AnalysisReport`]

pub mod beam_model;
pub mod report;
pub mod stress;

pub use beam_model::{
    BeamModel,
    BeamState,
    Diagrams,
    Envelope,
    Extremum,
    ForceSource,
    GoverningForces,
    LoadingCharacteristic,
    Reactions,
    SweepResult,
};
pub use report::AnalysisReport;
pub use stress::{
    centroidal_first_moment,
    first_moment_beyond,
    BendingStress,
    CentroidalShear,
    GlueStress,
};
