//! # Structural Mechanics Equations
//!
//! Every formula the engine evaluates lives here, so the analysis code reads
//! as bookkeeping over rectangles and load positions while the mechanics stay
//! in one reviewable place.
//!
//! ## Modules
//!
//! - [`beam`] - Simply-supported statics, diagrams, flexural and shear-flow stress
//! - [`section`] - Rectangle and composite section properties (A, ȳ, I, Q)
//! - [`plate`] - Thin-plate local buckling stresses
//!
//! ## Sign Conventions
//!
//! - **Loads**: Positive downward (gravity direction)
//! - **Moment**: Positive compresses the top fibre (sagging)
//! - **Shear**: Positive when left side moves up relative to right
//! - **Reactions**: Positive upward (resisting gravity)
//!
//! ## Units
//!
//! Millimetres, newtons and MPa throughout.

pub mod beam;
pub mod plate;
pub mod section;

pub use beam::{
    bending_stress,
    factor_of_safety,
    moment_at,
    point_loads_reactions,
    round_to_tenth,
    shear_at,
    shear_flow_stress,
};

pub use plate::{
    plate_buckling_stress,
    plate_stiffness,
    shear_buckling_stress,
    K_BOTH_EDGES,
    K_ONE_EDGE,
    K_WEB_FLEXURE,
    K_WEB_SHEAR,
};

pub use section::{
    first_moment,
    parallel_axis,
    rectangular_area,
    rectangular_moment_of_inertia,
    weighted_centroid,
};
