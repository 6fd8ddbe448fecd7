//! # Cross-Sections
//!
//! Built-up sections made of axis-aligned rectangles.
//!
//! - [`rectangle`] - A single rectangle and its own properties
//! - [`cross_section`] - The composite section, its joints and properties
//! - [`buckling`] - Local buckling classification and capacities
//! - [`record`] - The geometry interchange format

pub mod buckling;
pub mod cross_section;
pub mod record;
pub mod rectangle;

pub use buckling::{classify_buckling_regions, BucklingCase, BucklingCheck, BucklingPlate, BucklingRegions};
pub use cross_section::{AdhesiveJoint, CompositeCrossSection, ElementId, JointOrientation, SectionProperties};
pub use record::{GeometryRecord, GlueRecord, RectangleRecord};
pub use rectangle::RectangularElement;
