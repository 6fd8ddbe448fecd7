//! Axis-aligned rectangular element of a built-up section.

use serde::{Deserialize, Serialize};

use crate::equations::section::{rectangular_area, rectangular_moment_of_inertia};

/// One rectangle of a composite cross-section.
///
/// Positions are measured from an arbitrary datum: `position_mm` is the
/// height of the bottom edge, `position_x_mm` the offset of the left edge.
/// Dimensions are expected to be positive; the constructing collaborator
/// rejects anything else before it reaches the section.
///
/// Derived values are computed from the fields on every call, so editing a
/// field through [`CompositeCrossSection::element_mut`](super::CompositeCrossSection::element_mut)
/// never leaves a stale area or centroid behind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangularElement {
    /// Horizontal dimension (mm)
    pub width_mm: f64,
    /// Vertical dimension (mm)
    pub height_mm: f64,
    /// Bottom edge above the datum (mm)
    pub position_mm: f64,
    /// Left edge from the datum (mm)
    #[serde(default)]
    pub position_x_mm: f64,
}

impl RectangularElement {
    /// Rectangle with its left edge on the datum.
    pub fn new(width_mm: f64, height_mm: f64, position_mm: f64) -> Self {
        RectangularElement {
            width_mm,
            height_mm,
            position_mm,
            position_x_mm: 0.0,
        }
    }

    /// Set the horizontal offset of the left edge.
    pub fn at_x(mut self, position_x_mm: f64) -> Self {
        self.position_x_mm = position_x_mm;
        self
    }

    pub fn area(&self) -> f64 {
        rectangular_area(self.width_mm, self.height_mm)
    }

    /// Height of the rectangle's own centroid above the datum.
    pub fn centroid_y(&self) -> f64 {
        self.position_mm + self.height_mm / 2.0
    }

    /// Horizontal position of the rectangle's own centroid.
    pub fn centroid_x(&self) -> f64 {
        self.position_x_mm + self.width_mm / 2.0
    }

    /// I about the rectangle's own horizontal centroidal axis: bh³/12
    pub fn self_moment_of_inertia(&self) -> f64 {
        rectangular_moment_of_inertia(self.width_mm, self.height_mm)
    }

    pub fn top(&self) -> f64 {
        self.position_mm + self.height_mm
    }

    pub fn right(&self) -> f64 {
        self.position_x_mm + self.width_mm
    }
}

impl std::fmt::Display for RectangularElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} x {} mm at y = {} mm, x = {} mm",
            self.width_mm, self.height_mm, self.position_mm, self.position_x_mm
        )
    }
}
