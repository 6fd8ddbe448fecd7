//! # Composite Cross-Section
//!
//! A built-up section made of [`RectangularElement`]s plus the adhesive joints
//! declared between them.
//!
//! Rectangles live in slots addressed by a stable [`ElementId`] handed out at
//! insertion. Removing a rectangle empties its slot instead of shifting the
//! ones after it, so joint declarations keep pointing at the right material.
//!
//! Every property is recomputed from the live rectangles on each call. There
//! is no cached centroid to refresh before asking for the moment of inertia.
//!
//! ## Example
//!
//! ```rust
//! use trestle_core::section::{CompositeCrossSection, JointOrientation, RectangularElement};
//!
//! let mut section = CompositeCrossSection::new();
//! let flange = section.add_element(RectangularElement::new(100.0, 10.0, 0.0));
//! let web = section.add_element(RectangularElement::new(10.0, 100.0, 10.0).at_x(45.0));
//! section.add_adhesive_joint(web, flange, JointOrientation::Horizontal, 1.0);
//!
//! assert_eq!(section.total_area(), 2000.0);
//! assert_eq!(section.centroid_y(), 32.5);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::section::{parallel_axis, weighted_centroid};
use crate::errors::{CalcError, CalcResult};

use super::rectangle::RectangularElement;

/// Stable handle of a rectangle inside a [`CompositeCrossSection`].
///
/// For a section built by appending only, the id equals the rectangle's
/// position in insertion order, which is what the geometry file stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub usize);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Orientation of a bond line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JointOrientation {
    /// Bond along a horizontal edge (one rectangle sits on the other)
    Horizontal,
    /// Bond along a vertical edge; declared but not analysed
    Vertical,
}

impl JointOrientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            JointOrientation::Horizontal => "horizontal",
            JointOrientation::Vertical => "vertical",
        }
    }
}

/// A declared glue line between two rectangles.
///
/// Adjacency is not checked at declaration; the shear routine rejects a
/// joint whose rectangles do not actually meet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdhesiveJoint {
    pub rect_a: ElementId,
    pub rect_b: ElementId,
    pub orientation: JointOrientation,
    /// Bond-line thickness used as the shear width (mm)
    pub thickness_mm: f64,
}

impl AdhesiveJoint {
    /// Name under which this joint's stress is reported, e.g. `glue_1_0_horizontal`.
    pub fn key(&self) -> String {
        format!("glue_{}_{}_{}", self.rect_a, self.rect_b, self.orientation.as_str())
    }
}

/// Geometric properties of a section, computed together in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    pub area_mm2: f64,
    /// Neutral axis height above the datum
    pub centroid_y_mm: f64,
    pub centroid_x_mm: f64,
    /// Composite I about the horizontal neutral axis
    pub moment_of_inertia_mm4: f64,
    /// Neutral axis to highest top edge
    pub y_top_mm: f64,
    /// Neutral axis to lowest bottom edge
    pub y_bottom_mm: f64,
}

/// Ordered set of rectangles plus adhesive joint declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeCrossSection {
    slots: Vec<Option<RectangularElement>>,
    joints: Vec<AdhesiveJoint>,
}

impl CompositeCrossSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rectangle and return its handle.
    pub fn add_element(&mut self, element: RectangularElement) -> ElementId {
        self.slots.push(Some(element));
        ElementId(self.slots.len() - 1)
    }

    /// Remove the first rectangle equal to `element`.
    ///
    /// Returns the handle it occupied, or `None` if no rectangle matched.
    pub fn remove_element(&mut self, element: &RectangularElement) -> Option<ElementId> {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.as_ref() == Some(element))?;
        self.slots[index] = None;
        Some(ElementId(index))
    }

    /// Remove a rectangle by handle.
    pub fn remove(&mut self, id: ElementId) -> Option<RectangularElement> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    /// Look up a live rectangle, rejecting unknown or removed handles.
    pub fn element(&self, id: ElementId) -> CalcResult<&RectangularElement> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or_else(|| {
                CalcError::invalid_geometry(format!(
                    "rectangle {} does not exist in this section ({} slots)",
                    id,
                    self.slots.len()
                ))
            })
    }

    /// Edit a rectangle in place. Properties follow the edit on the next query.
    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut RectangularElement> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Live rectangles in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &RectangularElement)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|r| (ElementId(i), r)))
    }

    /// Copy of the live rectangles, for analyses that rework the geometry.
    pub fn snapshot(&self) -> Vec<RectangularElement> {
        self.elements().map(|(_, r)| *r).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declare a glue line. Returns the joint's index in declaration order.
    pub fn add_adhesive_joint(
        &mut self,
        rect_a: ElementId,
        rect_b: ElementId,
        orientation: JointOrientation,
        thickness_mm: f64,
    ) -> usize {
        self.joints.push(AdhesiveJoint {
            rect_a,
            rect_b,
            orientation,
            thickness_mm,
        });
        self.joints.len() - 1
    }

    pub fn joints(&self) -> &[AdhesiveJoint] {
        &self.joints
    }

    pub fn total_area(&self) -> f64 {
        self.elements().map(|(_, r)| r.area()).sum()
    }

    /// Neutral axis height. Returns 0.0 for an empty section.
    pub fn centroid_y(&self) -> f64 {
        weighted_centroid(self.elements().map(|(_, r)| (r.area(), r.centroid_y())))
    }

    /// Horizontal centroid. Returns 0.0 for an empty section.
    pub fn centroid_x(&self) -> f64 {
        weighted_centroid(self.elements().map(|(_, r)| (r.area(), r.centroid_x())))
    }

    /// Composite I about the horizontal neutral axis (parallel-axis sum).
    pub fn moment_of_inertia(&self) -> f64 {
        let centroid = self.centroid_y();
        self.elements()
            .map(|(_, r)| parallel_axis(r.self_moment_of_inertia(), r.area(), r.centroid_y() - centroid))
            .sum()
    }

    /// (neutral axis to highest top, neutral axis to lowest bottom)
    pub fn extreme_fiber_distances(&self) -> CalcResult<(f64, f64)> {
        if self.is_empty() {
            return Err(CalcError::invalid_geometry(
                "extreme fibre distances need at least one rectangle",
            ));
        }
        let top = self
            .elements()
            .map(|(_, r)| r.top())
            .fold(f64::NEG_INFINITY, f64::max);
        let bottom = self
            .elements()
            .map(|(_, r)| r.position_mm)
            .fold(f64::INFINITY, f64::min);
        let centroid = self.centroid_y();
        Ok((top - centroid, centroid - bottom))
    }

    /// Leftmost edge of any rectangle.
    pub fn left_edge(&self) -> Option<f64> {
        self.elements()
            .map(|(_, r)| r.position_x_mm)
            .reduce(f64::min)
    }

    /// Rightmost edge of any rectangle.
    pub fn right_edge(&self) -> Option<f64> {
        self.elements().map(|(_, r)| r.right()).reduce(f64::max)
    }

    /// The tallest rectangle; the first one wins a tie.
    pub fn tallest_element(&self) -> Option<(ElementId, &RectangularElement)> {
        self.elements().fold(None, |best, (id, r)| match best {
            Some((_, b)) if b.height_mm >= r.height_mm => best,
            _ => Some((id, r)),
        })
    }

    /// All section properties at once.
    pub fn properties(&self) -> CalcResult<SectionProperties> {
        let (y_top_mm, y_bottom_mm) = self.extreme_fiber_distances()?;
        Ok(SectionProperties {
            area_mm2: self.total_area(),
            centroid_y_mm: self.centroid_y(),
            centroid_x_mm: self.centroid_x(),
            moment_of_inertia_mm4: self.moment_of_inertia(),
            y_top_mm,
            y_bottom_mm,
        })
    }
}

impl std::fmt::Display for CompositeCrossSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (id, rect) in self.elements() {
            writeln!(f, "R{}: {}", id, rect)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tee() -> CompositeCrossSection {
        let mut section = CompositeCrossSection::new();
        section.add_element(RectangularElement::new(100.0, 10.0, 0.0));
        section.add_element(RectangularElement::new(10.0, 100.0, 10.0).at_x(45.0));
        section
    }

    #[test]
    fn test_total_area_is_sum_of_rectangles() {
        let section = tee();
        assert_relative_eq!(section.total_area(), 100.0 * 10.0 + 10.0 * 100.0);
        assert_eq!(CompositeCrossSection::new().total_area(), 0.0);
    }

    #[test]
    fn test_empty_section_centroid_sentinel() {
        let section = CompositeCrossSection::new();
        assert_eq!(section.centroid_y(), 0.0);
        assert_eq!(section.centroid_x(), 0.0);
        assert!(section.extreme_fiber_distances().is_err());
        assert!(section.properties().is_err());
    }

    #[test]
    fn test_single_rectangle_centroid_and_inertia() {
        let mut section = CompositeCrossSection::new();
        section.add_element(RectangularElement::new(80.0, 20.0, 30.0).at_x(10.0));
        assert_relative_eq!(section.centroid_y(), 40.0);
        assert_relative_eq!(section.centroid_x(), 50.0);
        assert_eq!(section.moment_of_inertia(), 80.0 * 20.0f64.powi(3) / 12.0);
        let (y_top, y_bottom) = section.extreme_fiber_distances().unwrap();
        assert_relative_eq!(y_top, 10.0);
        assert_relative_eq!(y_bottom, 10.0);
    }

    #[test]
    fn test_stacked_congruent_rectangles_centroid_at_midpoint() {
        let mut section = CompositeCrossSection::new();
        section.add_element(RectangularElement::new(50.0, 20.0, 0.0));
        section.add_element(RectangularElement::new(50.0, 20.0, 20.0));
        assert_relative_eq!(section.centroid_y(), 20.0);
        // Two stacked halves make one 50 x 40 rectangle
        assert_relative_eq!(section.moment_of_inertia(), 50.0 * 40.0f64.powi(3) / 12.0, epsilon = 1e-6);
    }

    #[test]
    fn test_tee_centroid_between_parts() {
        let section = tee();
        let c = section.centroid_y();
        assert!(c > 5.0 && c < 60.0);
        assert_relative_eq!(c, 32.5);
    }

    #[test]
    fn test_inertia_follows_edits() {
        let mut section = tee();
        let before = section.moment_of_inertia();
        section.element_mut(ElementId(1)).unwrap().height_mm = 150.0;
        let after = section.moment_of_inertia();

        let mut rebuilt = CompositeCrossSection::new();
        rebuilt.add_element(RectangularElement::new(100.0, 10.0, 0.0));
        rebuilt.add_element(RectangularElement::new(10.0, 150.0, 10.0).at_x(45.0));

        assert!(after > before);
        assert_relative_eq!(after, rebuilt.moment_of_inertia());
        assert_relative_eq!(section.centroid_y(), rebuilt.centroid_y());
    }

    #[test]
    fn test_removal_keeps_later_ids_stable() {
        let mut section = tee();
        let top = section.add_element(RectangularElement::new(100.0, 5.0, 110.0));
        assert!(section.remove(ElementId(1)).is_some());
        assert_eq!(section.len(), 2);
        assert_eq!(section.element(top).unwrap().height_mm, 5.0);
        assert!(section.element(ElementId(1)).is_err());
        assert!(section.element(ElementId(9)).is_err());
    }

    #[test]
    fn test_remove_element_by_value_takes_first_match() {
        let mut section = CompositeCrossSection::new();
        let plate = RectangularElement::new(10.0, 10.0, 0.0);
        section.add_element(plate);
        section.add_element(plate);
        assert_eq!(section.remove_element(&plate), Some(ElementId(0)));
        assert_eq!(section.remove_element(&plate), Some(ElementId(1)));
        assert_eq!(section.remove_element(&plate), None);
        assert!(section.is_empty());
    }

    #[test]
    fn test_tallest_element_first_wins() {
        let mut section = CompositeCrossSection::new();
        section.add_element(RectangularElement::new(1.0, 50.0, 0.0));
        section.add_element(RectangularElement::new(2.0, 80.0, 0.0));
        section.add_element(RectangularElement::new(3.0, 80.0, 0.0));
        let (id, _) = section.tallest_element().unwrap();
        assert_eq!(id, ElementId(1));
    }

    #[test]
    fn test_joint_key() {
        let mut section = tee();
        let j = section.add_adhesive_joint(ElementId(1), ElementId(0), JointOrientation::Horizontal, 1.0);
        assert_eq!(section.joints()[j].key(), "glue_1_0_horizontal");
    }
}
