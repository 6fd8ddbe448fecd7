//! # Geometry Interchange Record
//!
//! The JSON shape in which cross-section geometry is exchanged with the
//! editor and stored on disk:
//!
//! ```json
//! {
//!   "rectangles": [
//!     { "width": 100.0, "height": 10.0, "position": 0.0, "position_x": 0.0 }
//!   ],
//!   "glue_connections": [
//!     { "rect1": 1, "rect2": 0, "direction": "horizontal", "thickness": 1.0 }
//!   ]
//! }
//! ```
//!
//! `rect1`/`rect2` are positions in the `rectangles` list. `position_x` may
//! be absent or `null`, meaning 0.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

use super::cross_section::{CompositeCrossSection, ElementId, JointOrientation};
use super::rectangle::RectangularElement;

/// One rectangle as stored in the geometry file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangleRecord {
    pub width: f64,
    pub height: f64,
    pub position: f64,
    #[serde(default)]
    pub position_x: Option<f64>,
}

/// One glue connection as stored in the geometry file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlueRecord {
    pub rect1: usize,
    pub rect2: usize,
    pub direction: JointOrientation,
    pub thickness: f64,
}

/// Rectangles plus glue connections, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
    #[serde(default)]
    pub rectangles: Vec<RectangleRecord>,
    #[serde(default)]
    pub glue_connections: Vec<GlueRecord>,
}

impl GeometryRecord {
    pub fn is_empty(&self) -> bool {
        self.rectangles.is_empty() && self.glue_connections.is_empty()
    }

    pub fn from_json(json: &str) -> CalcResult<Self> {
        serde_json::from_str(json).map_err(CalcError::serialization)
    }

    pub fn to_json(&self) -> CalcResult<String> {
        serde_json::to_string_pretty(self).map_err(CalcError::serialization)
    }
}

impl CompositeCrossSection {
    /// Build a section from a geometry record.
    ///
    /// Rectangles get ids 0, 1, 2... in file order, so glue indices map
    /// straight onto handles. Glue indices are not checked here; an index
    /// past the end is reported when that joint is evaluated.
    pub fn from_record(record: &GeometryRecord) -> Self {
        let mut section = CompositeCrossSection::new();
        for rect in &record.rectangles {
            section.add_element(
                RectangularElement::new(rect.width, rect.height, rect.position)
                    .at_x(rect.position_x.unwrap_or(0.0)),
            );
        }
        for glue in &record.glue_connections {
            section.add_adhesive_joint(
                ElementId(glue.rect1),
                ElementId(glue.rect2),
                glue.direction,
                glue.thickness,
            );
        }
        section
    }

    /// Export the live rectangles and joints.
    ///
    /// Handles are renumbered densely in insertion order. A joint that refers
    /// to a removed or unknown rectangle cannot be written and is rejected.
    pub fn to_record(&self) -> CalcResult<GeometryRecord> {
        let mut index_of = vec![None; self.elements().map(|(id, _)| id.0 + 1).max().unwrap_or(0)];
        let rectangles: Vec<RectangleRecord> = self
            .elements()
            .enumerate()
            .map(|(dense, (id, rect))| {
                index_of[id.0] = Some(dense);
                RectangleRecord {
                    width: rect.width_mm,
                    height: rect.height_mm,
                    position: rect.position_mm,
                    position_x: Some(rect.position_x_mm),
                }
            })
            .collect();

        let resolve = |id: ElementId| {
            index_of.get(id.0).copied().flatten().ok_or_else(|| {
                CalcError::invalid_geometry(format!(
                    "glue connection refers to rectangle {} which is not in the section",
                    id
                ))
            })
        };

        let glue_connections = self
            .joints()
            .iter()
            .map(|joint| {
                Ok(GlueRecord {
                    rect1: resolve(joint.rect_a)?,
                    rect2: resolve(joint.rect_b)?,
                    direction: joint.orientation,
                    thickness: joint.thickness_mm,
                })
            })
            .collect::<CalcResult<Vec<_>>>()?;

        Ok(GeometryRecord {
            rectangles,
            glue_connections,
        })
    }
}
