//! Moving Load Group
//!
//! A group of wheels at fixed spacings that travels along the span. Wheel
//! positions are measured from a single reference position (the "train
//! position"): wheel `i` sits at `reference + offset_i`, where the offsets are
//! the running sum of the spacings.
//!
//! ## Sweep
//!
//! [`MovingLoad::sweep`] yields one [`LoadSnapshot`] per 1 mm step, from the
//! position where the leading wheel first reaches the beam to the position
//! where the trailing wheel has left it. The caller's load is never moved;
//! the iterator steps a private copy.
//!
//! ```rust
//! use trestle_core::loads::{MovingLoad, SweepDirection};
//!
//! let mut train = MovingLoad::standard_train(400.0, 0.0).unwrap();
//! train.bind_span(1200.0);
//!
//! let steps = train.sweep(SweepDirection::LeftToRight).unwrap().count();
//! // floor(span) + 1 + wheel group span
//! assert_eq!(steps, 1200 + 1 + 856);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Distance the load group moves between sweep snapshots (mm).
pub const SWEEP_STEP_MM: f64 = 1.0;

/// Spacings of the standard six-wheel train, cumulative from the reference (mm).
pub const STANDARD_WHEEL_SPACINGS_MM: [f64; 6] = [52.0, 176.0, 164.0, 176.0, 164.0, 176.0];

/// Total weight of the standard train (N).
pub const STANDARD_TRAIN_WEIGHT_N: f64 = 400.0;

// ============================================================================
// Point Load
// ============================================================================

/// A concentrated force at a position along the span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLoad {
    /// Distance from the left support (mm)
    pub position_mm: f64,
    /// Downward force (N)
    pub magnitude_n: f64,
}

impl PointLoad {
    pub fn new(position_mm: f64, magnitude_n: f64) -> Self {
        PointLoad {
            position_mm,
            magnitude_n,
        }
    }

    /// (position, magnitude) pair as consumed by the beam equations
    pub fn as_pair(&self) -> (f64, f64) {
        (self.position_mm, self.magnitude_n)
    }
}

// ============================================================================
// Wheel Weights and Direction
// ============================================================================

/// Weight carried by each wheel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum WheelWeights {
    /// Every wheel carries the same weight (N)
    Uniform(f64),
    /// One weight per wheel, in wheel order (N)
    PerWheel(Vec<f64>),
}

impl WheelWeights {
    /// Weight of wheel `index` (N); 0 past the end of a per-wheel list
    pub fn weight_of(&self, index: usize) -> f64 {
        match self {
            WheelWeights::Uniform(w) => *w,
            WheelWeights::PerWheel(weights) => weights.get(index).copied().unwrap_or(0.0),
        }
    }
}

/// Direction of travel along the span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepDirection {
    LeftToRight,
    RightToLeft,
}

impl SweepDirection {
    /// +1 for left-to-right travel, -1 otherwise
    pub fn sign(&self) -> f64 {
        match self {
            SweepDirection::LeftToRight => 1.0,
            SweepDirection::RightToLeft => -1.0,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SweepDirection::LeftToRight => "left to right",
            SweepDirection::RightToLeft => "right to left",
        }
    }
}

// ============================================================================
// Moving Load
// ============================================================================

/// A wheel group at fixed spacings, positioned by a single reference.
///
/// Deserialization runs the same checks as [`MovingLoad::new`] and
/// [`MovingLoad::with_wheel_weights`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MovingLoadFields")]
pub struct MovingLoad {
    /// Total weight of the group (N)
    pub total_weight_n: f64,
    pub wheel_weights: WheelWeights,
    /// Spacing of each wheel from the previous one; the first is measured
    /// from the reference position (mm)
    pub spacings_mm: Vec<f64>,
    /// Reference ("train") position (mm)
    pub reference_position_mm: f64,
    /// Span wheels are tested against for being on the beam. `None` until
    /// the load is bound to a beam; an unbound load keeps every wheel.
    pub span_mm: Option<f64>,
}

/// Unchecked field set a [`MovingLoad`] is read from.
#[derive(Deserialize)]
struct MovingLoadFields {
    total_weight_n: f64,
    wheel_weights: WheelWeights,
    spacings_mm: Vec<f64>,
    reference_position_mm: f64,
    #[serde(default)]
    span_mm: Option<f64>,
}

impl TryFrom<MovingLoadFields> for MovingLoad {
    type Error = CalcError;

    fn try_from(fields: MovingLoadFields) -> CalcResult<Self> {
        let mut load = MovingLoad::new(fields.total_weight_n, fields.spacings_mm, fields.reference_position_mm)?;
        load = match fields.wheel_weights {
            WheelWeights::Uniform(w) if !w.is_finite() || w < 0.0 => {
                return Err(CalcError::invalid_input(
                    "wheel_weights",
                    w.to_string(),
                    "Wheel weights must be finite and non-negative",
                ));
            }
            WheelWeights::Uniform(w) => {
                load.wheel_weights = WheelWeights::Uniform(w);
                load
            }
            WheelWeights::PerWheel(weights) => load.with_wheel_weights(weights)?,
        };
        load.span_mm = fields.span_mm;
        Ok(load)
    }
}

impl MovingLoad {
    /// Create a wheel group that shares `total_weight_n` equally between wheels.
    pub fn new(total_weight_n: f64, spacings_mm: Vec<f64>, reference_position_mm: f64) -> CalcResult<Self> {
        if spacings_mm.is_empty() {
            return Err(CalcError::invalid_input(
                "spacings_mm",
                "[]",
                "At least one wheel is required",
            ));
        }
        if let Some(bad) = spacings_mm.iter().find(|s| !s.is_finite() || **s < 0.0) {
            return Err(CalcError::invalid_input(
                "spacings_mm",
                bad.to_string(),
                "Wheel spacings must be finite and non-negative",
            ));
        }
        if !total_weight_n.is_finite() || total_weight_n < 0.0 {
            return Err(CalcError::invalid_input(
                "total_weight_n",
                total_weight_n.to_string(),
                "Total weight must be finite and non-negative",
            ));
        }
        if !reference_position_mm.is_finite() {
            return Err(CalcError::invalid_input(
                "reference_position_mm",
                reference_position_mm.to_string(),
                "Position must be finite",
            ));
        }

        let per_wheel = total_weight_n / spacings_mm.len() as f64;
        Ok(MovingLoad {
            total_weight_n,
            wheel_weights: WheelWeights::Uniform(per_wheel),
            spacings_mm,
            reference_position_mm,
            span_mm: None,
        })
    }

    /// The standard six-wheel train with the weight split evenly and rounded
    /// to two decimals.
    pub fn standard_train(total_weight_n: f64, reference_position_mm: f64) -> CalcResult<Self> {
        let mut train = MovingLoad::new(
            total_weight_n,
            STANDARD_WHEEL_SPACINGS_MM.to_vec(),
            reference_position_mm,
        )?;
        let per_wheel = total_weight_n / STANDARD_WHEEL_SPACINGS_MM.len() as f64;
        train.wheel_weights = WheelWeights::Uniform((per_wheel * 100.0).round() / 100.0);
        Ok(train)
    }

    /// Replace the even split with one weight per wheel.
    pub fn with_wheel_weights(mut self, weights: Vec<f64>) -> CalcResult<Self> {
        if weights.len() != self.wheel_count() {
            return Err(CalcError::invalid_input(
                "wheel_weights",
                format!("{} values", weights.len()),
                format!("Expected one weight per wheel ({})", self.wheel_count()),
            ));
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(CalcError::invalid_input(
                "wheel_weights",
                bad.to_string(),
                "Wheel weights must be finite and non-negative",
            ));
        }
        self.wheel_weights = WheelWeights::PerWheel(weights);
        Ok(self)
    }

    /// Set the span wheels are clipped against.
    pub fn bind_span(&mut self, span_mm: f64) {
        self.span_mm = Some(span_mm);
    }

    pub fn wheel_count(&self) -> usize {
        self.spacings_mm.len()
    }

    /// Wheel positions relative to the reference (running sum of spacings).
    pub fn wheel_offsets(&self) -> Vec<f64> {
        self.spacings_mm
            .iter()
            .scan(0.0, |acc, s| {
                *acc += s;
                Some(*acc)
            })
            .collect()
    }

    /// Distance from the first wheel to the last (mm).
    pub fn group_span(&self) -> f64 {
        let offsets = self.wheel_offsets();
        match (offsets.first(), offsets.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Absolute wheel positions at the current reference position.
    pub fn wheel_positions(&self) -> Vec<f64> {
        self.wheel_offsets()
            .into_iter()
            .map(|offset| self.reference_position_mm + offset)
            .collect()
    }

    /// Whether a position lies on [0, span]. Always true for an unbound load.
    pub fn is_on_beam(&self, position_mm: f64) -> bool {
        match self.span_mm {
            Some(span) => (0.0..=span).contains(&position_mm),
            None => true,
        }
    }

    /// One (position, weight) entry per wheel, in wheel order.
    ///
    /// A wheel off the beam keeps its entry with a weight of 0.
    pub fn loads_at_current_position(&self) -> Vec<PointLoad> {
        self.wheel_positions()
            .into_iter()
            .enumerate()
            .map(|(i, position)| {
                let weight = if self.is_on_beam(position) {
                    self.wheel_weights.weight_of(i)
                } else {
                    0.0
                };
                PointLoad::new(position, weight)
            })
            .collect()
    }

    /// Shift the group by `step_mm` in `direction`.
    pub fn translate(&mut self, direction: SweepDirection, step_mm: f64) {
        self.reference_position_mm += direction.sign() * step_mm;
    }

    /// Place the leading wheel of a left-to-right pass at x = 0, with the
    /// rest of the group off the left end.
    pub fn reset_to_left_extreme(&mut self) {
        let last = self.wheel_offsets().last().copied().unwrap_or(0.0);
        self.reference_position_mm = -last;
    }

    /// Place the leading wheel of a right-to-left pass at x = span, with the
    /// rest of the group off the right end.
    pub fn reset_to_right_extreme(&mut self) -> CalcResult<()> {
        let span = self.bound_span()?;
        let first = self.wheel_offsets().first().copied().unwrap_or(0.0);
        self.reference_position_mm = span - first;
        Ok(())
    }

    /// Reset a copy of this load to the starting extreme for `direction` and
    /// step it across the span.
    pub fn sweep(&self, direction: SweepDirection) -> CalcResult<Sweep> {
        let span_mm = self.bound_span()?;
        let mut load = self.clone();
        match direction {
            SweepDirection::LeftToRight => load.reset_to_left_extreme(),
            SweepDirection::RightToLeft => load.reset_to_right_extreme()?,
        }
        Ok(Sweep {
            load,
            direction,
            span_mm,
        })
    }

    fn bound_span(&self) -> CalcResult<f64> {
        self.span_mm.ok_or_else(|| CalcError::missing_field("span_mm"))
    }
}

// ============================================================================
// Sweep Iterator
// ============================================================================

/// The load group at one step of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSnapshot {
    pub reference_position_mm: f64,
    /// Clipped wheel loads, one per wheel
    pub loads: Vec<PointLoad>,
}

/// Iterator over the load positions of one pass across the span.
///
/// Finite: it ends once the trailing wheel has cleared the far support.
/// Cloning the iterator restarts from the clone's current step.
#[derive(Debug, Clone)]
pub struct Sweep {
    load: MovingLoad,
    direction: SweepDirection,
    span_mm: f64,
}

impl Sweep {
    pub fn direction(&self) -> SweepDirection {
        self.direction
    }

    fn trailing_wheel_on_span(&self) -> bool {
        let positions = self.load.wheel_positions();
        match self.direction {
            SweepDirection::LeftToRight => positions.first().map_or(false, |p| *p <= self.span_mm),
            SweepDirection::RightToLeft => positions.last().map_or(false, |p| *p >= 0.0),
        }
    }
}

impl Iterator for Sweep {
    type Item = LoadSnapshot;

    fn next(&mut self) -> Option<LoadSnapshot> {
        if !self.trailing_wheel_on_span() {
            return None;
        }
        let snapshot = LoadSnapshot {
            reference_position_mm: self.load.reference_position_mm,
            loads: self.load.loads_at_current_position(),
        };
        self.load.translate(self.direction, SWEEP_STEP_MM);
        Some(snapshot)
    }
}
