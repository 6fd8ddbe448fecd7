//! Simply-Supported Beam Under a Moving Load
//!
//! Statics, shear and moment diagrams, and the envelope sweep for a span
//! carrying a [`MovingLoad`].
//!
//! ## Sign Convention
//! - Positive shear: left side up, right side down
//! - Positive moment: sagging (compression at top, tension at bottom)
//!
//! ## Stations
//! Diagrams are sampled at every whole millimetre `x = 0, 1, ..., floor(span)`,
//! so a diagram has `floor(span) + 1` entries and index `i` is position `i`.
//! Values are rounded to 0.1 so repeated evaluation is deterministic.
//!
//! ## Example
//! ```rust
//! use trestle_core::calculations::BeamModel;
//! use trestle_core::loads::{MovingLoad, SweepDirection};
//!
//! let load = MovingLoad::new(400.0, vec![600.0], 0.0).unwrap();
//! let mut beam = BeamModel::new(1200.0, vec!["A".into(), "B".into()], load, None).unwrap();
//!
//! assert_eq!(beam.diagrams().moment_nmm[600], 120_000.0);
//!
//! let result = beam.sweep(SweepDirection::LeftToRight).unwrap();
//! assert_eq!(result.envelope.max_moment().unwrap().value, 120_000.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::beam::{moment_at, point_loads_reactions, round_to_tenth, shear_at};
use crate::errors::{CalcError, CalcResult};
use crate::loads::{MovingLoad, PointLoad, SweepDirection};
use crate::project::AnalysisSettings;
use crate::section::CompositeCrossSection;

// ============================================================================
// Result Types
// ============================================================================

/// Support reactions of the simple span (N, upward positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    pub left_n: f64,
    pub right_n: f64,
}

/// Shear and moment sampled at each whole-millimetre station.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagrams {
    pub shear_n: Vec<f64>,
    pub moment_nmm: Vec<f64>,
}

impl Diagrams {
    pub fn len(&self) -> usize {
        self.shear_n.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shear_n.is_empty()
    }
}

/// A peak value and where it occurs.
///
/// `index` is the position in the array the value came from; `position_mm`
/// is the beam station for an envelope and the reference position of the
/// load for a loading characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremum {
    pub index: usize,
    pub position_mm: f64,
    pub value: f64,
}

/// Index and value of the first entry that `better` prefers over every
/// earlier entry. Ties keep the earliest index.
fn first_extremum(values: &[f64], better: impl Fn(f64, f64) -> bool) -> Option<(usize, f64)> {
    values
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, v)| match best {
            Some((_, b)) if !better(v, b) => best,
            _ => Some((i, v)),
        })
}

fn station_max(values: &[f64]) -> Option<Extremum> {
    first_extremum(values, |v, b| v > b).map(|(index, value)| Extremum {
        index,
        position_mm: index as f64,
        value,
    })
}

fn station_min(values: &[f64]) -> Option<Extremum> {
    first_extremum(values, |v, b| v < b).map(|(index, value)| Extremum {
        index,
        position_mm: index as f64,
        value,
    })
}

/// Per-station running extremes over every load position of a sweep.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Envelope {
    pub max_shear_n: Vec<f64>,
    pub min_shear_n: Vec<f64>,
    pub max_moment_nmm: Vec<f64>,
    pub min_moment_nmm: Vec<f64>,
}

impl Envelope {
    /// An envelope whose every curve is this diagram.
    pub fn from_diagrams(diagrams: &Diagrams) -> Self {
        Envelope {
            max_shear_n: diagrams.shear_n.clone(),
            min_shear_n: diagrams.shear_n.clone(),
            max_moment_nmm: diagrams.moment_nmm.clone(),
            min_moment_nmm: diagrams.moment_nmm.clone(),
        }
    }

    /// Fold another diagram in, station by station.
    pub fn absorb(&mut self, diagrams: &Diagrams) {
        for (i, &v) in diagrams.shear_n.iter().enumerate() {
            self.max_shear_n[i] = self.max_shear_n[i].max(v);
            self.min_shear_n[i] = self.min_shear_n[i].min(v);
        }
        for (i, &m) in diagrams.moment_nmm.iter().enumerate() {
            self.max_moment_nmm[i] = self.max_moment_nmm[i].max(m);
            self.min_moment_nmm[i] = self.min_moment_nmm[i].min(m);
        }
    }

    pub fn max_shear(&self) -> Option<Extremum> {
        station_max(&self.max_shear_n)
    }

    pub fn min_shear(&self) -> Option<Extremum> {
        station_min(&self.min_shear_n)
    }

    pub fn max_moment(&self) -> Option<Extremum> {
        station_max(&self.max_moment_nmm)
    }

    pub fn min_moment(&self) -> Option<Extremum> {
        station_min(&self.min_moment_nmm)
    }
}

/// The governing force of each load step, in step order.
///
/// Each entry is the largest-magnitude value (sign kept) of that step's
/// diagram; the first station wins a tie. One entry per load position, so
/// the length is `floor(span) + 1 + group span` for whole-millimetre
/// geometry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadingCharacteristic {
    pub reference_positions_mm: Vec<f64>,
    pub shear_n: Vec<f64>,
    pub moment_nmm: Vec<f64>,
}

impl LoadingCharacteristic {
    fn push(&mut self, reference_position_mm: f64, diagrams: &Diagrams) {
        let governing = |values: &[f64]| {
            first_extremum(values, |v, b| v.abs() > b.abs())
                .map(|(_, v)| v)
                .unwrap_or(0.0)
        };
        self.reference_positions_mm.push(reference_position_mm);
        self.shear_n.push(governing(&diagrams.shear_n));
        self.moment_nmm.push(governing(&diagrams.moment_nmm));
    }

    pub fn len(&self) -> usize {
        self.reference_positions_mm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference_positions_mm.is_empty()
    }

    fn locate(&self, found: Option<(usize, f64)>) -> Option<Extremum> {
        found.map(|(index, value)| Extremum {
            index,
            position_mm: self.reference_positions_mm[index],
            value,
        })
    }

    pub fn max_shear(&self) -> Option<Extremum> {
        self.locate(first_extremum(&self.shear_n, |v, b| v > b))
    }

    pub fn min_shear(&self) -> Option<Extremum> {
        self.locate(first_extremum(&self.shear_n, |v, b| v < b))
    }

    pub fn max_moment(&self) -> Option<Extremum> {
        self.locate(first_extremum(&self.moment_nmm, |v, b| v > b))
    }

    pub fn min_moment(&self) -> Option<Extremum> {
        self.locate(first_extremum(&self.moment_nmm, |v, b| v < b))
    }
}

/// Everything a sweep produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub direction: SweepDirection,
    pub envelope: Envelope,
    pub characteristic: LoadingCharacteristic,
}

impl SweepResult {
    pub fn steps(&self) -> usize {
        self.characteristic.len()
    }
}

/// Whether the envelope has been populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "direction", rename_all = "snake_case")]
pub enum BeamState {
    /// Reactions and diagrams at the current load position only
    Constructed,
    /// An envelope from a full pass in the given direction
    Swept(SweepDirection),
}

/// Where the governing forces came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceSource {
    Envelope,
    CurrentPosition,
}

/// Design forces the stress checks use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoverningForces {
    pub source: ForceSource,
    pub max_shear_n: f64,
    pub min_shear_n: f64,
    /// Larger magnitude of the two shear extremes
    pub design_shear_n: f64,
    /// Largest sagging moment, never negative
    pub positive_moment_nmm: f64,
    /// Largest hogging moment, never positive
    pub negative_moment_nmm: f64,
}

// ============================================================================
// Beam Model
// ============================================================================

/// A simple span, the load travelling over it and the section resisting it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeamModel {
    span_mm: f64,
    supports: Vec<String>,
    load: MovingLoad,
    section: Option<CompositeCrossSection>,
    settings: AnalysisSettings,
    reactions: Reactions,
    diagrams: Diagrams,
    sweep: Option<SweepResult>,
}

impl BeamModel {
    /// Build the model and evaluate it at the load's current position.
    pub fn new(
        span_mm: f64,
        supports: Vec<String>,
        mut load: MovingLoad,
        section: Option<CompositeCrossSection>,
    ) -> CalcResult<Self> {
        if !span_mm.is_finite() || span_mm <= 0.0 {
            return Err(CalcError::invalid_input(
                "span_mm",
                span_mm.to_string(),
                "Span must be positive",
            ));
        }
        if supports.len() != 2 {
            return Err(CalcError::invalid_input(
                "supports",
                format!("{:?}", supports),
                "A simple span needs exactly two supports",
            ));
        }

        load.bind_span(span_mm);
        let mut model = BeamModel {
            span_mm,
            supports,
            load,
            section,
            settings: AnalysisSettings::default(),
            reactions: Reactions {
                left_n: 0.0,
                right_n: 0.0,
            },
            diagrams: Diagrams::default(),
            sweep: None,
        };
        model.evaluate_current_position();
        Ok(model)
    }

    /// Replace the material and diaphragm settings.
    pub fn with_settings(mut self, settings: AnalysisSettings) -> CalcResult<Self> {
        settings.validate()?;
        self.settings = settings;
        Ok(self)
    }

    pub fn span_mm(&self) -> f64 {
        self.span_mm
    }

    pub fn supports(&self) -> &[String] {
        &self.supports
    }

    pub fn load(&self) -> &MovingLoad {
        &self.load
    }

    pub fn section(&self) -> Option<&CompositeCrossSection> {
        self.section.as_ref()
    }

    /// Mutable access for editing; section properties are recomputed on
    /// every query so no refresh is needed afterwards.
    pub fn section_mut(&mut self) -> Option<&mut CompositeCrossSection> {
        self.section.as_mut()
    }

    pub fn set_section(&mut self, section: CompositeCrossSection) {
        self.section = Some(section);
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn state(&self) -> BeamState {
        match &self.sweep {
            Some(result) => BeamState::Swept(result.direction),
            None => BeamState::Constructed,
        }
    }

    pub fn reactions(&self) -> Reactions {
        self.reactions
    }

    pub fn diagrams(&self) -> &Diagrams {
        &self.diagrams
    }

    pub fn sweep_result(&self) -> Option<&SweepResult> {
        self.sweep.as_ref()
    }

    /// Number of diagram stations, `floor(span) + 1`.
    pub fn station_count(&self) -> usize {
        self.span_mm.floor() as usize + 1
    }

    /// Move the load group and re-evaluate reactions and diagrams.
    ///
    /// A previous envelope is kept; it does not depend on the start position.
    pub fn set_load_position(&mut self, reference_position_mm: f64) {
        self.load.reference_position_mm = reference_position_mm;
        self.evaluate_current_position();
    }

    /// Two-support statics for a set of point loads.
    pub fn reactions_for(&self, loads: &[PointLoad]) -> Reactions {
        let pairs: Vec<(f64, f64)> = loads.iter().map(PointLoad::as_pair).collect();
        let (left_n, right_n) = point_loads_reactions(&pairs, self.span_mm);
        Reactions { left_n, right_n }
    }

    /// Shear and moment at every station for a set of point loads.
    pub fn diagrams_for(&self, loads: &[PointLoad]) -> Diagrams {
        let pairs: Vec<(f64, f64)> = loads.iter().map(PointLoad::as_pair).collect();
        let (ra, _) = point_loads_reactions(&pairs, self.span_mm);
        let stations = self.station_count();

        let mut diagrams = Diagrams {
            shear_n: Vec::with_capacity(stations),
            moment_nmm: Vec::with_capacity(stations),
        };
        for i in 0..stations {
            let x = i as f64;
            diagrams.shear_n.push(round_to_tenth(shear_at(ra, &pairs, x)));
            diagrams.moment_nmm.push(round_to_tenth(moment_at(ra, &pairs, x)));
        }
        diagrams
    }

    fn evaluate_current_position(&mut self) {
        let loads = self.load.loads_at_current_position();
        self.reactions = self.reactions_for(&loads);
        self.diagrams = self.diagrams_for(&loads);
    }

    /// Pass the load group over the span and fold every position into the
    /// envelope. A later sweep replaces the earlier result.
    pub fn sweep(&mut self, direction: SweepDirection) -> CalcResult<&SweepResult> {
        let mut envelope: Option<Envelope> = None;
        let mut characteristic = LoadingCharacteristic::default();

        for snapshot in self.load.sweep(direction)? {
            let diagrams = self.diagrams_for(&snapshot.loads);
            match envelope.as_mut() {
                Some(env) => env.absorb(&diagrams),
                None => envelope = Some(Envelope::from_diagrams(&diagrams)),
            }
            characteristic.push(snapshot.reference_position_mm, &diagrams);
        }

        let envelope = envelope.ok_or_else(|| {
            CalcError::invalid_geometry("sweep produced no load positions on the span")
        })?;

        log::info!(
            "swept {} over {} mm span in {} steps",
            direction.display_name(),
            self.span_mm,
            characteristic.len()
        );
        if let (Some(max_m), Some(max_v)) = (envelope.max_moment(), envelope.max_shear()) {
            log::debug!(
                "envelope peaks: M = {:.1} N·mm at {} mm, V = {:.1} N at {} mm",
                max_m.value,
                max_m.index,
                max_v.value,
                max_v.index
            );
        }

        let result: &SweepResult = self.sweep.insert(SweepResult {
            direction,
            envelope,
            characteristic,
        });
        Ok(result)
    }

    /// Governing shear and moment: the envelope after a sweep, otherwise
    /// the diagram at the current load position.
    pub fn governing_forces(&self) -> GoverningForces {
        let (source, max_v, min_v, max_m, min_m) = match &self.sweep {
            Some(result) => {
                let env = &result.envelope;
                (
                    ForceSource::Envelope,
                    env.max_shear(),
                    env.min_shear(),
                    env.max_moment(),
                    env.min_moment(),
                )
            }
            None => (
                ForceSource::CurrentPosition,
                station_max(&self.diagrams.shear_n),
                station_min(&self.diagrams.shear_n),
                station_max(&self.diagrams.moment_nmm),
                station_min(&self.diagrams.moment_nmm),
            ),
        };
        let value = |e: Option<Extremum>| e.map_or(0.0, |e| e.value);
        let max_shear_n = value(max_v);
        let min_shear_n = value(min_v);

        GoverningForces {
            source,
            max_shear_n,
            min_shear_n,
            design_shear_n: max_shear_n.abs().max(min_shear_n.abs()),
            positive_moment_nmm: value(max_m).max(0.0),
            negative_moment_nmm: value(min_m).min(0.0),
        }
    }

    /// The owned section, or an error naming what is missing.
    pub(crate) fn require_section(&self) -> CalcResult<&CompositeCrossSection> {
        self.section
            .as_ref()
            .ok_or_else(|| CalcError::missing_field("section"))
    }
}
