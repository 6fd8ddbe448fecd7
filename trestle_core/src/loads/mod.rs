//! # Loads
//!
//! Point loads and the moving wheel group that is swept across the span.
//!
//! - [`PointLoad`] - A concentrated force at a position
//! - [`MovingLoad`] - A wheel group positioned by a single reference
//! - [`Sweep`] - Lazy sequence of [`LoadSnapshot`]s across the span

pub mod moving_load;

pub use moving_load::{
    LoadSnapshot,
    MovingLoad,
    PointLoad,
    Sweep,
    SweepDirection,
    WheelWeights,
    STANDARD_TRAIN_WEIGHT_N,
    STANDARD_WHEEL_SPACINGS_MM,
    SWEEP_STEP_MM,
};
