//! The discretised time axis that all trajectories are aligned with.

use crate::errors::{StofloError, StofloResult};
use ndarray::{Array, Array1, ArrayView1};
use serde::{Deserialize, Serialize};

pub type Time = f64;
pub type FloatValue = f64;

/// Settings that define a [`TimeGrid`].
///
/// This is the serialised form of a grid.
/// The time values themselves are never stored and are regenerated when a grid is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeGridConfig {
    /// Length of a whole step
    pub step: Time,
    /// Nominal end of the grid
    pub stop: Time,
    #[serde(default)]
    pub start: Time,
    /// Number of equal sub-steps used to integrate each whole step
    #[serde(default = "default_sub_steps")]
    pub sub_steps: usize,
}

fn default_sub_steps() -> usize {
    1
}

impl Default for TimeGridConfig {
    fn default() -> Self {
        Self {
            step: 1.0,
            stop: 20.0,
            start: 0.0,
            sub_steps: 1,
        }
    }
}

/// An evenly spaced sequence of time points.
///
/// The points are generated as `start, start + step, ...` up to, but not including, `stop + step`.
/// Floating point rounding in that bound can add a point past `stop`,
/// e.g. a step of 0.1 with a stop of 0.2 yields four points ending at 0.30000000000000004.
/// A negative step produces a descending grid.
/// This matches `numpy.arange(start, stop + step, step)` and is relied upon by existing
/// configurations so it must not be "corrected".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TimeGridConfig", into = "TimeGridConfig")]
pub struct TimeGrid {
    start: Time,
    stop: Time,
    step: Time,
    sub_steps: usize,
    values: Array1<Time>,
}

impl TimeGrid {
    /// Build a grid
    ///
    /// Returns an error if any of the settings isn't finite, `step` is zero, `sub_steps` is zero
    /// or no points would be generated (e.g. `stop` is before `start` for a positive step).
    pub fn new(step: Time, stop: Time, start: Time, sub_steps: usize) -> StofloResult<Self> {
        if !step.is_finite() || step == 0.0 {
            return Err(StofloError::InvalidTimeGrid(format!(
                "step must be a non-zero finite number, got {}",
                step
            )));
        }
        if !start.is_finite() || !stop.is_finite() {
            return Err(StofloError::InvalidTimeGrid(format!(
                "start and stop must be finite, got start={} stop={}",
                start, stop
            )));
        }
        if sub_steps == 0 {
            return Err(StofloError::InvalidTimeGrid(
                "at least one sub-step is required".to_string(),
            ));
        }

        // Same length calculation as `Array::range`
        let end = stop + step;
        let n_points = ((end - start) / step).ceil();
        if !n_points.is_finite() || n_points < 1.0 {
            return Err(StofloError::InvalidTimeGrid(format!(
                "no time points between start={} and stop={} with step={}",
                start, stop, step
            )));
        }

        Ok(Self {
            start,
            stop,
            step,
            sub_steps,
            values: Array::range(start, end, step),
        })
    }

    /// A grid starting at zero without any sub-stepping
    pub fn from_step(step: Time, stop: Time) -> StofloResult<Self> {
        Self::new(step, stop, 0.0, 1)
    }

    pub fn start(&self) -> Time {
        self.start
    }

    pub fn stop(&self) -> Time {
        self.stop
    }

    /// Length of a whole step (`dt`)
    pub fn step(&self) -> Time {
        self.step
    }

    pub fn sub_steps(&self) -> usize {
        self.sub_steps
    }

    /// Number of time points (`nt`)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false as a valid grid contains at least one point
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> ArrayView1<'_, Time> {
        self.values.view()
    }

    /// Get the time at a given index
    pub fn at(&self, index: usize) -> Option<Time> {
        self.values.get(index).copied()
    }

    pub fn config(&self) -> TimeGridConfig {
        TimeGridConfig {
            step: self.step,
            stop: self.stop,
            start: self.start,
            sub_steps: self.sub_steps,
        }
    }
}

impl Default for TimeGrid {
    /// 21 yearly points from 0 to 20
    fn default() -> Self {
        let config = TimeGridConfig::default();
        Self {
            values: Array::range(config.start, config.stop + config.step, config.step),
            start: config.start,
            stop: config.stop,
            step: config.step,
            sub_steps: config.sub_steps,
        }
    }
}

impl TryFrom<TimeGridConfig> for TimeGrid {
    type Error = StofloError;

    fn try_from(config: TimeGridConfig) -> Result<Self, Self::Error> {
        Self::new(config.step, config.stop, config.start, config.sub_steps)
    }
}

impl From<TimeGrid> for TimeGridConfig {
    fn from(value: TimeGrid) -> Self {
        value.config()
    }
}
