use crate::errors::{StofloError, StofloResult};
use crate::registry::Named;
use crate::time_grid::FloatValue;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// A named quantity that accumulates over time
///
/// The trajectory is index-aligned with the time grid that was active when the stock was added.
/// Only the initial value is known up front, the remaining values are zero until the model is
/// integrated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    name: String,
    values: Array1<FloatValue>,
}

impl Stock {
    /// Create a stock with `len` values
    ///
    /// `len` is the length of a time grid, which is never zero.
    pub(crate) fn new(name: String, initial: FloatValue, len: usize) -> Self {
        let mut values = Array1::zeros(len);
        values[0] = initial;
        Self { name, values }
    }

    pub fn initial(&self) -> FloatValue {
        self.values[0]
    }

    pub fn values(&self) -> ArrayView1<'_, FloatValue> {
        self.values.view()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false as a stock holds at least its initial value
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn at(&self, index: usize) -> StofloResult<FloatValue> {
        self.values
            .get(index)
            .copied()
            .ok_or_else(|| self.out_of_range(index))
    }

    pub(crate) fn set(&mut self, index: usize, value: FloatValue) -> StofloResult<()> {
        if index >= self.values.len() {
            return Err(self.out_of_range(index));
        }
        self.values[index] = value;
        Ok(())
    }

    fn out_of_range(&self, index: usize) -> StofloError {
        StofloError::DimensionMismatch {
            name: self.name.clone(),
            index,
            len: self.values.len(),
        }
    }
}

impl Named for Stock {
    fn name(&self) -> &str {
        &self.name
    }
}
