use crate::errors::{StofloError, StofloResult};
use crate::flow::StockLink;
use crate::registry::Named;
use crate::time_grid::FloatValue;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// An externally prescribed rate
///
/// Drivers behave like flows whose rate has been computed ahead of time.
/// The value at index `i` applies to the whole step starting at `t[i]`,
/// including every sub-step within it.
///
/// The series should contain at least as many values as the time grid.
/// This is not checked when the driver is added, a short series fails when the missing
/// value is first needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    name: String,
    values: Array1<FloatValue>,
    link: StockLink,
}

impl Driver {
    pub fn new(
        name: impl Into<String>,
        values: impl Into<Array1<FloatValue>>,
        link: StockLink,
    ) -> Self {
        Self {
            name: name.into(),
            values: values.into(),
            link,
        }
    }

    pub fn values(&self) -> ArrayView1<'_, FloatValue> {
        self.values.view()
    }

    pub fn link(&self) -> &StockLink {
        &self.link
    }

    /// Value of the series at a whole time step
    pub fn at(&self, index: usize) -> StofloResult<FloatValue> {
        self.values
            .get(index)
            .copied()
            .ok_or_else(|| StofloError::DimensionMismatch {
                name: self.name.clone(),
                index,
                len: self.values.len(),
            })
    }
}

impl Named for Driver {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_values() {
        let driver = Driver::new(
            "Rainfall",
            vec![1.0, 2.0, 3.0],
            StockLink::inflow_to("Soil moisture"),
        );

        assert_eq!(driver.at(2).unwrap(), 3.0);
        assert_eq!(driver.link().into_stock(), Some("Soil moisture"));
        assert!(matches!(
            driver.at(3),
            Err(StofloError::DimensionMismatch { index: 3, len: 3, .. })
        ));
    }
}
