use super::runtime::Model;
use crate::registry::Named;
use crate::time_grid::{FloatValue, Time};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A snapshot of the results of a model run
///
/// Every trajectory is aligned with `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    pub time: Array1<Time>,
    pub stocks: BTreeMap<String, Array1<FloatValue>>,
    /// Reconstructed flow rates. Empty if the model hasn't been run.
    pub flows: BTreeMap<String, Array1<FloatValue>>,
}

impl<P> Model<P> {
    /// Collect the time grid, stock trajectories and flow histories
    pub fn output(&self) -> ModelOutput {
        ModelOutput {
            time: self.time_grid.values().to_owned(),
            stocks: self
                .stocks
                .iter()
                .map(|stock| (stock.name().to_string(), stock.values().to_owned()))
                .collect(),
            flows: self
                .flow_output
                .iter()
                .map(|(name, values)| (name.clone(), values.clone()))
                .collect(),
        }
    }
}
