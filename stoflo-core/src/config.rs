//! Model configuration files
//!
//! A configuration describes the time grid, the initial value of each stock and any drivers.
//! Flows are code and are always added to a [`Model`](crate::model::Model) directly.
//!
//! ```toml
//! [time]
//! step = 0.5
//! stop = 10.0
//! sub_steps = 4
//!
//! [stocks]
//! Reservoir = 100.0
//!
//! [drivers.Inflow]
//! values = [1.0, 1.0, 2.0]
//! into = "Reservoir"
//! ```

use crate::errors::StofloResult;
use crate::flow::StockLink;
use crate::time_grid::{FloatValue, TimeGridConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    pub values: Vec<FloatValue>,
    #[serde(default)]
    pub into: Option<String>,
    #[serde(default)]
    pub outfrom: Option<String>,
}

impl DriverConfig {
    pub fn link(&self) -> StockLink {
        StockLink::new(self.into.clone(), self.outfrom.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    #[serde(default)]
    pub time: TimeGridConfig,
    /// Initial value of each stock
    #[serde(default)]
    pub stocks: BTreeMap<String, FloatValue>,
    #[serde(default)]
    pub drivers: BTreeMap<String, DriverConfig>,
}

impl ModelConfig {
    pub fn from_toml(contents: &str) -> StofloResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> StofloResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }
}
