use crate::errors::{StofloError, StofloResult};
use crate::time_grid::FloatValue;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::ops::Index;

/// The value of every stock at a single point in time
///
/// This is the view of the model that is passed to rate functions.
/// It behaves like a read-only map from stock name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockState {
    values: IndexMap<String, FloatValue>,
}

impl StockState {
    /// Create a state for the given stocks with every value set to zero
    pub(crate) fn with_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        names
            .into_iter()
            .map(|name| (name.to_string(), 0.0))
            .collect()
    }

    /// Overwrite the value at a position
    ///
    /// Positions follow the order that the names were provided in.
    pub(crate) fn set(&mut self, position: usize, value: FloatValue) {
        self.values[position] = value;
    }

    pub(crate) fn at(&self, position: usize) -> FloatValue {
        self.values[position]
    }

    /// Get the value of a stock
    pub fn get(&self, name: &str) -> Option<FloatValue> {
        self.values.get(name).copied()
    }

    /// Get the value of a stock
    ///
    /// Returns an error if the stock doesn't exist.
    /// This is the preferred way of reading stocks inside fallible rate functions.
    pub fn value(&self, name: &str) -> StofloResult<FloatValue> {
        self.get(name)
            .ok_or_else(|| StofloError::UnknownStock(name.to_string()))
    }

    /// Test if the state contains a stock with the given name
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FloatValue)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
    }

    /// Converts the state into an equivalent hashmap
    pub fn to_hashmap(&self) -> HashMap<String, FloatValue> {
        self.iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

impl FromIterator<(String, FloatValue)> for StockState {
    fn from_iter<T: IntoIterator<Item = (String, FloatValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Index<&str> for StockState {
    type Output = FloatValue;

    /// # Panics
    /// Panics if the stock is not found in the state.
    fn index(&self, name: &str) -> &Self::Output {
        self.values
            .get(name)
            .unwrap_or_else(|| panic!("No stock named '{}'", name))
    }
}
