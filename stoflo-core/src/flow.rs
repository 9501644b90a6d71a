//! Flows move quantity between stocks at a rate calculated by a user supplied function.

use crate::errors::{StofloError, StofloResult};
use crate::registry::Named;
use crate::state::StockState;
use crate::time_grid::{FloatValue, Time};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Error returned by a fallible rate function
pub type RateError = Box<dyn std::error::Error + Send + Sync>;

/// The stocks that a flow or driver is connected to
///
/// A positive rate is added to `into` and removed from `outfrom`.
/// Either end may be absent, in which case the quantity comes from (or goes to) outside
/// of the model.
/// The stocks are referenced by name and are only resolved during integration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockLink {
    #[serde(default)]
    pub into: Option<String>,
    #[serde(default)]
    pub outfrom: Option<String>,
}

impl StockLink {
    pub fn new(into: Option<String>, outfrom: Option<String>) -> Self {
        Self { into, outfrom }
    }

    /// Not connected to any stock
    ///
    /// Useful for diagnostic rates which are only reported as output.
    pub fn unlinked() -> Self {
        Self::default()
    }

    pub fn inflow_to(stock: impl Into<String>) -> Self {
        Self {
            into: Some(stock.into()),
            outfrom: None,
        }
    }

    pub fn outflow_from(stock: impl Into<String>) -> Self {
        Self {
            into: None,
            outfrom: Some(stock.into()),
        }
    }

    /// Moves quantity from `outfrom` to `into`
    pub fn transfer(outfrom: impl Into<String>, into: impl Into<String>) -> Self {
        Self {
            into: Some(into.into()),
            outfrom: Some(outfrom.into()),
        }
    }

    pub fn into_stock(&self) -> Option<&str> {
        self.into.as_deref()
    }

    pub fn outfrom_stock(&self) -> Option<&str> {
        self.outfrom.as_deref()
    }

    pub fn is_linked(&self) -> bool {
        self.into.is_some() || self.outfrom.is_some()
    }

    /// Iterate over the linked stocks with the sign applied to a positive rate
    pub(crate) fn targets(&self) -> impl Iterator<Item = (&str, FloatValue)> {
        self.into_stock()
            .map(|stock| (stock, 1.0))
            .into_iter()
            .chain(self.outfrom_stock().map(|stock| (stock, -1.0)))
    }
}

/// Calculates the rate of a flow
///
/// Rate functions receive the time being evaluated, the value of every stock at that time and
/// the model parameters.
/// They are called once per flow for every sub-step during integration and then again for every
/// saved time point when the flow history is reconstructed, so they should not depend on how
/// often they are called.
///
/// Any closure with the signature `Fn(Time, &StockState, &P) -> R` implements this trait
/// where `R` is either a [`FloatValue`] or a `Result<FloatValue, E>`.
pub trait RateFunction<P>: Send + Sync {
    fn rate(
        &self,
        t: Time,
        stocks: &StockState,
        parameters: &P,
    ) -> Result<FloatValue, RateError>;
}

/// Values that can be returned from a rate closure
pub trait RateOutput {
    fn into_rate(self) -> Result<FloatValue, RateError>;
}

impl RateOutput for FloatValue {
    fn into_rate(self) -> Result<FloatValue, RateError> {
        Ok(self)
    }
}

impl<E> RateOutput for Result<FloatValue, E>
where
    E: Into<RateError>,
{
    fn into_rate(self) -> Result<FloatValue, RateError> {
        self.map_err(Into::into)
    }
}

impl<P, F, R> RateFunction<P> for F
where
    F: Fn(Time, &StockState, &P) -> R + Send + Sync,
    R: RateOutput,
{
    fn rate(
        &self,
        t: Time,
        stocks: &StockState,
        parameters: &P,
    ) -> Result<FloatValue, RateError> {
        self(t, stocks, parameters).into_rate()
    }
}

/// A named rate between up to two stocks
///
/// Flows can't be modified after they are created.
pub struct Flow<P> {
    name: String,
    rate: Arc<dyn RateFunction<P>>,
    link: StockLink,
}

impl<P> Flow<P> {
    pub fn new(
        name: impl Into<String>,
        rate: impl RateFunction<P> + 'static,
        link: StockLink,
    ) -> Self {
        Self {
            name: name.into(),
            rate: Arc::new(rate),
            link,
        }
    }

    pub fn link(&self) -> &StockLink {
        &self.link
    }

    /// Evaluate the rate function
    ///
    /// Any error from the rate function is returned as a
    /// [`StofloError::RateFunctionFailure`] with the original error as its source.
    pub fn rate(
        &self,
        t: Time,
        stocks: &StockState,
        parameters: &P,
    ) -> StofloResult<FloatValue> {
        self.rate
            .rate(t, stocks, parameters)
            .map_err(|source| StofloError::RateFunctionFailure {
                flow: self.name.clone(),
                time: t,
                source,
            })
    }
}

impl<P> Clone for Flow<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            rate: Arc::clone(&self.rate),
            link: self.link.clone(),
        }
    }
}

impl<P> Debug for Flow<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flow")
            .field("name", &self.name)
            .field("link", &self.link)
            .finish_non_exhaustive()
    }
}

impl<P> Named for Flow<P> {
    fn name(&self) -> &str {
        &self.name
    }
}
