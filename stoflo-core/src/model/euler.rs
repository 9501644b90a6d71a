//! Explicit Euler integration of the stocks and reconstruction of the flow histories.

use super::runtime::Model;
use crate::errors::{StofloError, StofloResult};
use crate::flow::StockLink;
use crate::registry::{Named, Registry};
use crate::state::StockState;
use crate::stock::Stock;
use crate::time_grid::{FloatValue, Time};
use indexmap::IndexMap;
use log::debug;
use ndarray::Array1;

/// Add `amount` to the delta of each linked stock
///
/// `into` gains the amount and `outfrom` loses it.
/// Stock names are resolved here rather than when the link is registered.
fn accumulate(
    stocks: &Registry<Stock>,
    source_name: &str,
    link: &StockLink,
    amount: FloatValue,
    deltas: &mut [FloatValue],
) -> StofloResult<()> {
    for (stock, sign) in link.targets() {
        let position = stocks.position(stock).ok_or_else(|| {
            StofloError::UnknownStockReference {
                source_name: source_name.to_string(),
                stock: stock.to_string(),
            }
        })?;
        deltas[position] += sign * amount;
    }
    Ok(())
}

/// Copy the value of every stock at `index` into the state
fn load_state(
    stocks: &Registry<Stock>,
    index: usize,
    state: &mut StockState,
) -> StofloResult<()> {
    for (position, stock) in stocks.iter().enumerate() {
        state.set(position, stock.at(index)?);
    }
    Ok(())
}

impl<P> Model<P> {
    /// Integrate the stocks and then reconstruct the flow histories
    ///
    /// This is equivalent to calling [`Model::integrate`] followed by
    /// [`Model::reconstruct_flows`].
    /// Any error aborts the run.
    /// Stock values written before the error are kept, but no flow output is available
    /// until the model is successfully run again.
    pub fn run_euler(&mut self) -> StofloResult<()> {
        let result = self.integrate().and_then(|_| self.reconstruct_flows());
        if result.is_err() {
            self.flow_output.clear();
        }
        result
    }

    /// Integrate every stock over the time grid using explicit Euler
    ///
    /// For each whole step `i` the value at `i + 1` is first seeded with the value at `i`.
    /// The step is then split into `sub_steps` equal sub-steps of length `dt / sub_steps`.
    /// Sub-step times and amounts are calculated as `x * dt / sub_steps` (multiply first),
    /// never by precomputing the sub-step length, as the two round differently.
    /// Within a sub-step:
    ///
    /// 1. the current value of every stock is captured,
    /// 2. every flow is evaluated against that captured state at the sub-step time and
    ///    every driver contributes its value from the start of the whole step,
    /// 3. the accumulated deltas are applied.
    ///
    /// All flows in a sub-step see the same state, none of them observe the deltas of another.
    ///
    /// Errors are returned as soon as they are encountered.
    /// There is no rollback so stocks may be partially updated.
    pub fn integrate(&mut self) -> StofloResult<()> {
        let n_times = self.time_grid.len();
        let dt = self.time_grid.step();
        let sub_steps = self.time_grid.sub_steps();
        let n = sub_steps as Time;
        debug!(
            "Integrating {} stocks with {} flows and {} drivers over {} time points ({} sub-steps)",
            self.stocks.len(),
            self.flows.len(),
            self.drivers.len(),
            n_times,
            sub_steps
        );

        let mut state = StockState::with_names(self.stocks.names());
        let mut deltas = vec![0.0; self.stocks.len()];

        for index in 0..n_times - 1 {
            let t_start = self.time_grid.values()[index];

            for stock in self.stocks.iter_mut() {
                let value = stock.at(index)?;
                stock.set(index + 1, value)?;
            }

            for iteration in 0..sub_steps {
                let t: Time = t_start + iteration as Time * dt / n;

                load_state(&self.stocks, index + 1, &mut state)?;
                deltas.fill(0.0);

                for flow in self.flows.iter() {
                    let rate = flow.rate(t, &state, &self.parameters)?;
                    accumulate(
                        &self.stocks,
                        flow.name(),
                        flow.link(),
                        rate * dt / n,
                        &mut deltas,
                    )?;
                }

                for driver in self.drivers.iter() {
                    if !driver.link().is_linked() {
                        continue;
                    }
                    let value = driver.at(index)?;
                    accumulate(
                        &self.stocks,
                        driver.name(),
                        driver.link(),
                        value * dt / n,
                        &mut deltas,
                    )?;
                }

                for (position, stock) in self.stocks.iter_mut().enumerate() {
                    stock.set(index + 1, state.at(position) + deltas[position])?;
                }
            }
        }

        Ok(())
    }

    /// Recalculate the rate of every flow at each time point
    ///
    /// Each rate function is called again using the integrated stock values at every whole step.
    /// The rates calculated during integration are not reused, so a rate function that isn't
    /// pure may report a history that differs from what was integrated.
    ///
    /// The previous flow output is only replaced if every flow succeeds.
    pub fn reconstruct_flows(&mut self) -> StofloResult<()> {
        let times = self.time_grid.values();
        let mut state = StockState::with_names(self.stocks.names());
        let mut output = IndexMap::with_capacity(self.flows.len());

        for flow in self.flows.iter() {
            let mut rates = Array1::zeros(times.len());
            for (index, &t) in times.iter().enumerate() {
                load_state(&self.stocks, index, &mut state)?;
                rates[index] = flow.rate(t, &state, &self.parameters)?;
            }
            output.insert(flow.name().to_string(), rates);
        }

        debug!("Reconstructed {} flow histories", output.len());
        self.flow_output = output;
        Ok(())
    }
}
