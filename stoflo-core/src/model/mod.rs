//! A model is a set of stocks that are integrated together over a common time grid.
//!
//! Stocks change due to flows, whose rates are calculated from the current state of the model,
//! and drivers, whose rates are prescribed ahead of time.
//! The model is advanced with an explicit (forward) Euler scheme where each whole step may be
//! split into several equal sub-steps.
//! Only the values at whole steps are kept.
//!
//! Once the stocks have been integrated, the rate of every flow is recalculated at each saved
//! time point so that flows can be reported alongside the stocks.

mod euler;
mod graph;
mod output;
mod runtime;
mod validation;

#[cfg(test)]
mod tests;

pub use output::ModelOutput;
pub use runtime::Model;
