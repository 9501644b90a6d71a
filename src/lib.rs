//! A minimal stock-and-flow system dynamics simulator.
//!
//! The engine lives in [`stoflo_core`], this crate re-exports it and builds the Python extension.

pub use stoflo_core::*;

#[cfg(feature = "python")]
mod python;
