//! Tests for the model module.
//!
//! These cover model configuration, the Euler integration and flow reconstruction,
//! and how errors surface during a run.

#[cfg(test)]
mod basic;
