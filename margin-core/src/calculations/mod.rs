//! Margin calculations for the outpatient shift estimator.

pub mod common;
pub mod margin;

pub use margin::{MarginCalculator, MarginError, compute};
