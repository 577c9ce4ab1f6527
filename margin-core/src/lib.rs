pub mod calculations;
pub mod models;

pub use calculations::{MarginCalculator, MarginError, compute};
pub use models::*;
