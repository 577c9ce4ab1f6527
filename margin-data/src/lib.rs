mod assumptions;
mod scenarios;

pub use assumptions::{AssumptionsLoadError, AssumptionsLoader};
pub use scenarios::{Scenario, ScenarioLoadError, ScenarioLoader};
