mod assumptions;
mod input;
mod result;

pub use assumptions::{
    AssumptionsError, BaselineMode, CareSetting, CostRange, InpatientCosts, MAX_AMOUNT,
    ModelAssumptions, OutpatientCosts, Payer, ReimbursementTable,
};
pub use input::{CalculationInput, InputError};
pub use result::CalculationResult;
