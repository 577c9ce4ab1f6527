//! Presentation glue between the command line and the calculator.

use chrono::{DateTime, Local};
use margin_core::{
    CalculationInput, CalculationResult, MarginCalculator, MarginError, ModelAssumptions,
};
use margin_data::Scenario;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use crate::export::Report;
use crate::utils::{format_currency, format_range};

pub const HEADLINE_TITLE: &str = "Estimated Annual Financial Improvement";

/// `"$3,225,000 to $7,350,000"`
pub fn headline(result: &CalculationResult) -> String {
    format_range(result.improvement_low, result.improvement_high)
}

/// `"Based on shifting 375 of 500 patients to outpatient care."`
pub fn context_line(result: &CalculationResult) -> String {
    format!(
        "Based on shifting {} of {} patients to outpatient care.",
        result.shifted_patients, result.patient_volume
    )
}

pub fn fee_note(implementation_fee: Decimal) -> String {
    format!(
        "Includes amortized {} implementation fee and updated inpatient cost realism.",
        format_currency(implementation_fee)
    )
}

/// One row of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub label: String,
    pub report: Report,
}

/// Owns the calculator for the lifetime of a command and turns results
/// into reports.
#[derive(Debug, Clone)]
pub struct Estimator {
    calculator: MarginCalculator,
}

impl Estimator {
    pub fn new(assumptions: ModelAssumptions) -> Result<Self, MarginError> {
        Ok(Self {
            calculator: MarginCalculator::new(assumptions)?,
        })
    }

    pub fn assumptions(&self) -> &ModelAssumptions {
        self.calculator.assumptions()
    }

    /// Runs one calculation and wraps it in a report stamped `generated_at`.
    pub fn estimate(
        &self,
        input: &CalculationInput,
        generated_at: DateTime<Local>,
    ) -> Result<Report, MarginError> {
        let result = self.calculator.compute(input)?;
        info!(
            low = %result.improvement_low,
            high = %result.improvement_high,
            shifted = result.shifted_patients,
            "estimate complete"
        );

        Ok(Report::new(
            input.clone(),
            result,
            self.assumptions().outpatient.implementation_fee,
            generated_at,
        ))
    }

    /// Runs every scenario, failing on the first calculator error.
    pub fn estimate_batch(
        &self,
        scenarios: &[Scenario],
        generated_at: DateTime<Local>,
    ) -> Result<Vec<BatchEntry>, MarginError> {
        debug!(count = scenarios.len(), "running scenario batch");

        scenarios
            .iter()
            .enumerate()
            .map(|(idx, scenario)| {
                let report = self.estimate(&scenario.input, generated_at)?;
                Ok(BatchEntry {
                    label: scenario.label(idx + 1),
                    report,
                })
            })
            .collect()
    }
}
