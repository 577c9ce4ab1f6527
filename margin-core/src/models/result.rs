use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Output of a single margin calculation. All amounts are in dollars,
/// rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Lower bound of the annual margin improvement. Never above `improvement_high`.
    pub improvement_low: Decimal,
    pub improvement_high: Decimal,

    /// Patients moved to outpatient care, truncated to a whole count.
    pub shifted_patients: u32,
    pub patient_volume: u32,

    pub blended_inpatient_reimbursement: Decimal,
    pub blended_outpatient_reimbursement: Decimal,

    /// Per-patient inpatient margin under the high-cost bound.
    pub inpatient_margin_low: Decimal,
    /// Per-patient inpatient margin under the low-cost bound.
    pub inpatient_margin_high: Decimal,
    /// Per-patient outpatient margin after the amortized implementation fee.
    pub outpatient_margin: Decimal,

    /// Annual margin with no patients shifted, at the average inpatient margin.
    ///
    /// In [`BaselineMode::MatchedBound`](crate::models::BaselineMode::MatchedBound)
    /// each bound is measured against its own all-inpatient total instead, so
    /// this figure is informational there.
    pub baseline_margin: Decimal,
}

impl CalculationResult {
    /// Mean of the two per-patient inpatient margins.
    pub fn average_inpatient_margin(&self) -> Decimal {
        (self.inpatient_margin_low + self.inpatient_margin_high) / Decimal::TWO
    }

    /// Centre of the improvement range.
    pub fn improvement_midpoint(&self) -> Decimal {
        (self.improvement_low + self.improvement_high) / Decimal::TWO
    }

    /// Width of the improvement range; zero when the bounds coincide.
    pub fn improvement_spread(&self) -> Decimal {
        self.improvement_high - self.improvement_low
    }
}
