//! The assumption set behind the margin model.
//!
//! Every dollar constant the calculator uses lives here. [`ModelAssumptions::default`]
//! returns the reference CAR-T figures:
//!
//! | Item | Amount |
//! |------|--------|
//! | Drug acquisition | $373,000 |
//! | Medicare inpatient / outpatient | $450,000 / $430,000 |
//! | Commercial inpatient / outpatient | $550,000 / $500,000 |
//! | NTAP bonus (inpatient only) | $186,500 |
//! | Outpatient monitoring | $450/day over 15 days |
//! | Outpatient ancillary services | $15,000 |
//! | Implementation fee (one time) | $75,000 |
//! | Inpatient facility | $18,000 - $28,000 |
//! | Inpatient staffing | $25,000 - $38,000 |
//! | Inpatient ancillary services | $10,000 - $20,000 |
//! | Readmission (at a rate of 1.0) | $10,000 |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest dollar amount accepted anywhere in an assumption set.
///
/// Bounding every amount keeps annual totals for any `u32` patient volume
/// well inside the range of [`Decimal`].
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Errors raised when an assumption set cannot be priced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssumptionsError {
    /// A dollar amount that must be non-negative was negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    /// A dollar amount above [`MAX_AMOUNT`].
    #[error("{field} must not exceed {limit}, got {value}")]
    AmountTooLarge {
        field: &'static str,
        value: Decimal,
        limit: Decimal,
    },

    /// A cost range whose lower bound exceeds its upper bound.
    #[error("{field} range is inverted: low {low} is above high {high}")]
    InvertedRange {
        field: &'static str,
        low: Decimal,
        high: Decimal,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payer {
    Medicare,
    Commercial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareSetting {
    Inpatient,
    Outpatient,
}

/// Per-episode reimbursement by payer and care setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReimbursementTable {
    pub medicare_inpatient: Decimal,
    pub medicare_outpatient: Decimal,
    pub commercial_inpatient: Decimal,
    pub commercial_outpatient: Decimal,
}

impl Default for ReimbursementTable {
    fn default() -> Self {
        Self {
            medicare_inpatient: Decimal::from(450_000),
            medicare_outpatient: Decimal::from(430_000),
            commercial_inpatient: Decimal::from(550_000),
            commercial_outpatient: Decimal::from(500_000),
        }
    }
}

impl ReimbursementTable {
    pub fn rate(
        &self,
        payer: Payer,
        setting: CareSetting,
    ) -> Decimal {
        match (payer, setting) {
            (Payer::Medicare, CareSetting::Inpatient) => self.medicare_inpatient,
            (Payer::Medicare, CareSetting::Outpatient) => self.medicare_outpatient,
            (Payer::Commercial, CareSetting::Inpatient) => self.commercial_inpatient,
            (Payer::Commercial, CareSetting::Outpatient) => self.commercial_outpatient,
        }
    }

    /// Returns a copy with `bonus` added to both inpatient entries.
    pub fn with_inpatient_bonus(
        &self,
        bonus: Decimal,
    ) -> Self {
        Self {
            medicare_inpatient: self.medicare_inpatient + bonus,
            commercial_inpatient: self.commercial_inpatient + bonus,
            ..self.clone()
        }
    }

    /// Weighted reimbursement for `setting` given the Medicare share of the
    /// payer mix (0 to 1). The remainder is commercial.
    pub fn blended(
        &self,
        setting: CareSetting,
        medicare_share: Decimal,
    ) -> Decimal {
        let commercial_share = Decimal::ONE - medicare_share;
        commercial_share * self.rate(Payer::Commercial, setting)
            + medicare_share * self.rate(Payer::Medicare, setting)
    }

    fn validate(&self) -> Result<(), AssumptionsError> {
        amount("reimbursement.medicare_inpatient", self.medicare_inpatient)?;
        amount("reimbursement.medicare_outpatient", self.medicare_outpatient)?;
        amount("reimbursement.commercial_inpatient", self.commercial_inpatient)?;
        amount("reimbursement.commercial_outpatient", self.commercial_outpatient)
    }
}

/// A cost component known only within bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CostRange {
    pub low: Decimal,
    pub high: Decimal,
}

impl CostRange {
    pub fn new(
        low: Decimal,
        high: Decimal,
    ) -> Self {
        Self { low, high }
    }

    /// A range with no uncertainty.
    pub fn point(value: Decimal) -> Self {
        Self {
            low: value,
            high: value,
        }
    }

    fn validate(
        &self,
        field: &'static str,
    ) -> Result<(), AssumptionsError> {
        amount(field, self.low)?;
        if self.low > self.high {
            return Err(AssumptionsError::InvertedRange {
                field,
                low: self.low,
                high: self.high,
            });
        }
        amount(field, self.high)
    }
}

impl std::ops::Add for CostRange {
    type Output = CostRange;

    fn add(
        self,
        rhs: CostRange,
    ) -> CostRange {
        CostRange {
            low: self.low + rhs.low,
            high: self.high + rhs.high,
        }
    }
}

/// Cost components of the outpatient pathway, excluding the drug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutpatientCosts {
    /// Remote monitoring cost per day.
    pub monitoring_per_diem: Decimal,
    /// Length of the post-infusion monitoring window.
    pub monitoring_days: u32,
    /// Flat ancillary services cost per episode.
    pub ancillary_services: Decimal,
    /// One-time program cost, spread across the annual patient volume.
    pub implementation_fee: Decimal,
}

impl Default for OutpatientCosts {
    fn default() -> Self {
        Self {
            monitoring_per_diem: Decimal::from(450),
            monitoring_days: 15,
            ancillary_services: Decimal::from(15_000),
            implementation_fee: Decimal::from(75_000),
        }
    }
}

impl OutpatientCosts {
    pub fn monitoring_cost(&self) -> Decimal {
        self.monitoring_per_diem * Decimal::from(self.monitoring_days)
    }
}

/// Cost components of an inpatient episode, excluding the drug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InpatientCosts {
    pub facility: CostRange,
    pub staffing: CostRange,
    pub ancillary_services: CostRange,
    /// Cost of readmissions per episode at a readmission rate of 1.0.
    pub readmission_cost: Decimal,
}

impl Default for InpatientCosts {
    fn default() -> Self {
        Self {
            facility: CostRange::new(Decimal::from(18_000), Decimal::from(28_000)),
            staffing: CostRange::new(Decimal::from(25_000), Decimal::from(38_000)),
            ancillary_services: CostRange::new(Decimal::from(10_000), Decimal::from(20_000)),
            readmission_cost: Decimal::from(10_000),
        }
    }
}

impl InpatientCosts {
    /// Facility, staffing and ancillary ranges summed bound by bound.
    pub fn component_total(&self) -> CostRange {
        self.facility + self.staffing + self.ancillary_services
    }
}

/// What the post-shift totals are compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineMode {
    /// All volume treated inpatient at the average of the two inpatient
    /// margins. The range stays open even when nothing is shifted, since it
    /// carries the inpatient cost uncertainty.
    #[default]
    AverageInpatient,

    /// Each bound compared against the all-inpatient total under the same
    /// cost bound. No shift means no improvement at either bound.
    MatchedBound,
}

/// The complete, immutable set of constants the calculator prices with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelAssumptions {
    /// Drug acquisition cost, identical in both care settings.
    pub drug_acquisition_cost: Decimal,
    pub reimbursement: ReimbursementTable,
    /// New-technology add-on payment added to inpatient reimbursement.
    pub ntap_bonus: Decimal,
    pub outpatient: OutpatientCosts,
    pub inpatient: InpatientCosts,
    pub baseline: BaselineMode,
}

impl Default for ModelAssumptions {
    fn default() -> Self {
        Self {
            drug_acquisition_cost: Decimal::from(373_000),
            reimbursement: ReimbursementTable::default(),
            ntap_bonus: Decimal::from(186_500),
            outpatient: OutpatientCosts::default(),
            inpatient: InpatientCosts::default(),
            baseline: BaselineMode::default(),
        }
    }
}

impl ModelAssumptions {
    /// Validates every amount in the assumption set.
    ///
    /// # Errors
    ///
    /// Returns [`AssumptionsError`] if:
    /// - any dollar amount is negative or above [`MAX_AMOUNT`]
    /// - the outpatient monitoring cost (per diem times days) is above [`MAX_AMOUNT`]
    /// - any inpatient cost range has `low > high`
    ///
    /// # Example
    ///
    /// ```
    /// use margin_core::{AssumptionsError, CostRange, ModelAssumptions};
    /// use rust_decimal_macros::dec;
    ///
    /// let mut assumptions = ModelAssumptions::default();
    /// assumptions.inpatient.staffing = CostRange::new(dec!(40000), dec!(30000));
    ///
    /// assert_eq!(
    ///     assumptions.validate(),
    ///     Err(AssumptionsError::InvertedRange {
    ///         field: "inpatient.staffing",
    ///         low: dec!(40000),
    ///         high: dec!(30000),
    ///     })
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), AssumptionsError> {
        amount("drug_acquisition_cost", self.drug_acquisition_cost)?;
        self.reimbursement.validate()?;
        amount("ntap_bonus", self.ntap_bonus)?;

        amount("outpatient.monitoring_per_diem", self.outpatient.monitoring_per_diem)?;
        amount("outpatient.monitoring_cost", self.outpatient.monitoring_cost())?;
        amount("outpatient.ancillary_services", self.outpatient.ancillary_services)?;
        amount("outpatient.implementation_fee", self.outpatient.implementation_fee)?;

        self.inpatient.facility.validate("inpatient.facility")?;
        self.inpatient.staffing.validate("inpatient.staffing")?;
        self.inpatient
            .ancillary_services
            .validate("inpatient.ancillary_services")?;
        amount("inpatient.readmission_cost", self.inpatient.readmission_cost)
    }
}

/// Checks that `value` lies in `[0, MAX_AMOUNT]`.
fn amount(
    field: &'static str,
    value: Decimal,
) -> Result<(), AssumptionsError> {
    if value < Decimal::ZERO {
        return Err(AssumptionsError::NegativeAmount { field, value });
    }
    if value > MAX_AMOUNT {
        return Err(AssumptionsError::AmountTooLarge {
            field,
            value,
            limit: MAX_AMOUNT,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_assumptions_are_valid() {
        assert_eq!(ModelAssumptions::default().validate(), Ok(()));
    }

    #[test]
    fn rate_looks_up_each_cell() {
        let table = ReimbursementTable::default();

        assert_eq!(table.rate(Payer::Medicare, CareSetting::Inpatient), dec!(450000));
        assert_eq!(table.rate(Payer::Medicare, CareSetting::Outpatient), dec!(430000));
        assert_eq!(table.rate(Payer::Commercial, CareSetting::Inpatient), dec!(550000));
        assert_eq!(table.rate(Payer::Commercial, CareSetting::Outpatient), dec!(500000));
    }

    #[test]
    fn blended_weights_by_medicare_share() {
        let table = ReimbursementTable::default();

        assert_eq!(table.blended(CareSetting::Inpatient, dec!(0.5)), dec!(500000));
        assert_eq!(table.blended(CareSetting::Outpatient, dec!(0.5)), dec!(465000));
    }

    #[test]
    fn blended_all_commercial_uses_commercial_rate() {
        let table = ReimbursementTable::default();

        assert_eq!(table.blended(CareSetting::Inpatient, Decimal::ZERO), dec!(550000));
    }

    #[test]
    fn blended_all_medicare_uses_medicare_rate() {
        let table = ReimbursementTable::default();

        assert_eq!(table.blended(CareSetting::Outpatient, Decimal::ONE), dec!(430000));
    }

    #[test]
    fn inpatient_bonus_leaves_outpatient_untouched() {
        let table = ReimbursementTable::default().with_inpatient_bonus(dec!(1000));

        assert_eq!(table.medicare_inpatient, dec!(451000));
        assert_eq!(table.commercial_inpatient, dec!(551000));
        assert_eq!(table.medicare_outpatient, dec!(430000));
        assert_eq!(table.commercial_outpatient, dec!(500000));
    }

    #[test]
    fn monitoring_cost_is_per_diem_times_days() {
        assert_eq!(OutpatientCosts::default().monitoring_cost(), dec!(6750));
    }

    #[test]
    fn component_total_sums_bounds_separately() {
        let total = InpatientCosts::default().component_total();

        assert_eq!(total, CostRange::new(dec!(53000), dec!(86000)));
    }

    #[test]
    fn point_range_has_equal_bounds() {
        assert_eq!(CostRange::point(dec!(12)), CostRange::new(dec!(12), dec!(12)));
    }

    #[test]
    fn validate_rejects_negative_drug_cost() {
        let assumptions = ModelAssumptions {
            drug_acquisition_cost: dec!(-1),
            ..ModelAssumptions::default()
        };

        assert_eq!(
            assumptions.validate(),
            Err(AssumptionsError::NegativeAmount {
                field: "drug_acquisition_cost",
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_reimbursement() {
        let mut assumptions = ModelAssumptions::default();
        assumptions.reimbursement.commercial_outpatient = dec!(-500);

        assert_eq!(
            assumptions.validate(),
            Err(AssumptionsError::NegativeAmount {
                field: "reimbursement.commercial_outpatient",
                value: dec!(-500),
            })
        );
    }

    #[test]
    fn validate_rejects_inverted_facility_range() {
        let mut assumptions = ModelAssumptions::default();
        assumptions.inpatient.facility = CostRange::new(dec!(30000), dec!(20000));

        assert_eq!(
            assumptions.validate(),
            Err(AssumptionsError::InvertedRange {
                field: "inpatient.facility",
                low: dec!(30000),
                high: dec!(20000),
            })
        );
    }

    #[test]
    fn validate_accepts_point_ranges() {
        let mut assumptions = ModelAssumptions::default();
        assumptions.inpatient.ancillary_services = CostRange::point(dec!(15000));

        assert_eq!(assumptions.validate(), Ok(()));
    }

    #[test]
    fn max_amount_is_one_trillion() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000));
    }

    #[test]
    fn validate_rejects_amount_above_limit() {
        let assumptions = ModelAssumptions {
            drug_acquisition_cost: dec!(100000000000000000000),
            ..ModelAssumptions::default()
        };

        assert_eq!(
            assumptions.validate(),
            Err(AssumptionsError::AmountTooLarge {
                field: "drug_acquisition_cost",
                value: dec!(100000000000000000000),
                limit: MAX_AMOUNT,
            })
        );
    }

    #[test]
    fn validate_rejects_cost_range_high_above_limit() {
        let mut assumptions = ModelAssumptions::default();
        assumptions.inpatient.staffing = CostRange::new(dec!(25000), dec!(1000000000001));

        assert_eq!(
            assumptions.validate(),
            Err(AssumptionsError::AmountTooLarge {
                field: "inpatient.staffing",
                value: dec!(1000000000001),
                limit: MAX_AMOUNT,
            })
        );
    }

    #[test]
    fn validate_rejects_monitoring_window_priced_above_limit() {
        let mut assumptions = ModelAssumptions::default();
        assumptions.outpatient.monitoring_per_diem = MAX_AMOUNT;
        assumptions.outpatient.monitoring_days = 2;

        assert_eq!(
            assumptions.validate(),
            Err(AssumptionsError::AmountTooLarge {
                field: "outpatient.monitoring_cost",
                value: dec!(2000000000000),
                limit: MAX_AMOUNT,
            })
        );
    }

    #[test]
    fn validate_accepts_amounts_at_limit() {
        let mut assumptions = ModelAssumptions {
            drug_acquisition_cost: MAX_AMOUNT,
            ntap_bonus: MAX_AMOUNT,
            ..ModelAssumptions::default()
        };
        assumptions.inpatient.facility = CostRange::point(MAX_AMOUNT);

        assert_eq!(assumptions.validate(), Ok(()));
    }

    #[test]
    fn baseline_mode_defaults_to_average_inpatient() {
        assert_eq!(ModelAssumptions::default().baseline, BaselineMode::AverageInpatient);
    }
}
