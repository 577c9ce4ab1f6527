//! Margin impact of shifting CAR-T episodes from inpatient to outpatient care.
//!
//! # Calculation Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Blend reimbursement by payer mix (NTAP added to inpatient first, if it applies) |
//! | 2    | Outpatient margin: reimbursement - (drug + monitoring + ancillary + fee / volume) |
//! | 3    | Inpatient margin range: reimbursement - (drug + cost bounds + readmission) |
//! | 4    | Split volume into shifted and remaining patients |
//! | 5    | Baseline: all volume inpatient at the average inpatient margin |
//! | 6    | Post-shift totals at each inpatient bound |
//! | 7    | Improvement range: ordered post-shift totals minus baseline |
//!
//! A higher inpatient cost bound yields the lower inpatient margin, so the
//! low margin pairs with the high cost and vice versa.
//!
//! # Example
//!
//! ```
//! use margin_core::{CalculationInput, MarginCalculator, ModelAssumptions};
//! use rust_decimal_macros::dec;
//!
//! let calculator = MarginCalculator::new(ModelAssumptions::default()).unwrap();
//! let input = CalculationInput {
//!     medicare_pct: 50,
//!     inpatient_length_of_stay_days: 10,
//!     readmission_rate: dec!(0.15),
//!     patient_volume: 500,
//!     outpatient_shift_pct: 75,
//!     ntap_applies: false,
//! };
//!
//! let result = calculator.compute(&input).unwrap();
//!
//! assert_eq!(result.improvement_low, dec!(3225000.00));
//! assert_eq!(result.improvement_high, dec!(7350000.00));
//! assert_eq!(result.shifted_patients, 375);
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{percent_to_share, round_half_up};
use crate::models::{
    AssumptionsError, BaselineMode, CalculationInput, CalculationResult, CareSetting, CostRange,
    InputError, ModelAssumptions, ReimbursementTable,
};

/// Errors that can occur during a margin calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarginError {
    /// The calculation input violates a range precondition.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// The assumption set contains an amount the model cannot price.
    #[error("invalid assumptions: {0}")]
    InvalidAssumptions(#[from] AssumptionsError),
}

/// Per-patient inpatient margins at each end of the cost range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InpatientMargins {
    low: Decimal,
    high: Decimal,
}

impl InpatientMargins {
    fn average(&self) -> Decimal {
        (self.low + self.high) / Decimal::TWO
    }
}

/// Calculator for the margin impact of an outpatient shift.
///
/// Holds a validated [`ModelAssumptions`]; every call to [`compute`](Self::compute)
/// is independent and side-effect free.
#[derive(Debug, Clone, Default)]
pub struct MarginCalculator {
    assumptions: ModelAssumptions,
}

impl MarginCalculator {
    /// Creates a calculator over the given assumption set.
    ///
    /// # Errors
    ///
    /// Returns [`MarginError::InvalidAssumptions`] if the assumption set
    /// contains a negative amount, an amount above
    /// [`MAX_AMOUNT`](crate::models::MAX_AMOUNT) or an inverted cost range.
    pub fn new(assumptions: ModelAssumptions) -> Result<Self, MarginError> {
        assumptions.validate()?;

        if assumptions.outpatient.monitoring_days == 0
            && assumptions.outpatient.monitoring_per_diem > Decimal::ZERO
        {
            warn!(
                per_diem = %assumptions.outpatient.monitoring_per_diem,
                "monitoring window is zero days; outpatient monitoring will not be priced"
            );
        }

        Ok(Self { assumptions })
    }

    /// The validated assumption set this calculator prices with.
    pub fn assumptions(&self) -> &ModelAssumptions {
        &self.assumptions
    }

    /// Computes the annual margin improvement range for one input.
    ///
    /// # Errors
    ///
    /// Returns [`MarginError::InvalidInput`] if:
    /// - `patient_volume` is zero
    /// - `medicare_pct` or `outpatient_shift_pct` is above 100
    /// - `readmission_rate` is outside [0, 1]
    ///
    /// # Example: No Volume
    ///
    /// ```
    /// use margin_core::{CalculationInput, InputError, MarginCalculator, MarginError};
    ///
    /// let calculator = MarginCalculator::default();
    /// let input = CalculationInput {
    ///     patient_volume: 0,
    ///     ..CalculationInput::default()
    /// };
    ///
    /// assert_eq!(
    ///     calculator.compute(&input),
    ///     Err(MarginError::InvalidInput(InputError::ZeroPatientVolume))
    /// );
    /// ```
    pub fn compute(
        &self,
        input: &CalculationInput,
    ) -> Result<CalculationResult, MarginError> {
        input.validate()?;

        // Step 1: payer-blended reimbursement
        let table = self.reimbursement_table(input.ntap_applies);
        let medicare_share = percent_to_share(input.medicare_pct);
        let inpatient_reimbursement = table.blended(CareSetting::Inpatient, medicare_share);
        let outpatient_reimbursement = table.blended(CareSetting::Outpatient, medicare_share);

        // Step 2: outpatient margin net of the amortized fee
        let outpatient_margin =
            self.outpatient_margin(outpatient_reimbursement, input.patient_volume);

        // Step 3: inpatient margin range
        let inpatient = self.inpatient_margins(inpatient_reimbursement, input.readmission_rate);

        // Step 4: volume split
        let volume = Decimal::from(input.patient_volume);
        let shifted = volume * percent_to_share(input.outpatient_shift_pct);
        let remaining = volume - shifted;

        // Step 5: baseline with no shift
        let baseline = inpatient.average() * volume;

        // Step 6: post-shift totals at each bound
        let post_shift_low = inpatient.low * remaining + outpatient_margin * shifted;
        let post_shift_high = inpatient.high * remaining + outpatient_margin * shifted;

        // Step 7: ordered improvement range
        let (improvement_low, improvement_high) = match self.assumptions.baseline {
            BaselineMode::AverageInpatient => ordered(
                post_shift_low - baseline,
                post_shift_high - baseline,
            ),
            BaselineMode::MatchedBound => ordered(
                post_shift_low - inpatient.low * volume,
                post_shift_high - inpatient.high * volume,
            ),
        };

        debug!(
            inpatient_reimbursement = %inpatient_reimbursement,
            outpatient_reimbursement = %outpatient_reimbursement,
            outpatient_margin = %outpatient_margin,
            inpatient_margin_low = %inpatient.low,
            inpatient_margin_high = %inpatient.high,
            shifted = %shifted,
            baseline = %baseline,
            "computed margin impact"
        );

        Ok(CalculationResult {
            improvement_low: round_half_up(improvement_low),
            improvement_high: round_half_up(improvement_high),
            shifted_patients: input.shifted_patients(),
            patient_volume: input.patient_volume,
            blended_inpatient_reimbursement: round_half_up(inpatient_reimbursement),
            blended_outpatient_reimbursement: round_half_up(outpatient_reimbursement),
            inpatient_margin_low: inpatient.low,
            inpatient_margin_high: inpatient.high,
            outpatient_margin: round_half_up(outpatient_margin),
            baseline_margin: round_half_up(baseline),
        })
    }

    /// Reimbursement table with the NTAP bonus applied when requested.
    fn reimbursement_table(
        &self,
        ntap_applies: bool,
    ) -> ReimbursementTable {
        if ntap_applies {
            self.assumptions
                .reimbursement
                .with_inpatient_bonus(self.assumptions.ntap_bonus)
        } else {
            self.assumptions.reimbursement.clone()
        }
    }

    /// Outpatient margin per patient, including that patient's share of the
    /// implementation fee.
    fn outpatient_margin(
        &self,
        reimbursement: Decimal,
        patient_volume: u32,
    ) -> Decimal {
        let outpatient = &self.assumptions.outpatient;
        let episode_cost = self.assumptions.drug_acquisition_cost
            + outpatient.monitoring_cost()
            + outpatient.ancillary_services;
        let amortized_fee = outpatient.implementation_fee / Decimal::from(patient_volume);

        reimbursement - (episode_cost + amortized_fee)
    }

    /// Inpatient cost range for the given readmission rate.
    fn inpatient_cost(
        &self,
        readmission_rate: Decimal,
    ) -> CostRange {
        let inpatient = &self.assumptions.inpatient;
        let fixed = self.assumptions.drug_acquisition_cost
            + inpatient.readmission_cost * readmission_rate;

        inpatient.component_total() + CostRange::point(fixed)
    }

    /// Inpatient margins; the high cost bound yields the low margin.
    fn inpatient_margins(
        &self,
        reimbursement: Decimal,
        readmission_rate: Decimal,
    ) -> InpatientMargins {
        let cost = self.inpatient_cost(readmission_rate);

        InpatientMargins {
            low: round_half_up(reimbursement - cost.high),
            high: round_half_up(reimbursement - cost.low),
        }
    }
}

/// Returns the pair as `(smaller, larger)`.
fn ordered(
    a: Decimal,
    b: Decimal,
) -> (Decimal, Decimal) {
    (a.min(b), a.max(b))
}

/// Computes the margin impact with the reference assumption set.
///
/// # Example
///
/// ```
/// use margin_core::{CalculationInput, compute};
///
/// let result = compute(&CalculationInput::default()).unwrap();
/// assert!(result.improvement_low <= result.improvement_high);
/// ```
pub fn compute(input: &CalculationInput) -> Result<CalculationResult, MarginError> {
    MarginCalculator::default().compute(input)
}
