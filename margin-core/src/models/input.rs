use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a [`CalculationInput`] is rejected before any arithmetic runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// Annual volume must be at least one patient; the implementation fee is
    /// amortized across it.
    #[error("patient volume must be at least 1")]
    ZeroPatientVolume,

    /// A percentage field fell outside 0..=100.
    #[error("{field} must be between 0 and 100, got {value}")]
    PercentOutOfRange { field: &'static str, value: u8 },

    /// The readmission rate is a probability and must lie in [0, 1].
    #[error("readmission rate must be between 0 and 1, got {0}")]
    ReadmissionRateOutOfRange(Decimal),
}

/// One set of form values for a single calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Share of patients covered by Medicare, in whole percent.
    pub medicare_pct: u8,

    /// Typical inpatient stay. Shown alongside the result; the margin model
    /// does not price it.
    pub inpatient_length_of_stay_days: u32,

    /// Probability that an inpatient episode is followed by a readmission.
    pub readmission_rate: Decimal,

    /// Annual patient count.
    pub patient_volume: u32,

    /// Share of annual volume moved to the outpatient pathway, in whole percent.
    pub outpatient_shift_pct: u8,

    /// Whether the new-technology add-on payment applies to inpatient cases.
    #[serde(default)]
    pub ntap_applies: bool,
}

impl Default for CalculationInput {
    fn default() -> Self {
        Self {
            medicare_pct: 50,
            inpatient_length_of_stay_days: 10,
            readmission_rate: Decimal::new(15, 2),
            patient_volume: 500,
            outpatient_shift_pct: 75,
            ntap_applies: false,
        }
    }
}

impl CalculationInput {
    /// Checks every range precondition of the margin model.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.patient_volume < 1 {
            return Err(InputError::ZeroPatientVolume);
        }
        if self.medicare_pct > 100 {
            return Err(InputError::PercentOutOfRange {
                field: "medicare_pct",
                value: self.medicare_pct,
            });
        }
        if self.outpatient_shift_pct > 100 {
            return Err(InputError::PercentOutOfRange {
                field: "outpatient_shift_pct",
                value: self.outpatient_shift_pct,
            });
        }
        if self.readmission_rate < Decimal::ZERO || self.readmission_rate > Decimal::ONE {
            return Err(InputError::ReadmissionRateOutOfRange(
                self.readmission_rate,
            ));
        }
        Ok(())
    }

    /// Patients moved to the outpatient pathway, truncated to a whole count.
    pub fn shifted_patients(&self) -> u32 {
        // outpatient_shift_pct <= 100 after validation, so this never exceeds patient_volume
        let shifted = u64::from(self.patient_volume) * u64::from(self.outpatient_shift_pct) / 100;
        u32::try_from(shifted).unwrap_or(self.patient_volume)
    }
}
