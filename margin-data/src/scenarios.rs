//! CSV loader for batches of calculation inputs.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name).
//!
//! | Column | Required | Type | Notes |
//! |---------------------------------|----------|---------|------------------------------------|
//! | `name` | no | string | Label shown next to the result |
//! | `medicare_pct` | yes | integer | 0-100 |
//! | `inpatient_length_of_stay_days` | yes | integer | |
//! | `readmission_rate` | yes | decimal | 0-1, e.g. `0.15` |
//! | `patient_volume` | yes | integer | at least 1 |
//! | `outpatient_shift_pct` | yes | integer | 0-100 |
//! | `ntap_applies` | no | bool | `true`/`false`, empty means `false` |
//!
//! ### Example
//!
//! ```csv
//! name,medicare_pct,inpatient_length_of_stay_days,readmission_rate,patient_volume,outpatient_shift_pct
//! reference,50,10,0.15,500,75
//! ```

use std::io::Read;

use margin_core::{CalculationInput, InputError};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize)]
struct ScenarioRow {
    #[serde(default)]
    name: Option<String>,
    medicare_pct: u8,
    inpatient_length_of_stay_days: u32,
    readmission_rate: Decimal,
    patient_volume: u32,
    outpatient_shift_pct: u8,
    #[serde(default)]
    ntap_applies: Option<bool>,
}

/// Errors that can occur while loading scenario rows.
#[derive(Debug, Error)]
pub enum ScenarioLoadError {
    /// Bad structure, a missing required column, or a type mismatch.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A row parsed but fails the calculator's range checks. `row` is
    /// 1-based, not counting the header.
    #[error("invalid scenario on row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: InputError,
    },
}

/// One named calculation input from a batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: Option<String>,
    pub input: CalculationInput,
}

impl Scenario {
    /// Display label: the `name` column, or `row N` when it was blank.
    pub fn label(
        &self,
        row: usize,
    ) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => format!("row {row}"),
        }
    }
}

fn convert_row(
    row: ScenarioRow,
    row_number: usize,
) -> Result<Scenario, ScenarioLoadError> {
    let input = CalculationInput {
        medicare_pct: row.medicare_pct,
        inpatient_length_of_stay_days: row.inpatient_length_of_stay_days,
        readmission_rate: row.readmission_rate,
        patient_volume: row.patient_volume,
        outpatient_shift_pct: row.outpatient_shift_pct,
        ntap_applies: row.ntap_applies.unwrap_or(false),
    };

    input
        .validate()
        .map_err(|source| ScenarioLoadError::InvalidRow {
            row: row_number,
            source,
        })?;

    Ok(Scenario {
        name: row.name.filter(|n| !n.trim().is_empty()),
        input,
    })
}

/// Loader for scenario batches.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Parse every row from `reader`, stopping at the first invalid one.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<Scenario>, ScenarioLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut scenarios = Vec::new();

        for (idx, result) in csv_reader.deserialize::<ScenarioRow>().enumerate() {
            let row = result?;
            scenarios.push(convert_row(row, idx + 1)?);
        }

        Ok(scenarios)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const HEADER: &str = "name,medicare_pct,inpatient_length_of_stay_days,readmission_rate,patient_volume,outpatient_shift_pct,ntap_applies";

    #[test]
    fn parses_minimal_columns() {
        let csv = "medicare_pct,inpatient_length_of_stay_days,readmission_rate,patient_volume,outpatient_shift_pct\n\
                   50,10,0.15,500,75\n";

        let scenarios = ScenarioLoader::parse(csv.as_bytes()).unwrap();

        assert_eq!(
            scenarios,
            vec![Scenario {
                name: None,
                input: CalculationInput::default(),
            }]
        );
    }

    #[test]
    fn empty_ntap_cell_means_false() {
        let csv = format!("{HEADER}\nbase,50,10,0.15,500,75,\n");

        let scenarios = ScenarioLoader::parse(csv.as_bytes()).unwrap();

        assert!(!scenarios[0].input.ntap_applies);
    }

    #[test]
    fn parses_ntap_and_name() {
        let csv = format!("{HEADER}\n with ntap ,40,12,0.2,250,50,true\n");

        let scenarios = ScenarioLoader::parse(csv.as_bytes()).unwrap();

        assert_eq!(scenarios[0].name.as_deref(), Some("with ntap"));
        assert_eq!(scenarios[0].input.readmission_rate, dec!(0.2));
        assert!(scenarios[0].input.ntap_applies);
    }

    #[test]
    fn out_of_range_row_reports_row_number() {
        let csv = format!("{HEADER}\nok,50,10,0.15,500,75,\nbad,50,10,0.15,0,75,\n");

        let err = ScenarioLoader::parse(csv.as_bytes()).unwrap_err();

        match err {
            ScenarioLoadError::InvalidRow { row, source } => {
                assert_eq!(row, 2);
                assert_eq!(source, InputError::ZeroPatientVolume);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_cell_is_a_parse_error() {
        let csv = format!("{HEADER}\nbad,fifty,10,0.15,500,75,\n");

        let result = ScenarioLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(ScenarioLoadError::Parse(_))));
    }

    #[test]
    fn label_falls_back_to_row_number() {
        let scenario = Scenario {
            name: None,
            input: CalculationInput::default(),
        };

        assert_eq!(scenario.label(3), "row 3");
    }
}
