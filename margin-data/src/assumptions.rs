use std::fs;
use std::path::{Path, PathBuf};

use margin_core::{AssumptionsError, ModelAssumptions};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading an assumption set.
#[derive(Debug, Error)]
pub enum AssumptionsLoadError {
    #[error("cannot read assumptions file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("assumptions rejected: {0}")]
    Invalid(#[from] AssumptionsError),
}

/// Loader for assumption sets stored as TOML.
///
/// Every key is optional; anything left out keeps its reference value.
/// Unknown keys are rejected so that a misspelt constant does not silently
/// fall back to the default.
///
/// ```toml
/// drug_acquisition_cost = 400000
/// baseline = "matched_bound"
///
/// [reimbursement]
/// commercial_inpatient = 600000
///
/// [inpatient]
/// facility = { low = 20000, high = 30000 }
/// ```
pub struct AssumptionsLoader;

impl AssumptionsLoader {
    /// Parse and validate an assumption set from TOML text.
    pub fn parse(text: &str) -> Result<ModelAssumptions, AssumptionsLoadError> {
        let assumptions: ModelAssumptions = toml::from_str(text)?;
        assumptions.validate()?;

        debug!(
            drug_acquisition_cost = %assumptions.drug_acquisition_cost,
            baseline = ?assumptions.baseline,
            "parsed assumption set"
        );

        Ok(assumptions)
    }

    /// Read, parse and validate an assumption set from a file.
    pub fn load(path: &Path) -> Result<ModelAssumptions, AssumptionsLoadError> {
        let text = fs::read_to_string(path).map_err(|source| AssumptionsLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&text)
    }

    /// Render an assumption set as TOML that [`parse`](Self::parse) accepts.
    pub fn to_toml(assumptions: &ModelAssumptions) -> Result<String, AssumptionsLoadError> {
        Ok(toml::to_string_pretty(assumptions)?)
    }
}
