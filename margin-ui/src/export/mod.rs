//! Report export.
//!
//! A [`Report`] bundles one calculation with the formatted strings shown to
//! the user. Renderers turn it into text, JSON or a templated document;
//! none of them recompute anything.

pub mod error;
pub mod json;
pub mod template;
pub mod text;

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use margin_core::{CalculationInput, CalculationResult};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::app::{BatchEntry, context_line, fee_note, headline};

pub use error::ExportError;
pub use json::JsonRenderer;
pub use template::TemplateRenderer;
pub use text::TextRenderer;

pub const REPORT_TITLE: &str = "CAR-T Episode Financial Impact";

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub title: String,
    /// Local calendar date, `YYYY-MM-DD`.
    pub generated_on: String,
    pub input: CalculationInput,
    pub result: CalculationResult,
    pub implementation_fee: Decimal,
    pub headline: String,
    pub context: String,
    pub fee_note: String,
}

impl Report {
    pub fn new(
        input: CalculationInput,
        result: CalculationResult,
        implementation_fee: Decimal,
        generated_at: DateTime<Local>,
    ) -> Self {
        Self {
            title: REPORT_TITLE.to_string(),
            generated_on: generated_at.format("%Y-%m-%d").to_string(),
            headline: headline(&result),
            context: context_line(&result),
            fee_note: fee_note(implementation_fee),
            input,
            result,
            implementation_fee,
        }
    }
}

/// A presentation strategy over finished reports.
pub trait ReportRenderer {
    fn render(
        &self,
        report: &Report,
    ) -> Result<String, ExportError>;

    /// Renders a batch. The default renders each report under its label.
    fn render_batch(
        &self,
        entries: &[BatchEntry],
    ) -> Result<String, ExportError> {
        let mut out = String::new();
        for entry in entries {
            out.push_str(&format!("== {} ==\n", entry.label));
            out.push_str(&self.render(&entry.report)?);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Writes rendered output to `path`, replacing any existing file.
pub fn write_report(
    path: &Path,
    contents: &str,
) -> Result<(), ExportError> {
    fs::write(path, contents).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bytes = contents.len(), "report written");
    Ok(())
}
