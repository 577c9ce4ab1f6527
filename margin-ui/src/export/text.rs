use super::{ExportError, Report, ReportRenderer};
use crate::app::{BatchEntry, HEADLINE_TITLE};

/// Plain terminal output mirroring the on-screen result panel.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl ReportRenderer for TextRenderer {
    fn render(
        &self,
        report: &Report,
    ) -> Result<String, ExportError> {
        Ok(format!(
            "{HEADLINE_TITLE}\n{}\n\n{}\n{}\n",
            report.headline, report.context, report.fee_note
        ))
    }

    /// One line per scenario.
    fn render_batch(
        &self,
        entries: &[BatchEntry],
    ) -> Result<String, ExportError> {
        let width = entries.iter().map(|e| e.label.len()).max().unwrap_or(0);
        Ok(entries
            .iter()
            .map(|entry| {
                let result = &entry.report.result;
                format!(
                    "{:<width$}  {} ({} of {} shifted)\n",
                    entry.label,
                    entry.report.headline,
                    result.shifted_patients,
                    result.patient_volume,
                )
            })
            .collect())
    }
}
