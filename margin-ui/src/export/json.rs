use super::{ExportError, Report, ReportRenderer};
use crate::app::BatchEntry;

/// Pretty-printed JSON; amounts serialize as decimal strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn render(
        &self,
        report: &Report,
    ) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    fn render_batch(
        &self,
        entries: &[BatchEntry],
    ) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(entries)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::Value;

    use super::*;
    use crate::export::fixtures::reference_report;

    #[test]
    fn renders_result_fields() {
        let out = JsonRenderer.render(&reference_report()).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();

        let amount = |v: &Value| v.as_str().unwrap().parse::<Decimal>().unwrap();

        assert_eq!(amount(&value["result"]["improvement_low"]), dec!(3225000));
        assert_eq!(amount(&value["result"]["improvement_high"]), dec!(7350000));
        assert_eq!(value["result"]["shifted_patients"], 375);
        assert_eq!(value["input"]["medicare_pct"], 50);
        assert_eq!(value["headline"], "$3,225,000 to $7,350,000");
    }

    #[test]
    fn batch_is_an_array_of_labelled_reports() {
        let entries = vec![BatchEntry {
            label: "reference".to_string(),
            report: reference_report(),
        }];

        let out = JsonRenderer.render_batch(&entries).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value[0]["label"], "reference");
        assert_eq!(
            value[0]["report"]["context"],
            "Based on shifting 375 of 500 patients to outpatient care."
        );
    }
}
