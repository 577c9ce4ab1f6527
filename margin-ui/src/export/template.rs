use std::collections::HashMap;
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use tera::{Context, Tera, Value};

use super::{ExportError, Report, ReportRenderer};
use crate::utils::format_currency;

const TEMPLATE_NAME: &str = "report.md";
const DEFAULT_TEMPLATE: &str = include_str!("../../templates/report.md.tera");

/// Renders a report through a Tera template (Jinja2 syntax).
///
/// The report fields become the template context. A `currency` filter
/// formats decimal amounts the same way the terminal output does:
/// `{{ result.outpatient_margin | currency }}`.
#[derive(Debug)]
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Renderer over the built-in Markdown report template.
    pub fn new() -> Result<Self, ExportError> {
        Self::from_source(DEFAULT_TEMPLATE)
    }

    pub fn from_source(source: &str) -> Result<Self, ExportError> {
        let mut tera = Tera::default();
        tera.register_filter("currency", currency_filter);
        tera.add_raw_template(TEMPLATE_NAME, source)
            .map_err(|e| ExportError::TemplateParse(e.to_string()))?;
        Ok(Self { tera })
    }

    pub fn from_file(path: &Path) -> Result<Self, ExportError> {
        let source = fs::read_to_string(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(&source)
    }
}

impl ReportRenderer for TemplateRenderer {
    fn render(
        &self,
        report: &Report,
    ) -> Result<String, ExportError> {
        let value = serde_json::to_value(report)?;
        let context =
            Context::from_value(value).map_err(|e| ExportError::TemplateRender(e.to_string()))?;

        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }
}

fn currency_filter(
    value: &Value,
    _args: &HashMap<String, Value>,
) -> tera::Result<Value> {
    let amount = match value {
        Value::String(s) => s
            .parse::<Decimal>()
            .map_err(|e| tera::Error::msg(format!("currency: '{s}' is not a decimal: {e}")))?,
        Value::Number(n) => match n.as_i64() {
            Some(i) => Decimal::from(i),
            None => n
                .as_f64()
                .and_then(|f| Decimal::try_from(f).ok())
                .ok_or_else(|| tera::Error::msg(format!("currency: {n} is out of range")))?,
        },
        other => {
            return Err(tera::Error::msg(format!(
                "currency: expected a number, got {other}"
            )));
        }
    };

    Ok(Value::String(format_currency(amount)))
}
