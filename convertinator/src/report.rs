//! Report renderer
//!
//! Renders successful conversions as a markdown bullet list between a fixed
//! introduction and closing.

use serde::{Deserialize, Serialize};
use crate::convert::ConversionResult;
use crate::error::ConversionError;

/// Fixed text around the bullet list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportTemplate {
    pub intro: String,
    pub outro: String,
}

impl Default for ReportTemplate {
    fn default() -> Self {
        ReportTemplate {
            intro: "Hi, I'm a bot! Here are metric conversions of the imperial units found in your comment:\n\n"
                .to_string(),
            outro: "\n\nI hope this was helpful. DM me if there were any problems!\n\n*TheConvertinator*"
                .to_string(),
        }
    }
}

/// Render the report, or `None` if no conversion succeeded.
///
/// Bullets keep the order of `results`. Failed conversions are left out.
pub fn format_report(
    results: &[Result<ConversionResult, ConversionError>],
    template: &ReportTemplate,
) -> Option<String> {
    let bullets: Vec<String> = results.iter()
        .filter_map(|r| r.as_ref().ok())
        .map(render_bullet)
        .collect();

    if bullets.is_empty() {
        return None;
    }

    let mut output = template.intro.clone();
    for bullet in &bullets {
        output.push_str(bullet);
    }
    output.push_str(&template.outro);
    Some(output)
}

fn render_bullet(result: &ConversionResult) -> String {
    format!(
        "* {} {} ~= {} {}\n\n",
        result.original_token,
        result.source_symbol,
        render_value(result.value),
        result.target_symbol
    )
}

/// Two decimal places; values that round to zero never show a minus sign
fn render_value(value: f64) -> String {
    let rendered = format!("{:.2}", value);
    if rendered == "-0.00" {
        "0.00".to_string()
    } else {
        rendered
    }
}
