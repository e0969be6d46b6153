use crate::report::LinkReport;
use crate::Result;

/// Serializes the full report, every value included, as pretty JSON
pub fn format_json_report(report: &LinkReport) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}
