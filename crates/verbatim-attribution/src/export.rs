//! Export of attribution records

use crate::AttributionError;
use std::fmt::Write;
use std::str::FromStr;
use verbatim_domain::AttributionRecord;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Full structural dump
    Json,
    /// Human-readable citation blocks
    Markdown,
}

impl FromStr for ExportFormat {
    type Err = AttributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" => Ok(ExportFormat::Markdown),
            _ => Err(AttributionError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Render a record in the given format
pub fn render(record: &AttributionRecord, format: ExportFormat) -> Result<String, AttributionError> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        ExportFormat::Markdown => Ok(render_markdown(record)),
    }
}

fn render_markdown(record: &AttributionRecord) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "## Sources for insight {}", record.insight_id);

    for (idx, reference) in record.source_references.iter().enumerate() {
        let lines = if reference.line_start == reference.line_end {
            format!("line {}", reference.line_start)
        } else {
            format!("lines {}-{}", reference.line_start, reference.line_end)
        };

        let _ = writeln!(out);
        let _ = writeln!(out, "### Source {}", idx + 1);
        let _ = writeln!(out);
        let _ = writeln!(out, "- **File:** {}", reference.file);
        let _ = writeln!(out, "- **Location:** {}", lines);
        if let Some(ts) = &reference.timestamp {
            let _ = writeln!(out, "- **Timestamp:** {}", ts);
        }
        let _ = writeln!(out, "- **Confidence:** {:.0}%", reference.confidence * 100.0);
        let _ = writeln!(out);
        for line in reference.exact_quote.lines() {
            let _ = writeln!(out, "> {}", line);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("Markdown".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);

        let err = "pdf".parse::<ExportFormat>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported export format: pdf");
    }
}
