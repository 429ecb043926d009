//! Output formatting for comparison results.
//!
//! Results render as colored terminal text, plain text, or JSON. JSON output
//! is wrapped in a `{ "success", "data", "message" }` envelope and always
//! carries every difference; `show_ignored` only affects the text formats.
//!
//! # Examples
//!
//! ```
//! use xmlcmp_rs::{compare_xml, format_result, ComparisonOptions, OutputFormat, OutputOptions};
//!
//! let options = ComparisonOptions::default();
//! let result = compare_xml("<a>1</a>", "<a>2</a>", &options).unwrap();
//!
//! let output = format_result(&result, options.threshold, &OutputFormat::Plain, &OutputOptions::default()).unwrap();
//! assert!(output.contains("a [text]"));
//! assert!(output.contains("Match ratio: 0% (threshold 95%) FAIL"));
//! ```

use crate::batch::{BatchItem, BatchOutcome, BatchResult};
use crate::compare::ComparisonResult;
use crate::diff::{DiffStats, Difference};
use crate::error::OutputError;
use crate::tree::truncate;
use colored::*;
use serde::Serialize;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colored terminal output with ANSI escape codes
    Terminal,
    /// JSON envelope around the result
    Json,
    /// Plain text, no colors (suitable for piping)
    Plain,
}

/// Options for controlling text output.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// List differences suppressed by the ignore-list
    pub show_ignored: bool,
    /// Maximum length for displayed values (truncate if longer)
    pub max_value_length: usize,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            show_ignored: true,
            max_value_length: 80,
        }
    }
}

/// Transport envelope for JSON output.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

impl Envelope<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Formats one comparison result.
///
/// `threshold` is the one the result was judged against; it is only shown
/// in the summary line.
pub fn format_result(
    result: &ComparisonResult,
    threshold: f64,
    format: &OutputFormat,
    options: &OutputOptions,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Json => to_json(&Envelope::ok(result)),
        OutputFormat::Terminal => Ok(format_text(result, threshold, options, true)),
        OutputFormat::Plain => Ok(format_text(result, threshold, options, false)),
    }
}

/// Formats a batch result; `items` supplies the item names.
pub fn format_batch(
    batch: &BatchResult,
    items: &[BatchItem],
    format: &OutputFormat,
    options: &OutputOptions,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Json => to_json(&Envelope::ok(batch)),
        OutputFormat::Terminal => Ok(format_batch_text(batch, items, options, true)),
        OutputFormat::Plain => Ok(format_batch_text(batch, items, options, false)),
    }
}

/// Formats a failure for the given output format.
pub fn format_error(message: &str, format: &OutputFormat) -> Result<String, OutputError> {
    match format {
        OutputFormat::Json => to_json(&Envelope::error(message)),
        OutputFormat::Terminal => Ok(format!("{} {}", "Error:".bright_red().bold(), message)),
        OutputFormat::Plain => Ok(format!("Error: {}", message)),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, OutputError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| OutputError::JsonSerializationError { source: e })
}

fn format_text(
    result: &ComparisonResult,
    threshold: f64,
    options: &OutputOptions,
    color: bool,
) -> String {
    let mut output = String::new();

    let shown: Vec<&Difference> = result
        .differences
        .iter()
        .filter(|d| options.show_ignored || !d.ignored)
        .collect();

    if shown.is_empty() {
        let none = "No differences found.";
        output.push_str(&paint(none, color, |s| s.dimmed()));
        output.push('\n');
    } else {
        for difference in shown {
            output.push_str(&format_difference(difference, options, color));
            output.push('\n');
        }
    }

    output.push('\n');
    output.push_str(&format_stats(&result.stats()));
    output.push('\n');
    output.push_str(&format_verdict(
        result.match_ratio,
        threshold,
        result.is_match,
        color,
    ));

    output
}

/// One difference as a single line.
///
/// `-` marks content only the first document has, `+` content only the
/// second has, `•` content both have with different values.
fn format_difference(difference: &Difference, options: &OutputOptions, color: bool) -> String {
    let value = |v: &String| truncate(v.clone(), options.max_value_length);
    let kind = format!("[{:?}]", difference.kind).to_lowercase();
    let path = difference.path.to_string();

    let (symbol, values) = match (&difference.left, &difference.right) {
        (Some(left), Some(right)) => ("•", format!("{} → {}", value(left), value(right))),
        (Some(left), None) => ("-", value(left)),
        (None, Some(right)) => ("+", value(right)),
        (None, None) => ("•", String::new()),
    };

    let mut line = format!("{} {} {} {}", symbol, path, kind, difference.description);
    if !values.is_empty() {
        line.push_str(": ");
        line.push_str(&values);
    }
    if difference.ignored {
        line.push_str(" (ignored)");
    }

    if !color {
        return line;
    }
    if difference.ignored {
        return line.dimmed().to_string();
    }
    match symbol {
        "-" => line.red().to_string(),
        "+" => line.green().to_string(),
        _ => line.yellow().to_string(),
    }
}

fn format_stats(stats: &DiffStats) -> String {
    if stats.is_empty() {
        return "Differences: none".to_string();
    }

    let mut parts = Vec::new();
    if stats.attribute > 0 {
        parts.push(format!("{} attribute", stats.attribute));
    }
    if stats.element > 0 {
        parts.push(format!("{} element", stats.element));
    }
    if stats.text > 0 {
        parts.push(format!("{} text", stats.text));
    }
    if stats.structure > 0 {
        parts.push(format!("{} structure", stats.structure));
    }

    let mut summary = format!("Differences: {}", parts.join(", "));
    if stats.ignored > 0 {
        summary.push_str(&format!(" ({} ignored)", stats.ignored));
    }
    summary
}

fn format_verdict(match_ratio: f64, threshold: f64, is_match: bool, color: bool) -> String {
    let verdict = if is_match { "PASS" } else { "FAIL" };
    let verdict = match (color, is_match) {
        (false, _) => verdict.to_string(),
        (true, true) => verdict.bright_green().bold().to_string(),
        (true, false) => verdict.bright_red().bold().to_string(),
    };
    format!(
        "Match ratio: {}% (threshold {}%) {}",
        match_ratio, threshold, verdict
    )
}

fn format_batch_text(
    batch: &BatchResult,
    items: &[BatchItem],
    options: &OutputOptions,
    color: bool,
) -> String {
    let mut output = String::new();

    for (index, outcome) in batch.results.iter().enumerate() {
        let name = items
            .get(index)
            .map(|item| item.name(index))
            .unwrap_or_else(|| format!("#{}", index + 1));

        match outcome {
            BatchOutcome::Completed(result) => {
                let verdict = if result.is_match { "PASS" } else { "FAIL" };
                let line = format!(
                    "{} {}: {}% {}",
                    verdict,
                    name,
                    result.match_ratio,
                    format_stats(&result.stats())
                );
                output.push_str(&match (color, result.is_match) {
                    (false, _) => line,
                    (true, true) => line.green().to_string(),
                    (true, false) => line.red().to_string(),
                });
                output.push('\n');

                if !result.is_match {
                    for difference in result
                        .differences
                        .iter()
                        .filter(|d| options.show_ignored || !d.ignored)
                    {
                        output.push_str("    ");
                        output.push_str(&format_difference(difference, options, color));
                        output.push('\n');
                    }
                }
            }
            BatchOutcome::Failed { error, .. } => {
                let line = format!("ERROR {}: {}", name, error);
                output.push_str(&paint(&line, color, |s| s.bright_red()));
                output.push('\n');
            }
        }
    }

    let summary = &batch.summary;
    output.push('\n');
    output.push_str(&format!(
        "Summary: {} total, {} passed, {} failed ({} errored), average match ratio {}%",
        summary.total,
        summary.passed,
        summary.failed,
        summary.errored,
        summary.average_match_ratio
    ));

    output
}

fn paint(text: &str, color: bool, style: impl Fn(&str) -> ColoredString) -> String {
    if color {
        style(text).to_string()
    } else {
        text.to_string()
    }
}
