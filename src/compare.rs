//! One comparison: parse, diff, score.
//!
//! # Examples
//!
//! ```
//! use xmlcmp_rs::{compare_xml, ComparisonOptions};
//!
//! let options = ComparisonOptions::new(["id"], 95.0);
//! let result = compare_xml(
//!     "<root><id>1</id><name>Bob</name></root>",
//!     "<root><id>2</id><name>Bob</name></root>",
//!     &options,
//! )
//! .unwrap();
//!
//! assert_eq!(result.match_ratio, 100.0);
//! assert!(result.is_match);
//! assert_eq!(result.differences.len(), 1);
//! ```

use crate::diff::{diff_documents, DiffConfig, DiffStats, Difference};
use crate::error::{CompareError, ConfigError, Side};
use crate::ignore::IgnoreList;
use crate::parser::{ParserOptions, XmlParser};
use crate::ratio;
use crate::tree::Document;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;

/// Threshold used when none is configured.
pub const DEFAULT_THRESHOLD: f64 = 95.0;

/// Ignore-list and pass/fail threshold of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComparisonOptions {
    /// Names or dotted paths whose differences are flagged as ignored
    pub ignored_properties: Vec<String>,
    /// Minimum match ratio, in `[0, 100]`, for the documents to match
    pub threshold: f64,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            ignored_properties: Vec::new(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ComparisonOptions {
    pub fn new<I, S>(ignored_properties: I, threshold: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored_properties: ignored_properties.into_iter().map(Into::into).collect(),
            threshold,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threshold.is_nan() || !(0.0..=100.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold {
                value: self.threshold,
            });
        }
        Ok(())
    }

    /// Options for one batch item: item ignores united with these, and the
    /// item threshold when given.
    pub fn merged_with(&self, item_ignores: &[String], item_threshold: Option<f64>) -> Self {
        let mut ignored_properties: Vec<String> = item_ignores.to_vec();
        for entry in &self.ignored_properties {
            if !ignored_properties.contains(entry) {
                ignored_properties.push(entry.clone());
            }
        }

        Self {
            ignored_properties,
            threshold: item_threshold.unwrap_or(self.threshold),
        }
    }

    pub fn ignore_list(&self) -> IgnoreList {
        IgnoreList::new(&self.ignored_properties)
    }
}

/// Where a document's text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Raw XML text
    Inline(String),
    /// A file read when the comparison runs
    File(PathBuf),
}

impl Source {
    pub fn describe(&self) -> String {
        match self {
            Source::Inline(text) => format!("inline document ({} bytes)", text.len()),
            Source::File(path) => path.display().to_string(),
        }
    }
}

/// Outcome of one comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub match_ratio: f64,
    pub is_match: bool,
    /// Every difference found, ignored ones included
    pub differences: Vec<Difference>,
    pub processing_time_ms: u64,
}

impl ComparisonResult {
    pub fn stats(&self) -> DiffStats {
        DiffStats::from_differences(&self.differences)
    }
}

/// Parses and compares document pairs with fixed parser and diff settings.
///
/// Holds no per-comparison state, so one comparator can serve many threads.
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    parser: XmlParser,
    diff_config: DiffConfig,
}

impl Comparator {
    pub fn new(parser_options: ParserOptions, diff_config: DiffConfig) -> Self {
        Self {
            parser: XmlParser::new(parser_options),
            diff_config,
        }
    }

    /// Deepest nesting either stage will walk.
    pub(crate) fn max_depth(&self) -> usize {
        self.parser.options().max_depth.max(self.diff_config.max_depth)
    }

    /// Parses both inputs and compares them.
    ///
    /// # Errors
    ///
    /// [`CompareError::InvalidFirst`] / [`CompareError::InvalidSecond`] name
    /// the input that failed to parse; invalid options and traversal failures
    /// have their own variants.
    pub fn compare_xml(
        &self,
        left: &str,
        right: &str,
        options: &ComparisonOptions,
    ) -> Result<ComparisonResult, CompareError> {
        let start = Instant::now();
        options.validate()?;

        let left = self
            .parser
            .parse_str(left)
            .map_err(|e| CompareError::invalid(Side::First, e))?;
        let right = self
            .parser
            .parse_str(right)
            .map_err(|e| CompareError::invalid(Side::Second, e))?;

        self.compare_parsed(&left, &right, options, start)
    }

    /// Reads, parses and compares two sources.
    pub fn compare_sources(
        &self,
        left: &Source,
        right: &Source,
        options: &ComparisonOptions,
    ) -> Result<ComparisonResult, CompareError> {
        let start = Instant::now();
        options.validate()?;

        let left = self.parse_source(left, Side::First)?;
        let right = self.parse_source(right, Side::Second)?;

        self.compare_parsed(&left, &right, options, start)
    }

    fn parse_source(&self, source: &Source, side: Side) -> Result<Document, CompareError> {
        let parsed = match source {
            Source::Inline(text) => self.parser.parse_str(text),
            Source::File(path) => self.parser.parse_file(path),
        };
        parsed.map_err(|e| CompareError::invalid(side, e))
    }

    /// Compares two already parsed documents.
    pub fn compare_documents(
        &self,
        left: &Document,
        right: &Document,
        options: &ComparisonOptions,
    ) -> Result<ComparisonResult, CompareError> {
        let start = Instant::now();
        options.validate()?;
        self.compare_parsed(left, right, options, start)
    }

    fn compare_parsed(
        &self,
        left: &Document,
        right: &Document,
        options: &ComparisonOptions,
        start: Instant,
    ) -> Result<ComparisonResult, CompareError> {
        let ignores = options.ignore_list();
        let differences = diff_documents(left, right, &ignores, &self.diff_config)?;

        let match_ratio = ratio::match_ratio(left, right, ratio::scored(&differences));
        let is_match = match_ratio >= options.threshold;
        let processing_time_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "XML comparison completed in {}ms with {}% match ratio",
            processing_time_ms,
            match_ratio
        );

        Ok(ComparisonResult {
            match_ratio,
            is_match,
            differences,
            processing_time_ms,
        })
    }
}

/// Compares two XML strings with default parser and diff settings.
pub fn compare_xml(
    left: &str,
    right: &str,
    options: &ComparisonOptions,
) -> Result<ComparisonResult, CompareError> {
    Comparator::default().compare_xml(left, right, options)
}

/// Compares two parsed documents with default diff settings.
pub fn compare_documents(
    left: &Document,
    right: &Document,
    options: &ComparisonOptions,
) -> Result<ComparisonResult, CompareError> {
    Comparator::default().compare_documents(left, right, options)
}
