//! Many independent comparisons, run in parallel.
//!
//! Items share the base [`ComparisonOptions`] read-only. Each item's
//! outcome lands in its own slot, in input order, whether it completed or
//! failed; a malformed item never affects its siblings.
//!
//! # Examples
//!
//! ```
//! use xmlcmp_rs::batch::{compare_batch, BatchItem, BatchOutcome};
//! use xmlcmp_rs::ComparisonOptions;
//!
//! let items = vec![
//!     BatchItem::inline("<a>1</a>", "<a>1</a>"),
//!     BatchItem::inline("<a>1</a>", "<a>"),
//! ];
//! let batch = compare_batch(&items, &ComparisonOptions::default());
//!
//! assert!(matches!(batch.results[0], BatchOutcome::Completed(_)));
//! assert!(matches!(batch.results[1], BatchOutcome::Failed { .. }));
//! assert_eq!(batch.summary.passed, 1);
//! ```

use crate::compare::{Comparator, ComparisonOptions, ComparisonResult, Source};
use crate::error::Side;
use crate::ratio::round2;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::Serialize;
use std::time::Instant;

/// Worker stack before any nesting is accounted for.
const BASE_STACK_SIZE: usize = 2 * 1024 * 1024;

/// Worker stack reserved per level of element nesting.
const STACK_PER_LEVEL: usize = 16 * 1024;

/// One pair of documents plus its option overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    pub left: Source,
    pub right: Source,
    /// Extra ignore entries, united with the base ignore-list
    pub ignored_properties: Vec<String>,
    /// Replaces the base threshold when set
    pub threshold: Option<f64>,
    pub label: Option<String>,
}

impl BatchItem {
    pub fn new(left: Source, right: Source) -> Self {
        Self {
            left,
            right,
            ignored_properties: Vec::new(),
            threshold: None,
            label: None,
        }
    }

    pub fn inline(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::new(Source::Inline(left.into()), Source::Inline(right.into()))
    }

    pub fn with_ignores<I, S>(mut self, ignored_properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_properties = ignored_properties.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Human-readable name for logs and reports.
    pub fn name(&self, index: usize) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("#{}", index + 1),
        }
    }
}

/// Result slot of one batch item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchOutcome {
    Completed(ComparisonResult),
    Failed {
        error: String,
        /// Input at fault, when the failure was an input one
        #[serde(skip_serializing_if = "Option::is_none")]
        side: Option<Side>,
    },
}

impl BatchOutcome {
    pub fn result(&self) -> Option<&ComparisonResult> {
        match self {
            BatchOutcome::Completed(result) => Some(result),
            BatchOutcome::Failed { .. } => None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.result().is_some_and(|r| r.is_match)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub passed: usize,
    /// Items below threshold plus items that failed to run
    pub failed: usize,
    /// Items that failed to run
    pub errored: usize,
    /// Mean ratio of completed items, 0 when none completed
    pub average_match_ratio: f64,
    /// Wall-clock time of the whole batch
    pub total_processing_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub results: Vec<BatchOutcome>,
    pub summary: BatchSummary,
}

impl BatchResult {
    pub fn all_matched(&self) -> bool {
        self.summary.passed == self.summary.total
    }
}

impl Comparator {
    /// Runs every item in parallel; `results[i]` belongs to `items[i]`.
    ///
    /// Items run on a dedicated pool whose worker stacks are sized for the
    /// comparator's depth limit, so any document the parser accepts can be
    /// walked without overflowing a worker.
    pub fn compare_batch(&self, items: &[BatchItem], base: &ComparisonOptions) -> BatchResult {
        let start = Instant::now();
        let stack_size = worker_stack_size(self.max_depth());
        tracing::debug!(items = items.len(), stack_size, "starting batch comparison");

        let run = || -> Vec<BatchOutcome> {
            items
                .par_iter()
                .enumerate()
                .map(|(index, item)| self.run_item(index, item, base))
                .collect()
        };
        let results = match ThreadPoolBuilder::new().stack_size(stack_size).build() {
            Ok(pool) => pool.install(run),
            Err(err) => {
                tracing::warn!("batch thread pool unavailable, running sequentially: {}", err);
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| self.run_item(index, item, base))
                    .collect()
            }
        };

        let summary = summarize(&results, start.elapsed().as_millis() as u64);
        tracing::info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            "batch comparison completed in {}ms",
            summary.total_processing_time_ms
        );

        BatchResult { results, summary }
    }

    fn run_item(&self, index: usize, item: &BatchItem, base: &ComparisonOptions) -> BatchOutcome {
        let options = base.merged_with(&item.ignored_properties, item.threshold);
        match self.compare_sources(&item.left, &item.right, &options) {
            Ok(result) => BatchOutcome::Completed(result),
            Err(err) => {
                tracing::warn!(item = %item.name(index), "comparison failed: {}", err);
                BatchOutcome::Failed {
                    error: err.to_string(),
                    side: err.side(),
                }
            }
        }
    }
}

fn worker_stack_size(max_depth: usize) -> usize {
    BASE_STACK_SIZE.saturating_add(max_depth.saturating_mul(STACK_PER_LEVEL))
}

/// Runs a batch with default parser and diff settings.
pub fn compare_batch(items: &[BatchItem], base: &ComparisonOptions) -> BatchResult {
    Comparator::default().compare_batch(items, base)
}

fn summarize(results: &[BatchOutcome], total_processing_time_ms: u64) -> BatchSummary {
    let total = results.len();
    let passed = results.iter().filter(|r| r.is_match()).count();
    let ratios: Vec<f64> = results
        .iter()
        .filter_map(BatchOutcome::result)
        .map(|r| r.match_ratio)
        .collect();

    let average_match_ratio = if ratios.is_empty() {
        0.0
    } else {
        round2(ratios.iter().sum::<f64>() / ratios.len() as f64)
    };

    BatchSummary {
        total,
        passed,
        failed: total - passed,
        errored: total - ratios.len(),
        average_match_ratio,
        total_processing_time_ms,
    }
}
