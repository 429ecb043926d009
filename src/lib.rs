//! XMLCMP - Structural comparison of XML documents.
//!
//! This library parses two XML documents into trees, walks them in lock-step
//! and reports every difference by kind and dotted path. Differences matching
//! an ignore-list are still reported but do not count against the match
//! ratio, a 0-100 similarity score judged against a threshold. Batches of
//! comparisons run in parallel with per-item failure isolation.
//!
//! # Example
//!
//! ```no_run
//! use xmlcmp_rs::{format_result, Comparator, ComparisonOptions, OutputFormat, OutputOptions, Source};
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ComparisonOptions::new(["timestamp", "order.id"], 95.0);
//! let result = Comparator::default().compare_sources(
//!     &Source::File(PathBuf::from("expected.xml")),
//!     &Source::File(PathBuf::from("actual.xml")),
//!     &options,
//! )?;
//!
//! let output = format_result(&result, options.threshold, &OutputFormat::Terminal, &OutputOptions::default())?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod compare;
pub mod config;
pub mod diff;
pub mod error;
pub mod ignore;
pub mod output;
pub mod parser;
pub mod path;
pub mod ratio;
pub mod tree;

// Re-export commonly used types for convenience
pub use batch::{compare_batch, BatchItem, BatchOutcome, BatchResult, BatchSummary};
pub use compare::{
    compare_documents, compare_xml, Comparator, ComparisonOptions, ComparisonResult, Source,
    DEFAULT_THRESHOLD,
};
pub use config::{load_manifest, load_settings, BatchManifest, Settings};
pub use diff::{diff_documents, DiffConfig, DiffStats, Difference, DifferenceKind};
pub use error::{
    CompareError, ComparisonError, ConfigError, OutputError, ParseError, Side, XmlCmpError,
};
pub use ignore::IgnoreList;
pub use output::{format_batch, format_error, format_result, OutputFormat, OutputOptions};
pub use parser::{parse_xml, parse_xml_file, ParserOptions, XmlParser};
pub use path::Path;
pub use tree::{Document, Element, Node};
