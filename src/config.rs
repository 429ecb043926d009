//! Settings files and batch manifests.
//!
//! Both are read from JSON, YAML or TOML. The format is detected by file
//! extension (.json, .yaml, .yml, .toml); for any other extension the loader
//! tries JSON, then YAML, then TOML.
//!
//! A batch manifest in TOML looks like:
//!
//! ```toml
//! threshold = 90
//! ignored_properties = ["timestamp"]
//!
//! [[comparisons]]
//! left = "expected/order.xml"
//! right = "actual/order.xml"
//! ignored_properties = ["order.id"]
//!
//! [[comparisons]]
//! left = "expected/invoice.xml"
//! right = "actual/invoice.xml"
//! threshold = 99.5
//! label = "invoice"
//! ```
//!
//! Relative document paths are resolved against the manifest's directory.

use crate::batch::BatchItem;
use crate::compare::{ComparisonOptions, Source, DEFAULT_THRESHOLD};
use crate::error::ConfigError;
use crate::parser::ParserOptions;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Comparison defaults read from a settings file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(alias = "ignoredProperties")]
    pub ignored_properties: Vec<String>,
    pub threshold: Option<f64>,
    #[serde(alias = "trimText")]
    pub trim_text: Option<bool>,
    #[serde(alias = "maxDepth")]
    pub max_depth: Option<usize>,
}

impl Settings {
    pub fn comparison_options(&self) -> ComparisonOptions {
        ComparisonOptions {
            ignored_properties: self.ignored_properties.clone(),
            threshold: self.threshold.unwrap_or(DEFAULT_THRESHOLD),
        }
    }

    pub fn parser_options(&self) -> ParserOptions {
        let defaults = ParserOptions::default();
        ParserOptions {
            trim_text: self.trim_text.unwrap_or(defaults.trim_text),
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            ..defaults
        }
    }
}

/// A list of document pairs to compare in one batch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchManifest {
    #[serde(default, alias = "ignoredProperties")]
    pub ignored_properties: Vec<String>,
    #[serde(default)]
    pub threshold: Option<f64>,
    pub comparisons: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ManifestEntry {
    pub left: PathBuf,
    pub right: PathBuf,
    #[serde(default, alias = "ignoredProperties")]
    pub ignored_properties: Vec<String>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
}

impl BatchManifest {
    /// Converts entries to batch items, resolving paths against `base_dir`.
    pub fn items(&self, base_dir: &Path) -> Vec<BatchItem> {
        self.comparisons
            .iter()
            .map(|entry| BatchItem {
                left: Source::File(base_dir.join(&entry.left)),
                right: Source::File(base_dir.join(&entry.right)),
                ignored_properties: entry.ignored_properties.clone(),
                threshold: entry.threshold,
                label: entry.label.clone(),
            })
            .collect()
    }
}

/// Loads a settings file.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    load_file(path)
}

/// Loads a batch manifest and returns it with its items.
pub fn load_manifest(path: &Path) -> Result<(BatchManifest, Vec<BatchItem>), ConfigError> {
    let manifest: BatchManifest = load_file(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let items = manifest.items(base_dir);
    tracing::debug!(path = %path.display(), items = items.len(), "loaded batch manifest");
    Ok((manifest, items))
}

/// Reads and deserializes a JSON, YAML or TOML file.
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::file_not_found(
            path.to_string_lossy().to_string(),
        ));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::read_error(path.to_string_lossy().to_string(), e))?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase());

    let display = path.to_string_lossy().to_string();
    match extension.as_deref() {
        Some("json") => {
            serde_json::from_str(&content).map_err(|e| ConfigError::json_error(display, e))
        }
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&content).map_err(|e| ConfigError::yaml_error(display, e))
        }
        Some("toml") => toml::from_str(&content).map_err(|e| ConfigError::toml_error(display, e)),
        _ => serde_json::from_str(&content)
            .ok()
            .or_else(|| serde_yaml::from_str(&content).ok())
            .or_else(|| toml::from_str(&content).ok())
            .ok_or_else(|| ConfigError::unknown_format(display)),
    }
}
