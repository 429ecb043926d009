//! Custom error types for xmlcmp.

/// Failure to turn raw text into a [`Document`](crate::tree::Document).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Malformed XML at byte {position}: {message}")]
    Syntax { message: String, position: u64 },

    #[error("Document has no root element")]
    Empty,

    #[error("Document has more than one root element (second root <{name}>)")]
    MultipleRoots { name: String },

    #[error("Text content outside the root element: {text:?}")]
    TextOutsideRoot { text: String },

    #[error("Element nesting exceeds the maximum depth of {limit}")]
    DepthExceeded { limit: usize },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read file {path}: {message}")]
    Read { path: String, message: String },
}

/// Failure while walking two parsed trees.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComparisonError {
    #[error("Comparison exceeded the maximum depth of {limit} at {path}")]
    DepthExceeded { path: String, limit: usize },
}

/// Invalid options, settings files or batch manifests.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Threshold must be a number between 0 and 100, got {value}")]
    InvalidThreshold { value: f64 },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read file {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    YamlError {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not detect file format for {path}")]
    UnknownFormat { path: String },
}

/// Which input of a pair an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    First,
    Second,
}

/// Failure of a single comparison, telling apart which input was at fault.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompareError {
    #[error("First document is invalid: {0}")]
    InvalidFirst(#[source] ParseError),

    #[error("Second document is invalid: {0}")]
    InvalidSecond(#[source] ParseError),

    #[error(transparent)]
    Comparison(#[from] ComparisonError),

    #[error("Invalid comparison options: {message}")]
    Options { message: String },
}

impl CompareError {
    pub fn invalid(side: Side, source: ParseError) -> Self {
        match side {
            Side::First => Self::InvalidFirst(source),
            Side::Second => Self::InvalidSecond(source),
        }
    }

    /// The input responsible for the failure, if the failure was an input one.
    pub fn side(&self) -> Option<Side> {
        match self {
            Self::InvalidFirst(_) => Some(Side::First),
            Self::InvalidSecond(_) => Some(Side::Second),
            _ => None,
        }
    }
}

impl From<ConfigError> for CompareError {
    fn from(err: ConfigError) -> Self {
        Self::Options {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to serialize to JSON: {source}")]
    JsonSerializationError {
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum XmlCmpError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compare(#[from] CompareError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl ParseError {
    pub fn syntax(message: impl Into<String>, position: u64) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn read_error(path: impl Into<String>, source: &std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            message: source.to_string(),
        }
    }
}

impl ConfigError {
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn read_error(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    pub fn json_error(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonError {
            path: path.into(),
            source,
        }
    }

    pub fn yaml_error(path: impl Into<String>, source: serde_yaml::Error) -> Self {
        Self::YamlError {
            path: path.into(),
            source,
        }
    }

    pub fn toml_error(path: impl Into<String>, source: toml::de::Error) -> Self {
        Self::TomlError {
            path: path.into(),
            source,
        }
    }

    pub fn unknown_format(path: impl Into<String>) -> Self {
        Self::UnknownFormat { path: path.into() }
    }
}
