use crate::attributes::AttributeTable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How the `index` attribute is written into a path expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexStyle {
    /// `[@index=N]`, the value written as is
    #[default]
    Attribute,
    /// `[position()=N+1]`
    Position,
}

/// Tunable parts of the notations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct LocatorOptions {
    /// Class named by the builder constructor, `new <class>()`.
    pub builder_class: String,
    /// Whether a top-level builder string must end with `;`.
    pub require_terminator: bool,
    pub index_style: IndexStyle,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            builder_class: "UiSelector".to_string(),
            require_terminator: true,
            index_style: IndexStyle::Attribute,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable configuration handed to converters at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatorConfig {
    pub options: LocatorOptions,
    pub table: AttributeTable,
}

impl LocatorConfig {
    pub fn new(options: LocatorOptions) -> Self {
        Self {
            options,
            table: AttributeTable::android(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let options: LocatorOptions = serde_json::from_str(json)?;
        Ok(Self::new(options))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Constructor prefix of a builder string, e.g. `new UiSelector()`.
    pub fn constructor(&self) -> String {
        format!("new {}()", self.options.builder_class)
    }
}
