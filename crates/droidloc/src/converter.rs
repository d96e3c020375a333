use crate::builder;
use crate::config::LocatorConfig;
use crate::errors::{ConversionError, LocatorError};
use crate::path::{self, PathTranslator};
use crate::selector::SelectorMap;
use crate::validator;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// The three interchangeable locator notations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notation {
    /// JSON form of a [`SelectorMap`]
    Mapping,
    /// `new UiSelector().text("OK");`
    Builder,
    /// `//*[@text='OK']`
    Path,
}

impl Notation {
    /// Guesses the notation of raw text from its first character.
    pub fn detect(input: &str) -> Self {
        match input.trim_start().chars().next() {
            Some('{') => Notation::Mapping,
            Some('/') | Some('(') => Notation::Path,
            _ => Notation::Builder,
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Notation::Mapping => "mapping",
            Notation::Builder => "builder",
            Notation::Path => "path",
        };
        f.write_str(name)
    }
}

/// A locator in any notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Mapping(SelectorMap),
    Builder(String),
    Path(String),
}

impl Locator {
    /// Classifies raw text with [`Notation::detect`]. Mapping JSON is
    /// decoded and validated here; the string notations are kept as is.
    pub fn detect(input: &str) -> Result<Self, LocatorError> {
        Self::with_notation(input, Notation::detect(input))
    }

    pub fn with_notation(input: &str, notation: Notation) -> Result<Self, LocatorError> {
        Ok(match notation {
            Notation::Mapping => {
                let value: serde_json::Value = serde_json::from_str(input)?;
                Locator::Mapping(validator::selector_from_json(&value)?)
            }
            Notation::Builder => Locator::Builder(input.trim().to_string()),
            Notation::Path => Locator::Path(input.trim().to_string()),
        })
    }

    pub fn notation(&self) -> Notation {
        match self {
            Locator::Mapping(_) => Notation::Mapping,
            Locator::Builder(_) => Notation::Builder,
            Locator::Path(_) => Notation::Path,
        }
    }
}

impl From<SelectorMap> for Locator {
    fn from(selector: SelectorMap) -> Self {
        Locator::Mapping(selector)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Mapping(selector) => write!(f, "{selector}"),
            Locator::Builder(text) | Locator::Path(text) => f.write_str(text),
        }
    }
}

/// Converts locators between notations.
///
/// Holds only the shared, immutable configuration, so one converter can be
/// used from many threads at once.
#[derive(Debug, Clone, Default)]
pub struct LocatorConverter {
    config: Arc<LocatorConfig>,
}

impl LocatorConverter {
    pub fn new(config: LocatorConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn with_shared_config(config: Arc<LocatorConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    pub fn validate(&self, selector: &SelectorMap) -> Result<(), LocatorError> {
        Ok(validator::validate(selector)?)
    }

    /// Decodes and validates the JSON form of a mapping.
    pub fn parse_mapping(&self, json: &str) -> Result<SelectorMap, LocatorError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Ok(validator::selector_from_json(&value)?)
    }

    #[instrument(level = "debug", skip(self, selector), fields(selector = %selector))]
    pub fn mapping_to_path(&self, selector: &SelectorMap) -> Result<String, LocatorError> {
        let out = path::to_path_expression(selector, &self.config)?;
        debug!(output = %out, "generated path expression");
        Ok(out)
    }

    #[instrument(level = "debug", skip(self, selector), fields(selector = %selector))]
    pub fn mapping_to_builder_string(&self, selector: &SelectorMap) -> Result<String, LocatorError> {
        let out = builder::to_builder_string(selector, &self.config)?;
        debug!(output = %out, "generated builder string");
        Ok(out)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn builder_string_to_mapping(&self, input: &str) -> Result<SelectorMap, LocatorError> {
        let selector = builder::parse_selector(input, &self.config)?;
        debug!(depth = selector.depth(), "parsed builder string");
        Ok(selector)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn builder_string_to_path(&self, input: &str) -> Result<String, LocatorError> {
        let selector = builder::parse_selector(input, &self.config)?;
        path::to_path_expression(&selector, &self.config)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn path_to_mapping(&self, input: &str) -> Result<SelectorMap, LocatorError> {
        let ast = path::parse_path(input).map_err(ConversionError::from)?;
        let selector = PathTranslator::new(&self.config).to_selector(&ast)?;
        debug!(depth = selector.depth(), "translated path expression");
        Ok(selector)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn path_to_builder_string(&self, input: &str) -> Result<String, LocatorError> {
        let ast = path::parse_path(input).map_err(ConversionError::from)?;
        PathTranslator::new(&self.config).to_builder_string(&ast)
    }

    pub fn to_mapping(&self, locator: &Locator) -> Result<SelectorMap, LocatorError> {
        match locator {
            Locator::Mapping(selector) => {
                self.validate(selector)?;
                Ok(selector.clone())
            }
            Locator::Builder(text) => self.builder_string_to_mapping(text),
            Locator::Path(text) => self.path_to_mapping(text),
        }
    }

    pub fn to_path(&self, locator: &Locator) -> Result<String, LocatorError> {
        match locator {
            Locator::Mapping(selector) => self.mapping_to_path(selector),
            Locator::Builder(text) => self.builder_string_to_path(text),
            Locator::Path(text) => {
                // Normalize through the mapping so the output is canonical.
                let selector = self.path_to_mapping(text)?;
                self.mapping_to_path(&selector)
            }
        }
    }

    pub fn to_builder_string(&self, locator: &Locator) -> Result<String, LocatorError> {
        match locator {
            Locator::Mapping(selector) => self.mapping_to_builder_string(selector),
            Locator::Builder(text) => {
                let selector = self.builder_string_to_mapping(text)?;
                self.mapping_to_builder_string(&selector)
            }
            Locator::Path(text) => self.path_to_builder_string(text),
        }
    }

    /// Converts `locator` into `target`.
    pub fn convert(&self, locator: &Locator, target: Notation) -> Result<Locator, LocatorError> {
        Ok(match target {
            Notation::Mapping => Locator::Mapping(self.to_mapping(locator)?),
            Notation::Builder => Locator::Builder(self.to_builder_string(locator)?),
            Notation::Path => Locator::Path(self.to_path(locator)?),
        })
    }
}
