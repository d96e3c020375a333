//! Fluent construction of selector mappings, mirroring the builder notation.
//!
//! ```
//! use droidloc::UiSelector;
//!
//! let selector = UiSelector::new()
//!     .class_name("android.widget.LinearLayout")
//!     .child_selector(UiSelector::new().text("Item"))
//!     .build()
//!     .unwrap();
//! assert_eq!(selector.depth(), 2);
//! ```

use crate::attributes::{AttributeKey, AttributeValue, Relation};
use crate::builder::generator::write_selector;
use crate::config::LocatorConfig;
use crate::errors::ValidationError;
use crate::selector::SelectorMap;
use crate::validator;
use std::fmt;

macro_rules! string_setters {
    ($($name:ident => $key:ident),* $(,)?) => {
        $(
            pub fn $name(self, value: impl Into<String>) -> Self {
                self.set(AttributeKey::$key, AttributeValue::String(value.into()))
            }
        )*
    };
}

macro_rules! bool_setters {
    ($($name:ident => $key:ident),* $(,)?) => {
        $(
            pub fn $name(self, value: bool) -> Self {
                self.set(AttributeKey::$key, AttributeValue::Boolean(value))
            }
        )*
    };
}

/// Chainable selector builder.
///
/// Setting the same attribute twice, or two variants of one attribute,
/// is remembered and reported by [`UiSelector::build`].
#[derive(Debug, Clone, Default)]
pub struct UiSelector {
    selector: SelectorMap,
    error: Option<ValidationError>,
}

impl UiSelector {
    pub fn new() -> Self {
        Self::default()
    }

    string_setters! {
        text => Text,
        text_contains => TextContains,
        text_starts_with => TextStartsWith,
        text_matches => TextMatches,
        description => Description,
        description_contains => DescriptionContains,
        description_starts_with => DescriptionStartsWith,
        description_matches => DescriptionMatches,
        resource_id => ResourceId,
        resource_id_matches => ResourceIdMatches,
        package_name => Package,
        package_name_matches => PackageMatches,
        class_name => ClassName,
        class_name_matches => ClassNameMatches,
    }

    bool_setters! {
        checkable => Checkable,
        checked => Checked,
        clickable => Clickable,
        enabled => Enabled,
        focusable => Focusable,
        focused => Focused,
        long_clickable => LongClickable,
        scrollable => Scrollable,
        selected => Selected,
        password => Password,
    }

    pub fn index(self, value: u32) -> Self {
        self.set(AttributeKey::Index, AttributeValue::Integer(value))
    }

    pub fn instance(self, value: u32) -> Self {
        self.set(AttributeKey::Instance, AttributeValue::Integer(value))
    }

    pub fn child_selector(self, nested: UiSelector) -> Self {
        self.relate(Relation::ChildSelector, nested)
    }

    pub fn from_parent(self, nested: UiSelector) -> Self {
        self.relate(Relation::FromParent, nested)
    }

    pub fn sibling(self, nested: UiSelector) -> Self {
        self.relate(Relation::Sibling, nested)
    }

    /// Finishes the chain, returning the first recorded error or the
    /// validated mapping.
    pub fn build(self) -> Result<SelectorMap, ValidationError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        validator::validate(&self.selector)?;
        Ok(self.selector)
    }

    /// The mapping built so far, unvalidated.
    pub fn as_selector(&self) -> &SelectorMap {
        &self.selector
    }

    fn set(mut self, key: AttributeKey, value: AttributeValue) -> Self {
        if self.error.is_none() {
            match validator::check_insert(&self.selector, key) {
                Ok(()) => {
                    self.selector.insert(key, value);
                }
                Err(err) => self.error = Some(err),
            }
        }
        self
    }

    fn relate(mut self, relation: Relation, nested: UiSelector) -> Self {
        if self.error.is_some() {
            return self;
        }
        if let Some((first, _)) = self.selector.relation() {
            self.error = Some(ValidationError::MultipleRelations {
                first: first.to_string(),
                second: relation.to_string(),
            });
            return self;
        }
        match nested.error {
            Some(err) => self.error = Some(err),
            None => self.selector.set_relation(relation, nested.selector),
        }
        self
    }
}

impl From<SelectorMap> for UiSelector {
    fn from(selector: SelectorMap) -> Self {
        Self {
            selector,
            error: None,
        }
    }
}

/// Renders the builder string with the default `UiSelector` class.
impl fmt::Display for UiSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_selector(&self.selector, &LocatorConfig::default(), &mut out)
            .map_err(|_| fmt::Error)?;
        write!(f, "{out};")
    }
}
