use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Base attribute names shared by every notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaseAttribute {
    Text,
    Description,
    ResourceId,
    Package,
    ClassName,
    Checkable,
    Checked,
    Clickable,
    Enabled,
    Focusable,
    Focused,
    LongClickable,
    Scrollable,
    Selected,
    Password,
    Index,
    Instance,
}

impl BaseAttribute {
    /// Attribute name as written after `@` in a path expression.
    /// `Instance` has no attribute form, only a positional one.
    pub fn path_name(self) -> Option<&'static str> {
        Some(match self {
            BaseAttribute::Text => "text",
            BaseAttribute::Description => "content-desc",
            BaseAttribute::ResourceId => "resource-id",
            BaseAttribute::Package => "package",
            BaseAttribute::ClassName => "class",
            BaseAttribute::Checkable => "checkable",
            BaseAttribute::Checked => "checked",
            BaseAttribute::Clickable => "clickable",
            BaseAttribute::Enabled => "enabled",
            BaseAttribute::Focusable => "focusable",
            BaseAttribute::Focused => "focused",
            BaseAttribute::LongClickable => "long-clickable",
            BaseAttribute::Scrollable => "scrollable",
            BaseAttribute::Selected => "selected",
            BaseAttribute::Password => "password",
            BaseAttribute::Index => "index",
            BaseAttribute::Instance => return None,
        })
    }

    pub fn value_kind(self) -> ValueKind {
        match self {
            BaseAttribute::Text
            | BaseAttribute::Description
            | BaseAttribute::ResourceId
            | BaseAttribute::Package
            | BaseAttribute::ClassName => ValueKind::String,
            BaseAttribute::Index | BaseAttribute::Instance => ValueKind::Integer,
            _ => ValueKind::Boolean,
        }
    }
}

/// How a string attribute is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MatchKind {
    Exact,
    Contains,
    StartsWith,
    Matches,
}

impl MatchKind {
    /// The path function that expresses this comparison, if any.
    pub fn function(self) -> Option<PathFunction> {
        match self {
            MatchKind::Exact => None,
            MatchKind::Contains => Some(PathFunction::Contains),
            MatchKind::StartsWith => Some(PathFunction::StartsWith),
            MatchKind::Matches => Some(PathFunction::Matches),
        }
    }
}

/// String predicate functions understood in path expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathFunction {
    Contains,
    StartsWith,
    Matches,
}

impl PathFunction {
    pub fn name(self) -> &'static str {
        match self {
            PathFunction::Contains => "contains",
            PathFunction::StartsWith => "starts-with",
            PathFunction::Matches => "matches",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "contains" => Some(PathFunction::Contains),
            "starts-with" => Some(PathFunction::StartsWith),
            "matches" => Some(PathFunction::Matches),
            _ => None,
        }
    }

    pub fn match_kind(self) -> MatchKind {
        match self {
            PathFunction::Contains => MatchKind::Contains,
            PathFunction::StartsWith => MatchKind::StartsWith,
            PathFunction::Matches => MatchKind::Matches,
        }
    }
}

/// Type of value an attribute accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Boolean,
    Integer,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => write!(f, "a string"),
            ValueKind::Boolean => write!(f, "a boolean"),
            ValueKind::Integer => write!(f, "a non-negative integer"),
        }
    }
}

/// Canonical constraint names of a selector mapping.
///
/// Declaration order is the generation order used by every generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKey {
    Text,
    TextContains,
    TextStartsWith,
    TextMatches,
    Description,
    DescriptionContains,
    DescriptionStartsWith,
    DescriptionMatches,
    ResourceId,
    ResourceIdMatches,
    Package,
    PackageMatches,
    ClassName,
    ClassNameMatches,
    Checkable,
    Checked,
    Clickable,
    Enabled,
    Focusable,
    Focused,
    LongClickable,
    Scrollable,
    Selected,
    Password,
    Index,
    Instance,
}

impl AttributeKey {
    pub const ALL: [AttributeKey; 26] = [
        AttributeKey::Text,
        AttributeKey::TextContains,
        AttributeKey::TextStartsWith,
        AttributeKey::TextMatches,
        AttributeKey::Description,
        AttributeKey::DescriptionContains,
        AttributeKey::DescriptionStartsWith,
        AttributeKey::DescriptionMatches,
        AttributeKey::ResourceId,
        AttributeKey::ResourceIdMatches,
        AttributeKey::Package,
        AttributeKey::PackageMatches,
        AttributeKey::ClassName,
        AttributeKey::ClassNameMatches,
        AttributeKey::Checkable,
        AttributeKey::Checked,
        AttributeKey::Clickable,
        AttributeKey::Enabled,
        AttributeKey::Focusable,
        AttributeKey::Focused,
        AttributeKey::LongClickable,
        AttributeKey::Scrollable,
        AttributeKey::Selected,
        AttributeKey::Password,
        AttributeKey::Index,
        AttributeKey::Instance,
    ];

    /// Key as it appears in the JSON form of a mapping.
    pub fn as_str(self) -> &'static str {
        match self {
            AttributeKey::Text => "text",
            AttributeKey::TextContains => "textContains",
            AttributeKey::TextStartsWith => "textStartsWith",
            AttributeKey::TextMatches => "textMatches",
            AttributeKey::Description => "content-desc",
            AttributeKey::DescriptionContains => "content-descContains",
            AttributeKey::DescriptionStartsWith => "content-descStartsWith",
            AttributeKey::DescriptionMatches => "content-descMatches",
            AttributeKey::ResourceId => "resource-id",
            AttributeKey::ResourceIdMatches => "resource-idMatches",
            AttributeKey::Package => "package",
            AttributeKey::PackageMatches => "packageMatches",
            AttributeKey::ClassName => "class",
            AttributeKey::ClassNameMatches => "classMatches",
            AttributeKey::Checkable => "checkable",
            AttributeKey::Checked => "checked",
            AttributeKey::Clickable => "clickable",
            AttributeKey::Enabled => "enabled",
            AttributeKey::Focusable => "focusable",
            AttributeKey::Focused => "focused",
            AttributeKey::LongClickable => "long-clickable",
            AttributeKey::Scrollable => "scrollable",
            AttributeKey::Selected => "selected",
            AttributeKey::Password => "password",
            AttributeKey::Index => "index",
            AttributeKey::Instance => "instance",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    pub fn base(self) -> BaseAttribute {
        match self {
            AttributeKey::Text
            | AttributeKey::TextContains
            | AttributeKey::TextStartsWith
            | AttributeKey::TextMatches => BaseAttribute::Text,
            AttributeKey::Description
            | AttributeKey::DescriptionContains
            | AttributeKey::DescriptionStartsWith
            | AttributeKey::DescriptionMatches => BaseAttribute::Description,
            AttributeKey::ResourceId | AttributeKey::ResourceIdMatches => {
                BaseAttribute::ResourceId
            }
            AttributeKey::Package | AttributeKey::PackageMatches => BaseAttribute::Package,
            AttributeKey::ClassName | AttributeKey::ClassNameMatches => BaseAttribute::ClassName,
            AttributeKey::Checkable => BaseAttribute::Checkable,
            AttributeKey::Checked => BaseAttribute::Checked,
            AttributeKey::Clickable => BaseAttribute::Clickable,
            AttributeKey::Enabled => BaseAttribute::Enabled,
            AttributeKey::Focusable => BaseAttribute::Focusable,
            AttributeKey::Focused => BaseAttribute::Focused,
            AttributeKey::LongClickable => BaseAttribute::LongClickable,
            AttributeKey::Scrollable => BaseAttribute::Scrollable,
            AttributeKey::Selected => BaseAttribute::Selected,
            AttributeKey::Password => BaseAttribute::Password,
            AttributeKey::Index => BaseAttribute::Index,
            AttributeKey::Instance => BaseAttribute::Instance,
        }
    }

    pub fn match_kind(self) -> MatchKind {
        match self {
            AttributeKey::TextContains | AttributeKey::DescriptionContains => MatchKind::Contains,
            AttributeKey::TextStartsWith | AttributeKey::DescriptionStartsWith => {
                MatchKind::StartsWith
            }
            AttributeKey::TextMatches
            | AttributeKey::DescriptionMatches
            | AttributeKey::ResourceIdMatches
            | AttributeKey::PackageMatches
            | AttributeKey::ClassNameMatches => MatchKind::Matches,
            _ => MatchKind::Exact,
        }
    }

    pub fn value_kind(self) -> ValueKind {
        self.base().value_kind()
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar constraint value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    Boolean(bool),
    Integer(u32),
}

impl AttributeValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            AttributeValue::String(_) => ValueKind::String,
            AttributeValue::Boolean(_) => ValueKind::Boolean,
            AttributeValue::Integer(_) => ValueKind::Integer,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => f.write_str(s),
            AttributeValue::Boolean(b) => write!(f, "{b}"),
            AttributeValue::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Boolean(b)
    }
}

impl From<u32> for AttributeValue {
    fn from(n: u32) -> Self {
        AttributeValue::Integer(n)
    }
}

/// Hierarchical relation between two nested mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Relation {
    /// Descendant of the current element
    ChildSelector,
    /// Descendant of the current element's parent
    FromParent,
    /// Following element at the same level
    Sibling,
}

impl Relation {
    pub const ALL: [Relation; 3] = [Relation::ChildSelector, Relation::FromParent, Relation::Sibling];

    pub fn as_str(self) -> &'static str {
        match self {
            Relation::ChildSelector => "childSelector",
            Relation::FromParent => "fromParent",
            Relation::Sibling => "sibling",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == key)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name tables shared by the generators and parsers.
///
/// Holds the 1:1 attribute-to-builder-method mapping, the relation method
/// names and the per-attribute path function support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTable {
    methods: BTreeMap<AttributeKey, String>,
    relation_methods: BTreeMap<Relation, String>,
    functions: BTreeMap<BaseAttribute, Vec<PathFunction>>,
}

impl AttributeTable {
    /// Table for the Android `UiSelector` API.
    pub fn android() -> Self {
        let methods = [
            (AttributeKey::Text, "text"),
            (AttributeKey::TextContains, "textContains"),
            (AttributeKey::TextStartsWith, "textStartsWith"),
            (AttributeKey::TextMatches, "textMatches"),
            (AttributeKey::Description, "description"),
            (AttributeKey::DescriptionContains, "descriptionContains"),
            (AttributeKey::DescriptionStartsWith, "descriptionStartsWith"),
            (AttributeKey::DescriptionMatches, "descriptionMatches"),
            (AttributeKey::ResourceId, "resourceId"),
            (AttributeKey::ResourceIdMatches, "resourceIdMatches"),
            (AttributeKey::Package, "packageName"),
            (AttributeKey::PackageMatches, "packageNameMatches"),
            (AttributeKey::ClassName, "className"),
            (AttributeKey::ClassNameMatches, "classNameMatches"),
            (AttributeKey::Checkable, "checkable"),
            (AttributeKey::Checked, "checked"),
            (AttributeKey::Clickable, "clickable"),
            (AttributeKey::Enabled, "enabled"),
            (AttributeKey::Focusable, "focusable"),
            (AttributeKey::Focused, "focused"),
            (AttributeKey::LongClickable, "longClickable"),
            (AttributeKey::Scrollable, "scrollable"),
            (AttributeKey::Selected, "selected"),
            (AttributeKey::Password, "password"),
            (AttributeKey::Index, "index"),
            (AttributeKey::Instance, "instance"),
        ]
        .into_iter()
        .map(|(key, method)| (key, method.to_string()))
        .collect();

        let relation_methods = Relation::ALL
            .into_iter()
            .map(|r| (r, r.as_str().to_string()))
            .collect();

        let all_string_functions = vec![
            PathFunction::Contains,
            PathFunction::StartsWith,
            PathFunction::Matches,
        ];
        let functions = [
            (BaseAttribute::Text, all_string_functions.clone()),
            (BaseAttribute::Description, all_string_functions),
            (BaseAttribute::ResourceId, vec![PathFunction::Matches]),
            (BaseAttribute::Package, vec![PathFunction::Matches]),
            (BaseAttribute::ClassName, vec![PathFunction::Matches]),
        ]
        .into_iter()
        .collect();

        Self {
            methods,
            relation_methods,
            functions,
        }
    }

    pub fn method_name(&self, key: AttributeKey) -> Option<&str> {
        self.methods.get(&key).map(String::as_str)
    }

    pub fn key_for_method(&self, method: &str) -> Option<AttributeKey> {
        self.methods
            .iter()
            .find(|(_, name)| name.as_str() == method)
            .map(|(key, _)| *key)
    }

    pub fn relation_method(&self, relation: Relation) -> Option<&str> {
        self.relation_methods.get(&relation).map(String::as_str)
    }

    pub fn relation_for_method(&self, method: &str) -> Option<Relation> {
        self.relation_methods
            .iter()
            .find(|(_, name)| name.as_str() == method)
            .map(|(relation, _)| *relation)
    }

    /// Whether `function` may be applied to `base` in a path predicate.
    pub fn supports(&self, base: BaseAttribute, function: PathFunction) -> bool {
        self.functions
            .get(&base)
            .is_some_and(|fns| fns.contains(&function))
    }

    /// Looks up the base attribute behind a path `@name`.
    pub fn base_for_path_name(&self, name: &str) -> Option<BaseAttribute> {
        AttributeKey::ALL
            .into_iter()
            .map(AttributeKey::base)
            .find(|base| base.path_name() == Some(name))
    }

    /// The key holding `base` compared with `kind`, if the key set has one.
    pub fn key_for(&self, base: BaseAttribute, kind: MatchKind) -> Option<AttributeKey> {
        AttributeKey::ALL
            .into_iter()
            .find(|key| key.base() == base && key.match_kind() == kind)
    }
}

impl Default for AttributeTable {
    fn default() -> Self {
        Self::android()
    }
}
