use thiserror::Error;

/// Errors raised while splitting a builder string into tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Unterminated string literal starting at {position}")]
    UnterminatedString { position: usize },

    #[error("Bad escape sequence '\\{escape}' at {position}")]
    BadEscape { escape: char, position: usize },

    #[error("Unexpected character '{ch}' at {position}")]
    UnexpectedChar { ch: char, position: usize },
}

impl LexError {
    pub fn position(&self) -> usize {
        match self {
            LexError::UnterminatedString { position }
            | LexError::BadEscape { position, .. }
            | LexError::UnexpectedChar { position, .. } => *position,
        }
    }
}

/// Errors raised while turning a token stream into a call chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Expected {expected}, found {found} at {position}")]
    ExpectedToken {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("Unexpected {found} at {position}, expected {expected}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("Unbalanced expression: unmatched ')' at {position}")]
    UnbalancedExpression { position: usize },

    #[error("Too many arguments for method '{method}' at {position}")]
    TooManyArguments { method: String, position: usize },

    #[error("Method '{method}' requires an argument at {position}")]
    MissingArgument { method: String, position: usize },

    #[error("Unsupported method '{method}' at {position}")]
    UnsupportedMethod { method: String, position: usize },

    #[error("Invalid number literal '{literal}' at {position}")]
    InvalidNumber { literal: String, position: usize },
}

/// Errors raised when a selector mapping breaks its structural rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Selector mapping cannot be empty")]
    EmptySelector,

    #[error("Selector mapping must be an object, found {found}")]
    WrongTopLevelType { found: String },

    #[error("Conflicting attribute variants: '{first}' and '{second}'")]
    ConflictingAttributeVariants { first: String, second: String },

    #[error("Attribute '{key}' is given more than once")]
    DuplicateAttribute { key: String },

    #[error("Hierarchical attribute '{relation}' must have a mapping value, found {found}")]
    HierarchicalValueTypeError { relation: String, found: String },

    #[error("Only one hierarchical relation is allowed per level: '{first}' and '{second}'")]
    MultipleRelations { first: String, second: String },

    #[error("Unknown attribute '{key}'")]
    UnknownAttribute { key: String },

    #[error("Attribute '{key}' expects {expected}, found {found}")]
    InvalidValueType {
        key: String,
        expected: String,
        found: String,
    },
}

/// Errors raised while translating between notations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Invalid path expression: {message} at {position}")]
    InvalidExpression { message: String, position: usize },

    #[error("Logical operators are not supported: {expression}")]
    LogicalOperatorsUnsupported { expression: String },

    #[error("Unsupported attribute '{attribute}'")]
    UnsupportedAttribute { attribute: String },

    #[error("Function '{function}' is not supported for attribute '{attribute}'")]
    FunctionNotSupportedForAttribute { function: String, attribute: String },

    #[error("Attribute presence predicate is not supported for '{attribute}'")]
    AttributePresenceNotSupported { attribute: String },

    #[error("Unsupported function '{function}'")]
    UnsupportedFunction { function: String },

    #[error("Unsupported comparison operator '{operator}' in {expression}")]
    UnsupportedComparisonOperator { operator: String, expression: String },

    #[error("Unsupported predicate: {predicate}")]
    UnsupportedPredicate { predicate: String },

    #[error("Unsupported path step '{node}': {reason}")]
    UnsupportedNode { node: String, reason: String },

    #[error("Invalid value '{value}' for attribute '{attribute}'")]
    InvalidValue { attribute: String, value: String },

    #[error("Unbalanced composition, missing ')' in {expression}")]
    UnbalancedComposition { expression: String },
}

/// Umbrella error returned by every public conversion.
#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Invalid JSON mapping: {0}")]
    Json(#[from] serde_json::Error),
}
