//! Minimal path-expression syntax tree.
//!
//! Every node renders back to path text through `Display`, which error
//! messages use to point at the failing fragment.

use std::fmt;

/// An absolute location path: `//*[@text='OK']/..//*[@class='Button']`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPath {
    pub steps: Vec<Step>,
}

/// The separator written before a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `/`
    Child,
    /// `//`
    Descendant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    Parent,
    Ancestor,
    AncestorOrSelf,
    FollowingSibling,
    PrecedingSibling,
    Following,
    Preceding,
    SelfAxis,
    Attribute,
}

impl Axis {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "child" => Axis::Child,
            "descendant" => Axis::Descendant,
            "descendant-or-self" => Axis::DescendantOrSelf,
            "parent" => Axis::Parent,
            "ancestor" => Axis::Ancestor,
            "ancestor-or-self" => Axis::AncestorOrSelf,
            "following-sibling" => Axis::FollowingSibling,
            "preceding-sibling" => Axis::PrecedingSibling,
            "following" => Axis::Following,
            "preceding" => Axis::Preceding,
            "self" => Axis::SelfAxis,
            "attribute" => Axis::Attribute,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::Child => "child",
            Axis::Descendant => "descendant",
            Axis::DescendantOrSelf => "descendant-or-self",
            Axis::Parent => "parent",
            Axis::Ancestor => "ancestor",
            Axis::AncestorOrSelf => "ancestor-or-self",
            Axis::FollowingSibling => "following-sibling",
            Axis::PrecedingSibling => "preceding-sibling",
            Axis::Following => "following",
            Axis::Preceding => "preceding",
            Axis::SelfAxis => "self",
            Axis::Attribute => "attribute",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// `*`
    Any,
    /// An element name such as `android.widget.Button`
    Name(String),
    /// `node()`
    Node,
    /// `text()`
    Text,
}

impl fmt::Display for NodeTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeTest::Any => f.write_str("*"),
            NodeTest::Name(name) => f.write_str(name),
            NodeTest::Node => f.write_str("node()"),
            NodeTest::Text => f.write_str("text()"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub separator: Separator,
    pub axis: Axis,
    pub node_test: NodeTest,
    pub predicates: Vec<Expr>,
    /// Written as `.`, `..` or `@name`
    pub abbreviated: bool,
    /// Byte offset of the step in the source
    pub position: usize,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.separator {
            Separator::Child => f.write_str("/")?,
            Separator::Descendant => f.write_str("//")?,
        }
        match (self.abbreviated, self.axis) {
            (true, Axis::Parent) => f.write_str("..")?,
            (true, Axis::SelfAxis) => f.write_str(".")?,
            (true, Axis::Attribute) => write!(f, "@{}", self.node_test)?,
            (_, Axis::Child) => write!(f, "{}", self.node_test)?,
            (_, axis) => write!(f, "{}::{}", axis.name(), self.node_test)?,
        }
        for predicate in &self.predicates {
            write!(f, "[{predicate}]")?;
        }
        Ok(())
    }
}

impl fmt::Display for LocationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Equal => "=",
            CompareOp::NotEqual => "!=",
            CompareOp::LessThan => "<",
            CompareOp::LessThanEqual => "<=",
            CompareOp::GreaterThan => ">",
            CompareOp::GreaterThanEqual => ">=",
        }
    }
}

/// Predicate expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Or(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    /// `@name`
    Attribute(String),
    Literal(String),
    Number(f64),
    /// A relative location such as `node` or `*` used as a value
    Path(String),
}

impl Expr {
    /// True if `and`/`or` appears anywhere in the expression.
    pub fn has_logical_operator(&self) -> bool {
        match self {
            Expr::Or(..) | Expr::And(..) => true,
            Expr::Compare { left, right, .. } => {
                left.has_logical_operator() || right.has_logical_operator()
            }
            Expr::Call { args, .. } => args.iter().any(Expr::has_logical_operator),
            _ => false,
        }
    }

    /// The integer value of a whole-number literal.
    pub fn as_integer(&self) -> Option<u64> {
        match self {
            Expr::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= u32::MAX as f64 => {
                Some(*n as u64)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Or(left, right) => write!(f, "{left} or {right}"),
            Expr::And(left, right) => {
                write_operand(f, left)?;
                f.write_str(" and ")?;
                write_operand(f, right)
            }
            Expr::Compare { op, left, right } => write!(f, "{left}{}{right}", op.symbol()),
            Expr::Call { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expr::Attribute(name) => write!(f, "@{name}"),
            Expr::Literal(value) if value.contains('\'') => write!(f, "\"{value}\""),
            Expr::Literal(value) => write!(f, "'{value}'"),
            Expr::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            Expr::Number(n) => write!(f, "{n}"),
            Expr::Path(path) => f.write_str(path),
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
    match expr {
        Expr::Or(..) => write!(f, "({expr})"),
        _ => write!(f, "{expr}"),
    }
}
