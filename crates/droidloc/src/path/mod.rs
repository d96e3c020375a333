//! The path-expression notation: `//*[@text='OK']/..//*[@class='Button']`

pub mod ast;
pub mod generator;
pub mod lexer;
pub mod parser;
pub mod translator;

pub use ast::{Axis, CompareOp, Expr, LocationPath, NodeTest, Separator, Step};
pub use generator::to_path_expression;
pub use lexer::PathSyntaxError;
pub use parser::parse_path;
pub use translator::PathTranslator;

use crate::errors::ConversionError;

impl From<PathSyntaxError> for ConversionError {
    fn from(err: PathSyntaxError) -> Self {
        ConversionError::InvalidExpression {
            message: err.message,
            position: err.position,
        }
    }
}
