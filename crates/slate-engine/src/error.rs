//! Error types for the expression engine.

use thiserror::Error;

/// Contract violations reported by the expression constructors.
///
/// These are configuration-time faults: a correct parser never lets one
/// reach a sheet update.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidExpr {
    #[error("reference identifier must not be empty")]
    EmptyIdentifier,

    #[error("unknown operator `{0}`")]
    UnknownOperator(String),

    #[error("operator requires at least one operand")]
    NoOperands,

    #[error("`{symbol}` requires at least {needs} operands")]
    NotEnoughOperands { symbol: &'static str, needs: usize },
}

/// Faults raised while evaluating an expression.
///
/// Division by zero is kept as its own variant but travels the same channel
/// as the type errors, so callers recover from all evaluation faults
/// uniformly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("type error: expected a number, found {found}")]
    NotNumeric { found: String },

    #[error("type error: circular reference through `{0}`")]
    CircularReference(String),

    #[error("division by zero")]
    DivisionByZero,
}

/// Formula text that does not conform to any recognized grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized formula `{input}`")]
pub struct ParseError {
    pub input: String,
}

impl ParseError {
    pub fn new(input: &str) -> ParseError {
        ParseError {
            input: input.to_string(),
        }
    }
}
