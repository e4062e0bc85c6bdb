//! slate_engine - formula expression model and parsing.

pub mod error;
pub mod expr;
pub mod location;
pub mod parser;

pub use error::{EvalError, InvalidExpr, ParseError};
pub use expr::{Environment, Expr, Op};
pub use location::CellLocation;
pub use parser::{Parser, SimpleParser};
