//! Textual formula parsing.
//!
//! [`SimpleParser`] is a naive splitter, not a precedence parser: the first
//! operator symbol found in the text (tried in a fixed priority order) splits
//! the whole input into operands, which parse recursively. That keeps the
//! grammar tiny and makes `render` output re-parseable.

use crate::error::ParseError;
use crate::expr::Expr;

/// Turns formula text into an expression tree.
pub trait Parser {
    fn parse(&self, input: &str) -> Result<Expr, ParseError>;
}

/// Symbols in split priority order. Leftmost in this list wins, so `1+2*3`
/// becomes `(1) + (2*3)`.
const PRIORITY: [&str; 6] = ["=", "<", "+", "-", "*", "/"];

/// The naive left-to-right formula parser.
///
/// - empty or whitespace-only text is the empty expression
/// - an integer literal is a constant
/// - text containing an operator symbol splits on every occurrence of it
/// - alphanumeric text is a reference
/// - anything else fails to parse
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleParser;

impl Parser for SimpleParser {
    fn parse(&self, input: &str) -> Result<Expr, ParseError> {
        let input = input.trim();

        if input.is_empty() {
            return Ok(Expr::Empty);
        }

        if let Ok(n) = input.parse::<i64>() {
            return Ok(Expr::Constant(n));
        }

        for symbol in PRIORITY {
            if !input.contains(symbol) {
                continue;
            }
            let mut operands = Vec::new();
            for part in input.split(symbol) {
                operands.push(self.parse(part)?);
            }
            match Expr::operator(symbol, operands) {
                Ok(expr) => return Ok(expr),
                // Try the next symbol in priority order.
                Err(_) => continue,
            }
        }

        if input.chars().all(char::is_alphanumeric) {
            return Expr::reference(input).map_err(|_| ParseError::new(input));
        }

        Err(ParseError::new(input))
    }
}
