//! Expression tree data structures and validated construction.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InvalidExpr;

/// A formula stored in a spreadsheet cell.
///
/// `Empty` and `Constant` are terminal. `Reference` names another cell or a
/// built-in and only gains meaning against an [`Environment`]. `Op` combines
/// one or more sub-expressions with an operator from the fixed set.
///
/// [`Environment`]: super::Environment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    Empty,
    Constant(i64),
    Reference(String),
    Op(Op, Vec<Expr>),
}

/// The operator set: `+ - * / < =`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Plus,
    Minus,
    Times,
    Divide,
    Less,
    Equal,
}

impl Op {
    /// Look up an operator by its textual symbol.
    pub fn from_symbol(symbol: &str) -> Option<Op> {
        match symbol {
            "+" => Some(Op::Plus),
            "-" => Some(Op::Minus),
            "*" => Some(Op::Times),
            "/" => Some(Op::Divide),
            "<" => Some(Op::Less),
            "=" => Some(Op::Equal),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Op::Plus => "+",
            Op::Minus => "-",
            Op::Times => "*",
            Op::Divide => "/",
            Op::Less => "<",
            Op::Equal => "=",
        }
    }

    /// Minimum operand count accepted at construction.
    fn arity(&self) -> usize {
        match self {
            Op::Less => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Expr {
    /// Construct a reference to a cell or built-in identifier.
    ///
    /// Rejects the empty identifier.
    pub fn reference(identifier: &str) -> Result<Expr, InvalidExpr> {
        if identifier.is_empty() {
            return Err(InvalidExpr::EmptyIdentifier);
        }
        Ok(Expr::Reference(identifier.to_string()))
    }

    /// Construct an operator node from a textual symbol and operand list.
    ///
    /// Rejects unknown symbols and operand lists shorter than the operator's
    /// arity. This is the single authority on what a legal operator node is;
    /// the parser builds every operator through here.
    pub fn operator(symbol: &str, operands: Vec<Expr>) -> Result<Expr, InvalidExpr> {
        let op = Op::from_symbol(symbol)
            .ok_or_else(|| InvalidExpr::UnknownOperator(symbol.to_string()))?;
        if operands.is_empty() {
            return Err(InvalidExpr::NoOperands);
        }
        if operands.len() < op.arity() {
            return Err(InvalidExpr::NotEnoughOperands {
                symbol: op.symbol(),
                needs: op.arity(),
            });
        }
        Ok(Expr::Op(op, operands))
    }

    /// All identifiers this expression depends on, transitively.
    ///
    /// Operands may themselves be operators; their nested references are
    /// included. Recomputed on every call, nothing is memoized.
    pub fn dependencies(&self) -> HashSet<String> {
        let mut deps = HashSet::new();
        self.collect_dependencies(&mut deps);
        deps
    }

    fn collect_dependencies(&self, deps: &mut HashSet<String>) {
        match self {
            Expr::Empty | Expr::Constant(_) => {}
            Expr::Reference(identifier) => {
                deps.insert(identifier.clone());
            }
            Expr::Op(_, operands) => {
                for operand in operands {
                    operand.collect_dependencies(deps);
                }
            }
        }
    }

    /// The textual form of the expression as shown in a cell.
    pub fn render(&self) -> String {
        match self {
            Expr::Empty => String::new(),
            Expr::Constant(n) => n.to_string(),
            Expr::Reference(identifier) => identifier.clone(),
            Expr::Op(op, operands) => {
                let parts: Vec<String> = operands.iter().map(Expr::render).collect();
                parts.join(&format!(" {} ", op.symbol()))
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_rejects_empty_identifier() {
        assert_eq!(Expr::reference(""), Err(InvalidExpr::EmptyIdentifier));
        assert!(Expr::reference("A1").is_ok());
    }

    #[test]
    fn test_operator_rejects_unknown_symbol() {
        let result = Expr::operator("%", vec![Expr::Constant(1)]);
        assert_eq!(result, Err(InvalidExpr::UnknownOperator("%".to_string())));
    }

    #[test]
    fn test_operator_rejects_no_operands() {
        let result = Expr::operator("+", vec![]);
        assert_eq!(result, Err(InvalidExpr::NoOperands));
    }

    #[test]
    fn test_less_requires_two_operands() {
        let result = Expr::operator("<", vec![Expr::Constant(1)]);
        assert_eq!(
            result,
            Err(InvalidExpr::NotEnoughOperands {
                symbol: "<",
                needs: 2
            })
        );
        assert!(Expr::operator("<", vec![Expr::Constant(1), Expr::Constant(2)]).is_ok());
    }

    #[test]
    fn test_dependencies_terminal_nodes() {
        assert!(Expr::Empty.dependencies().is_empty());
        assert!(Expr::Constant(7).dependencies().is_empty());

        let deps = Expr::reference("A1").unwrap().dependencies();
        assert_eq!(deps.len(), 1);
        assert!(deps.contains("A1"));
    }

    #[test]
    fn test_dependencies_are_transitive() {
        // (A1 + (B2 * C3)) depends on all three, not just the direct operands.
        let inner = Expr::operator(
            "*",
            vec![
                Expr::reference("B2").unwrap(),
                Expr::reference("C3").unwrap(),
            ],
        )
        .unwrap();
        let outer = Expr::operator("+", vec![Expr::reference("A1").unwrap(), inner]).unwrap();

        let deps = outer.dependencies();
        assert_eq!(deps.len(), 3);
        assert!(deps.contains("A1"));
        assert!(deps.contains("B2"));
        assert!(deps.contains("C3"));
    }

    #[test]
    fn test_render() {
        assert_eq!(Expr::Empty.render(), "");
        assert_eq!(Expr::Constant(42).render(), "42");
        assert_eq!(Expr::Constant(-3).render(), "-3");
        assert_eq!(Expr::reference("A1").unwrap().render(), "A1");

        let sum = Expr::operator(
            "+",
            vec![Expr::Constant(1), Expr::reference("B2").unwrap()],
        )
        .unwrap();
        assert_eq!(sum.render(), "1 + B2");
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Expr::Constant(5), Expr::Constant(5));
        assert_ne!(Expr::Constant(5), Expr::Constant(6));
        assert_eq!(
            Expr::reference("A1").unwrap(),
            Expr::reference("A1").unwrap()
        );
        assert_ne!(
            Expr::reference("A1").unwrap(),
            Expr::reference("A2").unwrap()
        );
    }
}
