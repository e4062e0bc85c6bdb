//! Expression evaluation against an identifier environment.
//!
//! Evaluation is a single reduction chain: references resolve through the
//! environment until a non-reference is reached, operators reduce every
//! operand to a constant and apply their numeric rule. A visited-identifier
//! set guards reference resolution, so a direct or indirect self-reference
//! fails with a circular-reference error instead of recursing forever.

use std::collections::{HashMap, HashSet};

use crate::error::EvalError;

use super::ast::{Expr, Op};

/// Identifier bindings consulted when resolving [`Expr::Reference`] nodes.
///
/// Keys are cell coordinates in textual form (`A0`, `B3`) or built-in names.
pub type Environment = HashMap<String, Expr>;

impl Expr {
    /// The numeric value of an already-reduced expression.
    ///
    /// Only a `Constant` has one; everything else is a type error. This is
    /// the pure accessor, distinct from environment-aware evaluation.
    pub fn as_number(&self) -> Result<i64, EvalError> {
        match self {
            Expr::Constant(n) => Ok(*n),
            Expr::Empty => Err(EvalError::NotNumeric {
                found: "an empty cell".to_string(),
            }),
            other => Err(EvalError::NotNumeric {
                found: format!("`{}`", other.render()),
            }),
        }
    }

    /// Evaluate this expression against `env`.
    ///
    /// - `Empty` and `Constant` return themselves.
    /// - An unbound `Reference` returns itself unchanged; a bound one
    ///   evaluates whatever the environment holds for it.
    /// - `Op` requires every operand to reduce to a `Constant` and wraps the
    ///   applied result in a new `Constant`.
    pub fn eval(&self, env: &Environment) -> Result<Expr, EvalError> {
        self.eval_guarded(env, &mut HashSet::new())
    }

    fn eval_guarded(
        &self,
        env: &Environment,
        visiting: &mut HashSet<String>,
    ) -> Result<Expr, EvalError> {
        match self {
            Expr::Empty | Expr::Constant(_) => Ok(self.clone()),
            Expr::Reference(identifier) => {
                let Some(bound) = env.get(identifier) else {
                    return Ok(self.clone());
                };
                if !visiting.insert(identifier.clone()) {
                    return Err(EvalError::CircularReference(identifier.clone()));
                }
                let result = bound.eval_guarded(env, visiting);
                visiting.remove(identifier);
                result
            }
            Expr::Op(op, operands) => {
                let mut reduced = Vec::with_capacity(operands.len());
                for operand in operands {
                    reduced.push(operand.eval_guarded(env, visiting)?.as_number()?);
                }
                op.apply(&reduced).map(Expr::Constant)
            }
        }
    }
}

impl Op {
    /// Apply the operator's numeric rule to a reduced operand list.
    ///
    /// Arithmetic wraps on overflow. The list is never empty; construction
    /// enforces the arity.
    pub(crate) fn apply(&self, args: &[i64]) -> Result<i64, EvalError> {
        debug_assert!(!args.is_empty());
        match self {
            Op::Plus => Ok(args.iter().fold(0i64, |acc, n| acc.wrapping_add(*n))),
            Op::Minus => Ok(args[1..].iter().fold(args[0], |acc, n| acc.wrapping_sub(*n))),
            Op::Times => Ok(args.iter().fold(1i64, |acc, n| acc.wrapping_mul(*n))),
            Op::Divide => {
                let mut result = args[0];
                for n in &args[1..] {
                    if *n == 0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    result = result.wrapping_div(*n);
                }
                Ok(result)
            }
            Op::Less => Ok(args.windows(2).all(|pair| pair[0] < pair[1]) as i64),
            Op::Equal => Ok(args.iter().all(|n| *n == args[0]) as i64),
        }
    }
}
