//! Builder for [`Sheet`] instances.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use slate_engine::{CellLocation, Expr, Parser};

use super::Sheet;

/// A built-in identifier that would shadow a cell.
///
/// The identifier space is shared between built-ins and cell coordinates;
/// disjointness is enforced here, at configuration time, rather than by
/// lookup order at evaluation time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("built-in `{0}` is a valid cell location")]
pub struct BuiltinCollision(pub String);

/// Collects a parser, a default expression, and named built-ins, then stamps
/// out sheets.
///
/// Every sheet receives its own copy of the built-in table, so registering
/// more built-ins after a sheet is built never affects it.
pub struct SheetBuilder {
    parser: Arc<dyn Parser>,
    default: Expr,
    builtins: HashMap<String, Expr>,
}

impl std::fmt::Debug for SheetBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetBuilder")
            .field("default", &self.default)
            .field("builtins", &self.builtins)
            .finish_non_exhaustive()
    }
}

impl SheetBuilder {
    pub fn new(parser: Arc<dyn Parser>, default: Expr) -> SheetBuilder {
        SheetBuilder {
            parser,
            default,
            builtins: HashMap::new(),
        }
    }

    /// Register a built-in expression available to all cells of sheets built
    /// from here on.
    ///
    /// Rejects identifiers that parse as a cell location.
    pub fn include_builtin(
        mut self,
        identifier: &str,
        expr: Expr,
    ) -> Result<SheetBuilder, BuiltinCollision> {
        if CellLocation::parse(identifier).is_some() {
            return Err(BuiltinCollision(identifier.to_string()));
        }
        self.builtins.insert(identifier.to_string(), expr);
        Ok(self)
    }

    /// Construct an empty sheet of the given dimensions.
    pub fn empty(&self, rows: usize, columns: usize) -> Sheet {
        Sheet::new(
            self.parser.clone(),
            self.builtins.clone(),
            self.default.clone(),
            rows,
            columns,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slate_engine::SimpleParser;

    fn builder() -> SheetBuilder {
        SheetBuilder::new(Arc::new(SimpleParser), Expr::Empty)
    }

    #[test]
    fn test_builtin_collision_rejected() {
        let result = builder().include_builtin("B2", Expr::Constant(1));
        assert_eq!(result.unwrap_err(), BuiltinCollision("B2".to_string()));
    }

    #[test]
    fn test_non_location_identifiers_accepted() {
        // Lowercase and multi-letter names never parse as locations.
        builder()
            .include_builtin("b2", Expr::Constant(1))
            .unwrap()
            .include_builtin("hundred", Expr::Constant(100))
            .unwrap()
            .include_builtin("AA1", Expr::Constant(2))
            .unwrap();
    }

    #[test]
    fn test_builtins_snapshot_at_build_time() {
        let builder = builder().include_builtin("ten", Expr::Constant(10)).unwrap();
        let mut early = builder.empty(1, 1);
        let builder = builder.include_builtin("late", Expr::Constant(1)).unwrap();
        let mut late = builder.empty(1, 1);

        let a0 = CellLocation::new(0, 0);
        // Both sheets see "ten"; only the later one sees "late".
        early.insert(a0, Expr::reference("ten").unwrap()).unwrap();
        assert_eq!(early.evaluate(a0), Ok(Expr::Constant(10)));

        late.insert(a0, Expr::reference("late").unwrap()).unwrap();
        assert_eq!(late.evaluate(a0), Ok(Expr::Constant(1)));

        // "late" is unbound in the earlier sheet.
        early.insert(a0, Expr::reference("late").unwrap()).unwrap();
        assert_eq!(
            early.evaluate(a0),
            Ok(Expr::Reference("late".to_string()))
        );
    }
}
