//! A sheet that shows formulas without ever evaluating them.

use std::collections::HashMap;
use std::sync::Arc;

use slate_engine::{CellLocation, Expr, Parser};

use crate::error::UpdateError;
use crate::view::{SheetUpdate, SheetView, ViewElement};

/// Stores parsed formulas and renders them verbatim.
///
/// Useful as a scaffold while wiring up a frontend: the value view and the
/// formula view are identical because nothing is evaluated, so a reference
/// like `A1` displays as `A1` rather than as the value stored there.
pub struct DisplaySheet {
    parser: Arc<dyn Parser>,
    default: Expr,
    rows: usize,
    columns: usize,
    cells: HashMap<CellLocation, Expr>,
}

impl DisplaySheet {
    pub fn new(parser: Arc<dyn Parser>, default: Expr, rows: usize, columns: usize) -> DisplaySheet {
        assert!(rows > 0 && columns > 0, "sheet dimensions must be positive");
        assert!(columns <= 26, "columns are limited to A-Z");
        DisplaySheet {
            parser,
            default,
            rows,
            columns,
            cells: HashMap::new(),
        }
    }

    fn render(&self, location: CellLocation) -> ViewElement {
        let formula = self.cells.get(&location).unwrap_or(&self.default);
        ViewElement::plain(formula.render())
    }
}

impl SheetView for DisplaySheet {
    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.columns
    }

    fn value_at(&self, row: usize, column: usize) -> ViewElement {
        let location = self.assert_in_bounds(row, column);
        self.render(location)
    }

    /// Identical to the value view; formulas are never evaluated here.
    fn formula_at(&self, row: usize, column: usize) -> ViewElement {
        let location = self.assert_in_bounds(row, column);
        self.render(location)
    }
}

impl SheetUpdate for DisplaySheet {
    fn update(&mut self, row: usize, column: usize, input: &str) -> Result<(), UpdateError> {
        let location = self.assert_in_bounds(row, column);
        let expr = self
            .parser
            .parse(input)
            .map_err(|_| UpdateError::Parse(input.to_string()))?;
        self.cells.insert(location, expr);
        Ok(())
    }
}
