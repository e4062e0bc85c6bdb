//! Sheet operations: atomic updates, evaluation, dependency queries.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use slate_engine::{CellLocation, EvalError, Expr};

use super::Sheet;
use crate::error::UpdateError;
use crate::view::{SheetUpdate, SheetView, ViewElement};

impl Sheet {
    /// Insert an expression at a location, atomically.
    ///
    /// The formula store and the environment are updated together; the new
    /// formula and every cell that transitively uses the location are then
    /// re-evaluated. If any of them fails, both maps are restored to the
    /// pre-insert state and the error is returned, as if the call had never
    /// happened. On success nothing is cached: dependents see the new value
    /// on their next read.
    pub fn insert(&mut self, location: CellLocation, expr: Expr) -> Result<(), EvalError> {
        self.assert_in_bounds(location.row, location.col);

        let identifier = location.to_string();
        let previous = self.cells.insert(location, expr.clone());
        self.env.insert(identifier.clone(), expr);

        if let Err(error) = self.check_from(location) {
            debug!(cell = %identifier, %error, "rolling back update");
            match previous {
                Some(prev) => {
                    self.env.insert(identifier, prev.clone());
                    self.cells.insert(location, prev);
                }
                None => {
                    self.env.remove(&identifier);
                    self.cells.remove(&location);
                }
            }
            return Err(error);
        }

        debug!(cell = %identifier, "updated");
        Ok(())
    }

    /// Evaluate the stored formula at a location against the current
    /// environment.
    pub fn evaluate(&self, location: CellLocation) -> Result<Expr, EvalError> {
        self.formula(location).eval(&self.env)
    }

    /// All cells whose formulas use `location`, directly or transitively.
    ///
    /// Breadth-first closure over the whole grid: any cell whose dependencies
    /// name an already-found cell joins the frontier, until no new cells turn
    /// up. The starting location is excluded unless it reaches itself through
    /// a cycle. This is how an editor learns what to re-render after an
    /// update; the sheet itself pushes nothing.
    pub fn used_by(&self, location: CellLocation) -> HashSet<CellLocation> {
        let mut used = HashSet::new();
        let mut seen = HashSet::from([location]);
        let mut queue = VecDeque::from([location]);

        while let Some(current) = queue.pop_front() {
            let target = current.to_string();
            for (&cell, formula) in &self.cells {
                if !formula.dependencies().contains(&target) {
                    continue;
                }
                used.insert(cell);
                if seen.insert(cell) {
                    queue.push_back(cell);
                }
            }
        }

        trace!(cell = %location, dependents = used.len(), "dependency sweep");
        used
    }

    /// Re-evaluate the updated cell and everything downstream of it.
    fn check_from(&self, location: CellLocation) -> Result<(), EvalError> {
        self.evaluate(location)?;
        for dependent in self.used_by(location) {
            self.evaluate(dependent)?;
        }
        Ok(())
    }
}

impl SheetView for Sheet {
    fn rows(&self) -> usize {
        self.rows()
    }

    fn columns(&self) -> usize {
        self.columns()
    }

    /// The evaluated value, or the raw formula when evaluation fails.
    ///
    /// Display reads never raise: a formula that cannot currently reduce
    /// (unresolved reference, cycle, bad operand) shows as entered.
    fn value_at(&self, row: usize, column: usize) -> ViewElement {
        let location = self.assert_in_bounds(row, column);
        match self.evaluate(location) {
            Ok(value) => ViewElement::plain(value.render()),
            Err(_) => ViewElement::plain(self.formula(location).render()),
        }
    }

    fn formula_at(&self, row: usize, column: usize) -> ViewElement {
        let location = self.assert_in_bounds(row, column);
        ViewElement::plain(self.formula(location).render())
    }
}

impl SheetUpdate for Sheet {
    fn update(&mut self, row: usize, column: usize, input: &str) -> Result<(), UpdateError> {
        let location = self.assert_in_bounds(row, column);
        let expr = self
            .parser
            .parse(input)
            .map_err(|_| UpdateError::Parse(input.to_string()))?;
        self.insert(location, expr)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use slate_engine::{CellLocation, EvalError, Expr, SimpleParser};

    use super::super::SheetBuilder;
    use super::*;

    fn sheet(rows: usize, columns: usize) -> Sheet {
        SheetBuilder::new(Arc::new(SimpleParser), Expr::Empty).empty(rows, columns)
    }

    fn loc(text: &str) -> CellLocation {
        CellLocation::parse(text).unwrap()
    }

    #[test]
    fn test_new_sheet_is_all_default() {
        let sheet = sheet(2, 3);
        assert_eq!(sheet.rows(), 2);
        assert_eq!(sheet.columns(), 3);
        assert_eq!(*sheet.formula(loc("B1")), Expr::Empty);
        assert_eq!(sheet.evaluate(loc("B1")), Ok(Expr::Empty));
    }

    #[test]
    fn test_insert_then_evaluate() {
        let mut sheet = sheet(2, 2);
        sheet.insert(loc("A0"), Expr::Constant(5)).unwrap();
        assert_eq!(sheet.evaluate(loc("A0")), Ok(Expr::Constant(5)));
        assert_eq!(*sheet.formula(loc("A0")), Expr::Constant(5));
    }

    #[test]
    fn test_dependent_sees_new_value_on_read() {
        let mut sheet = sheet(1, 2);
        sheet.insert(loc("A0"), Expr::Constant(5)).unwrap();
        sheet
            .update(0, 1, "A0 + 3")
            .expect("formula over a constant must be accepted");
        assert_eq!(sheet.evaluate(loc("B0")), Ok(Expr::Constant(8)));

        // No caching: replacing A0 is visible on the next read of B0.
        sheet.insert(loc("A0"), Expr::Constant(10)).unwrap();
        assert_eq!(sheet.evaluate(loc("B0")), Ok(Expr::Constant(13)));
    }

    #[test]
    fn test_self_reference_rolls_back() {
        let mut sheet = sheet(1, 2);
        sheet.insert(loc("A0"), Expr::Constant(1)).unwrap();
        sheet.update(0, 1, "A0 + 1").unwrap(); // B0

        let result = sheet.insert(loc("A0"), Expr::reference("A0").unwrap());
        assert_eq!(
            result,
            Err(EvalError::CircularReference("A0".to_string()))
        );

        // Both cells keep their prior formulas, and the environment agrees.
        assert_eq!(*sheet.formula(loc("A0")), Expr::Constant(1));
        assert_eq!(sheet.evaluate(loc("A0")), Ok(Expr::Constant(1)));
        assert_eq!(sheet.evaluate(loc("B0")), Ok(Expr::Constant(2)));
    }

    #[test]
    fn test_update_breaking_a_dependent_rolls_back() {
        let mut sheet = sheet(1, 2);
        sheet.insert(loc("A0"), Expr::Constant(1)).unwrap();
        sheet.update(0, 1, "A0 + 1").unwrap(); // B0

        // Emptying A0 would make B0 add an empty cell.
        let result = sheet.insert(loc("A0"), Expr::Empty);
        assert!(matches!(result, Err(EvalError::NotNumeric { .. })));
        assert_eq!(sheet.evaluate(loc("A0")), Ok(Expr::Constant(1)));
        assert_eq!(sheet.evaluate(loc("B0")), Ok(Expr::Constant(2)));
    }

    #[test]
    fn test_division_by_zero_rolls_back() {
        let mut sheet = sheet(1, 1);
        sheet.insert(loc("A0"), Expr::Constant(7)).unwrap();

        let result = sheet.update(0, 0, "1 / 0");
        assert_eq!(result, Err(UpdateError::Eval(EvalError::DivisionByZero)));
        assert_eq!(*sheet.formula(loc("A0")), Expr::Constant(7));
    }

    #[test]
    fn test_parse_failure_reports_input_and_keeps_state() {
        let mut sheet = sheet(1, 1);
        sheet.insert(loc("A0"), Expr::Constant(7)).unwrap();

        let result = sheet.update(0, 0, "3 $ 4");
        assert_eq!(result, Err(UpdateError::Parse("3 $ 4".to_string())));
        assert_eq!(result.unwrap_err().to_string(), "unable to parse: 3 $ 4");
        assert_eq!(*sheet.formula(loc("A0")), Expr::Constant(7));
    }

    #[test]
    fn test_used_by_transitive_closure() {
        let mut sheet = sheet(3, 1);
        sheet.update(0, 0, "5").unwrap(); // A0
        sheet.update(1, 0, "A0 + 1").unwrap(); // A1
        sheet.update(2, 0, "A1 + 1").unwrap(); // A2

        assert_eq!(
            sheet.used_by(loc("A0")),
            HashSet::from([loc("A1"), loc("A2")])
        );
        assert_eq!(sheet.used_by(loc("A1")), HashSet::from([loc("A2")]));
        assert!(sheet.used_by(loc("A2")).is_empty());
    }

    #[test]
    fn test_used_by_ignores_unrelated_cells() {
        let mut sheet = sheet(2, 2);
        sheet.update(0, 0, "5").unwrap(); // A0
        sheet.update(0, 1, "A0 + 1").unwrap(); // B0
        sheet.update(1, 1, "7").unwrap(); // B1

        assert_eq!(sheet.used_by(loc("A0")), HashSet::from([loc("B0")]));
    }

    #[test]
    fn test_view_falls_back_to_formula_on_type_error() {
        let mut sheet = sheet(1, 2);
        // B0 refers to A0, which is empty: evaluation fails, the view shows
        // the raw formula.
        sheet.insert(loc("A0"), Expr::Empty).unwrap();
        sheet.update(0, 1, "A0 + 3").unwrap_err();

        // The failed update rolled back, so B0 still renders as empty.
        assert_eq!(sheet.value_at(0, 1).content, "");

        // An unbound bare reference evaluates to itself and displays as such.
        sheet.update(0, 0, "outside").unwrap();
        assert_eq!(sheet.value_at(0, 0).content, "outside");
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_bounds_panics() {
        let sheet = sheet(2, 2);
        let _ = sheet.value_at(2, 0);
    }
}
