//! A view-only 6x6 sheet with fixed contents.

use crate::error::UpdateError;
use crate::view::{SheetUpdate, SheetView, ViewElement};

/// A fixed demonstration sheet.
///
/// Always 6x6. The four cells where rows 2..=3 cross columns 2..=3 are
/// highlighted green: their value reads `W` and their formula reads `GREEN`.
/// Every update fails because the sheet is view only.
#[derive(Default)]
pub struct FixedSheet;

fn highlighted(row: usize, column: usize) -> bool {
    (2..=3).contains(&row) && (2..=3).contains(&column)
}

impl SheetView for FixedSheet {
    fn rows(&self) -> usize {
        6
    }

    fn columns(&self) -> usize {
        6
    }

    fn value_at(&self, row: usize, column: usize) -> ViewElement {
        self.assert_in_bounds(row, column);
        if highlighted(row, column) {
            ViewElement::new("W", "green", "black")
        } else {
            ViewElement::plain("")
        }
    }

    fn formula_at(&self, row: usize, column: usize) -> ViewElement {
        self.assert_in_bounds(row, column);
        if highlighted(row, column) {
            ViewElement::new("GREEN", "green", "black")
        } else {
            ViewElement::plain("")
        }
    }
}

impl SheetUpdate for FixedSheet {
    fn update(&mut self, row: usize, column: usize, _input: &str) -> Result<(), UpdateError> {
        self.assert_in_bounds(row, column);
        Err(UpdateError::ReadOnly)
    }
}
