//! Sheet state: the formula store and the evaluation environment.

use std::collections::HashMap;
use std::sync::Arc;

use slate_engine::{CellLocation, Environment, Expr, Parser};

/// A spreadsheet of fixed dimensions that evaluates its formulas.
///
/// Two maps are kept in step: `cells` holds the formula at each location
/// exactly as entered, `env` holds the same expressions keyed by textual
/// identifier (plus the built-in snapshot) and is what reference resolution
/// walks. The invariant is that every cell's `env` entry equals its `cells`
/// entry; `insert` maintains it on both the success and the rollback path.
///
/// Single-threaded by design: both maps are exclusively owned and no
/// operation suspends. Concurrent use would need an exclusion discipline
/// around `insert`, which mutates both maps.
pub struct Sheet {
    rows: usize,
    columns: usize,
    pub(crate) parser: Arc<dyn Parser>,
    pub(crate) default: Expr,
    pub(crate) cells: HashMap<CellLocation, Expr>,
    pub(crate) env: Environment,
}

impl Sheet {
    /// Build a sheet with every cell holding the default expression.
    ///
    /// `builtins` is the snapshot copied out of the builder; it seeds the
    /// environment and is never mutated afterwards, so later changes to the
    /// builder cannot reach a built sheet.
    pub(crate) fn new(
        parser: Arc<dyn Parser>,
        builtins: HashMap<String, Expr>,
        default: Expr,
        rows: usize,
        columns: usize,
    ) -> Sheet {
        assert!(rows > 0 && columns > 0, "sheet dimensions must be positive");
        assert!(columns <= 26, "columns are limited to A-Z");

        let mut cells = HashMap::with_capacity(rows * columns);
        let mut env = builtins;
        for row in 0..rows {
            for col in 0..columns {
                let location = CellLocation::new(row, col);
                cells.insert(location, default.clone());
                env.insert(location.to_string(), default.clone());
            }
        }

        Sheet {
            rows,
            columns,
            parser,
            default,
            cells,
            env,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The stored formula at a location, verbatim and unevaluated.
    pub fn formula(&self, location: CellLocation) -> &Expr {
        assert!(
            location.row < self.rows && location.col < self.columns,
            "cell {location} outside {}x{} sheet",
            self.rows,
            self.columns,
        );
        self.cells.get(&location).unwrap_or(&self.default)
    }
}
