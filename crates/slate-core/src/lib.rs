//! slate_core - sheet model over the slate expression engine.

pub mod display;
pub mod error;
pub mod fixed;
pub mod sheet;
pub mod view;

pub use display::DisplaySheet;
pub use error::UpdateError;
pub use fixed::FixedSheet;
pub use sheet::{BuiltinCollision, Sheet, SheetBuilder};
pub use view::{SheetUpdate, SheetView, ViewElement};

pub use slate_engine::{CellLocation, EvalError, Expr};
