//! The evaluating sheet: grid state, atomic updates, dependency queries.

mod builder;
mod ops;
mod state;

pub use builder::{BuiltinCollision, SheetBuilder};
pub use state::Sheet;
