//! Error types for the sheet layer.

use thiserror::Error;

use slate_engine::EvalError;

/// Why an update to a cell was refused.
///
/// Both variants leave the sheet exactly as it was before the attempt: parse
/// failures are detected before any state changes, evaluation failures roll
/// the change back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    #[error("unable to parse: {0}")]
    Parse(String),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("sheet is view only")]
    ReadOnly,
}
