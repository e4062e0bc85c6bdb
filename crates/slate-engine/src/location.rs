//! Cell location parsing and formatting.
//!
//! Provides bidirectional conversion between the textual cell form (one
//! uppercase column letter followed by a decimal row number, e.g. `A0`,
//! `C12`) and zero-indexed row/column coordinates. The single-letter column
//! bounds the grid at 26 columns.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A (row, column) coordinate within a grid, 0-indexed.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellLocation {
    pub row: usize,
    pub col: usize,
}

fn location_re() -> &'static Regex {
    static LOCATION_RE: OnceLock<Regex> = OnceLock::new();
    LOCATION_RE
        .get_or_init(|| Regex::new(r"^([A-Z])([0-9]+)$").expect("cell location regex must compile"))
}

impl CellLocation {
    pub fn new(row: usize, col: usize) -> CellLocation {
        CellLocation { row, col }
    }

    /// Parse a string as a cell location.
    ///
    /// The format is strict: a single uppercase letter (`A` = column 0)
    /// immediately followed by a non-negative decimal row number, with no
    /// surrounding characters. Anything else is simply not a location.
    pub fn parse(text: &str) -> Option<CellLocation> {
        let caps = location_re().captures(text)?;
        let col = (caps[1].as_bytes()[0] - b'A') as usize;
        let row = caps[2].parse::<usize>().ok()?;
        Some(CellLocation::new(row, col))
    }
}

impl FromStr for CellLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid cell location: {}", s))
    }
}

impl fmt::Display for CellLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_assert!(self.col < 26, "column {} has no single-letter form", self.col);
        write!(f, "{}{}", (b'A' + self.col as u8) as char, self.row)
    }
}
