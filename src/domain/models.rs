use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::{DomainError, DomainResult};

/// Zero-based coordinates of one grid cell.
///
/// The textual form is a single uppercase column letter followed by a
/// 1-based row number, so `C7` is row index 6, column index 2. Parsing is
/// the only constructor that accepts untrusted input and it enforces the
/// single-letter column range; addresses built through it always have
/// `col < 26` and therefore always re-encode.
///
/// # Examples
///
/// ```
/// use gridcalc::domain::CellAddress;
///
/// let addr = CellAddress::parse("B12").unwrap();
/// assert_eq!(addr, CellAddress::new(11, 1));
/// assert_eq!(addr.to_string(), "B12");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellAddress {
    pub row: usize,
    pub col: usize,
}

impl CellAddress {
    /// Highest addressable column count (single letter A-Z).
    pub const MAX_COLS: usize = 26;

    /// Creates an address from raw indices. `col` must be below
    /// [`CellAddress::MAX_COLS`] for the address to be displayable.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Decodes a label like `"B12"` into zero-based coordinates.
    ///
    /// The label must be exactly one uppercase letter followed by one or
    /// more digits, and the digits must parse to a row number of at least 1.
    pub fn parse(label: &str) -> DomainResult<CellAddress> {
        let invalid = || DomainError::InvalidAddress(label.to_string());

        let mut bytes = label.bytes();
        let letter = bytes.next().filter(u8::is_ascii_uppercase).ok_or_else(invalid)?;

        let digits = &label[1..];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let row_label: usize = digits.parse().map_err(|_| invalid())?;
        let row = row_label.checked_sub(1).ok_or_else(invalid)?;

        Ok(CellAddress::new(row, (letter - b'A') as usize))
    }

    /// Maps a column index to its letter. Meaningful for indices 0-25 only.
    pub fn column_letter(col: usize) -> char {
        (b'A' + col as u8) as char
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_letter(self.col), self.row + 1)
    }
}

/// Inclusive rectangular region between two addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: CellAddress,
    pub end: CellAddress,
}

impl Range {
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        Self { start, end }
    }

    /// Iterates the region row-ascending, then column-ascending within each
    /// row. An inverted range (end before start on either axis) is empty.
    pub fn cells(&self) -> impl Iterator<Item = CellAddress> + '_ {
        let cols = self.start.col..=self.end.col;
        (self.start.row..=self.end.row)
            .flat_map(move |row| cols.clone().map(move |col| CellAddress::new(row, col)))
    }
}

/// Fixed-size dense grid of cell content strings, row-major.
///
/// Each cell stores exactly one string: a literal, or a formula beginning
/// with `=`. Once a formula cell is committed its content is replaced by the
/// evaluated result, so the stored string is always what the grid displays.
/// The grid is created at fixed dimensions and never resized.
///
/// # Examples
///
/// ```
/// use gridcalc::domain::Grid;
///
/// let mut grid = Grid::default();
/// grid.set(0, 0, "42".to_string());
/// assert_eq!(grid.get(0, 0), "42");
/// assert_eq!(grid.get(99, 99), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<String>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROWS, Self::DEFAULT_COLS)
    }
}

impl Grid {
    pub const DEFAULT_ROWS: usize = 20;
    pub const DEFAULT_COLS: usize = 20;

    /// Creates an empty grid. Columns are capped at the codec ceiling of 26
    /// so every cell stays addressable; both dimensions are at least 1.
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.clamp(1, CellAddress::MAX_COLS);
        Self {
            rows,
            cols,
            cells: vec![String::new(); rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the stored content of a cell, or the empty string for any
    /// coordinate outside the grid. Out-of-bounds reads are not errors.
    pub fn get(&self, row: usize, col: usize) -> &str {
        if row < self.rows && col < self.cols {
            &self.cells[row * self.cols + col]
        } else {
            ""
        }
    }

    /// Convenience accessor taking an address instead of raw indices.
    pub fn value_at(&self, addr: CellAddress) -> &str {
        self.get(addr.row, addr.col)
    }

    /// Overwrites a cell's content in place. Writes outside the grid are
    /// ignored; the grid never grows.
    pub fn set(&mut self, row: usize, col: usize, content: String) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = content;
        }
    }

    pub fn clear(&mut self, row: usize, col: usize) {
        self.set(row, col, String::new());
    }
}
