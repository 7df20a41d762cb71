//! Spreadsheet-style cell references ("L2", "$AA$10").

use std::{fmt, str::FromStr};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellRefError {
    #[error("empty cell reference")]
    Empty,
    #[error("cell reference '{0}' has no column letters")]
    MissingColumn(String),
    #[error("cell reference '{0}' has no row number")]
    MissingRow(String),
    #[error("cell reference '{0}' is malformed")]
    Malformed(String),
}

/// A 1-based (column, row) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub column: usize,
    pub row: usize,
}

impl CellRef {
    pub fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// Zero-based (row, column) indices into parsed CSV records.
    pub fn indices(self) -> (usize, usize) {
        (self.row - 1, self.column - 1)
    }

    pub fn column_letters(self) -> String {
        let mut n = self.column;
        let mut letters = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        letters.reverse();
        String::from_utf8(letters).unwrap_or_default()
    }
}

impl FromStr for CellRef {
    type Err = CellRefError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let cleaned: String = raw.trim().chars().filter(|c| *c != '$').collect();
        if cleaned.is_empty() {
            return Err(CellRefError::Empty);
        }

        let split = cleaned
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(cleaned.len());
        let (letters, digits) = cleaned.split_at(split);

        if letters.is_empty() {
            return Err(CellRefError::MissingColumn(raw.to_string()));
        }
        if digits.is_empty() {
            return Err(CellRefError::MissingRow(raw.to_string()));
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CellRefError::Malformed(raw.to_string()));
        }

        let mut column: usize = 0;
        for c in letters.chars() {
            let value = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
            column = column
                .checked_mul(26)
                .and_then(|acc| acc.checked_add(value))
                .ok_or_else(|| CellRefError::Malformed(raw.to_string()))?;
        }

        let row: usize = digits
            .parse()
            .map_err(|_| CellRefError::Malformed(raw.to_string()))?;
        if row == 0 {
            return Err(CellRefError::Malformed(raw.to_string()));
        }

        Ok(Self { column, row })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letters(), self.row)
    }
}

#[cfg(test)]
#[path = "tests/cell_tests.rs"]
mod tests;
