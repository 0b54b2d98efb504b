use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell coordinate in a square grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major index into a grid of the given size
    pub fn index(&self, size: usize) -> usize {
        self.row * size + self.col
    }

    /// Offset this position, returning `None` if it leaves a `size`×`size` grid
    pub fn offset(&self, d_row: isize, d_col: isize, size: usize) -> Option<Position> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        if row < size && col < size {
            Some(Position::new(row, col))
        } else {
            None
        }
    }

    /// True if the two cells touch horizontally, vertically or diagonally
    pub fn is_adjacent(&self, other: Position) -> bool {
        *self != other && self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }
}

/// Errors raised when building a grid or alphabet from external input
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no rows")]
    Empty,
    #[error("row {row} has {found} letters, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("alphabet has no letters")]
    EmptyAlphabet,
    #[error("grid size must be at least 1")]
    ZeroSize,
    #[error("grid of size {size} needs {expected} cells, found {found}")]
    CellCount {
        size: usize,
        expected: usize,
        found: usize,
    },
}

/// Letters used to fill cells that no target word claimed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAlphabet")]
pub struct Alphabet {
    letters: Vec<char>,
}

#[derive(Deserialize)]
struct RawAlphabet {
    letters: Vec<char>,
}

impl TryFrom<RawAlphabet> for Alphabet {
    type Error = GridError;

    fn try_from(raw: RawAlphabet) -> Result<Self, Self::Error> {
        Alphabet::new(raw.letters)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            letters: ('A'..='Z').collect(),
        }
    }
}

impl Alphabet {
    /// Build an alphabet from arbitrary letters (uppercased, deduplicated)
    pub fn new(letters: impl IntoIterator<Item = char>) -> Result<Self, GridError> {
        let mut out: Vec<char> = Vec::new();
        for c in letters.into_iter().flat_map(char::to_uppercase) {
            if !c.is_whitespace() && !out.contains(&c) {
                out.push(c);
            }
        }
        if out.is_empty() {
            return Err(GridError::EmptyAlphabet);
        }
        Ok(Self { letters: out })
    }

    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn contains(&self, c: char) -> bool {
        self.letters.contains(&c)
    }
}

/// A fully populated square letter grid.
///
/// Grids are only built by the generator or parsed from rows; nothing mutates
/// a grid once it exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    size: usize,
    cells: Vec<char>,
}

#[derive(Deserialize)]
struct RawGrid {
    size: usize,
    cells: Vec<char>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = GridError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        if raw.size == 0 {
            return Err(GridError::ZeroSize);
        }
        let cells: Vec<char> = raw.cells.into_iter().flat_map(char::to_uppercase).collect();
        let expected = raw.size.saturating_mul(raw.size);
        if cells.len() != expected {
            return Err(GridError::CellCount {
                size: raw.size,
                expected,
                found: cells.len(),
            });
        }
        Ok(Self {
            size: raw.size,
            cells,
        })
    }
}

impl Grid {
    /// Assemble a grid from a completed row-major cell buffer
    pub(crate) fn from_cells(size: usize, cells: Vec<char>) -> Self {
        debug_assert!(size > 0);
        debug_assert_eq!(cells.len(), size * size);
        Self { size, cells }
    }

    /// Parse a grid from rows of letters, e.g. `["CAT", "XOY", "ZZG"]`
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let size = rows.len();
        if size == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, line) in rows.iter().enumerate() {
            let letters: Vec<char> = line
                .as_ref()
                .chars()
                .filter(|c| !c.is_whitespace())
                .flat_map(char::to_uppercase)
                .collect();
            if letters.len() != size {
                return Err(GridError::NotSquare {
                    row,
                    expected: size,
                    found: letters.len(),
                });
            }
            cells.extend(letters);
        }

        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Letter at a position. Panics if the position is outside the grid.
    pub fn get(&self, pos: Position) -> char {
        self.cells[pos.index(self.size)]
    }

    /// Letter at a position, or `None` outside the grid
    pub fn try_get(&self, pos: Position) -> Option<char> {
        if pos.row < self.size && pos.col < self.size {
            Some(self.get(pos))
        } else {
            None
        }
    }

    /// Iterate rows as letter slices
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.cells.chunks(self.size)
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
    }

    /// Raw row-major letters
    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    /// All letters concatenated row by row
    pub fn to_string_compact(&self) -> String {
        self.cells.iter().collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            write!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
