//! Word location by depth-first search over 8-connected cells.

use crate::{Grid, Position};
use serde::{Deserialize, Serialize};

/// Neighbour offsets (row, col), tried in this order from every cell
const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// An ordered path of grid cells spelling a word
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trail {
    cells: Vec<Position>,
}

impl Trail {
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    /// Check that this trail spells `word` on `grid`: one cell per letter,
    /// no cell repeated, each step to an 8-adjacent cell.
    pub fn spells(&self, grid: &Grid, word: &str) -> bool {
        let letters: Vec<char> = word.chars().flat_map(char::to_uppercase).collect();
        if letters.len() != self.cells.len() {
            return false;
        }

        let all_match = self
            .cells
            .iter()
            .zip(&letters)
            .all(|(&pos, &letter)| grid.try_get(pos) == Some(letter));
        let all_adjacent = self.cells.windows(2).all(|w| w[0].is_adjacent(w[1]));
        let all_distinct = self
            .cells
            .iter()
            .enumerate()
            .all(|(i, pos)| !self.cells[..i].contains(pos));

        all_match && all_adjacent && all_distinct
    }
}

impl From<Vec<Position>> for Trail {
    fn from(cells: Vec<Position>) -> Self {
        Self { cells }
    }
}

/// Unit struct finder: stateless, all scratch state is per-call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathFinder;

impl PathFinder {
    pub fn new() -> Self {
        Self
    }

    /// Find the first trail spelling `word`.
    ///
    /// Start cells are tried in row-major order and neighbours in the fixed
    /// `NEIGHBORS` order, so the same grid and word always give the same trail.
    pub fn find(&self, grid: &Grid, word: &str) -> Option<Trail> {
        let letters: Vec<char> = word.chars().flat_map(char::to_uppercase).collect();
        if letters.is_empty() {
            return Some(Trail::default());
        }
        if letters.len() > grid.size() * grid.size() {
            return None;
        }

        let mut visited = vec![false; grid.size() * grid.size()];
        let mut path = Vec::with_capacity(letters.len());

        for start in grid.positions() {
            if Self::extend(grid, &letters, start, &mut visited, &mut path) {
                return Some(Trail::from(path));
            }
            debug_assert!(path.is_empty());
        }

        None
    }

    /// True if `word` can be traced anywhere on `grid`
    pub fn contains(&self, grid: &Grid, word: &str) -> bool {
        self.find(grid, word).is_some()
    }

    /// Match `letters[path.len()]` at `pos`, then recurse into neighbours.
    /// On failure the cell is unmarked and popped before returning.
    fn extend(
        grid: &Grid,
        letters: &[char],
        pos: Position,
        visited: &mut [bool],
        path: &mut Vec<Position>,
    ) -> bool {
        let size = grid.size();
        let idx = pos.index(size);
        if visited[idx] || grid.get(pos) != letters[path.len()] {
            return false;
        }

        visited[idx] = true;
        path.push(pos);

        if path.len() == letters.len() {
            return true;
        }

        for (d_row, d_col) in NEIGHBORS {
            if let Some(next) = pos.offset(d_row, d_col, size) {
                if Self::extend(grid, letters, next, visited, path) {
                    return true;
                }
            }
        }

        visited[idx] = false;
        path.pop();
        false
    }
}
