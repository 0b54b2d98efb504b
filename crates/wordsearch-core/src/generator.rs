use crate::{Alphabet, Grid, GridError, Position};
use serde::{Deserialize, Serialize};

/// Direction a target word is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Left to right along a row
    Horizontal,
    /// Top to bottom along a column
    Vertical,
    /// Top-left to bottom-right
    Diagonal,
}

impl Direction {
    pub const ALL: [Direction; 3] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::Diagonal,
    ];

    /// (row delta, column delta) per letter
    pub fn delta(&self) -> (usize, usize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::Diagonal => (1, 1),
        }
    }
}

/// Configuration for grid synthesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGeneratorConfig")]
pub struct GeneratorConfig {
    /// Grid side length
    pub size: usize,
    /// Random placements tried per word before it is skipped
    pub max_attempts: usize,
    /// Letters used for backfill
    pub alphabet: Alphabet,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            size: 4,
            max_attempts: 100,
            alphabet: Alphabet::default(),
        }
    }
}

impl GeneratorConfig {
    /// Default settings on a `size`×`size` grid; size 0 is rejected
    pub fn with_size(size: usize) -> Result<Self, GridError> {
        if size == 0 {
            return Err(GridError::ZeroSize);
        }
        Ok(Self {
            size,
            ..Self::default()
        })
    }
}

#[derive(Deserialize)]
struct RawGeneratorConfig {
    size: usize,
    max_attempts: usize,
    alphabet: Alphabet,
}

impl TryFrom<RawGeneratorConfig> for GeneratorConfig {
    type Error = GridError;

    fn try_from(raw: RawGeneratorConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            max_attempts: raw.max_attempts,
            alphabet: raw.alphabet,
            ..Self::with_size(raw.size)?
        })
    }
}

/// Where one word was written during synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Placement {
    pub word: String,
    pub start: Position,
    pub direction: Direction,
}

/// Word-search grid generator
pub struct Generator {
    config: GeneratorConfig,
    rng: SimpleRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create a new generator with default configuration
    pub fn new() -> Self {
        Self {
            config: GeneratorConfig::default(),
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with custom configuration
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            config,
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with a specific seed for reproducibility
    pub fn with_seed(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SimpleRng::with_seed(seed),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build a grid hiding as many of `words` as fit.
    ///
    /// Earlier words claim cells first. A word that finds no free run of cells
    /// within `max_attempts` random tries is left out without error.
    pub fn generate<S: AsRef<str>>(&mut self, words: &[S]) -> Grid {
        self.generate_with_placements(words).0
    }

    pub(crate) fn generate_with_placements<S: AsRef<str>>(
        &mut self,
        words: &[S],
    ) -> (Grid, Vec<Placement>) {
        // A zero size can only come from writing the field directly
        let size = self.config.size.max(1);
        let mut board: Vec<Option<char>> = vec![None; size * size];
        let mut placements = Vec::new();

        for word in words {
            let word = word.as_ref().trim().to_uppercase();
            if word.is_empty() {
                continue;
            }
            match self.place_word(&mut board, &word) {
                Some(placement) => {
                    log::debug!(
                        "placed {} at ({}, {}) {:?}",
                        placement.word,
                        placement.start.row,
                        placement.start.col,
                        placement.direction
                    );
                    placements.push(placement);
                }
                None => log::debug!(
                    "could not place {} after {} attempts",
                    word,
                    self.config.max_attempts
                ),
            }
        }

        let letters = self.config.alphabet.letters();
        let rng = &mut self.rng;
        let cells = board
            .into_iter()
            .map(|cell| cell.unwrap_or_else(|| letters[rng.next_usize(letters.len())]))
            .collect();

        (Grid::from_cells(size, cells), placements)
    }

    /// Try random starts and directions until one fits, then write the word
    fn place_word(&mut self, board: &mut [Option<char>], word: &str) -> Option<Placement> {
        let size = self.config.size.max(1);
        let letters: Vec<char> = word.chars().collect();

        for _ in 0..self.config.max_attempts {
            let start = Position::new(self.rng.next_usize(size), self.rng.next_usize(size));
            let direction = Direction::ALL[self.rng.next_usize(Direction::ALL.len())];

            if let Some(cells) = Self::free_run(board, size, start, direction, letters.len()) {
                for (idx, &letter) in cells.iter().zip(&letters) {
                    board[*idx] = Some(letter);
                }
                return Some(Placement {
                    word: word.to_string(),
                    start,
                    direction,
                });
            }
        }

        None
    }

    /// Indices of `len` cells from `start`, if all are in bounds and empty
    fn free_run(
        board: &[Option<char>],
        size: usize,
        start: Position,
        direction: Direction,
        len: usize,
    ) -> Option<Vec<usize>> {
        let (d_row, d_col) = direction.delta();
        let mut cells = Vec::with_capacity(len);
        for i in 0..len {
            let row = start.row + d_row * i;
            let col = start.col + d_col * i;
            if row >= size || col >= size {
                return None;
            }
            let idx = row * size + col;
            if board[idx].is_some() {
                return None;
            }
            cells.push(idx);
        }
        Some(cells)
    }
}

/// Small PCG-style PRNG, seeded from the OS where possible
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new() -> Self {
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            // No OS entropy: distinct seeds per generator
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        Self::with_seed(u64::from_le_bytes(seed_bytes))
    }

    fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        (xorshifted.rotate_right(rot)) as u64
    }

    fn next_usize(&mut self, bound: usize) -> usize {
        (self.next_u64() as usize) % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PathFinder;

    #[test]
    fn test_grid_fully_filled_from_alphabet() {
        let alphabet = Alphabet::new("XYZ".chars()).unwrap();
        let config = GeneratorConfig {
            size: 6,
            max_attempts: 100,
            alphabet: alphabet.clone(),
        };
        for seed in 0..20 {
            let mut generator = Generator::with_seed(config.clone(), seed);
            let grid = generator.generate::<&str>(&[]);
            assert_eq!(grid.cells().len(), 36);
            assert!(grid.cells().iter().all(|&c| alphabet.contains(c)));
        }
    }

    #[test]
    fn test_placed_words_are_findable() {
        let words = ["CAT", "DOG", "SUN", "FUN"];
        let finder = PathFinder::new();
        for seed in 0..50 {
            let mut generator = Generator::with_seed(GeneratorConfig::default(), seed);
            let (grid, placements) = generator.generate_with_placements(&words);
            for placement in &placements {
                let trail = finder
                    .find(&grid, &placement.word)
                    .unwrap_or_else(|| panic!("{} missing from\n{}", placement.word, grid));
                assert!(trail.spells(&grid, &placement.word));
            }
        }
    }

    #[test]
    fn test_placement_writes_along_direction() {
        let mut generator = Generator::with_seed(GeneratorConfig::with_size(8).unwrap(), 7);
        let (grid, placements) = generator.generate_with_placements(&["WORDS"]);
        let placement = &placements[0];
        let (d_row, d_col) = placement.direction.delta();
        for (i, letter) in "WORDS".chars().enumerate() {
            let pos = Position::new(
                placement.start.row + d_row * i,
                placement.start.col + d_col * i,
            );
            assert_eq!(grid.get(pos), letter);
        }
    }

    #[test]
    fn test_placements_never_overlap() {
        let words = ["ABCD", "EFGH", "IJKL", "MNOP", "QRST"];
        for seed in 0..30 {
            let mut generator = Generator::with_seed(GeneratorConfig::with_size(5).unwrap(), seed);
            let (_, placements) = generator.generate_with_placements(&words);
            let mut used = std::collections::HashSet::new();
            for placement in &placements {
                let (d_row, d_col) = placement.direction.delta();
                for i in 0..placement.word.len() {
                    let cell = (
                        placement.start.row + d_row * i,
                        placement.start.col + d_col * i,
                    );
                    assert!(used.insert(cell), "cell {:?} claimed twice", cell);
                }
            }
        }
    }

    #[test]
    fn test_word_longer_than_grid_is_skipped() {
        let mut generator = Generator::with_seed(GeneratorConfig::with_size(3).unwrap(), 1);
        let (grid, placements) = generator.generate_with_placements(&["TOOLONG", "AB"]);
        assert_eq!(grid.size(), 3);
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].word, "AB");
    }

    #[test]
    fn test_lowercase_and_empty_words() {
        let mut generator = Generator::with_seed(GeneratorConfig::default(), 3);
        let (grid, placements) = generator.generate_with_placements(&["", "cat"]);
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].word, "CAT");
        assert!(PathFinder::new().contains(&grid, "CAT"));
    }

    #[test]
    fn test_short_words_eventually_placed() {
        // 4x4 has ample room for CAT; some seed must place it
        let placed = (0..20).any(|seed| {
            let mut generator = Generator::with_seed(GeneratorConfig::default(), seed);
            let grid = generator.generate(&["CAT", "DOG"]);
            PathFinder::new().contains(&grid, "CAT")
        });
        assert!(placed);
    }

    #[test]
    fn test_same_seed_same_grid() {
        let a = Generator::with_seed(GeneratorConfig::default(), 42).generate(&["CAT"]);
        let b = Generator::with_seed(GeneratorConfig::default(), 42).generate(&["CAT"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(GeneratorConfig::with_size(0), Err(GridError::ZeroSize));
        let json = r#"{"size":0,"max_attempts":100,"alphabet":{"letters":["A"]}}"#;
        assert!(serde_json::from_str::<GeneratorConfig>(json).is_err());
    }

    #[test]
    fn test_deserialized_config_keeps_alphabet_non_empty() {
        let json = r#"{"size":4,"max_attempts":100,"alphabet":{"letters":[]}}"#;
        assert!(serde_json::from_str::<GeneratorConfig>(json).is_err());

        let json = r#"{"size":3,"max_attempts":10,"alphabet":{"letters":["q"]}}"#;
        let config: GeneratorConfig = serde_json::from_str(json).unwrap();
        let grid = Generator::with_seed(config, 1).generate(&["QQ"]);
        assert_eq!(grid.to_string_compact(), "QQQQQQQQQ");
    }

    #[test]
    fn test_zero_size_field_still_builds_a_grid() {
        let config = GeneratorConfig {
            size: 0,
            ..GeneratorConfig::default()
        };
        let grid = Generator::with_seed(config, 5).generate(&["CAT"]);
        assert_eq!(grid.size(), 1);
        assert_eq!(grid.to_string().chars().count(), 1);
    }
}
