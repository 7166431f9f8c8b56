use std::fmt;

use icu_normalizer::ComposingNormalizerBorrowed;
use rand::Rng;
use rand::rngs::SmallRng;

use crate::config::WordSearchConfig;
use crate::generator::path::{Position, find_path_bounded, is_valid_path, snake_path};

pub const FILLER_ALPHABET: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// A square letter grid with `word` hidden along `path`.
#[derive(Clone, Debug, PartialEq)]
pub struct GridPuzzle {
    pub grid: Vec<Vec<char>>,
    pub size: usize,
    pub word: String,
    pub path: Vec<Position>,
}

impl GridPuzzle {
    pub fn letter_at(&self, pos: Position) -> Option<char> {
        self.grid.get(pos.row)?.get(pos.col).copied()
    }

    /// Letters along `cells`, skipping any that fall outside the grid.
    pub fn read(&self, cells: &[Position]) -> String {
        cells.iter().filter_map(|&p| self.letter_at(p)).collect()
    }

    /// Whether a learner's selection spells the word. Either reading direction
    /// counts, and the selection must itself be a connected walk.
    pub fn check_selection(&self, selection: &[Position]) -> bool {
        if selection.is_empty() || !is_valid_path(selection, self.size) {
            return false;
        }
        let forward = self.read(selection);
        let backward: String = forward.chars().rev().collect();
        forward == self.word || backward == self.word
    }
}

impl fmt::Display for GridPuzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.grid {
            let line: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// NFC-normalize, uppercase and drop whitespace: "Blue Tit" -> "BLUETIT".
pub fn normalize_word(word: &str) -> String {
    let nfc = ComposingNormalizerBorrowed::new_nfc();
    nfc.normalize(word)
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

fn filler_grid(size: usize, rng: &mut SmallRng) -> Vec<Vec<char>> {
    (0..size)
        .map(|_| {
            (0..size)
                .map(|_| FILLER_ALPHABET[rng.gen_range(0..FILLER_ALPHABET.len())])
                .collect()
        })
        .collect()
}

fn place(word: &[char], size: usize, path: Vec<Position>, rng: &mut SmallRng) -> GridPuzzle {
    let mut grid = filler_grid(size, rng);
    for (pos, &ch) in path.iter().zip(word) {
        grid[pos.row][pos.col] = ch;
    }
    GridPuzzle {
        grid,
        size,
        word: word.iter().collect(),
        path,
    }
}

/// Smallest side that can hold `len` cells, raised to `min_size`.
fn starting_size(len: usize, min_size: usize, max_size: usize) -> usize {
    let mut side = 1;
    while side * side < len {
        side += 1;
    }
    side.max(min_size).min(max_size)
}

/// Generates a puzzle with the default escalation policy for everything but
/// the size cap and the per-size attempt budget.
pub fn generate(
    word: &str,
    max_grid_size: usize,
    attempts_per_size: usize,
    rng: &mut SmallRng,
) -> Option<GridPuzzle> {
    let cfg = WordSearchConfig {
        max_grid_size,
        attempts_per_size,
        ..WordSearchConfig::default()
    };
    generate_with(word, &cfg, rng)
}

/// Hides `word` in a random grid.
///
/// Starts at the smallest grid that can hold the word (at least
/// `min_grid_size`) and grows by `growth_step` after every failed search,
/// capped at `max_grid_size`, for up to `max_size_rounds` rounds. Returns
/// `None` for an empty word, for a word longer than `max_grid_size²`, or when
/// every round fails and `snake_fallback` is off.
pub fn generate_with(word: &str, cfg: &WordSearchConfig, rng: &mut SmallRng) -> Option<GridPuzzle> {
    let letters: Vec<char> = normalize_word(word).chars().collect();
    let len = letters.len();
    let max_size = cfg.max_grid_size;

    if len == 0 || max_size == 0 || len > max_size * max_size {
        log::debug!("word {word:?} ({len} letters) cannot fit a {max_size}x{max_size} grid");
        return None;
    }

    let mut size = starting_size(len, cfg.min_grid_size, max_size);
    for round in 0..cfg.max_size_rounds {
        if round > 0 {
            size = (size + cfg.growth_step).min(max_size);
        }
        if let Some(path) =
            find_path_bounded(len, size, cfg.attempts_per_size, cfg.step_limit, rng)
        {
            return Some(place(&letters, size, path, rng));
        }
        log::debug!("round {}: no path for {len} letters on {size}x{size}", round + 1);
    }

    if cfg.snake_fallback {
        log::warn!("search exhausted for {word:?}; using snake placement on {size}x{size}");
        return Some(place(&letters, size, snake_path(len, size), rng));
    }

    log::warn!("could not hide {word:?} within {max_size}x{max_size}");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("Blue Tit"), "BLUETIT");
        assert_eq!(normalize_word("  robin\t"), "ROBIN");
        // Decomposed e + combining acute composes to a single letter
        assert_eq!(normalize_word("Pe\u{301}rez").chars().count(), 5);
        assert_eq!(normalize_word("Pe\u{301}rez"), "P\u{C9}REZ");
    }

    #[test]
    fn test_grid_round_trip() {
        let mut rng = SmallRng::seed_from_u64(42);
        for word in ["wren", "Robin", "blackbird", "Great Spotted Woodpecker"] {
            let puzzle = generate(word, 10, 100, &mut rng).expect(word);
            assert_eq!(puzzle.read(&puzzle.path), normalize_word(word));
            assert_eq!(puzzle.word, normalize_word(word));
            assert!(is_valid_path(&puzzle.path, puzzle.size));
            assert_eq!(puzzle.grid.len(), puzzle.size);
            assert!(puzzle.grid.iter().all(|row| row.len() == puzzle.size));
        }
    }

    #[test]
    fn test_word_longer_than_max_grid_is_rejected() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(generate("ABCDEFGHIJKLMNOPQRSTUVWXYZ", 5, 100, &mut rng).is_none());
    }

    #[test]
    fn test_empty_word_is_rejected() {
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(generate("", 10, 100, &mut rng).is_none());
        assert!(generate("   ", 10, 100, &mut rng).is_none());
    }

    #[test]
    fn test_starts_small_and_grows_for_long_words() {
        let mut rng = SmallRng::seed_from_u64(2);
        assert_eq!(generate("owl", 10, 100, &mut rng).unwrap().size, 4);
        // 20 letters need at least a 5x5 grid
        let long = generate("ABCDEFGHIJKLMNOPQRST", 10, 100, &mut rng).unwrap();
        assert!(long.size >= 5);
        assert_eq!(starting_size(20, 4, 10), 5);
        assert_eq!(starting_size(3, 4, 10), 4);
        assert_eq!(starting_size(3, 4, 3), 3);
    }

    #[test]
    fn test_exhausted_search_returns_none_or_snake() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut cfg = WordSearchConfig {
            attempts_per_size: 0,
            ..WordSearchConfig::default()
        };
        assert!(generate_with("sparrow", &cfg, &mut rng).is_none());

        cfg.snake_fallback = true;
        let puzzle = generate_with("sparrow", &cfg, &mut rng).unwrap();
        // Grew 4 -> 6 -> 8 before giving up on search
        assert_eq!(puzzle.size, 8);
        assert_eq!(puzzle.read(&puzzle.path), "SPARROW");
        assert!(is_valid_path(&puzzle.path, puzzle.size));
    }

    #[test]
    fn test_check_selection_either_direction() {
        let mut rng = SmallRng::seed_from_u64(4);
        let puzzle = generate("finch", 10, 100, &mut rng).unwrap();
        assert!(puzzle.check_selection(&puzzle.path));
        let reversed: Vec<Position> = puzzle.path.iter().rev().copied().collect();
        assert!(puzzle.check_selection(&reversed));
        assert!(!puzzle.check_selection(&puzzle.path[..3]));
        assert!(!puzzle.check_selection(&[]));
    }

    #[test]
    fn test_check_selection_rejects_disconnected_cells() {
        let puzzle = GridPuzzle {
            grid: vec![
                vec!['O', 'X', 'W'],
                vec!['X', 'X', 'X'],
                vec!['L', 'X', 'X'],
            ],
            size: 3,
            word: "OWL".to_string(),
            path: vec![Position::new(0, 0), Position::new(0, 2), Position::new(2, 0)],
        };
        // Spells the word but jumps across the grid
        assert_eq!(puzzle.read(&puzzle.path), "OWL");
        assert!(!puzzle.check_selection(&puzzle.path));
    }

    #[test]
    fn test_display_renders_rows() {
        let puzzle = GridPuzzle {
            grid: vec![vec!['A', 'B'], vec!['C', 'D']],
            size: 2,
            word: "AB".to_string(),
            path: vec![Position::new(0, 0), Position::new(0, 1)],
        };
        assert_eq!(puzzle.to_string(), "A B\nC D\n");
        assert_eq!(puzzle.letter_at(Position::new(1, 0)), Some('C'));
        assert_eq!(puzzle.letter_at(Position::new(2, 0)), None);
    }
}
