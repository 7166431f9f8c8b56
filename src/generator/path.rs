use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Default cap on node expansions per attempt for grid generation.
pub const DEFAULT_STEP_LIMIT: usize = 200_000;

// Row/column offsets of the 8 neighbours
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn chebyshev_distance(self, other: Position) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }

    /// True for the 8 surrounding cells, false for the cell itself.
    pub fn is_adjacent(self, other: Position) -> bool {
        self.chebyshev_distance(other) == 1
    }

    pub fn in_bounds(self, size: usize) -> bool {
        self.row < size && self.col < size
    }

    fn offset(self, (dr, dc): (isize, isize), size: usize) -> Option<Position> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        let pos = Position::new(row, col);
        pos.in_bounds(size).then_some(pos)
    }
}

/// A valid walk: every cell in bounds, no repeats, consecutive cells adjacent.
pub fn is_valid_path(path: &[Position], size: usize) -> bool {
    let mut seen = vec![false; size * size];
    for (i, &pos) in path.iter().enumerate() {
        if !pos.in_bounds(size) {
            return false;
        }
        let idx = pos.row * size + pos.col;
        if seen[idx] {
            return false;
        }
        seen[idx] = true;
        if i > 0 && !path[i - 1].is_adjacent(pos) {
            return false;
        }
    }
    true
}

/// Randomized backtracking search for a self-avoiding, 8-connected walk of
/// `length` cells on a `size`×`size` grid.
///
/// Each attempt starts from a random cell and runs a depth-first search whose
/// neighbour order is reshuffled at every step. Returns the first complete
/// walk, or `None` when the search space of all `max_attempts` attempts is
/// exhausted. Attempts are not capped; see [`find_path_bounded`].
pub fn find_path(
    length: usize,
    size: usize,
    max_attempts: usize,
    rng: &mut SmallRng,
) -> Option<Vec<Position>> {
    find_path_bounded(length, size, max_attempts, usize::MAX, rng)
}

/// [`find_path`] with an explicit cap on node expansions per attempt. An
/// attempt that hits the cap is abandoned like an exhausted one, so `None`
/// may also mean every attempt ran out of steps.
pub fn find_path_bounded(
    length: usize,
    size: usize,
    max_attempts: usize,
    step_limit: usize,
    rng: &mut SmallRng,
) -> Option<Vec<Position>> {
    if length == 0 {
        return Some(Vec::new());
    }
    if size == 0 || length > size * size {
        return None;
    }

    for attempt in 0..max_attempts {
        let start = Position::new(rng.gen_range(0..size), rng.gen_range(0..size));
        if let Some(path) = search_from(start, length, size, step_limit, rng) {
            log::trace!("path of {length} on {size}x{size} found on attempt {}", attempt + 1);
            return Some(path);
        }
    }
    log::trace!("no path of {length} on {size}x{size} after {max_attempts} attempts");
    None
}

struct Frame {
    options: Vec<Position>,
    next: usize,
}

fn shuffled_neighbours(
    pos: Position,
    size: usize,
    visited: &[bool],
    rng: &mut SmallRng,
) -> Vec<Position> {
    let mut options: Vec<Position> = DIRECTIONS
        .iter()
        .filter_map(|&d| pos.offset(d, size))
        .filter(|p| !visited[p.row * size + p.col])
        .collect();
    options.shuffle(rng);
    options
}

// Explicit stack instead of recursion so depth is never tied to the call stack.
fn search_from(
    start: Position,
    length: usize,
    size: usize,
    step_limit: usize,
    rng: &mut SmallRng,
) -> Option<Vec<Position>> {
    let mut visited = vec![false; size * size];
    let mut path = Vec::with_capacity(length);

    visited[start.row * size + start.col] = true;
    path.push(start);
    if path.len() == length {
        return Some(path);
    }

    let mut frames = vec![Frame {
        options: shuffled_neighbours(start, size, &visited, rng),
        next: 0,
    }];
    let mut steps = 0usize;

    while let Some(frame) = frames.last_mut() {
        if frame.next < frame.options.len() {
            let candidate = frame.options[frame.next];
            frame.next += 1;
            let idx = candidate.row * size + candidate.col;
            if visited[idx] {
                continue;
            }

            steps += 1;
            if steps > step_limit {
                return None;
            }

            visited[idx] = true;
            path.push(candidate);
            if path.len() == length {
                return Some(path);
            }
            let options = shuffled_neighbours(candidate, size, &visited, rng);
            frames.push(Frame { options, next: 0 });
        } else {
            // Dead end: unmark and step back
            frames.pop();
            if let Some(last) = path.pop() {
                visited[last.row * size + last.col] = false;
            }
        }
    }
    None
}

/// Deterministic boustrophedon walk, vertically centred. Always valid when
/// `length <= size * size`; truncated otherwise.
pub fn snake_path(length: usize, size: usize) -> Vec<Position> {
    if size == 0 {
        return Vec::new();
    }
    let length = length.min(size * size);
    let rows_needed = length.div_ceil(size);
    let top = (size - rows_needed) / 2;

    (0..length)
        .map(|i| {
            let row = top + i / size;
            let step = i % size;
            let col = if (i / size) % 2 == 0 { step } else { size - 1 - step };
            Position::new(row, col)
        })
        .collect()
}
