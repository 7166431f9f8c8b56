use crate::config::ChoiceConfig;
use crate::generator::path::Position;
use crate::generator::word_search::GridPuzzle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HuntOutcome {
    Found,
    Miss,
    Lost,
    Finished,
}

/// Selection state for one word-search puzzle. Cells are picked one at a time
/// and the selection only ever holds a connected walk.
pub struct WordHunt {
    pub puzzle: GridPuzzle,
    pub lives: u32,
    pub wrong: u32,
    selection: Vec<Position>,
    found: bool,
}

impl WordHunt {
    pub fn new(puzzle: GridPuzzle, lives: u32) -> Self {
        Self {
            puzzle,
            lives,
            wrong: 0,
            selection: Vec::new(),
            found: false,
        }
    }

    /// Lives taken from the `[choices]` config section.
    pub fn from_config(puzzle: GridPuzzle, cfg: &ChoiceConfig) -> Self {
        Self::new(puzzle, cfg.lives)
    }

    pub fn selection(&self) -> &[Position] {
        &self.selection
    }

    pub fn selected_letters(&self) -> String {
        self.puzzle.read(&self.selection)
    }

    pub fn is_found(&self) -> bool {
        self.found
    }

    pub fn is_lost(&self) -> bool {
        self.wrong >= self.lives
    }

    pub fn is_finished(&self) -> bool {
        self.found || self.is_lost()
    }

    /// Extends, trims or restarts the selection.
    ///
    /// A cell next to the last selected one is appended, or if it is already
    /// part of the selection everything after it is dropped. Tapping the
    /// starting cell again restarts from there. Anything else is ignored.
    pub fn select(&mut self, pos: Position) {
        if self.is_finished() || !pos.in_bounds(self.puzzle.size) {
            return;
        }

        let Some(&last) = self.selection.last() else {
            self.selection.push(pos);
            return;
        };

        if last.is_adjacent(pos) {
            match self.selection.iter().position(|&p| p == pos) {
                Some(idx) => self.selection.truncate(idx + 1),
                None => self.selection.push(pos),
            }
        } else if self.selection.len() > 1 && self.selection[0] == pos {
            self.selection.truncate(1);
        }
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }

    /// Checks the current selection against the hidden word. A miss costs a
    /// life and clears the selection.
    pub fn submit(&mut self) -> HuntOutcome {
        if self.is_finished() {
            return HuntOutcome::Finished;
        }

        if self.puzzle.check_selection(&self.selection) {
            self.found = true;
            return HuntOutcome::Found;
        }

        self.wrong += 1;
        self.selection.clear();
        if self.is_lost() {
            HuntOutcome::Lost
        } else {
            HuntOutcome::Miss
        }
    }
}
