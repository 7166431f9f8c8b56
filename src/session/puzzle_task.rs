use std::sync::mpsc::{self, TryRecvError};
use std::thread;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::WordSearchConfig;
use crate::generator::word_search::{GridPuzzle, generate_with};

pub enum PuzzleStatus {
    Pending,
    Ready(Option<GridPuzzle>),
    /// The worker went away without answering.
    Lost,
}

/// Grid generation running off the caller's thread. The search holds no
/// shared state, so dropping the task simply discards whatever it finds.
pub struct PuzzleTask {
    rx: mpsc::Receiver<Option<GridPuzzle>>,
    word: String,
}

impl PuzzleTask {
    pub fn spawn(word: &str, cfg: WordSearchConfig) -> Self {
        Self::spawn_with_rng(word, cfg, SmallRng::from_entropy())
    }

    pub fn spawn_seeded(word: &str, cfg: WordSearchConfig, seed: u64) -> Self {
        Self::spawn_with_rng(word, cfg, SmallRng::seed_from_u64(seed))
    }

    fn spawn_with_rng(word: &str, cfg: WordSearchConfig, mut rng: SmallRng) -> Self {
        let (tx, rx) = mpsc::channel();
        let owned = word.to_string();

        thread::spawn(move || {
            let puzzle = generate_with(&owned, &cfg, &mut rng);
            if tx.send(puzzle).is_err() {
                log::trace!("puzzle for {owned:?} discarded");
            }
        });

        Self {
            rx,
            word: word.to_string(),
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn try_result(&self) -> PuzzleStatus {
        match self.rx.try_recv() {
            Ok(puzzle) => PuzzleStatus::Ready(puzzle),
            Err(TryRecvError::Empty) => PuzzleStatus::Pending,
            Err(TryRecvError::Disconnected) => PuzzleStatus::Lost,
        }
    }

    /// Blocks until the worker finishes.
    pub fn wait(self) -> anyhow::Result<Option<GridPuzzle>> {
        Ok(self.rx.recv()?)
    }

    pub fn cancel(self) {
        log::debug!("cancelled puzzle for {:?}", self.word);
    }
}
