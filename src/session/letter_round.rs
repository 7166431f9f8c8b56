use rand::rngs::SmallRng;

use crate::config::ChoiceConfig;
use crate::generator::choices::letter_options;
use crate::generator::word_search::normalize_word;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LetterOutcome {
    Correct,
    Wrong,
    Won,
    Lost,
    /// Guess after the round already ended.
    Finished,
}

/// Spell a name one letter at a time, picking each letter from a small set of
/// options. Wrong picks cost a life; the round is lost when lives run out.
pub struct LetterRound {
    pub target: Vec<char>,
    pub position: usize,
    pub incorrect: u32,
    pub lives: u32,
    option_count: usize,
    options: Vec<char>,
}

impl LetterRound {
    pub fn new(name: &str, option_count: usize, lives: u32, rng: &mut SmallRng) -> Self {
        let mut round = Self {
            target: normalize_word(name).chars().collect(),
            position: 0,
            incorrect: 0,
            lives,
            option_count,
            options: Vec::new(),
        };
        round.refresh_options(rng);
        round
    }

    /// Option count and lives taken from the `[choices]` config section.
    pub fn from_config(name: &str, cfg: &ChoiceConfig, rng: &mut SmallRng) -> Self {
        Self::new(name, cfg.letter_options, cfg.lives, rng)
    }

    fn refresh_options(&mut self, rng: &mut SmallRng) {
        self.options = match self.target.get(self.position) {
            Some(&ch) => letter_options(ch, self.option_count, rng),
            None => Vec::new(),
        };
    }

    pub fn options(&self) -> &[char] {
        &self.options
    }

    pub fn is_won(&self) -> bool {
        self.position >= self.target.len()
    }

    pub fn is_lost(&self) -> bool {
        self.incorrect >= self.lives
    }

    pub fn is_finished(&self) -> bool {
        self.is_won() || self.is_lost()
    }

    /// Letters filled so far, with `_` for the rest.
    pub fn revealed(&self) -> String {
        self.target
            .iter()
            .enumerate()
            .map(|(i, &c)| if i < self.position { c } else { '_' })
            .collect()
    }

    pub fn guess(&mut self, letter: char, rng: &mut SmallRng) -> LetterOutcome {
        if self.is_finished() {
            return LetterOutcome::Finished;
        }

        if letter.to_uppercase().eq(std::iter::once(self.target[self.position])) {
            self.position += 1;
            if self.is_won() {
                self.options.clear();
                return LetterOutcome::Won;
            }
            self.refresh_options(rng);
            LetterOutcome::Correct
        } else {
            self.incorrect += 1;
            if self.is_lost() {
                LetterOutcome::Lost
            } else {
                LetterOutcome::Wrong
            }
        }
    }
}
