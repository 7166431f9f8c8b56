use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::engine::mastery::PracticeSet;
use crate::generator::word_search::FILLER_ALPHABET;

/// Group ids other than `correct_id` that the learner has already met.
fn introduced_others<'a>(set: &'a PracticeSet, correct_id: &str) -> Vec<&'a str> {
    set.groups
        .iter()
        .filter(|g| g.id != correct_id && !g.is_new())
        .map(|g| g.id.as_str())
        .collect()
}

/// Answer options for a multiple-choice exercise: the correct group plus up
/// to `distractors` other introduced groups, shuffled. Never includes groups
/// the learner has not been introduced to.
pub fn multiple_choice_options(
    set: &PracticeSet,
    correct_id: &str,
    distractors: usize,
    rng: &mut SmallRng,
) -> Vec<String> {
    let others = introduced_others(set, correct_id);
    let mut options: Vec<String> = others
        .choose_multiple(rng, distractors)
        .map(|id| id.to_string())
        .collect();
    options.push(correct_id.to_string());
    options.shuffle(rng);
    options
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrueFalsePrompt {
    pub shown_id: String,
    pub is_match: bool,
}

/// Shows either the correct group's name or another introduced group's name
/// with even odds. Without any introduced alternative the prompt is a match.
pub fn true_false_prompt(set: &PracticeSet, correct_id: &str, rng: &mut SmallRng) -> TrueFalsePrompt {
    if rng.gen_bool(0.5) {
        if let Some(&other) = introduced_others(set, correct_id).choose(rng) {
            return TrueFalsePrompt {
                shown_id: other.to_string(),
                is_match: false,
            };
        }
    }
    TrueFalsePrompt {
        shown_id: correct_id.to_string(),
        is_match: true,
    }
}

/// `count` distinct letters including `correct`, shuffled. Decoys come from
/// the filler alphabet.
pub fn letter_options(correct: char, count: usize, rng: &mut SmallRng) -> Vec<char> {
    let decoys: Vec<char> = FILLER_ALPHABET
        .iter()
        .copied()
        .filter(|&c| c != correct)
        .collect();
    let mut options: Vec<char> = decoys
        .choose_multiple(rng, count.saturating_sub(1))
        .copied()
        .collect();
    options.push(correct);
    options.shuffle(rng);
    options
}
