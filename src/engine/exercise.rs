use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::engine::mastery::MAX_MASTERY;
use crate::engine::weighted::select_weighted;

const BASE_WEIGHT: f64 = 0.1;
const EXCESS_WEIGHT: f64 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Introduction,
    MultipleChoice,
    TrueFalse,
    LetterSelection,
    WordSearch,
}

impl ExerciseKind {
    pub fn all() -> &'static [ExerciseKind] {
        &[
            ExerciseKind::Introduction,
            ExerciseKind::MultipleChoice,
            ExerciseKind::TrueFalse,
            ExerciseKind::LetterSelection,
            ExerciseKind::WordSearch,
        ]
    }

    pub fn to_key(self) -> &'static str {
        match self {
            ExerciseKind::Introduction => "introduction",
            ExerciseKind::MultipleChoice => "multiple_choice",
            ExerciseKind::TrueFalse => "true_false",
            ExerciseKind::LetterSelection => "letter_selection",
            ExerciseKind::WordSearch => "word_search",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "introduction" => Some(ExerciseKind::Introduction),
            "multiple_choice" => Some(ExerciseKind::MultipleChoice),
            "true_false" => Some(ExerciseKind::TrueFalse),
            "letter_selection" => Some(ExerciseKind::LetterSelection),
            "word_search" => Some(ExerciseKind::WordSearch),
            _ => None,
        }
    }

    /// 0.0 (easiest) to 1.0 (hardest). Drives both reward and penalty size.
    pub fn difficulty(self) -> f64 {
        match self {
            ExerciseKind::Introduction => 0.2,
            ExerciseKind::MultipleChoice | ExerciseKind::TrueFalse => 0.4,
            ExerciseKind::LetterSelection => 0.5,
            ExerciseKind::WordSearch => 0.7,
        }
    }

    /// Minimum concept (group) mastery that unlocks this kind.
    pub fn required_mastery(self) -> f64 {
        match self {
            ExerciseKind::Introduction => 0.0,
            // Non-zero so these only open up once the concept was introduced
            ExerciseKind::MultipleChoice | ExerciseKind::TrueFalse => 0.01,
            ExerciseKind::LetterSelection | ExerciseKind::WordSearch => 40.0,
        }
    }

    pub fn is_legal_for(self, concept_mastery: f64) -> bool {
        match self {
            ExerciseKind::Introduction => concept_mastery <= 0.0,
            kind => kind.required_mastery() <= concept_mastery,
        }
    }
}

impl std::fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_key())
    }
}

pub fn legal_kinds(concept_mastery: f64) -> Vec<ExerciseKind> {
    ExerciseKind::all()
        .iter()
        .copied()
        .filter(|kind| kind.is_legal_for(concept_mastery))
        .collect()
}

/// `0.1 + 0.9 * excess²`, where excess is how far the concept is past the
/// kind's unlock threshold, normalized over the remaining range. Zero for
/// locked kinds.
pub fn selection_weight(kind: ExerciseKind, concept_mastery: f64) -> f64 {
    if !kind.is_legal_for(concept_mastery) {
        return 0.0;
    }
    let required = kind.required_mastery();
    let excess = if required >= MAX_MASTERY {
        0.0
    } else {
        ((concept_mastery - required) / (MAX_MASTERY - required)).clamp(0.0, 1.0)
    };
    BASE_WEIGHT + EXCESS_WEIGHT * excess * excess
}

/// Picks the exercise kind for a concept at the given mastery.
///
/// A single legal kind is returned as is. Otherwise Introduction is dropped
/// from the candidates and the rest are drawn by [`selection_weight`]. A
/// mastery so small that nothing is legal yet falls back to the entry-level
/// practice kind.
pub fn select_kind(concept_mastery: f64, rng: &mut SmallRng) -> ExerciseKind {
    let legal = legal_kinds(concept_mastery);
    match legal.as_slice() {
        [] => return ExerciseKind::MultipleChoice,
        [only] => return *only,
        _ => {}
    }

    let practice: Vec<ExerciseKind> = legal
        .iter()
        .copied()
        .filter(|&k| k != ExerciseKind::Introduction)
        .collect();
    let candidates = if practice.is_empty() { legal } else { practice };

    let weights: Vec<f64> = candidates
        .iter()
        .map(|&k| selection_weight(k, concept_mastery))
        .collect();
    select_weighted(&candidates, &weights, rng)
        .copied()
        .unwrap_or(candidates[0])
}
