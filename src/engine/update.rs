use rand::Rng;
use rand::rngs::SmallRng;

use crate::config::MasteryConfig;
use crate::engine::exercise::ExerciseKind;
use crate::engine::mastery::{MAX_MASTERY, MIN_INTRODUCED, MasteryEntity};

/// Diminishing-returns multiplier on gains: 1.0 for an unseen entity,
/// shrinking linearly with mastery but never below the configured floor.
pub fn gain_scale(current: f64, cfg: &MasteryConfig) -> f64 {
    let current = current.clamp(0.0, MAX_MASTERY);
    (1.0 - (current / MAX_MASTERY) * cfg.diminishing_factor).max(cfg.diminishing_floor)
}

/// Inclusive range a correct answer's gain is drawn from.
pub fn gain_range(kind: ExerciseKind, current: f64, cfg: &MasteryConfig) -> (f64, f64) {
    let bonus = kind.difficulty() * cfg.gain_difficulty_scale;
    let scale = gain_scale(current, cfg);
    ((cfg.gain_min + bonus) * scale, (cfg.gain_max + bonus) * scale)
}

/// Gain at quantile `q` (0 = smallest, 1 = largest) of [`gain_range`].
pub fn gain_at(kind: ExerciseKind, current: f64, q: f64, cfg: &MasteryConfig) -> f64 {
    let (lo, hi) = gain_range(kind, current, cfg);
    lo + (hi - lo) * q.clamp(0.0, 1.0)
}

/// Mastery lost on a wrong answer at the given difficulty. Harder exercises
/// forgive more.
pub fn penalty_for(difficulty: f64, cfg: &MasteryConfig) -> f64 {
    (cfg.penalty_base - difficulty.clamp(0.0, 1.0) * cfg.penalty_difficulty_scale).max(0.0)
}

pub fn penalty(kind: ExerciseKind, cfg: &MasteryConfig) -> f64 {
    if kind == ExerciseKind::Introduction {
        return 0.0;
    }
    penalty_for(kind.difficulty(), cfg)
}

/// Mastery after an attempt. Introductions only ever raise an entity to the
/// bootstrap value; every other kind keeps the result within [1, 100].
pub fn next_mastery(
    current: f64,
    kind: ExerciseKind,
    was_correct: bool,
    rng: &mut SmallRng,
    cfg: &MasteryConfig,
) -> f64 {
    let current = current.clamp(0.0, MAX_MASTERY);

    if kind == ExerciseKind::Introduction {
        return current.max(cfg.intro_bootstrap).min(MAX_MASTERY);
    }

    let updated = if was_correct {
        let q = rng.gen_range(0.0..=1.0);
        current + gain_at(kind, current, q, cfg)
    } else {
        current - penalty(kind, cfg)
    };
    updated.clamp(MIN_INTRODUCED, MAX_MASTERY)
}

/// Applies [`next_mastery`] to the entity in place and returns the new value.
pub fn record_attempt(
    entity: &mut MasteryEntity,
    kind: ExerciseKind,
    was_correct: bool,
    rng: &mut SmallRng,
    cfg: &MasteryConfig,
) -> f64 {
    let before = entity.mastery;
    entity.mastery = next_mastery(before, kind, was_correct, rng, cfg);
    log::debug!(
        "{} ({kind}, correct={was_correct}): {before:.1} -> {:.1}",
        entity.id,
        entity.mastery
    );
    entity.mastery
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn cfg() -> MasteryConfig {
        MasteryConfig::default()
    }

    const PRACTICE: [ExerciseKind; 4] = [
        ExerciseKind::MultipleChoice,
        ExerciseKind::TrueFalse,
        ExerciseKind::LetterSelection,
        ExerciseKind::WordSearch,
    ];

    #[test]
    fn test_diminishing_returns() {
        let cfg = cfg();
        for kind in PRACTICE {
            for q in [0.0, 0.5, 1.0] {
                assert!(gain_at(kind, 0.0, q, &cfg) > gain_at(kind, 90.0, q, &cfg));
            }
        }
        assert_eq!(gain_scale(0.0, &cfg), 1.0);
        // 1 - 0.4 = 0.6 at full mastery, which is also the floor
        assert!((gain_scale(100.0, &cfg) - 0.6).abs() < 1e-12);
        assert!(gain_scale(50.0, &cfg) > gain_scale(90.0, &cfg));
    }

    #[test]
    fn test_harder_kinds_win_more() {
        let cfg = cfg();
        let easy = gain_at(ExerciseKind::MultipleChoice, 30.0, 0.5, &cfg);
        let hard = gain_at(ExerciseKind::WordSearch, 30.0, 0.5, &cfg);
        assert!(hard > easy);
    }

    #[test]
    fn test_gain_range_bounds() {
        let (lo, hi) = gain_range(ExerciseKind::WordSearch, 0.0, &cfg());
        // 10 + 0.7 * 20 and 15 + 0.7 * 20
        assert!((lo - 24.0).abs() < 1e-9);
        assert!((hi - 29.0).abs() < 1e-9);
        assert!(lo < hi);
    }

    #[test]
    fn test_penalty_inversion() {
        let cfg = cfg();
        assert!(penalty(ExerciseKind::WordSearch, &cfg) < penalty(ExerciseKind::MultipleChoice, &cfg));
        assert!(
            penalty(ExerciseKind::LetterSelection, &cfg) < penalty(ExerciseKind::TrueFalse, &cfg)
        );
        assert!(penalty_for(1.0, &cfg) < penalty_for(0.0, &cfg));
        assert_eq!(penalty_for(0.0, &cfg), 5.0);
        assert_eq!(penalty_for(1.0, &cfg), 3.0);
    }

    #[test]
    fn test_introduction_never_penalizes() {
        let cfg = cfg();
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(next_mastery(0.0, ExerciseKind::Introduction, false, &mut rng, &cfg), 5.0);
        assert_eq!(next_mastery(0.0, ExerciseKind::Introduction, true, &mut rng, &cfg), 5.0);
        assert_eq!(next_mastery(42.0, ExerciseKind::Introduction, false, &mut rng, &cfg), 42.0);
        assert_eq!(penalty(ExerciseKind::Introduction, &cfg), 0.0);
    }

    #[test]
    fn test_wrong_answer_floors_at_one() {
        let cfg = cfg();
        let mut rng = SmallRng::seed_from_u64(1);
        for kind in PRACTICE {
            assert_eq!(next_mastery(2.0, kind, false, &mut rng, &cfg), 1.0);
            assert_eq!(next_mastery(1.0, kind, false, &mut rng, &cfg), 1.0);
        }
    }

    #[test]
    fn test_mastery_stays_in_bounds() {
        let cfg = cfg();
        let mut rng = SmallRng::seed_from_u64(99);
        for step in 0..=100 {
            let current = step as f64;
            for kind in PRACTICE {
                for was_correct in [true, false] {
                    let next = next_mastery(current, kind, was_correct, &mut rng, &cfg);
                    assert!((1.0..=100.0).contains(&next), "{current} {kind} -> {next}");
                    if was_correct {
                        assert!(next >= current.max(1.0));
                    } else {
                        assert!(next <= current.max(1.0));
                    }
                }
            }
        }
    }

    #[test]
    fn test_correct_answer_gain_within_range() {
        let cfg = cfg();
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..500 {
            let next = next_mastery(20.0, ExerciseKind::TrueFalse, true, &mut rng, &cfg);
            let (lo, hi) = gain_range(ExerciseKind::TrueFalse, 20.0, &cfg);
            let gain = next - 20.0;
            assert!(gain >= lo - 1e-9 && gain <= hi + 1e-9);
        }
    }

    #[test]
    fn test_record_attempt_mutates_entity() {
        let cfg = cfg();
        let mut rng = SmallRng::seed_from_u64(5);
        let mut entity = MasteryEntity::new("robin-0", "primary");
        let after = record_attempt(&mut entity, ExerciseKind::Introduction, true, &mut rng, &cfg);
        assert_eq!(after, 5.0);
        assert_eq!(entity.mastery, 5.0);
        let after = record_attempt(&mut entity, ExerciseKind::WordSearch, true, &mut rng, &cfg);
        assert!(after > 5.0);
        assert_eq!(entity.mastery, after);
    }
}
