use std::collections::HashSet;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

use fieldguide::config::{Config, MasteryConfig, PacingConfig, WordSearchConfig};
use fieldguide::engine::exercise::{legal_kinds, selection_weight};
use fieldguide::engine::scheduler::advance;
use fieldguide::engine::update::{gain_at, next_mastery, penalty_for};
use fieldguide::engine::weighted::select_weighted_index;
use fieldguide::engine::{ConceptGroup, ExerciseKind, MasteryEntity, PracticeSet};
use fieldguide::generator::path::{find_path, is_valid_path};
use fieldguide::generator::word_search::{generate, normalize_word};
use fieldguide::session::practice::PracticeSession;
use fieldguide::session::word_hunt::{HuntOutcome, WordHunt};
use fieldguide::store::bundled::load_bundled;
use fieldguide::store::json_store::JsonStore;

fn unseen_set(names: &[&str]) -> PracticeSet {
    names.iter().fold(PracticeSet::new("test", "Test"), |set, name| {
        set.with_group(
            ConceptGroup::new(name.to_lowercase(), *name)
                .with_entity(MasteryEntity::new(format!("{name}-primary"), "primary"))
                .with_entity(MasteryEntity::new(format!("{name}-alt"), "alternate")),
        )
    })
}

#[test]
fn test_weighted_frequencies_converge() {
    let mut rng = SmallRng::seed_from_u64(11);
    let weights = [1.0, 0.0, 3.0, 6.0];
    let mut counts = [0usize; 4];
    let trials = 50_000;
    for _ in 0..trials {
        counts[select_weighted_index(&weights, 4, &mut rng).unwrap()] += 1;
    }
    for (i, &w) in weights.iter().enumerate() {
        let freq = counts[i] as f64 / trials as f64;
        assert!((freq - w / 10.0).abs() < 0.015, "index {i}: {freq}");
    }
}

#[test]
fn test_mastery_stays_clamped_once_introduced() {
    let cfg = MasteryConfig::default();
    let mut rng = SmallRng::seed_from_u64(12);
    for _ in 0..2_000 {
        let current = rng.gen_range(0.0..=100.0);
        let kind = ExerciseKind::all()[rng.gen_range(1..ExerciseKind::all().len())];
        let next = next_mastery(current, kind, rng.gen_bool(0.5), &mut rng, &cfg);
        assert!((1.0..=100.0).contains(&next), "{current} -> {next}");
    }
}

#[test]
fn test_diminishing_returns_and_penalty_inversion() {
    let cfg = MasteryConfig::default();
    for &kind in &ExerciseKind::all()[1..] {
        for q in [0.0, 0.5, 1.0] {
            assert!(gain_at(kind, 0.0, q, &cfg) > gain_at(kind, 90.0, q, &cfg));
        }
    }
    assert!(penalty_for(1.0, &cfg) < penalty_for(0.0, &cfg));
}

#[test]
fn test_paths_are_self_avoiding_walks() {
    let mut rng = SmallRng::seed_from_u64(13);
    for size in 3..=7 {
        for length in 1..=size * size / 2 {
            let path = find_path(length, size, 100, &mut rng).unwrap();
            assert_eq!(path.len(), length);
            assert!(is_valid_path(&path, size));
            let distinct: HashSet<_> = path.iter().collect();
            assert_eq!(distinct.len(), length);
        }
    }
}

#[test]
fn test_bundled_names_round_trip_through_grids() {
    let mut rng = SmallRng::seed_from_u64(14);
    let set = load_bundled("waterbirds").unwrap();
    for group in &set.groups {
        let puzzle = generate(&group.label, 10, 100, &mut rng).unwrap();
        assert_eq!(puzzle.read(&puzzle.path), normalize_word(&group.label));
    }
}

#[test]
fn test_oversized_word_rejected() {
    let mut rng = SmallRng::seed_from_u64(15);
    assert!(generate("ABCDEFGHIJKLMNOPQRSTUVWXYZ", 5, 100, &mut rng).is_none());
}

#[test]
fn test_unseen_set_always_introduces() {
    let set = unseen_set(&["Robin", "Wren", "Jay", "Finch", "Tit"]);
    let cfg = PacingConfig::default();
    let mut rng = SmallRng::seed_from_u64(16);
    for _ in 0..500 {
        let unit = advance(&set, &cfg, &mut rng).unwrap();
        assert_eq!(unit.kind, ExerciseKind::Introduction);
        assert_eq!(unit.group.label, "Finch");
        assert_eq!(unit.entity.variant, "primary");
    }
}

#[test]
fn test_full_mastery_unlocks_everything_but_introduction() {
    let kinds = legal_kinds(100.0);
    assert!(!kinds.contains(&ExerciseKind::Introduction));
    assert_eq!(kinds.len(), ExerciseKind::all().len() - 1);

    let top = ExerciseKind::WordSearch;
    for &kind in &kinds {
        assert!(selection_weight(kind, 100.0) <= selection_weight(top, 100.0));
    }
    assert!((selection_weight(top, 100.0) - 1.0).abs() < 1e-9);
}

#[test]
fn test_empty_set_is_exhausted() {
    let mut rng = SmallRng::seed_from_u64(17);
    assert!(advance(&PracticeSet::default(), &PacingConfig::default(), &mut rng).is_none());
}

#[test]
fn test_session_persists_through_store() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let set = load_bundled("garden-birds").unwrap();
    store.save_set(&set).unwrap();

    let mut session =
        PracticeSession::with_rng(set, Config::default(), SmallRng::seed_from_u64(18))
            .with_hook(Box::new(store));
    for i in 0..60 {
        session.advance();
        session.record_attempt(i % 4 != 0);
    }

    let reopened = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let stored = reopened.load_set("garden-birds").unwrap().unwrap();
    assert!(stored.introduced_count() > 0);
    for (kept, live) in stored.groups.iter().zip(&session.set().groups) {
        for (a, b) in kept.entities.iter().zip(&live.entities) {
            assert_eq!(a.id, b.id);
            assert!((a.mastery - b.mastery).abs() < 1e-9, "{}", a.id);
        }
    }
}

#[test]
fn test_word_hunt_on_generated_puzzle() {
    let mut rng = SmallRng::seed_from_u64(19);
    let cfg = WordSearchConfig::default();
    let puzzle = fieldguide::generator::word_search::generate_with("Kingfisher", &cfg, &mut rng)
        .unwrap();
    let mut hunt = WordHunt::new(puzzle, 3);
    for pos in hunt.puzzle.path.clone() {
        hunt.select(pos);
    }
    assert_eq!(hunt.selected_letters(), "KINGFISHER");
    assert_eq!(hunt.submit(), HuntOutcome::Found);
}
