use rand::Rng;
use rand::rngs::SmallRng;

use crate::config::PacingConfig;
use crate::engine::exercise::{ExerciseKind, select_kind};
use crate::engine::mastery::{ConceptGroup, MAX_MASTERY, MasteryEntity, PracticeSet};
use crate::engine::weighted::select_weighted_index;

/// One scheduled exercise. Holds copies, so it stays valid while the caller
/// mutates the set it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct PracticeUnit {
    pub group: ConceptGroup,
    pub entity: MasteryEntity,
    pub kind: ExerciseKind,
}

impl PracticeUnit {
    pub fn group_id(&self) -> &str {
        &self.group.id
    }

    pub fn entity_id(&self) -> &str {
        &self.entity.id
    }
}

/// Decides what to practice next.
///
/// Returns `None` only when the set has no group that can be shown (no groups
/// at all, or only groups without entities).
pub fn advance(set: &PracticeSet, cfg: &PacingConfig, rng: &mut SmallRng) -> Option<PracticeUnit> {
    let schedulable: Vec<&ConceptGroup> = set
        .groups
        .iter()
        .filter(|g| !g.entities.is_empty())
        .collect();
    if schedulable.is_empty() {
        return None;
    }

    let (fresh, introduced): (Vec<&ConceptGroup>, Vec<&ConceptGroup>) =
        schedulable.iter().copied().partition(|g| g.is_new());

    let progress = set.progress();
    let introduce = should_introduce(
        schedulable.len(),
        introduced.len(),
        fresh.len(),
        progress,
        cfg,
        rng,
    );

    // New groups are the fallback whenever nothing has been introduced yet
    let group = if introduce || introduced.is_empty() {
        earliest_new(&fresh)?
    } else {
        select_group(&introduced, cfg, rng)
    };

    let kind = if group.is_new() {
        ExerciseKind::Introduction
    } else {
        select_kind(group.aggregate_mastery(), rng)
    };

    let entity_idx = select_entity(group, kind, cfg, rng)?;

    log::debug!(
        "next unit: {} / {} as {kind} (progress {progress:.2}, introduced {}/{})",
        group.label,
        group.entities[entity_idx].variant,
        introduced.len(),
        schedulable.len()
    );

    Some(PracticeUnit {
        group: group.clone(),
        entity: group.entities[entity_idx].clone(),
        kind,
    })
}

/// Pacing check: should this turn introduce a new group?
///
/// Introductions are spread across the first `intro_window` of set progress.
/// While behind the target count, a new group is introduced with a
/// probability that decays linearly from `floor + span` to `floor` across the
/// window. Past the window nothing is introduced spontaneously.
pub fn should_introduce(
    total: usize,
    introduced: usize,
    fresh: usize,
    progress: f64,
    cfg: &PacingConfig,
    rng: &mut SmallRng,
) -> bool {
    if fresh == 0 || progress >= cfg.intro_window {
        return false;
    }

    let ratio = (progress / cfg.intro_window).clamp(0.0, 1.0);
    let target = (total as f64 * ratio).ceil() as usize;
    if introduced >= target {
        return false;
    }

    let probability =
        (cfg.intro_probability_floor + cfg.intro_probability_span * (1.0 - ratio)).clamp(0.0, 1.0);
    rng.gen_bool(probability)
}

/// Lowest label first; ties broken by id so the choice is stable.
fn earliest_new<'a>(fresh: &[&'a ConceptGroup]) -> Option<&'a ConceptGroup> {
    fresh
        .iter()
        .copied()
        .min_by(|a, b| a.label.cmp(&b.label).then_with(|| a.id.cmp(&b.id)))
}

/// Weaker groups are drawn more often.
pub fn group_weight(group: &ConceptGroup, cfg: &PacingConfig) -> f64 {
    (MAX_MASTERY - group.aggregate_mastery()).max(cfg.min_group_weight)
}

fn select_group<'a>(
    groups: &[&'a ConceptGroup],
    cfg: &PacingConfig,
    rng: &mut SmallRng,
) -> &'a ConceptGroup {
    let weights: Vec<f64> = groups.iter().map(|g| group_weight(g, cfg)).collect();
    let idx = select_weighted_index(&weights, groups.len(), rng).unwrap_or(0);
    groups[idx]
}

/// Selection weights for each entity of `group` in a practice (non-introduction)
/// exercise. Alternates get zero until the primary has had enough exposure.
pub fn entity_weights(group: &ConceptGroup, cfg: &PacingConfig) -> Vec<f64> {
    let Some(primary_idx) = group.primary_index(&cfg.primary_variant) else {
        return Vec::new();
    };
    let primary_mastery = group.entities[primary_idx].mastery;

    let primary_weight = (1.0 - primary_mastery / 200.0).max(cfg.primary_weight_floor);

    let alternate_weight = if primary_mastery < cfg.min_exposure {
        0.0
    } else {
        let span = (MAX_MASTERY - cfg.min_exposure).max(f64::EPSILON);
        let factor = ((primary_mastery - cfg.min_exposure) / span).clamp(0.0, 1.0);
        cfg.alternate_weight_floor + (1.0 - cfg.alternate_weight_floor) * factor
    };

    (0..group.entities.len())
        .map(|i| {
            if i == primary_idx {
                primary_weight
            } else {
                alternate_weight
            }
        })
        .collect()
}

/// Index of the entity to show. Introductions always use the primary.
pub fn select_entity(
    group: &ConceptGroup,
    kind: ExerciseKind,
    cfg: &PacingConfig,
    rng: &mut SmallRng,
) -> Option<usize> {
    let primary_idx = group.primary_index(&cfg.primary_variant)?;
    if kind == ExerciseKind::Introduction || group.entities.len() == 1 {
        return Some(primary_idx);
    }

    let weights = entity_weights(group, cfg);
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Some(primary_idx);
    }
    select_weighted_index(&weights, group.entities.len(), rng).or(Some(primary_idx))
}
