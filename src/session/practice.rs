use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::Config;
use crate::engine::mastery::PracticeSet;
use crate::engine::scheduler::{PracticeUnit, advance};
use crate::engine::update::record_attempt;

/// Receives every mastery change so the storage layer can persist it.
/// Failures are the hook's concern; the session only logs them.
pub trait MasteryHook {
    fn persist(&mut self, set_id: &str, group_id: &str, entity_id: &str, mastery: f64)
    -> anyhow::Result<()>;
}

/// Drives one learner through a practice set: schedule a unit, record the
/// answer, schedule the next. Owns its copy of the set.
pub struct PracticeSession {
    set: PracticeSet,
    config: Config,
    rng: SmallRng,
    current: Option<PracticeUnit>,
    hook: Option<Box<dyn MasteryHook>>,
    attempts: u32,
    correct: u32,
}

impl PracticeSession {
    pub fn new(set: PracticeSet, config: Config) -> Self {
        Self::with_rng(set, config, SmallRng::from_entropy())
    }

    pub fn with_rng(set: PracticeSet, config: Config, rng: SmallRng) -> Self {
        Self {
            set,
            config,
            rng,
            current: None,
            hook: None,
            attempts: 0,
            correct: 0,
        }
    }

    pub fn with_hook(mut self, hook: Box<dyn MasteryHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Schedules the next unit. `None` means the set has nothing to practice.
    pub fn advance(&mut self) -> Option<&PracticeUnit> {
        self.current = advance(&self.set, &self.config.pacing, &mut self.rng);
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&PracticeUnit> {
        self.current.as_ref()
    }

    /// Applies the answer to the current unit's entity and returns its new
    /// mastery. `None` when no unit is scheduled or the entity vanished.
    pub fn record_attempt(&mut self, was_correct: bool) -> Option<f64> {
        let unit = self.current.as_ref()?;
        let kind = unit.kind;
        let group_id = unit.group_id().to_string();
        let entity_id = unit.entity_id().to_string();

        let entity = self.set.entity_mut(&group_id, &entity_id)?;
        let mastery = record_attempt(
            entity,
            kind,
            was_correct,
            &mut self.rng,
            &self.config.mastery,
        );

        self.attempts += 1;
        if was_correct {
            self.correct += 1;
        }

        if let Some(hook) = self.hook.as_mut() {
            if let Err(err) = hook.persist(&self.set.id, &group_id, &entity_id, mastery) {
                log::warn!("failed to persist mastery for {entity_id}: {err:#}");
            }
        }
        Some(mastery)
    }

    pub fn progress(&self) -> f64 {
        self.set.progress()
    }

    pub fn set(&self) -> &PracticeSet {
        &self.set
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn rng_mut(&mut self) -> &mut SmallRng {
        &mut self.rng
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            return 100.0;
        }
        self.correct as f64 / self.attempts as f64 * 100.0
    }

    pub fn into_set(self) -> PracticeSet {
        self.set
    }
}
