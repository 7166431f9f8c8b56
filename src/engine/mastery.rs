use serde::{Deserialize, Serialize};

pub const UNSEEN: f64 = 0.0;
pub const MIN_INTRODUCED: f64 = 1.0;
pub const MAX_MASTERY: f64 = 100.0;

/// One representation variant of a concept (e.g. a single photo of a species)
/// and its mastery score in [0, 100]. Zero means the variant has never been shown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MasteryEntity {
    pub id: String,
    pub variant: String,
    #[serde(default)]
    pub mastery: f64,
}

impl MasteryEntity {
    pub fn new(id: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            variant: variant.into(),
            mastery: UNSEEN,
        }
    }

    pub fn with_mastery(mut self, mastery: f64) -> Self {
        self.mastery = mastery.clamp(UNSEEN, MAX_MASTERY);
        self
    }

    pub fn is_unseen(&self) -> bool {
        self.mastery <= UNSEEN
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConceptGroup {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub entities: Vec<MasteryEntity>,
}

impl ConceptGroup {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            entities: Vec::new(),
        }
    }

    pub fn with_entity(mut self, entity: MasteryEntity) -> Self {
        self.entities.push(entity);
        self
    }

    /// Mean of member mastery values; 0 for an empty group.
    pub fn aggregate_mastery(&self) -> f64 {
        if self.entities.is_empty() {
            return UNSEEN;
        }
        self.entities.iter().map(|e| e.mastery).sum::<f64>() / self.entities.len() as f64
    }

    pub fn is_new(&self) -> bool {
        self.entities.iter().all(MasteryEntity::is_unseen)
    }

    /// Index of the designated primary entity: the first tagged with
    /// `primary_variant`, otherwise the first-created one.
    pub fn primary_index(&self, primary_variant: &str) -> Option<usize> {
        if self.entities.is_empty() {
            return None;
        }
        Some(
            self.entities
                .iter()
                .position(|e| e.variant == primary_variant)
                .unwrap_or(0),
        )
    }

    pub fn primary(&self, primary_variant: &str) -> Option<&MasteryEntity> {
        self.primary_index(primary_variant)
            .map(|idx| &self.entities[idx])
    }

    pub fn entity(&self, entity_id: &str) -> Option<&MasteryEntity> {
        self.entities.iter().find(|e| e.id == entity_id)
    }

    pub fn entity_mut(&mut self, entity_id: &str) -> Option<&mut MasteryEntity> {
        self.entities.iter_mut().find(|e| e.id == entity_id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PracticeSet {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub groups: Vec<ConceptGroup>,
}

impl PracticeSet {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            groups: Vec::new(),
        }
    }

    pub fn with_group(mut self, group: ConceptGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Mean group mastery normalized to [0, 1].
    pub fn progress(&self) -> f64 {
        if self.groups.is_empty() {
            return 0.0;
        }
        let total: f64 = self.groups.iter().map(|g| g.aggregate_mastery()).sum();
        (total / self.groups.len() as f64 / MAX_MASTERY).clamp(0.0, 1.0)
    }

    pub fn introduced_count(&self) -> usize {
        self.groups.iter().filter(|g| !g.is_new()).count()
    }

    pub fn group(&self, group_id: &str) -> Option<&ConceptGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    pub fn entity_mut(&mut self, group_id: &str, entity_id: &str) -> Option<&mut MasteryEntity> {
        self.groups
            .iter_mut()
            .find(|g| g.id == group_id)?
            .entity_mut(entity_id)
    }
}
