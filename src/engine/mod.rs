pub mod exercise;
pub mod mastery;
pub mod scheduler;
pub mod update;
pub mod weighted;

pub use exercise::ExerciseKind;
pub use mastery::{ConceptGroup, MasteryEntity, PracticeSet};
pub use scheduler::PracticeUnit;
