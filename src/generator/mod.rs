pub mod choices;
pub mod path;
pub mod word_search;

pub use path::Position;
pub use word_search::GridPuzzle;
