pub mod letter_round;
pub mod practice;
pub mod puzzle_task;
pub mod word_hunt;
