//! Problem generation and ringside commentary for Math Boxing.
//!
//! Both halves are stateless: every call takes the caller's RNG, so a seeded
//! `StdRng` reproduces the same fight question for question and line for
//! line.

pub mod commentary;
pub mod generator;

pub use commentary::{CommentaryEvent, CommentaryTable};
pub use generator::{answer_options, generate_problem};
