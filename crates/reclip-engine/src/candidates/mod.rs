//! Transcript to clip-candidate pool.

mod generator;

pub use generator::{ends_sentence, CandidateGenerator};
