// Core engine exports
pub mod engine;
pub mod errors;
pub mod filters;
pub mod ranking;

pub use engine::MatchingEngine;
pub use errors::EngineError;
pub use filters::{apply_filter, matches_subject, escape_like};
pub use ranking::{top_by_rating, compare_popularity};
