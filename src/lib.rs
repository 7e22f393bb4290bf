//! StudyMate - partner-matching service for the StudyMate study-partner platform
//!
//! The [`MatchingEngine`] owns the workflow rules: unique profile emails, one
//! open partner request per sender/receiver pair, atomic receiver counter
//! updates and popularity ranking. Stores are injected behind the
//! [`ProfileStore`] and [`RequestStore`] traits; routes bind the engine to HTTP.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{MatchingEngine, EngineError};
pub use models::{Profile, NewProfile, ProfileFilter, SortOrder, PartnerRequest, RequestStatus};
pub use services::{MemoryStore, PostgresStore, ProfileStore, RequestStore, StoreError};
