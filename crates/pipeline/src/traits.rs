//! Core traits for the filtering pipeline.

use crate::types::{Candidate, UserContext};
use anyhow::Result;

/// A step that removes candidates.
///
/// Filters take ownership of the candidate list and return what survives,
/// keeping the relative order of the survivors.
pub trait Filter: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    fn apply(&self, candidates: Vec<Candidate>, context: &UserContext) -> Result<Vec<Candidate>>;
}
