//! Removes movies the user has already rated.

use crate::traits::Filter;
use crate::types::{Candidate, UserContext};
use anyhow::Result;

pub struct AlreadyRatedFilter;

impl Filter for AlreadyRatedFilter {
    fn name(&self) -> &str {
        "AlreadyRatedFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, context: &UserContext) -> Result<Vec<Candidate>> {
        Ok(candidates
            .into_iter()
            .filter(|candidate| !context.rated_movies.contains(&candidate.movie_id))
            .collect())
    }
}
