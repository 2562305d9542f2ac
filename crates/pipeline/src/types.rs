//! Types flowing through the pipeline.

use data_loader::{MovieId, UserId};
use std::collections::HashSet;

/// A movie under consideration for one user
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub movie_id: MovieId,
    /// Predicted rating; 0.0 until the candidate has been scored
    pub score: f32,
}

impl Candidate {
    pub fn new(movie_id: MovieId) -> Self {
        Self {
            movie_id,
            score: 0.0,
        }
    }

    pub fn with_score(movie_id: MovieId, score: f32) -> Self {
        Self { movie_id, score }
    }
}

/// What the filters need to know about the requesting user
///
/// `user_id` is `None` for a requester whose id cannot belong to the dataset;
/// such a user has no history and is scored as a brand new user.
#[derive(Debug, Clone, Default)]
pub struct UserContext {
    pub user_id: Option<UserId>,
    /// Movies the user has rated, for O(1) exclusion
    pub rated_movies: HashSet<MovieId>,
}

impl UserContext {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            rated_movies: HashSet::new(),
        }
    }

    /// Context for a requester outside the dataset's id space
    pub fn anonymous() -> Self {
        Self::default()
    }
}
