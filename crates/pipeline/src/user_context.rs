use crate::types::UserContext;
use data_loader::{DataIndex, UserId};

/// Gather the user's rating history from the index.
///
/// A user with no ratings (or unknown to the dataset) gets an empty history,
/// so nothing is excluded for them.
pub fn build_user_context(data_index: &DataIndex, user_id: UserId) -> UserContext {
    UserContext {
        user_id: Some(user_id),
        rated_movies: data_index.rated_movie_ids(user_id),
    }
}
