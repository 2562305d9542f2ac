//! Core domain types for the MovieLens ratings dataset.
//!
//! This module defines the two tables the service works with (movies and
//! ratings) and the [`DataIndex`] that holds them in memory.
//!
//! Rust concepts demonstrated here:
//! - Type aliases for domain clarity (UserId, MovieId)
//! - `Vec` + `HashMap` side by side to keep both file order and O(1) lookups
//! - Borrowing: query methods hand out `&T` and slices, never owned copies

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

// =============================================================================
// Rating Scale
// =============================================================================

/// Inclusive bounds of the star rating scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingScale {
    pub lower: f32,
    pub upper: f32,
}

impl RatingScale {
    /// MovieLens uses half stars from 0.5 to 5.0
    pub const MOVIELENS: RatingScale = RatingScale {
        lower: 0.5,
        upper: 5.0,
    };

    pub fn contains(&self, value: f32) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Clamp an estimate into the scale
    pub fn clip(&self, value: f32) -> f32 {
        value.clamp(self.lower, self.upper)
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self::MOVIELENS
    }
}

// =============================================================================
// Movie
// =============================================================================

/// Represents a movie in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Year extracted from title (e.g., "Toy Story (1995)")
    ///
    /// `None` when the title carries no trailing year
    pub year: Option<u16>,
    /// Genre labels as they appear in the file ("Sci-Fi", "IMAX", ...)
    pub genres: Vec<String>,
}

// =============================================================================
// Rating
// =============================================================================

/// A single rating from a user for a movie
///
/// Small and `Copy`, so the index can keep one copy per lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value within [`RatingScale::MOVIELENS`]
    pub rating: f32,
    /// Unix timestamp when rating was made
    pub timestamp: i64,
}

/// Precomputed statistics for a movie
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MovieStats {
    pub avg_rating: f32,
    pub rating_count: u32,
}

// =============================================================================
// DataIndex - The In-Memory Data Store
// =============================================================================

/// Holds the movie catalog and all ratings, loaded once at startup and
/// read-only afterwards.
///
/// The catalog is kept in file order: that order decides ties when two
/// candidates receive the same predicted score.
#[derive(Debug, Default)]
pub struct DataIndex {
    /// Movies in file order
    pub(crate) movies: Vec<Movie>,
    /// Position of each movie inside `movies`
    pub(crate) movie_positions: HashMap<MovieId, usize>,

    /// All ratings in file order
    pub(crate) ratings: Vec<Rating>,
    /// All ratings made by each user
    pub(crate) user_ratings: HashMap<UserId, Vec<Rating>>,
    /// All ratings received by each movie
    pub(crate) movie_ratings: HashMap<MovieId, Vec<Rating>>,

    pub(crate) movie_stats: HashMap<MovieId, MovieStats>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.movie_positions.get(&id).map(|&pos| &self.movies[pos])
    }

    /// The whole catalog, in file order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Every rating, in file order
    pub fn all_ratings(&self) -> &[Rating] {
        &self.ratings
    }

    /// Get all ratings made by a user
    ///
    /// Returns an empty slice if the user has no ratings
    pub fn get_user_ratings(&self, user_id: UserId) -> &[Rating] {
        self.user_ratings
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get all ratings for a movie
    pub fn get_movie_ratings(&self, movie_id: MovieId) -> &[Rating] {
        self.movie_ratings
            .get(&movie_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Set of movies the user has already rated (empty for unknown users)
    pub fn rated_movie_ids(&self, user_id: UserId) -> HashSet<MovieId> {
        self.get_user_ratings(user_id)
            .iter()
            .map(|r| r.movie_id)
            .collect()
    }

    /// Whether the user appears in the ratings table
    pub fn has_user(&self, user_id: UserId) -> bool {
        self.user_ratings.contains_key(&user_id)
    }

    /// All user ids that have at least one rating, sorted ascending
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.user_ratings.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Get precomputed statistics for a movie
    pub fn get_movie_stats(&self, movie_id: MovieId) -> Option<&MovieStats> {
        self.movie_stats.get(&movie_id)
    }

    /// Case-insensitive title search.
    ///
    /// Exact matches come first, then substring matches; within each group
    /// movies keep catalog order.
    pub fn search_titles(&self, query: &str) -> Vec<&Movie> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let (mut exact, mut partial) = (Vec::new(), Vec::new());
        for movie in &self.movies {
            let title = movie.title.to_lowercase();
            if title == needle {
                exact.push(movie);
            } else if title.contains(&needle) {
                partial.push(movie);
            }
        }
        exact.append(&mut partial);
        exact
    }

    /// Insert a movie, replacing an existing entry with the same id in place
    pub fn insert_movie(&mut self, movie: Movie) {
        match self.movie_positions.get(&movie.id) {
            Some(&pos) => self.movies[pos] = movie,
            None => {
                self.movie_positions.insert(movie.id, self.movies.len());
                self.movies.push(movie);
            }
        }
    }

    /// Insert a rating and update indices
    pub fn insert_rating(&mut self, rating: Rating) {
        self.ratings.push(rating);

        self.user_ratings
            .entry(rating.user_id)
            .or_default()
            .push(rating);

        self.movie_ratings
            .entry(rating.movie_id)
            .or_default()
            .push(rating);
    }

    /// Get (users, movies, ratings) counts
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.user_ratings.len(), self.movies.len(), self.ratings.len())
    }
}
