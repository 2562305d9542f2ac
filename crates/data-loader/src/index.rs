//! DataIndex building and validation.
//!
//! Loads both CSV files, fills the index, computes per-movie statistics and
//! checks referential integrity.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::path::Path;
use tracing::info;

/// File names expected inside the data directory
pub const RATINGS_FILE: &str = "ratings.csv";
pub const MOVIES_FILE: &str = "movies.csv";

impl DataIndex {
    /// Load the MovieLens dataset from a directory containing
    /// `ratings.csv` and `movies.csv`.
    ///
    /// Steps:
    /// 1. Parse both files in parallel
    /// 2. Insert movies, then ratings
    /// 3. Compute movie statistics
    /// 4. Validate data integrity
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading MovieLens dataset from {:?}", data_dir);

        let movies_path = data_dir.join(MOVIES_FILE);
        let ratings_path = data_dir.join(RATINGS_FILE);

        let (movies, ratings) = rayon::join(
            || parser::parse_movies(&movies_path),
            || parser::parse_ratings(&ratings_path),
        );
        let movies = movies?;
        let ratings = ratings?;

        info!("Parsed {} movies, {} ratings", movies.len(), ratings.len());

        let index = Self::from_parts(movies, ratings)?;

        let (users, movies, ratings) = index.counts();
        info!(
            "DataIndex built and validated: {} users, {} movies, {} ratings",
            users, movies, ratings
        );
        Ok(index)
    }

    /// Build a validated index from already-parsed tables
    pub fn from_parts(movies: Vec<Movie>, ratings: Vec<Rating>) -> Result<Self> {
        let mut index = DataIndex::new();

        for movie in movies {
            index.insert_movie(movie);
        }
        for rating in ratings {
            index.insert_rating(rating);
        }

        index.compute_movie_stats();
        index.validate()?;
        Ok(index)
    }

    /// Compute average rating and rating count for every rated movie
    pub fn compute_movie_stats(&mut self) {
        self.movie_stats = self
            .movie_ratings
            .par_iter()
            .map(|(&movie_id, ratings)| {
                let rating_count = ratings.len() as u32;
                let total: f32 = ratings.iter().map(|r| r.rating).sum();
                let avg_rating = if rating_count > 0 {
                    total / rating_count as f32
                } else {
                    0.0
                };
                (
                    movie_id,
                    MovieStats {
                        avg_rating,
                        rating_count,
                    },
                )
            })
            .collect();
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - Every rating.movie_id exists in the catalog
    /// - Every rating value lies within the rating scale
    pub fn validate(&self) -> Result<()> {
        let scale = RatingScale::MOVIELENS;

        for rating in &self.ratings {
            if !self.movie_positions.contains_key(&rating.movie_id) {
                return Err(DataLoadError::MissingReference {
                    entity: "Movie".to_string(),
                    id: rating.movie_id,
                });
            }
            if !scale.contains(rating.rating) {
                return Err(DataLoadError::InvalidValue {
                    field: "rating".to_string(),
                    value: rating.rating.to_string(),
                });
            }
        }

        if self.movie_positions.len() != self.movies.len() {
            return Err(DataLoadError::ValidationError(
                "movie position index out of sync with catalog".to_string(),
            ));
        }
        Ok(())
    }
}
