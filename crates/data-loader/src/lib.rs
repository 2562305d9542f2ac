//! # Data Loader Crate
//!
//! Loads the MovieLens ratings dataset (`ratings.csv` + `movies.csv`) into an
//! in-memory, read-only [`DataIndex`].
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, Rating, RatingScale, DataIndex)
//! - **parser**: Parse the CSV files into Rust structs
//! - **index**: Build the index, compute stats, validate references
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("data"))?;
//!
//! let movie = index.get_movie(1).unwrap();
//! let rated = index.rated_movie_ids(1);
//! println!("User 1 rated {} movies, first movie is {}", rated.len(), movie.title);
//! ```

pub mod error;
pub mod index;
pub mod parser;
pub mod types;

pub use error::{DataLoadError, Result};
pub use index::{MOVIES_FILE, RATINGS_FILE};
pub use types::{
    // Type aliases
    MovieId,
    UserId,
    // Core types
    DataIndex,
    Movie,
    MovieStats,
    Rating,
    RatingScale,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_story() -> Movie {
        Movie {
            id: 1,
            title: "Toy Story (1995)".to_string(),
            year: Some(1995),
            genres: vec!["Adventure".to_string(), "Animation".to_string()],
        }
    }

    #[test]
    fn test_data_index_creation() {
        let index = DataIndex::new();
        assert_eq!(index.counts(), (0, 0, 0));
    }

    #[test]
    fn test_insert_movie_keeps_catalog_order() {
        let mut index = DataIndex::new();
        index.insert_movie(Movie {
            id: 10,
            title: "Heat (1995)".to_string(),
            year: Some(1995),
            genres: vec![],
        });
        index.insert_movie(toy_story());

        let ids: Vec<MovieId> = index.movies().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![10, 1]);

        // Re-inserting replaces in place
        let mut renamed = toy_story();
        renamed.title = "Toy Story".to_string();
        index.insert_movie(renamed);
        assert_eq!(index.movies().len(), 2);
        assert_eq!(index.movies()[1].title, "Toy Story");
    }

    #[test]
    fn test_insert_rating() {
        let mut index = DataIndex::new();
        index.insert_movie(toy_story());
        index.insert_rating(Rating {
            user_id: 7,
            movie_id: 1,
            rating: 4.5,
            timestamp: 964982703,
        });

        assert!(index.has_user(7));
        assert_eq!(index.get_user_ratings(7)[0].rating, 4.5);
        assert_eq!(index.get_movie_ratings(1).len(), 1);
        assert!(index.rated_movie_ids(7).contains(&1));
        assert_eq!(index.user_ids(), vec![7]);
    }

    #[test]
    fn test_empty_queries() {
        let index = DataIndex::new();

        assert!(index.get_movie(999).is_none());
        assert!(index.get_user_ratings(999).is_empty());
        assert!(index.get_movie_ratings(999).is_empty());
        assert!(index.rated_movie_ids(999).is_empty());
        assert!(!index.has_user(999));
    }

    #[test]
    fn test_search_titles_exact_first() {
        let mut index = DataIndex::new();
        index.insert_movie(Movie {
            id: 2,
            title: "Toy Story 2 (1999)".to_string(),
            year: Some(1999),
            genres: vec![],
        });
        index.insert_movie(toy_story());

        let hits = index.search_titles("toy story (1995)");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);

        let hits = index.search_titles("TOY");
        assert_eq!(hits.len(), 2);
        assert!(index.search_titles("   ").is_empty());
    }

    #[test]
    fn test_rating_scale_clip() {
        let scale = RatingScale::MOVIELENS;
        assert_eq!(scale.clip(6.2), 5.0);
        assert_eq!(scale.clip(0.1), 0.5);
        assert_eq!(scale.clip(3.3), 3.3);
        assert!(!scale.contains(0.0));
    }
}
