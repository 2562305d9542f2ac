//! Parser for MovieLens CSV files.
//!
//! - ratings.csv: `userId,movieId,rating,timestamp`
//! - movies.csv: `movieId,title,genres`
//!
//! Both files start with a header row. Titles containing commas are quoted,
//! which the `csv` crate handles for us.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Genre label MovieLens uses for movies without any genre
const NO_GENRES: &str = "(no genres listed)";

#[derive(Debug, Deserialize)]
struct RatingRecord {
    #[serde(rename = "userId")]
    user_id: UserId,
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    rating: f32,
    #[serde(default)]
    timestamp: i64,
}

#[derive(Debug, Deserialize)]
struct MovieRecord {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    title: String,
    #[serde(default)]
    genres: String,
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Attach file and line context to a record-level CSV error
fn record_error(file: &str, err: csv::Error) -> DataLoadError {
    match err.position() {
        Some(pos) => DataLoadError::ParseError {
            file: file.to_string(),
            line: pos.line(),
            reason: err.to_string(),
        },
        None => DataLoadError::CsvError(err),
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Parse the ratings.csv file
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    let file = open(path)?;
    parse_ratings_from_reader(file, &file_label(path))
}

/// Parse ratings from any reader; `file` is only used in error messages
pub fn parse_ratings_from_reader<R: Read>(reader: R, file: &str) -> Result<Vec<Rating>> {
    let mut reader = csv_reader(reader);
    let mut ratings = Vec::new();

    for record in reader.deserialize::<RatingRecord>() {
        let record = record.map_err(|e| record_error(file, e))?;
        ratings.push(Rating {
            user_id: record.user_id,
            movie_id: record.movie_id,
            rating: record.rating,
            timestamp: record.timestamp,
        });
    }

    Ok(ratings)
}

/// Parse the movies.csv file
///
/// The title usually ends with the release year: "Toy Story (1995)".
/// Genres are pipe-separated: "Adventure|Animation|Children".
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let file = open(path)?;
    parse_movies_from_reader(file, &file_label(path))
}

/// Parse movies from any reader; `file` is only used in error messages
pub fn parse_movies_from_reader<R: Read>(reader: R, file: &str) -> Result<Vec<Movie>> {
    let mut reader = csv_reader(reader);
    let mut movies = Vec::new();

    for record in reader.deserialize::<MovieRecord>() {
        let record = record.map_err(|e| record_error(file, e))?;
        movies.push(Movie {
            id: record.movie_id,
            year: extract_year_from_title(&record.title),
            genres: parse_genres(&record.genres),
            title: record.title,
        });
    }

    Ok(movies)
}

/// Extract year from movie title
///
/// Example: "Toy Story (1995)" -> Some(1995)
///          "Movie Title" -> None
fn extract_year_from_title(title: &str) -> Option<u16> {
    let inner = title.trim_end().strip_suffix(')')?;
    let start = inner.rfind('(')?;
    let year = &inner[start + 1..];
    if year.len() != 4 {
        return None;
    }
    year.parse().ok()
}

/// Split a pipe-separated genre list, dropping the "no genres" marker
fn parse_genres(s: &str) -> Vec<String> {
    s.split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty() && *g != NO_GENRES)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year_from_title("Toy Story (1995)"), Some(1995));
        assert_eq!(extract_year_from_title("Babylon 5"), None);
        assert_eq!(
            extract_year_from_title("Wings of Courage (Guillaumet, les ailes du courage) (1996)"),
            Some(1996)
        );
        assert_eq!(extract_year_from_title("Ready Player One (2018) "), Some(2018));
        assert_eq!(extract_year_from_title("Eloise (Part 2)"), None);
    }

    #[test]
    fn test_parse_genres() {
        assert_eq!(
            parse_genres("Adventure|Animation|Children"),
            vec!["Adventure", "Animation", "Children"]
        );
        assert!(parse_genres("(no genres listed)").is_empty());
    }

    #[test]
    fn test_parse_ratings() {
        let data = "userId,movieId,rating,timestamp\n\
                    1,1,4.0,964982703\n\
                    1,3,4.5,964981247\n";
        let ratings = parse_ratings_from_reader(data.as_bytes(), "ratings.csv").unwrap();

        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[1].movie_id, 3);
        assert_eq!(ratings[1].rating, 4.5);
        assert_eq!(ratings[0].timestamp, 964982703);
    }

    #[test]
    fn test_parse_movies_with_quoted_title() {
        let data = "movieId,title,genres\n\
                    1,Toy Story (1995),Adventure|Animation|Children\n\
                    11,\"American President, The (1995)\",Comedy|Drama|Romance\n";
        let movies = parse_movies_from_reader(data.as_bytes(), "movies.csv").unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[1].id, 11);
        assert_eq!(movies[1].title, "American President, The (1995)");
        assert_eq!(movies[1].year, Some(1995));
        assert_eq!(movies[1].genres.len(), 3);
    }

    #[test]
    fn test_bad_record_reports_line() {
        let data = "userId,movieId,rating,timestamp\n\
                    1,1,4.0,964982703\n\
                    1,abc,4.5,964981247\n";
        let err = parse_ratings_from_reader(data.as_bytes(), "ratings.csv").unwrap_err();

        match err {
            DataLoadError::ParseError { file, line, .. } => {
                assert_eq!(file, "ratings.csv");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = parse_movies(Path::new("does/not/exist/movies.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
