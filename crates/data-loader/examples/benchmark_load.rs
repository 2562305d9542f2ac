//! Times a full load of `ratings.csv` + `movies.csv` and summarises how
//! sparse the rating matrix is.
//!
//! Usage: `cargo run --release --example benchmark_load [DATA_DIR]`

use data_loader::DataIndex;
use std::path::PathBuf;
use std::time::Instant;

fn main() {
    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));

    println!("Loading {}...\n", data_dir.display());

    let start = Instant::now();
    let index = DataIndex::load_from_files(&data_dir).expect("Failed to load dataset");
    let elapsed = start.elapsed();

    let (users, movies, ratings) = index.counts();
    let mut per_user: Vec<usize> = index
        .user_ids()
        .into_iter()
        .map(|user_id| index.get_user_ratings(user_id).len())
        .collect();
    per_user.sort_unstable();

    let unrated = index
        .movies()
        .iter()
        .filter(|movie| index.get_movie_ratings(movie.id).is_empty())
        .count();

    println!("Loaded in {:?} ({:.0} ratings/s)", elapsed, ratings as f64 / elapsed.as_secs_f64());
    println!("{users} users, {movies} movies, {ratings} ratings");
    if let (Some(min), Some(max)) = (per_user.first(), per_user.last()) {
        println!(
            "Ratings per user: min {min}, median {}, max {max}",
            per_user[per_user.len() / 2]
        );
    }
    println!("Movies nobody rated: {unrated}");
    if users > 0 && movies > 0 {
        let density = ratings as f64 / (users as f64 * movies as f64);
        println!("Matrix density: {:.3}%", density * 100.0);
    }
}
