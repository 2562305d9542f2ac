use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{DataIndex, UserId};
use models::{Accuracy, AlgorithmKind, ModelRegistry, TrainingConfig};
use rand::Rng;
use server::{MovieRecommendation, RecommendationOrchestrator, ServerConfig};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// movie-recs - collaborative-filtering movie recommendations
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Train rating models on MovieLens data and serve recommendations", long_about = None)]
struct Cli {
    /// Directory holding ratings.csv and movies.csv
    #[arg(short, long, env = "MOVIE_RECS_DATA_DIR", default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Directory trained models are written to and loaded from
    #[arg(short, long, env = "MOVIE_RECS_MODELS_DIR", default_value = "models", global = true)]
    models_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the algorithms, report their accuracy and save them
    Train {
        /// Fraction of ratings held out for evaluation
        #[arg(long, default_value = "0.2")]
        test_size: f32,

        /// Seed for the split and model initialisation
        #[arg(long)]
        seed: Option<u64>,

        /// Algorithm to train (repeatable); all of them when omitted
        #[arg(long = "algo")]
        algorithms: Vec<AlgorithmKind>,
    },

    /// Run the HTTP recommendation service
    Serve {
        /// Address to listen on
        #[arg(long, env = "MOVIE_RECS_ADDR", default_value = "127.0.0.1:5000")]
        addr: SocketAddr,

        /// Algorithm used when a request names none
        #[arg(long, env = "MOVIE_RECS_DEFAULT_ALGO", default_value = "SVD")]
        default_algo: String,

        /// Recommendations per request when a request names none
        #[arg(long, default_value = "5")]
        top_n: usize,
    },

    /// Get movie recommendations for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Algorithm to score with
        #[arg(long, default_value = "SVD")]
        algo: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Show a user's rating history
    User {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Measure in-process recommendation latency
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Algorithm to score with
        #[arg(long, default_value = "SVD")]
        algo: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let data_index = Arc::new(load_data(&cli.data_dir)?);

    match cli.command {
        Commands::Train {
            test_size,
            seed,
            algorithms,
        } => handle_train(&data_index, &cli.models_dir, test_size, seed, algorithms)?,
        Commands::Serve {
            addr,
            default_algo,
            top_n,
        } => {
            let config = ServerConfig {
                addr,
                default_algo,
                top_n,
            };
            handle_serve(data_index, &cli.models_dir, config).await?
        }
        Commands::Recommend {
            user_id,
            algo,
            limit,
        } => handle_recommend(data_index, &cli.models_dir, user_id, &algo, limit).await?,
        Commands::User { user_id } => handle_user(&data_index, user_id)?,
        Commands::Search { title } => handle_search(&data_index, &title),
        Commands::Benchmark { requests, algo } => {
            handle_benchmark(data_index, &cli.models_dir, requests, algo).await?
        }
    }

    Ok(())
}

fn load_data(data_dir: &Path) -> Result<DataIndex> {
    println!("Loading MovieLens dataset from {}...", data_dir.display());
    let start = Instant::now();
    let data_index =
        DataIndex::load_from_files(data_dir).context("Failed to load MovieLens dataset")?;
    println!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());
    Ok(data_index)
}

fn load_orchestrator(
    data_index: Arc<DataIndex>,
    models_dir: &Path,
) -> Result<RecommendationOrchestrator> {
    let registry = ModelRegistry::load_from_dir(models_dir)
        .with_context(|| format!("Failed to load models from {}", models_dir.display()))?;
    if registry.is_empty() {
        bail!(
            "No trained models in {}. Run `movie-recs train` first.",
            models_dir.display()
        );
    }
    Ok(RecommendationOrchestrator::new(data_index, Arc::new(registry)))
}

/// Handle the 'train' command
fn handle_train(
    data_index: &DataIndex,
    models_dir: &Path,
    test_size: f32,
    seed: Option<u64>,
    algorithms: Vec<AlgorithmKind>,
) -> Result<()> {
    let mut config = TrainingConfig {
        test_size,
        seed,
        ..TrainingConfig::default()
    };
    if !algorithms.is_empty() {
        config.algorithms = algorithms;
    }

    let start = Instant::now();
    let reports = models::train(data_index.all_ratings(), &config).context("Training failed")?;

    println!("{}", "Training results:".bold().blue());
    for report in &reports {
        let path = report
            .model
            .save(models_dir)
            .with_context(|| format!("Failed to save {}", report.kind))?;

        println!(
            "{} {:<13} {}  ({:.2?}) -> {}",
            "✓".green(),
            report.kind.name(),
            format_accuracy(report.accuracy.as_ref()),
            report.elapsed,
            path.display()
        );
    }
    info!("Trained {} model(s) in {:.2?}", reports.len(), start.elapsed());
    Ok(())
}

/// One line of `train` output, e.g. `RMSE 0.8731  MAE 0.6712  (12/20000 impossible)`
fn format_accuracy(accuracy: Option<&Accuracy>) -> String {
    match accuracy {
        Some(acc) if acc.impossible > 0 => format!(
            "RMSE {:.4}  MAE {:.4}  ({}/{} impossible)",
            acc.rmse, acc.mae, acc.impossible, acc.n
        ),
        Some(acc) => format!("RMSE {:.4}  MAE {:.4}", acc.rmse, acc.mae),
        None => "no test ratings".to_string(),
    }
}

/// Handle the 'serve' command
async fn handle_serve(
    data_index: Arc<DataIndex>,
    models_dir: &Path,
    config: ServerConfig,
) -> Result<()> {
    let orchestrator = load_orchestrator(data_index, models_dir)?
        .with_defaults(config.default_algo.clone(), config.top_n);
    server::serve(&config, orchestrator).await
}

/// Handle the 'recommend' command
async fn handle_recommend(
    data_index: Arc<DataIndex>,
    models_dir: &Path,
    user_id: UserId,
    algo: &str,
    limit: usize,
) -> Result<()> {
    if !data_index.has_user(user_id) {
        println!(
            "{} User {} has no ratings; scoring the whole catalog",
            "!".yellow(),
            user_id
        );
    }

    let orchestrator = load_orchestrator(data_index, models_dir)?;
    let algo = algo.to_string();
    let recommendations = tokio::task::spawn_blocking(move || {
        orchestrator.get_recommendations(Some(user_id), Some(algo.as_str()), Some(limit))
    })
    .await
    .context("Recommendation task panicked")??;

    print_recommendations(&recommendations);
    Ok(())
}

/// Handle the 'user' command
fn handle_user(data_index: &DataIndex, user_id: UserId) -> Result<()> {
    if !data_index.has_user(user_id) {
        bail!("User {} not found", user_id);
    }
    let ratings = data_index.get_user_ratings(user_id);

    println!("{}", format!("User ID: {}", user_id).bold().blue());
    let avg_rating = ratings.iter().map(|r| r.rating).sum::<f32>() / ratings.len() as f32;
    println!("{}Number of ratings: {}", "• ".cyan(), ratings.len());
    println!("{}Average rating: {:.2}", "• ".cyan(), avg_rating);

    let mut top_rated: Vec<_> = ratings.iter().collect();
    top_rated.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    println!("Top rated movies:");
    for rating in top_rated.iter().take(5) {
        if let Some(movie) = data_index.get_movie(rating.movie_id) {
            println!("  - {} (Rating: {})", movie.title, rating.rating);
        }
    }

    let mut genre_ratings: HashMap<&str, (f32, u32)> = HashMap::new();
    for rating in ratings {
        if let Some(movie) = data_index.get_movie(rating.movie_id) {
            for genre in &movie.genres {
                let entry = genre_ratings.entry(genre.as_str()).or_insert((0.0, 0));
                entry.0 += rating.rating;
                entry.1 += 1;
            }
        }
    }
    let mut genres: Vec<_> = genre_ratings
        .into_iter()
        .map(|(genre, (total, count))| (genre, total / count as f32, count))
        .collect();
    genres.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(b.0)));

    println!("Genre preferences:");
    for (genre, avg, count) in genres {
        println!("  - {}: Average Rating: {:.2} ({} ratings)", genre, avg, count);
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(data_index: &DataIndex, title: &str) {
    let matches = data_index.search_titles(title);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  no movies found");
        return;
    }
    for movie in matches.iter().take(20) {
        let (avg_rating, rating_count) = data_index
            .get_movie_stats(movie.id)
            .map(|s| (s.avg_rating, s.rating_count))
            .unwrap_or((0.0, 0));
        println!(
            "{}: {} [{}] avg {:.2} ({} ratings)",
            movie.id,
            movie.title,
            movie.genres.join(", "),
            avg_rating,
            rating_count
        );
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    data_index: Arc<DataIndex>,
    models_dir: &Path,
    requests: usize,
    algo: String,
) -> Result<()> {
    if requests == 0 {
        bail!("--requests must be at least 1");
    }
    let user_ids = data_index.user_ids();
    if user_ids.is_empty() {
        bail!("Dataset has no users to benchmark with");
    }

    let orchestrator = load_orchestrator(data_index, models_dir)?;
    if !orchestrator.models().contains(&algo) {
        bail!("Algorithm '{}' not found.", algo);
    }

    let mut rng = rand::rng();
    let sampled: Vec<UserId> = (0..requests)
        .map(|_| user_ids[rng.random_range(0..user_ids.len())])
        .collect();

    let total_start = Instant::now();
    let mut timings = tokio::task::spawn_blocking(move || {
        sampled
            .into_iter()
            .map(|user_id| {
                let start = Instant::now();
                orchestrator.get_recommendations(Some(user_id), Some(algo.as_str()), None)?;
                Ok(start.elapsed())
            })
            .collect::<Result<Vec<Duration>>>()
    })
    .await
    .context("Benchmark task panicked")??;
    let total_time = total_start.elapsed();

    timings.sort();
    let avg_latency = timings.iter().sum::<Duration>() / timings.len() as u32;
    let throughput = requests as f64 / total_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {}", requests);
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(&timings, 0.50));
    println!("P95 latency: {:?}", percentile(&timings, 0.95));
    println!("P99 latency: {:?}", percentile(&timings, 0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Nearest-rank percentile of sorted, non-empty timings
fn percentile(sorted: &[Duration], p: f64) -> Duration {
    let rank = (p * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

fn print_recommendations(recommendations: &[MovieRecommendation]) {
    println!("{}", "Movie Recommendations:".bold().blue());
    if recommendations.is_empty() {
        println!("  nothing left to recommend");
    }
    for (idx, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} (movie {}) - Predicted rating: {:.2}",
            (idx + 1).to_string().green(),
            rec.title,
            rec.movie_id,
            rec.score
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_train_accepts_repeated_algorithms() {
        let cli = Cli::parse_from([
            "movie-recs",
            "train",
            "--algo",
            "SVD",
            "--algo",
            "Slope One",
            "--seed",
            "4",
        ]);
        match cli.command {
            Commands::Train {
                algorithms, seed, test_size,
            } => {
                assert_eq!(algorithms, vec![AlgorithmKind::Svd, AlgorithmKind::SlopeOne]);
                assert_eq!(seed, Some(4));
                assert_eq!(test_size, 0.2);
            }
            _ => panic!("expected train"),
        }
    }

    #[test]
    fn test_unknown_algorithm_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["movie-recs", "train", "--algo", "Nope"]).is_err());
    }

    #[test]
    fn test_format_accuracy_reports_impossible_predictions() {
        let mut acc = Accuracy {
            rmse: 0.9,
            mae: 0.7,
            n: 20,
            impossible: 0,
        };
        assert_eq!(format_accuracy(Some(&acc)), "RMSE 0.9000  MAE 0.7000");

        acc.impossible = 3;
        assert_eq!(
            format_accuracy(Some(&acc)),
            "RMSE 0.9000  MAE 0.7000  (3/20 impossible)"
        );
        assert_eq!(format_accuracy(None), "no test ratings");
    }

    #[test]
    fn test_percentile() {
        let timings: Vec<Duration> = (1..=100).map(Duration::from_millis).collect();
        assert_eq!(percentile(&timings, 0.50), Duration::from_millis(50));
        assert_eq!(percentile(&timings, 0.99), Duration::from_millis(99));
        assert_eq!(percentile(&timings[..1], 0.95), Duration::from_millis(1));
    }
}
