//! # Recommendation Orchestrator
//!
//! Runs one recommendation request end to end:
//! 1. Resolve the algorithm in the model registry
//! 2. Build the user context (movies already rated)
//! 3. Turn the catalog into candidates and apply the filter pipeline
//! 4. Score the survivors and keep the top N
//! 5. Attach titles
//!
//! Everything here is synchronous and CPU-bound; the HTTP layer calls it
//! from `spawn_blocking`.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, instrument};

use data_loader::{DataIndex, MovieId, UserId};
use models::{AlgorithmKind, ModelRegistry, Predictor};
use pipeline::filters::AlreadyRatedFilter;
use pipeline::{
    FilterPipeline, UserContext, build_user_context, catalog_candidates, rank_candidates,
};

/// One recommended movie, as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRecommendation {
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    pub title: String,
    /// Predicted rating; used for display only
    #[serde(skip_serializing)]
    pub score: f32,
}

#[derive(thiserror::Error, Debug)]
pub enum RecommendError {
    #[error("Algorithm '{0}' not found.")]
    UnknownAlgorithm(String),

    #[error("top_n must be at least 1")]
    InvalidTopN,

    #[error("Pipeline failed: {0}")]
    Pipeline(#[from] anyhow::Error),
}

/// Service context shared by every request
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    data_index: Arc<DataIndex>,
    models: Arc<ModelRegistry>,
    filter_pipeline: Arc<FilterPipeline>,
    default_algo: String,
    default_top_n: usize,
}

impl RecommendationOrchestrator {
    /// Orchestrator excluding already rated movies, defaulting to `SVD` and 5 results
    pub fn new(data_index: Arc<DataIndex>, models: Arc<ModelRegistry>) -> Self {
        Self {
            data_index,
            models,
            filter_pipeline: Arc::new(FilterPipeline::new().add_filter(AlreadyRatedFilter)),
            default_algo: AlgorithmKind::default().name().to_string(),
            default_top_n: 5,
        }
    }

    pub fn with_defaults(mut self, default_algo: impl Into<String>, default_top_n: usize) -> Self {
        self.default_algo = default_algo.into();
        self.default_top_n = default_top_n;
        self
    }

    pub fn data_index(&self) -> &DataIndex {
        &self.data_index
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    pub fn default_algo(&self) -> &str {
        &self.default_algo
    }

    pub fn default_top_n(&self) -> usize {
        self.default_top_n
    }

    /// Sorted names of the loaded algorithms
    pub fn algorithm_names(&self) -> Vec<String> {
        self.models.names()
    }

    /// Recommendations for `user_id` using `algo` (or the default algorithm).
    ///
    /// Unknown users are not an error: nothing is excluded for them and every
    /// catalog movie is scored. `None` stands for a requester whose id cannot
    /// occur in the dataset, which is handled the same way.
    pub fn get_recommendations(
        &self,
        user_id: Option<UserId>,
        algo: Option<&str>,
        top_n: Option<usize>,
    ) -> Result<Vec<MovieRecommendation>, RecommendError> {
        let algo = algo.unwrap_or(&self.default_algo);
        let model = self
            .models
            .get(algo)
            .ok_or_else(|| RecommendError::UnknownAlgorithm(algo.to_string()))?;

        self.recommend_with(user_id, model.as_ref(), top_n.unwrap_or(self.default_top_n))
    }

    /// Run the pipeline with an explicit predictor
    #[instrument(skip(self, predictor), fields(algo = predictor.name()))]
    pub fn recommend_with(
        &self,
        user_id: Option<UserId>,
        predictor: &dyn Predictor,
        top_n: usize,
    ) -> Result<Vec<MovieRecommendation>, RecommendError> {
        if top_n == 0 {
            return Err(RecommendError::InvalidTopN);
        }
        let start_time = Instant::now();

        let context = match user_id {
            Some(id) => build_user_context(&self.data_index, id),
            None => UserContext::anonymous(),
        };
        debug!("User {:?} has rated {} movies", user_id, context.rated_movies.len());

        let candidates = catalog_candidates(&self.data_index);
        let total = candidates.len();
        let candidates = self.filter_pipeline.apply(candidates, &context)?;
        debug!("{} of {} catalog movies left after filtering", candidates.len(), total);

        let ranked = rank_candidates(predictor, &context, candidates, top_n);

        let recommendations: Vec<MovieRecommendation> = ranked
            .into_iter()
            .filter_map(|candidate| {
                let movie = self.data_index.get_movie(candidate.movie_id)?;
                Some(MovieRecommendation {
                    movie_id: candidate.movie_id,
                    title: movie.title.clone(),
                    score: candidate.score,
                })
            })
            .collect();

        info!(
            "Recommended {} movies for user {:?} in {:.2?}",
            recommendations.len(),
            user_id,
            start_time.elapsed()
        );
        Ok(recommendations)
    }
}
