//! Basic k-nearest-neighbours collaborative filtering with cosine similarity.
//!
//! User-based: `r̂(u, i)` is the similarity-weighted mean of the ratings given
//! to `i` by the `k` users most similar to `u`. Item-based swaps the roles.
//!
//! Similarities between two entities are computed over their co-rated
//! entries by merge-joining the sorted rating lists. When the number of
//! entities is small enough the full matrix is computed at fit time;
//! otherwise each similarity is computed when a prediction needs it.

use super::{Estimator, PredictionImpossible};
use crate::trainset::{InnerRating, TrainSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Above this many entities the similarity matrix is not materialised
const MAX_DENSE_ENTITIES: usize = 4096;

#[derive(Debug, Clone, Copy)]
pub struct KnnOptions {
    /// Maximum number of neighbours taken into account
    pub k: usize,
    /// Minimum number of neighbours with positive similarity
    pub min_k: usize,
    /// Minimum number of co-rated entries for a non-zero similarity
    pub min_support: usize,
    /// User-based when true, item-based otherwise
    pub user_based: bool,
}

impl KnnOptions {
    pub fn user_based() -> Self {
        Self {
            k: 40,
            min_k: 1,
            min_support: 1,
            user_based: true,
        }
    }

    pub fn item_based() -> Self {
        Self {
            user_based: false,
            ..Self::user_based()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnBasic {
    k: usize,
    min_k: usize,
    min_support: usize,
    user_based: bool,
    /// Row-major `n x n` cosine similarities, when materialised
    similarities: Option<Vec<f32>>,
}

/// Cosine similarity of two rating lists sorted by id, over co-rated ids only
pub(crate) fn cosine(a: &[InnerRating], b: &[InnerRating], min_support: usize) -> f32 {
    let (mut x, mut y) = (0, 0);
    let (mut prods, mut sq_a, mut sq_b) = (0.0f32, 0.0f32, 0.0f32);
    let mut support = 0;

    while x < a.len() && y < b.len() {
        match a[x].0.cmp(&b[y].0) {
            Ordering::Less => x += 1,
            Ordering::Greater => y += 1,
            Ordering::Equal => {
                let (ra, rb) = (a[x].1, b[y].1);
                prods += ra * rb;
                sq_a += ra * ra;
                sq_b += rb * rb;
                support += 1;
                x += 1;
                y += 1;
            }
        }
    }

    if support < min_support || sq_a == 0.0 || sq_b == 0.0 {
        0.0
    } else {
        prods / (sq_a * sq_b).sqrt()
    }
}

impl KnnBasic {
    pub fn fit(trainset: &TrainSet, options: &KnnOptions) -> Self {
        let mut model = Self {
            k: options.k,
            min_k: options.min_k,
            min_support: options.min_support,
            user_based: options.user_based,
            similarities: None,
        };

        let n = model.n_entities(trainset);
        if n <= MAX_DENSE_ENTITIES {
            let this = &model;
            let min_support = options.min_support;
            let matrix: Vec<f32> = (0..n)
                .into_par_iter()
                .flat_map_iter(|x| {
                    let row = this.ratings_of(trainset, x);
                    (0..n).map(move |y| cosine(row, this.ratings_of(trainset, y), min_support))
                })
                .collect();
            model.similarities = Some(matrix);
        }

        tracing::debug!(
            "Fitted {}-based KNN over {} entities (dense similarities: {})",
            if options.user_based { "user" } else { "item" },
            n,
            model.similarities.is_some()
        );
        model
    }

    fn n_entities(&self, trainset: &TrainSet) -> usize {
        if self.user_based {
            trainset.n_users()
        } else {
            trainset.n_items()
        }
    }

    /// Rating list describing entity `x` (a user row or an item column)
    fn ratings_of<'a>(&self, trainset: &'a TrainSet, x: usize) -> &'a [InnerRating] {
        if self.user_based {
            trainset.user_ratings(x)
        } else {
            trainset.item_ratings(x)
        }
    }

    fn similarity(&self, trainset: &TrainSet, x: usize, y: usize) -> f32 {
        match &self.similarities {
            Some(matrix) => matrix[x * self.n_entities(trainset) + y],
            None => cosine(
                self.ratings_of(trainset, x),
                self.ratings_of(trainset, y),
                self.min_support,
            ),
        }
    }
}

impl Estimator for KnnBasic {
    fn estimate(
        &self,
        trainset: &TrainSet,
        user: Option<usize>,
        item: Option<usize>,
    ) -> Result<f32, PredictionImpossible> {
        let (Some(u), Some(i)) = (user, item) else {
            return Err(PredictionImpossible("user and/or item is unknown"));
        };

        // x: the entity we look neighbours up for, y_ratings: who rated the other side
        let (x, y_ratings) = if self.user_based {
            (u, trainset.item_ratings(i))
        } else {
            (i, trainset.user_ratings(u))
        };

        let mut neighbors: Vec<(f32, f32)> = y_ratings
            .iter()
            .map(|&(x2, r)| (self.similarity(trainset, x, x2), r))
            .collect();
        neighbors.sort_by(|a, b| b.0.total_cmp(&a.0));
        neighbors.truncate(self.k);

        let (mut sum_sim, mut sum_ratings, mut actual_k) = (0.0f32, 0.0f32, 0usize);
        for (sim, r) in neighbors {
            if sim > 0.0 {
                sum_sim += sim;
                sum_ratings += sim * r;
                actual_k += 1;
            }
        }

        if actual_k < self.min_k || sum_sim == 0.0 {
            return Err(PredictionImpossible("not enough neighbors"));
        }
        Ok(sum_ratings / sum_sim)
    }
}
