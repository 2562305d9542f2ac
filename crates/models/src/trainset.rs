//! Train set construction and train/test splitting.
//!
//! Algorithms never see raw MovieLens ids. A [`TrainSet`] maps every user and
//! movie to a dense *inner id* (assigned in order of first appearance) and
//! keeps the ratings twice: grouped by user and grouped by item, each list
//! sorted by the other side's inner id so two lists can be merge-joined.

use crate::error::{ModelError, Result};
use data_loader::{MovieId, Rating, RatingScale, UserId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ratings list entry: (other side's inner id, rating)
pub type InnerRating = (usize, f32);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainSet {
    raw_to_inner_user: HashMap<UserId, usize>,
    raw_to_inner_item: HashMap<MovieId, usize>,
    /// Ratings per user, sorted by inner item id
    ur: Vec<Vec<InnerRating>>,
    /// Ratings per item, sorted by inner user id
    ir: Vec<Vec<InnerRating>>,
    n_ratings: usize,
    global_mean: f32,
    scale: RatingScale,
}

impl TrainSet {
    /// Build a train set on the MovieLens rating scale
    pub fn build(ratings: &[Rating]) -> Result<Self> {
        Self::with_scale(ratings, RatingScale::MOVIELENS)
    }

    pub fn with_scale(ratings: &[Rating], scale: RatingScale) -> Result<Self> {
        if ratings.is_empty() {
            return Err(ModelError::EmptyTrainSet);
        }

        let mut raw_to_inner_user = HashMap::new();
        let mut raw_to_inner_item = HashMap::new();
        let mut ur: Vec<Vec<InnerRating>> = Vec::new();
        let mut ir: Vec<Vec<InnerRating>> = Vec::new();
        let mut total = 0.0f64;

        for rating in ratings {
            let u = *raw_to_inner_user.entry(rating.user_id).or_insert_with(|| {
                ur.push(Vec::new());
                ur.len() - 1
            });
            let i = *raw_to_inner_item.entry(rating.movie_id).or_insert_with(|| {
                ir.push(Vec::new());
                ir.len() - 1
            });

            ur[u].push((i, rating.rating));
            ir[i].push((u, rating.rating));
            total += rating.rating as f64;
        }

        // Stable sorts keep duplicate (user, item) pairs in file order
        for list in ur.iter_mut().chain(ir.iter_mut()) {
            list.sort_by_key(|&(id, _)| id);
        }

        Ok(Self {
            raw_to_inner_user,
            raw_to_inner_item,
            ur,
            ir,
            n_ratings: ratings.len(),
            global_mean: (total / ratings.len() as f64) as f32,
            scale,
        })
    }

    pub fn n_users(&self) -> usize {
        self.ur.len()
    }

    pub fn n_items(&self) -> usize {
        self.ir.len()
    }

    pub fn n_ratings(&self) -> usize {
        self.n_ratings
    }

    /// Mean of all ratings in the train set
    pub fn global_mean(&self) -> f32 {
        self.global_mean
    }

    pub fn scale(&self) -> RatingScale {
        self.scale
    }

    pub fn inner_user(&self, user_id: UserId) -> Option<usize> {
        self.raw_to_inner_user.get(&user_id).copied()
    }

    pub fn inner_item(&self, movie_id: MovieId) -> Option<usize> {
        self.raw_to_inner_item.get(&movie_id).copied()
    }

    /// Ratings given by inner user `u`, sorted by inner item id
    pub fn user_ratings(&self, u: usize) -> &[InnerRating] {
        &self.ur[u]
    }

    /// Ratings received by inner item `i`, sorted by inner user id
    pub fn item_ratings(&self, i: usize) -> &[InnerRating] {
        &self.ir[i]
    }

    /// Every rating as (inner user, inner item, rating), grouped by user
    pub fn all_ratings(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        self.ur
            .iter()
            .enumerate()
            .flat_map(|(u, ratings)| ratings.iter().map(move |&(i, r)| (u, i, r)))
    }
}

/// Random generator from an optional seed (OS entropy when absent)
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Shuffle the ratings and hold out `test_size` of them.
///
/// Returns `(train, test)`. The test part holds `ceil(test_size * n)` ratings.
pub fn train_test_split(
    ratings: &[Rating],
    test_size: f32,
    seed: Option<u64>,
) -> Result<(Vec<Rating>, Vec<Rating>)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ModelError::InvalidParameter {
            name: "test_size",
            value: test_size.to_string(),
        });
    }

    let mut shuffled = ratings.to_vec();
    shuffled.shuffle(&mut make_rng(seed));

    let n_test = ((ratings.len() as f64) * test_size as f64).ceil() as usize;
    let train = shuffled.split_off(n_test.min(shuffled.len()));
    Ok((train, shuffled))
}
