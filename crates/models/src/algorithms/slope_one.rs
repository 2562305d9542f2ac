//! Slope One.
//!
//! `r̂(u, i) = μ_u + 1/|R_i(u)| · Σ_{j ∈ R_i(u)} dev(i, j)`, where `R_i(u)` are
//! the items rated by `u` that share at least one rater with `i`, and
//! `dev(i, j)` is the mean of `r_vi - r_vj` over users `v` who rated both.
//!
//! Deviations are derived on demand from the item rating lists; only the
//! user means are stored.

use super::{Estimator, PredictionImpossible};
use crate::trainset::{InnerRating, TrainSet};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlopeOne {
    user_mean: Vec<f32>,
}

/// Sum of `r_vi - r_vj` over common raters, and their count
fn deviation(item_i: &[InnerRating], item_j: &[InnerRating]) -> (f32, usize) {
    let (mut x, mut y) = (0, 0);
    let (mut sum, mut freq) = (0.0f32, 0usize);

    while x < item_i.len() && y < item_j.len() {
        match item_i[x].0.cmp(&item_j[y].0) {
            Ordering::Less => x += 1,
            Ordering::Greater => y += 1,
            Ordering::Equal => {
                sum += item_i[x].1 - item_j[y].1;
                freq += 1;
                x += 1;
                y += 1;
            }
        }
    }
    (sum, freq)
}

impl SlopeOne {
    pub fn fit(trainset: &TrainSet) -> Self {
        let user_mean = (0..trainset.n_users())
            .map(|u| {
                let ratings = trainset.user_ratings(u);
                ratings.iter().map(|&(_, r)| r).sum::<f32>() / ratings.len() as f32
            })
            .collect();
        Self { user_mean }
    }
}

impl Estimator for SlopeOne {
    fn estimate(
        &self,
        trainset: &TrainSet,
        user: Option<usize>,
        item: Option<usize>,
    ) -> Result<f32, PredictionImpossible> {
        let (Some(u), Some(i)) = (user, item) else {
            return Err(PredictionImpossible("user and/or item is unknown"));
        };

        let target = trainset.item_ratings(i);
        let (mut total_dev, mut n_related) = (0.0f32, 0usize);

        for &(j, _) in trainset.user_ratings(u) {
            let (sum, freq) = deviation(target, trainset.item_ratings(j));
            if freq > 0 {
                total_dev += sum / freq as f32;
                n_related += 1;
            }
        }

        let mut est = self.user_mean[u];
        if n_related > 0 {
            est += total_dev / n_related as f32;
        }
        Ok(est)
    }
}
