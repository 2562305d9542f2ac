//! Baseline estimates: `r̂(u, i) = μ + b_u + b_i`.
//!
//! Biases are fitted with alternating least squares: item biases are solved
//! with user biases fixed, then the other way round, for `n_epochs` rounds.

use super::{Estimator, PredictionImpossible};
use crate::trainset::TrainSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy)]
pub struct BaselineOptions {
    pub n_epochs: usize,
    pub reg_u: f32,
    pub reg_i: f32,
}

impl Default for BaselineOptions {
    fn default() -> Self {
        Self {
            n_epochs: 10,
            reg_u: 15.0,
            reg_i: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineOnly {
    bu: Vec<f32>,
    bi: Vec<f32>,
}

impl BaselineOnly {
    pub fn fit(trainset: &TrainSet, options: &BaselineOptions) -> Self {
        let mu = trainset.global_mean();
        let mut bu = vec![0.0f32; trainset.n_users()];
        let mut bi = vec![0.0f32; trainset.n_items()];

        for _ in 0..options.n_epochs {
            for (i, bias) in bi.iter_mut().enumerate() {
                let ratings = trainset.item_ratings(i);
                let dev: f32 = ratings.iter().map(|&(u, r)| r - mu - bu[u]).sum();
                *bias = dev / (options.reg_i + ratings.len() as f32);
            }

            for (u, bias) in bu.iter_mut().enumerate() {
                let ratings = trainset.user_ratings(u);
                let dev: f32 = ratings.iter().map(|&(i, r)| r - mu - bi[i]).sum();
                *bias = dev / (options.reg_u + ratings.len() as f32);
            }
        }

        Self { bu, bi }
    }

    pub fn item_bias(&self, i: usize) -> f32 {
        self.bi[i]
    }
}

impl Estimator for BaselineOnly {
    fn estimate(
        &self,
        trainset: &TrainSet,
        user: Option<usize>,
        item: Option<usize>,
    ) -> Result<f32, PredictionImpossible> {
        let mut est = trainset.global_mean();
        if let Some(u) = user {
            est += self.bu[u];
        }
        if let Some(i) = item {
            est += self.bi[i];
        }
        Ok(est)
    }
}
