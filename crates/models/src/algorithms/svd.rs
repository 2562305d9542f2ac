//! Biased matrix factorisation ("SVD" in the recommender literature).
//!
//! `r̂(u, i) = μ + b_u + b_i + q_iᵀ p_u`, fitted with plain stochastic gradient
//! descent over the train set, one pass per epoch.

use super::{Estimator, PredictionImpossible};
use crate::trainset::TrainSet;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

#[derive(Debug, Clone, Copy)]
pub struct SvdOptions {
    pub n_factors: usize,
    pub n_epochs: usize,
    pub lr_all: f32,
    pub reg_all: f32,
    pub init_mean: f32,
    pub init_std_dev: f32,
}

impl Default for SvdOptions {
    fn default() -> Self {
        Self {
            n_factors: 100,
            n_epochs: 20,
            lr_all: 0.005,
            reg_all: 0.02,
            init_mean: 0.0,
            init_std_dev: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Svd {
    n_factors: usize,
    bu: Vec<f32>,
    bi: Vec<f32>,
    /// User factors, row-major `n_users x n_factors`
    pu: Vec<f32>,
    /// Item factors, row-major `n_items x n_factors`
    qi: Vec<f32>,
}

/// Box-Muller transform
fn sample_normal<R: Rng>(rng: &mut R, mean: f32, std_dev: f32) -> f32 {
    let u1 = rng.random::<f32>().max(f32::MIN_POSITIVE);
    let u2 = rng.random::<f32>();
    mean + std_dev * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl Svd {
    pub fn fit<R: Rng>(trainset: &TrainSet, options: &SvdOptions, rng: &mut R) -> Self {
        let k = options.n_factors;
        let (lr, reg) = (options.lr_all, options.reg_all);
        let mu = trainset.global_mean();

        let mut bu = vec![0.0f32; trainset.n_users()];
        let mut bi = vec![0.0f32; trainset.n_items()];
        let mut pu: Vec<f32> = (0..trainset.n_users() * k)
            .map(|_| sample_normal(rng, options.init_mean, options.init_std_dev))
            .collect();
        let mut qi: Vec<f32> = (0..trainset.n_items() * k)
            .map(|_| sample_normal(rng, options.init_mean, options.init_std_dev))
            .collect();

        for epoch in 0..options.n_epochs {
            tracing::trace!("SVD epoch {}/{}", epoch + 1, options.n_epochs);

            for (u, i, r) in trainset.all_ratings() {
                let p = &mut pu[u * k..(u + 1) * k];
                let q = &mut qi[i * k..(i + 1) * k];

                let err = r - (mu + bu[u] + bi[i] + dot(p, q));

                bu[u] += lr * (err - reg * bu[u]);
                bi[i] += lr * (err - reg * bi[i]);

                for (puf, qif) in p.iter_mut().zip(q.iter_mut()) {
                    let (old_p, old_q) = (*puf, *qif);
                    *puf += lr * (err * old_q - reg * old_p);
                    *qif += lr * (err * old_p - reg * old_q);
                }
            }
        }

        Self {
            n_factors: k,
            bu,
            bi,
            pu,
            qi,
        }
    }

    fn user_factors(&self, u: usize) -> &[f32] {
        &self.pu[u * self.n_factors..(u + 1) * self.n_factors]
    }

    fn item_factors(&self, i: usize) -> &[f32] {
        &self.qi[i * self.n_factors..(i + 1) * self.n_factors]
    }
}

impl Estimator for Svd {
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
        if let (Some(u), Some(i)) = (user, item) {
            est += dot(self.user_factors(u), self.item_factors(i));
        }
        Ok(est)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Rating;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ratings() -> Vec<Rating> {
        let mut out = Vec::new();
        // Two taste groups: users 1-3 love movies 1-3, users 4-6 love movies 4-6
        for user_id in 1..=6u32 {
            for movie_id in 1..=6u32 {
                let same_group = (user_id <= 3) == (movie_id <= 3);
                out.push(Rating {
                    user_id,
                    movie_id,
                    rating: if same_group { 5.0 } else { 1.0 },
                    timestamp: 0,
                });
            }
        }
        out
    }

    fn train_rmse(model: &Svd, ts: &TrainSet) -> f32 {
        let sq: f32 = ts
            .all_ratings()
            .map(|(u, i, r)| {
                let est = model.estimate(ts, Some(u), Some(i)).unwrap();
                (r - est).powi(2)
            })
            .sum();
        (sq / ts.n_ratings() as f32).sqrt()
    }

    #[test]
    fn test_sgd_beats_global_mean() {
        let ts = TrainSet::build(&ratings()).unwrap();
        let options = SvdOptions {
            n_factors: 4,
            n_epochs: 200,
            lr_all: 0.02,
            ..SvdOptions::default()
        };
        let model = Svd::fit(&ts, &options, &mut StdRng::seed_from_u64(42));

        // Predicting the global mean everywhere gives an RMSE of 2.0 here
        assert!(train_rmse(&model, &ts) < 1.0);
    }

    #[test]
    fn test_unknown_user_gets_item_bias_only() {
        let ts = TrainSet::build(&ratings()).unwrap();
        let options = SvdOptions {
            n_factors: 2,
            n_epochs: 5,
            ..SvdOptions::default()
        };
        let model = Svd::fit(&ts, &options, &mut StdRng::seed_from_u64(1));

        let est = model.estimate(&ts, None, Some(0)).unwrap();
        assert_eq!(est, ts.global_mean() + model.bi[0]);
    }

    #[test]
    fn test_sample_normal_is_centered() {
        let mut rng = StdRng::seed_from_u64(3);
        let n = 10_000;
        let mean: f32 = (0..n).map(|_| sample_normal(&mut rng, 0.0, 0.1)).sum::<f32>() / n as f32;
        assert!(mean.abs() < 0.01);
    }
}
