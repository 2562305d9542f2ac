//! Co-clustering of users and items.
//!
//! Users and items are assigned to clusters; a rating is estimated as
//! `avg(co-cluster) + (μ_u - avg(user cluster)) + (μ_i - avg(item cluster))`.
//! Assignments start at random and are refined by moving every user (then
//! every item) to the cluster minimising its squared error.

use super::{Estimator, PredictionImpossible};
use crate::trainset::TrainSet;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy)]
pub struct CoClusteringOptions {
    pub n_cltr_u: usize,
    pub n_cltr_i: usize,
    pub n_epochs: usize,
}

impl Default for CoClusteringOptions {
    fn default() -> Self {
        Self {
            n_cltr_u: 3,
            n_cltr_i: 3,
            n_epochs: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoClustering {
    n_cltr_i: usize,
    user_mean: Vec<f32>,
    item_mean: Vec<f32>,
    cltr_u: Vec<usize>,
    cltr_i: Vec<usize>,
    avg_cltr_u: Vec<f32>,
    avg_cltr_i: Vec<f32>,
    /// Row-major `n_cltr_u x n_cltr_i`
    avg_cocltr: Vec<f32>,
}

/// Cluster averages for the current assignment
struct Averages {
    cltr_u: Vec<f32>,
    cltr_i: Vec<f32>,
    cocltr: Vec<f32>,
}

fn mean_ratings(values: impl Iterator<Item = f32>, len: usize) -> f32 {
    values.sum::<f32>() / len as f32
}

/// Index of the smallest value, first one on ties
fn argmin(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f32::INFINITY), |(best, best_val), (idx, &val)| {
            if val < best_val { (idx, val) } else { (best, best_val) }
        })
        .0
}

impl CoClustering {
    pub fn fit<R: Rng>(trainset: &TrainSet, options: &CoClusteringOptions, rng: &mut R) -> Self {
        let (n_u, n_i) = (options.n_cltr_u.max(1), options.n_cltr_i.max(1));

        let user_mean: Vec<f32> = (0..trainset.n_users())
            .map(|u| {
                let ratings = trainset.user_ratings(u);
                mean_ratings(ratings.iter().map(|&(_, r)| r), ratings.len())
            })
            .collect();
        let item_mean: Vec<f32> = (0..trainset.n_items())
            .map(|i| {
                let ratings = trainset.item_ratings(i);
                mean_ratings(ratings.iter().map(|&(_, r)| r), ratings.len())
            })
            .collect();

        let mut cltr_u: Vec<usize> = (0..trainset.n_users())
            .map(|_| rng.random_range(0..n_u))
            .collect();
        let mut cltr_i: Vec<usize> = (0..trainset.n_items())
            .map(|_| rng.random_range(0..n_i))
            .collect();

        for _ in 0..options.n_epochs {
            let avg = compute_averages(trainset, &cltr_u, &cltr_i, n_u, n_i);

            for (u, assigned) in cltr_u.iter_mut().enumerate() {
                let errors: Vec<f32> = (0..n_u)
                    .map(|uc| {
                        trainset
                            .user_ratings(u)
                            .iter()
                            .map(|&(i, r)| {
                                let ic = cltr_i[i];
                                let est = avg.cocltr[uc * n_i + ic]
                                    + user_mean[u] - avg.cltr_u[uc]
                                    + item_mean[i] - avg.cltr_i[ic];
                                (r - est).powi(2)
                            })
                            .sum()
                    })
                    .collect();
                *assigned = argmin(&errors);
            }

            for (i, assigned) in cltr_i.iter_mut().enumerate() {
                let errors: Vec<f32> = (0..n_i)
                    .map(|ic| {
                        trainset
                            .item_ratings(i)
                            .iter()
                            .map(|&(u, r)| {
                                let uc = cltr_u[u];
                                let est = avg.cocltr[uc * n_i + ic]
                                    + user_mean[u] - avg.cltr_u[uc]
                                    + item_mean[i] - avg.cltr_i[ic];
                                (r - est).powi(2)
                            })
                            .sum()
                    })
                    .collect();
                *assigned = argmin(&errors);
            }
        }

        let avg = compute_averages(trainset, &cltr_u, &cltr_i, n_u, n_i);
        Self {
            n_cltr_i: n_i,
            user_mean,
            item_mean,
            cltr_u,
            cltr_i,
            avg_cltr_u: avg.cltr_u,
            avg_cltr_i: avg.cltr_i,
            avg_cocltr: avg.cocltr,
        }
    }
}

fn compute_averages(
    trainset: &TrainSet,
    cltr_u: &[usize],
    cltr_i: &[usize],
    n_u: usize,
    n_i: usize,
) -> Averages {
    let mut sum_u = vec![0.0f32; n_u];
    let mut count_u = vec![0usize; n_u];
    let mut sum_i = vec![0.0f32; n_i];
    let mut count_i = vec![0usize; n_i];
    let mut sum_co = vec![0.0f32; n_u * n_i];
    let mut count_co = vec![0usize; n_u * n_i];

    for (u, i, r) in trainset.all_ratings() {
        let (uc, ic) = (cltr_u[u], cltr_i[i]);
        sum_u[uc] += r;
        count_u[uc] += 1;
        sum_i[ic] += r;
        count_i[ic] += 1;
        sum_co[uc * n_i + ic] += r;
        count_co[uc * n_i + ic] += 1;
    }

    let mu = trainset.global_mean();
    let average = |sums: Vec<f32>, counts: Vec<usize>| -> Vec<f32> {
        sums.into_iter()
            .zip(counts)
            .map(|(s, c)| if c > 0 { s / c as f32 } else { mu })
            .collect()
    };

    Averages {
        cltr_u: average(sum_u, count_u),
        cltr_i: average(sum_i, count_i),
        cocltr: average(sum_co, count_co),
    }
}

impl Estimator for CoClustering {
    fn estimate(
        &self,
        trainset: &TrainSet,
        user: Option<usize>,
        item: Option<usize>,
    ) -> Result<f32, PredictionImpossible> {
        let (Some(u), Some(i)) = (user, item) else {
            return Ok(trainset.global_mean());
        };

        let (uc, ic) = (self.cltr_u[u], self.cltr_i[i]);
        Ok(self.avg_cocltr[uc * self.n_cltr_i + ic]
            + (self.user_mean[u] - self.avg_cltr_u[uc])
            + (self.item_mean[i] - self.avg_cltr_i[ic]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Rating;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn trainset() -> TrainSet {
        let mut ratings = Vec::new();
        for user_id in 1..=4u32 {
            for movie_id in 1..=4u32 {
                let same_group = (user_id <= 2) == (movie_id <= 2);
                ratings.push(Rating {
                    user_id,
                    movie_id,
                    rating: if same_group { 4.5 } else { 1.5 },
                    timestamp: 0,
                });
            }
        }
        TrainSet::build(&ratings).unwrap()
    }

    #[test]
    fn test_argmin_prefers_first() {
        assert_eq!(argmin(&[2.0, 1.0, 1.0]), 1);
        assert_eq!(argmin(&[0.5]), 0);
    }

    #[test]
    fn test_single_cluster_reduces_to_means() {
        let ts = trainset();
        let options = CoClusteringOptions {
            n_cltr_u: 1,
            n_cltr_i: 1,
            n_epochs: 3,
        };
        let model = CoClustering::fit(&ts, &options, &mut StdRng::seed_from_u64(5));

        // One co-cluster: est = μ_u + μ_i - μ, and every mean is 3.0 here
        let est = model.estimate(&ts, Some(0), Some(0)).unwrap();
        assert!((est - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_fit_assigns_every_entity() {
        let ts = trainset();
        let model = CoClustering::fit(
            &ts,
            &CoClusteringOptions::default(),
            &mut StdRng::seed_from_u64(9),
        );

        assert_eq!(model.cltr_u.len(), ts.n_users());
        assert_eq!(model.cltr_i.len(), ts.n_items());
        assert!(model.cltr_u.iter().all(|&c| c < 3));
        assert_eq!(model.estimate(&ts, None, Some(0)).unwrap(), ts.global_mean());
    }
}
