//! Offline training: split, fit every requested algorithm, score it on the
//! held-out part.

use crate::algorithms::AlgorithmKind;
use crate::error::Result;
use crate::evaluate::{Accuracy, evaluate};
use crate::predictor::FittedModel;
use crate::trainset::{TrainSet, train_test_split};
use data_loader::Rating;
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Fraction of ratings held out for evaluation, in (0, 1)
    pub test_size: f32,
    /// Seed for the split and the random initialisations
    pub seed: Option<u64>,
    pub algorithms: Vec<AlgorithmKind>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            seed: None,
            algorithms: AlgorithmKind::ALL.to_vec(),
        }
    }
}

/// Outcome of training one algorithm
#[derive(Debug)]
pub struct TrainingReport {
    pub kind: AlgorithmKind,
    /// `None` when the held-out part is empty
    pub accuracy: Option<Accuracy>,
    pub elapsed: Duration,
    pub model: FittedModel,
}

/// Fit every algorithm in `config` on the same train split, in parallel.
///
/// Reports come back in the order the algorithms were requested.
pub fn train(ratings: &[Rating], config: &TrainingConfig) -> Result<Vec<TrainingReport>> {
    let (train, test) = train_test_split(ratings, config.test_size, config.seed)?;
    info!(
        "Split {} ratings into {} train / {} test",
        ratings.len(),
        train.len(),
        test.len()
    );

    let trainset = TrainSet::build(&train)?;
    info!(
        "Train set: {} users, {} movies, global mean {:.3}",
        trainset.n_users(),
        trainset.n_items(),
        trainset.global_mean()
    );

    let reports = config
        .algorithms
        .par_iter()
        .enumerate()
        .map(|(idx, &kind)| {
            let start = Instant::now();
            let seed = config.seed.map(|s| s.wrapping_add(idx as u64));
            let model = FittedModel::fit(kind, trainset.clone(), seed);
            let accuracy = evaluate(&model, &test);

            if let Some(acc) = &accuracy {
                info!("{}: RMSE {:.4}, MAE {:.4}", kind, acc.rmse, acc.mae);
            }
            TrainingReport {
                kind,
                accuracy,
                elapsed: start.elapsed(),
                model,
            }
        })
        .collect();

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    fn ratings() -> Vec<Rating> {
        let mut out = Vec::new();
        for user_id in 1..=8u32 {
            for movie_id in 1..=6u32 {
                out.push(Rating {
                    user_id,
                    movie_id,
                    rating: ((user_id + movie_id) % 5) as f32 + 1.0,
                    timestamp: 0,
                });
            }
        }
        out
    }

    #[test]
    fn test_train_reports_in_requested_order() {
        let config = TrainingConfig {
            test_size: 0.25,
            seed: Some(7),
            algorithms: vec![AlgorithmKind::SlopeOne, AlgorithmKind::BaselineOnly],
        };
        let reports = train(&ratings(), &config).unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].kind, AlgorithmKind::SlopeOne);
        assert_eq!(reports[1].kind, AlgorithmKind::BaselineOnly);
        for report in &reports {
            let acc = report.accuracy.unwrap();
            assert_eq!(acc.n, 12);
            assert!(acc.rmse >= acc.mae);
        }
    }

    #[test]
    fn test_invalid_test_size() {
        let config = TrainingConfig {
            test_size: 1.0,
            ..TrainingConfig::default()
        };
        let err = train(&ratings(), &config).unwrap_err();
        assert!(matches!(err, ModelError::InvalidParameter { name: "test_size", .. }));
    }
}
