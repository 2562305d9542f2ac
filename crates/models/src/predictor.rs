//! The prediction capability the service depends on, and the fitted model
//! that provides it.

use crate::algorithms::{
    AlgorithmKind, AlgorithmState, BaselineOnly, BaselineOptions, CoClustering,
    CoClusteringOptions, KnnBasic, KnnOptions, SlopeOne, Svd, SvdOptions,
};
use crate::trainset::{TrainSet, make_rng};
use data_loader::{MovieId, UserId};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;

/// A predicted rating for one (user, movie) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// `None` when the prediction was made for a user outside the id space
    pub user_id: Option<UserId>,
    pub movie_id: MovieId,
    /// Estimated rating, clipped to the rating scale
    pub estimate: f32,
    /// The algorithm could not estimate and the global mean was used instead
    pub was_impossible: bool,
}

/// Anything that can score a (user, movie) pair.
///
/// `Send + Sync` so a single loaded model can serve concurrent requests.
pub trait Predictor: Send + Sync {
    /// Name the model is registered under
    fn name(&self) -> &str;

    /// Score `movie_id` for `user_id`, or for a user with no history at all
    /// when `user_id` is `None`.
    fn predict_for(&self, user_id: Option<UserId>, movie_id: MovieId) -> Prediction;

    fn predict(&self, user_id: UserId, movie_id: MovieId) -> Prediction {
        self.predict_for(Some(user_id), movie_id)
    }
}

/// A trained algorithm together with the train set it was fitted on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedModel {
    kind: AlgorithmKind,
    trainset: TrainSet,
    state: AlgorithmState,
}

impl FittedModel {
    /// Fit `kind` with its default hyper-parameters.
    ///
    /// `seed` drives the random initialisation of SVD and CoClustering.
    pub fn fit(kind: AlgorithmKind, trainset: TrainSet, seed: Option<u64>) -> Self {
        let start = Instant::now();
        let mut rng = make_rng(seed);

        let state = match kind {
            AlgorithmKind::Svd => {
                AlgorithmState::Svd(Svd::fit(&trainset, &SvdOptions::default(), &mut rng))
            }
            AlgorithmKind::KnnBasic => {
                AlgorithmState::Knn(KnnBasic::fit(&trainset, &KnnOptions::user_based()))
            }
            AlgorithmKind::KnnItem => {
                AlgorithmState::Knn(KnnBasic::fit(&trainset, &KnnOptions::item_based()))
            }
            AlgorithmKind::SlopeOne => AlgorithmState::SlopeOne(SlopeOne::fit(&trainset)),
            AlgorithmKind::BaselineOnly => AlgorithmState::BaselineOnly(BaselineOnly::fit(
                &trainset,
                &BaselineOptions::default(),
            )),
            AlgorithmKind::CoClustering => AlgorithmState::CoClustering(CoClustering::fit(
                &trainset,
                &CoClusteringOptions::default(),
                &mut rng,
            )),
        };

        info!(
            "Fitted {} on {} ratings in {:.2?}",
            kind,
            trainset.n_ratings(),
            start.elapsed()
        );
        Self::from_state(kind, trainset, state)
    }

    /// Assemble a model from an already fitted state
    pub fn from_state(kind: AlgorithmKind, trainset: TrainSet, state: AlgorithmState) -> Self {
        Self {
            kind,
            trainset,
            state,
        }
    }

    pub fn kind(&self) -> AlgorithmKind {
        self.kind
    }
}

impl Predictor for FittedModel {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn predict_for(&self, user_id: Option<UserId>, movie_id: MovieId) -> Prediction {
        let user = user_id.and_then(|id| self.trainset.inner_user(id));
        let item = self.trainset.inner_item(movie_id);

        let (estimate, was_impossible) =
            match self.state.estimator().estimate(&self.trainset, user, item) {
                Ok(est) => (est, false),
                Err(_) => (self.trainset.global_mean(), true),
            };

        Prediction {
            user_id,
            movie_id,
            estimate: self.trainset.scale().clip(estimate),
            was_impossible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Rating;

    fn ratings() -> Vec<Rating> {
        let raw = [
            (1, 1, 5.0),
            (1, 2, 4.0),
            (2, 1, 5.0),
            (2, 3, 1.0),
            (3, 2, 3.5),
            (3, 3, 0.5),
        ];
        raw.iter()
            .map(|&(user_id, movie_id, rating)| Rating {
                user_id,
                movie_id,
                rating,
                timestamp: 0,
            })
            .collect()
    }

    #[test]
    fn test_every_algorithm_predicts_within_scale() {
        let ts = TrainSet::build(&ratings()).unwrap();
        for kind in AlgorithmKind::ALL {
            let model = FittedModel::fit(kind, ts.clone(), Some(11));
            assert_eq!(model.name(), kind.name());

            for movie_id in 1..=3 {
                let p = model.predict(1, movie_id);
                assert!((0.5..=5.0).contains(&p.estimate), "{kind}: {p:?}");
            }
        }
    }

    #[test]
    fn test_unknown_user_predicts_global_mean() {
        let ts = TrainSet::build(&ratings()).unwrap();
        let mean = ts.global_mean();
        let model = FittedModel::fit(AlgorithmKind::KnnBasic, ts, None);

        let p = model.predict(999, 1);
        assert!(p.was_impossible);
        assert_eq!(p.estimate, mean);
        assert_eq!(p.user_id, Some(999));
    }

    #[test]
    fn test_missing_user_matches_unseen_user() {
        let ts = TrainSet::build(&ratings()).unwrap();
        let model = FittedModel::fit(AlgorithmKind::BaselineOnly, ts, None);

        for movie_id in 1..=3 {
            let anonymous = model.predict_for(None, movie_id);
            let unseen = model.predict(999, movie_id);
            assert_eq!(anonymous.estimate, unseen.estimate);
            assert_eq!(anonymous.user_id, None);
        }
    }

    #[test]
    fn test_estimates_are_clipped() {
        let raw = [(1, 2, 5.0), (1, 3, 5.0), (2, 1, 5.0), (2, 2, 1.0)];
        let ratings: Vec<Rating> = raw
            .iter()
            .map(|&(user_id, movie_id, rating)| Rating {
                user_id,
                movie_id,
                rating,
                timestamp: 0,
            })
            .collect();
        let ts = TrainSet::build(&ratings).unwrap();
        let model = FittedModel::fit(AlgorithmKind::SlopeOne, ts, None);

        // Raw estimate is 5.0 (user mean) + 4.0 (deviation against movie 2)
        let p = model.predict(1, 1);
        assert_eq!(p.estimate, 5.0);
        assert!(!p.was_impossible);
    }
}
