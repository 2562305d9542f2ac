//! Collaborative-filtering algorithms.
//!
//! Each algorithm is fitted once on a [`TrainSet`] and afterwards only
//! answers [`Estimator::estimate`] calls on inner ids. Mapping raw ids,
//! falling back to the global mean and clipping to the rating scale is done
//! once, in [`crate::FittedModel`].

pub mod baseline;
pub mod co_clustering;
pub mod knn;
pub mod slope_one;
pub mod svd;

pub use baseline::{BaselineOnly, BaselineOptions};
pub use co_clustering::{CoClustering, CoClusteringOptions};
pub use knn::{KnnBasic, KnnOptions};
pub use slope_one::SlopeOne;
pub use svd::{Svd, SvdOptions};

use crate::error::ModelError;
use crate::trainset::TrainSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The algorithm could not produce an estimate for this (user, item) pair
#[derive(Debug, Clone, Copy, Error)]
#[error("prediction impossible: {0}")]
pub struct PredictionImpossible(pub &'static str);

/// Estimation over inner ids. `None` means the raw id was not in the train set.
pub trait Estimator {
    fn estimate(
        &self,
        trainset: &TrainSet,
        user: Option<usize>,
        item: Option<usize>,
    ) -> Result<f32, PredictionImpossible>;
}

/// The algorithms the training step fits and the service can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AlgorithmKind {
    #[default]
    Svd,
    KnnBasic,
    KnnItem,
    SlopeOne,
    BaselineOnly,
    CoClustering,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 6] = [
        AlgorithmKind::Svd,
        AlgorithmKind::KnnBasic,
        AlgorithmKind::KnnItem,
        AlgorithmKind::SlopeOne,
        AlgorithmKind::BaselineOnly,
        AlgorithmKind::CoClustering,
    ];

    /// Registry name, also used as the model file stem
    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmKind::Svd => "SVD",
            AlgorithmKind::KnnBasic => "KNN Basic",
            AlgorithmKind::KnnItem => "KNN Item",
            AlgorithmKind::SlopeOne => "Slope One",
            AlgorithmKind::BaselineOnly => "BaselineOnly",
            AlgorithmKind::CoClustering => "CoClustering",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlgorithmKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ModelError::UnknownAlgorithm(s.to_string()))
    }
}

/// Fitted parameters of one algorithm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AlgorithmState {
    Svd(Svd),
    Knn(KnnBasic),
    SlopeOne(SlopeOne),
    BaselineOnly(BaselineOnly),
    CoClustering(CoClustering),
}

impl AlgorithmState {
    pub fn estimator(&self) -> &dyn Estimator {
        match self {
            AlgorithmState::Svd(algo) => algo,
            AlgorithmState::Knn(algo) => algo,
            AlgorithmState::SlopeOne(algo) => algo,
            AlgorithmState::BaselineOnly(algo) => algo,
            AlgorithmState::CoClustering(algo) => algo,
        }
    }
}
