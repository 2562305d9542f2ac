//! Collaborative-filtering models for movie ratings.
//!
//! Six algorithms share one [`Predictor`] interface: matrix factorisation
//! (`SVD`), user- and item-based neighbourhood models (`KNN Basic`,
//! `KNN Item`), `Slope One`, `BaselineOnly` and `CoClustering`. Models are
//! trained offline with [`train`], persisted as JSON with
//! [`FittedModel::save`] and loaded at service start through
//! [`ModelRegistry::load_from_dir`].

pub mod algorithms;
pub mod error;
pub mod evaluate;
pub mod persist;
pub mod predictor;
pub mod registry;
pub mod training;
pub mod trainset;

pub use algorithms::AlgorithmKind;
pub use error::{ModelError, Result};
pub use evaluate::{Accuracy, evaluate};
pub use persist::model_path;
pub use predictor::{FittedModel, Prediction, Predictor};
pub use registry::ModelRegistry;
pub use training::{TrainingConfig, TrainingReport, train};
pub use trainset::{TrainSet, train_test_split};
