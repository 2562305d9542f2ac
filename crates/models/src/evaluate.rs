//! Accuracy of a predictor on held-out ratings.

use crate::predictor::Predictor;
use data_loader::Rating;
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Accuracy {
    pub rmse: f32,
    pub mae: f32,
    /// Number of ratings evaluated
    pub n: usize,
    /// How many of them fell back to the global mean
    pub impossible: usize,
}

/// RMSE and MAE of `predictor` over `test`. `None` when `test` is empty.
pub fn evaluate(predictor: &dyn Predictor, test: &[Rating]) -> Option<Accuracy> {
    if test.is_empty() {
        return None;
    }

    let (sq_err, abs_err, impossible) = test
        .par_iter()
        .map(|rating| {
            let p = predictor.predict(rating.user_id, rating.movie_id);
            let err = (rating.rating - p.estimate) as f64;
            (err * err, err.abs(), usize::from(p.was_impossible))
        })
        .reduce(|| (0.0, 0.0, 0), |a, b| (a.0 + b.0, a.1 + b.1, a.2 + b.2));

    let n = test.len();
    Some(Accuracy {
        rmse: (sq_err / n as f64).sqrt() as f32,
        mae: (abs_err / n as f64) as f32,
        n,
        impossible,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::Prediction;
    use data_loader::{MovieId, UserId};

    struct Fixed(f32);

    impl Predictor for Fixed {
        fn name(&self) -> &str {
            "Fixed"
        }

        fn predict_for(&self, user_id: Option<UserId>, movie_id: MovieId) -> Prediction {
            Prediction {
                user_id,
                movie_id,
                estimate: self.0,
                was_impossible: movie_id > 100,
            }
        }
    }

    fn rating(movie_id: MovieId, rating: f32) -> Rating {
        Rating {
            user_id: 1,
            movie_id,
            rating,
            timestamp: 0,
        }
    }

    #[test]
    fn test_rmse_and_mae() {
        let test = [rating(1, 4.0), rating(2, 2.0), rating(101, 3.0), rating(3, 3.0)];
        let acc = evaluate(&Fixed(3.0), &test).unwrap();

        // Errors: 1, -1, 0, 0
        assert!((acc.rmse - (0.5f32).sqrt()).abs() < 1e-6);
        assert!((acc.mae - 0.5).abs() < 1e-6);
        assert_eq!(acc.n, 4);
        assert_eq!(acc.impossible, 1);
    }

    #[test]
    fn test_empty_test_set() {
        assert!(evaluate(&Fixed(3.0), &[]).is_none());
    }
}
