//! Scoring and ordering candidates.

use crate::types::{Candidate, UserContext};
use data_loader::DataIndex;
use models::Predictor;
use rayon::prelude::*;

/// Every catalog movie as an unscored candidate, in catalog order
pub fn catalog_candidates(data_index: &DataIndex) -> Vec<Candidate> {
    data_index
        .movies()
        .iter()
        .map(|movie| Candidate::new(movie.id))
        .collect()
}

/// Score `candidates` for the user in `context` and keep the `top_n` best.
///
/// Scores are computed in parallel. The sort is stable, so candidates with
/// equal scores stay in their input order. A NaN score sorts below every
/// number.
pub fn rank_candidates(
    predictor: &dyn Predictor,
    context: &UserContext,
    candidates: Vec<Candidate>,
    top_n: usize,
) -> Vec<Candidate> {
    let mut scored: Vec<Candidate> = candidates
        .into_par_iter()
        .map(|candidate| {
            let prediction = predictor.predict_for(context.user_id, candidate.movie_id);
            Candidate::with_score(candidate.movie_id, prediction.estimate)
        })
        .collect();

    scored.sort_by(|a, b| nan_last(b.score).total_cmp(&nan_last(a.score)));
    scored.truncate(top_n);
    scored
}

fn nan_last(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{MovieId, UserId};
    use models::Prediction;

    /// Scores a movie by its id modulo 4
    struct ModScorer;

    impl Predictor for ModScorer {
        fn name(&self) -> &str {
            "ModScorer"
        }

        fn predict_for(&self, user_id: Option<UserId>, movie_id: MovieId) -> Prediction {
            Prediction {
                user_id,
                movie_id,
                estimate: (movie_id % 4) as f32,
                was_impossible: false,
            }
        }
    }

    #[test]
    fn test_rank_orders_by_score_descending() {
        let candidates = (1..=8).map(Candidate::new).collect();
        let ranked = rank_candidates(&ModScorer, &UserContext::new(1), candidates, 3);

        // Scores: 3 -> 3.0, 7 -> 3.0, then 2 and 6 at 2.0
        let ids: Vec<_> = ranked.iter().map(|c| c.movie_id).collect();
        assert_eq!(ids, vec![3, 7, 2]);
        assert_eq!(ranked[0].score, 3.0);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let candidates = vec![Candidate::new(8), Candidate::new(4), Candidate::new(12)];
        let ranked = rank_candidates(&ModScorer, &UserContext::new(1), candidates, 10);
        let ids: Vec<_> = ranked.iter().map(|c| c.movie_id).collect();
        assert_eq!(ids, vec![8, 4, 12]);
    }

    /// Movie 2 gets a NaN estimate, the others their id
    struct NanScorer;

    impl Predictor for NanScorer {
        fn name(&self) -> &str {
            "NanScorer"
        }

        fn predict_for(&self, user_id: Option<UserId>, movie_id: MovieId) -> Prediction {
            Prediction {
                user_id,
                movie_id,
                estimate: if movie_id == 2 { f32::NAN } else { movie_id as f32 },
                was_impossible: false,
            }
        }
    }

    #[test]
    fn test_nan_scores_rank_last() {
        let candidates = (1..=4).map(Candidate::new).collect();
        let ranked = rank_candidates(&NanScorer, &UserContext::new(1), candidates, 4);
        let ids: Vec<_> = ranked.iter().map(|c| c.movie_id).collect();
        assert_eq!(ids, vec![4, 3, 1, 2]);
    }

    #[test]
    fn test_anonymous_context_scores_without_user() {
        let context = UserContext::anonymous();
        let ranked = rank_candidates(&ModScorer, &context, vec![Candidate::new(3)], 1);
        assert_eq!(ranked[0].score, 3.0);
    }

    #[test]
    fn test_fewer_candidates_than_top_n() {
        let ranked = rank_candidates(&ModScorer, &UserContext::new(1), vec![Candidate::new(5)], 5);
        assert_eq!(ranked.len(), 1);
        assert!(rank_candidates(&ModScorer, &UserContext::new(1), Vec::new(), 5).is_empty());
    }
}
