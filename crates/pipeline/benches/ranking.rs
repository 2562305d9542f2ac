//! Benchmarks for filtering and ranking the full catalog
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses a synthetic catalog so it runs without the MovieLens files.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use data_loader::{DataIndex, Movie, Rating};
use models::{AlgorithmKind, FittedModel, TrainSet};
use pipeline::filters::AlreadyRatedFilter;
use pipeline::{FilterPipeline, build_user_context, catalog_candidates, rank_candidates};

fn synthetic_index(n_users: u32, n_movies: u32) -> DataIndex {
    let mut index = DataIndex::new();
    for id in 1..=n_movies {
        index.insert_movie(Movie {
            id,
            title: format!("Movie {id}"),
            year: None,
            genres: vec![],
        });
    }
    for user_id in 1..=n_users {
        for movie_id in (1..=n_movies).filter(|m| (m + user_id) % 7 == 0) {
            index.insert_rating(Rating {
                user_id,
                movie_id,
                rating: ((user_id * movie_id) % 10) as f32 * 0.5 + 0.5,
                timestamp: 0,
            });
        }
    }
    index
}

fn bench_rank_catalog(c: &mut Criterion) {
    let index = synthetic_index(300, 3000);
    let trainset = TrainSet::build(index.all_ratings()).expect("train set");
    let model = FittedModel::fit(AlgorithmKind::Svd, trainset, Some(1));
    let pipeline = FilterPipeline::new().add_filter(AlreadyRatedFilter);
    let context = build_user_context(&index, 1);

    c.bench_function("rank_full_catalog_svd", |b| {
        b.iter(|| {
            let candidates = pipeline
                .apply(catalog_candidates(&index), black_box(&context))
                .expect("filter");
            black_box(rank_candidates(&model, &context, candidates, 5))
        })
    });
}

criterion_group!(benches, bench_rank_catalog);
criterion_main!(benches);
