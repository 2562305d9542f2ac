//! Candidate handling between the catalog and a scoring model.
//!
//! A recommendation request goes through three stages:
//! 1. Every catalog movie becomes a [`Candidate`]
//! 2. The [`FilterPipeline`] drops candidates the user should not see
//!    (movies they already rated)
//! 3. [`rank_candidates`] scores what is left with a
//!    [`Predictor`](models::Predictor) and keeps the best `top_n`
//!
//! ```ignore
//! use pipeline::filters::AlreadyRatedFilter;
//! use pipeline::{FilterPipeline, build_user_context, catalog_candidates, rank_candidates};
//!
//! let pipeline = FilterPipeline::new().add_filter(AlreadyRatedFilter);
//! let context = build_user_context(&index, user_id);
//! let candidates = pipeline.apply(catalog_candidates(&index), &context)?;
//! let top = rank_candidates(model.as_ref(), &context, candidates, 5);
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod ranking;
pub mod traits;
pub mod types;
pub mod user_context;

pub use filter_pipeline::FilterPipeline;
pub use ranking::{catalog_candidates, rank_candidates};
pub use traits::Filter;
pub use types::{Candidate, UserContext};
pub use user_context::build_user_context;
