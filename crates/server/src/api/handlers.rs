use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use data_loader::UserId;

use super::AppState;
use crate::error::{ApiError, ApiResult};
use crate::orchestrator::MovieRecommendation;

/// Query string of `/recommend`.
///
/// Kept as raw strings so that a bad `user_id` is reported by the handler
/// rather than rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct RecommendParams {
    pub user_id: Option<String>,
    pub algo: Option<String>,
    pub top_n: Option<String>,
}

pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub async fn list_algorithms(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.orchestrator.algorithm_names())
}

/// `GET /recommend?user_id=<int>&algo=<name>&top_n=<int>`
pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendParams>,
) -> ApiResult<Json<Vec<MovieRecommendation>>> {
    let user_id = parse_user_id(params.user_id.as_deref())?;
    let top_n = params
        .top_n
        .as_deref()
        .map(|raw| {
            raw.trim()
                .parse::<usize>()
                .map_err(|_| ApiError::InvalidTopN(raw.to_string()))
        })
        .transpose()?;

    let orchestrator = state.orchestrator.clone();
    let algo = params.algo;
    let recommendations = tokio::task::spawn_blocking(move || {
        orchestrator.get_recommendations(user_id, algo.as_deref(), top_n)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Recommendation task failed: {e}")))??;

    Ok(Json(recommendations))
}

/// Any integer is a valid user id. Ids that do not fit [`UserId`] cannot be
/// in the dataset and come back as `None`, an unknown user.
fn parse_user_id(raw: Option<&str>) -> ApiResult<Option<UserId>> {
    let raw = raw.ok_or_else(|| ApiError::InvalidUserId("missing".to_string()))?;
    let id: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::InvalidUserId(raw.to_string()))?;
    Ok(UserId::try_from(id).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id(Some("12")).unwrap(), Some(12));
        assert_eq!(parse_user_id(Some(" 3 ")).unwrap(), Some(3));
        assert!(matches!(parse_user_id(Some("abc")), Err(ApiError::InvalidUserId(_))));
        assert!(matches!(parse_user_id(Some("1.5")), Err(ApiError::InvalidUserId(_))));
        assert!(matches!(parse_user_id(None), Err(ApiError::InvalidUserId(_))));
    }

    #[test]
    fn test_out_of_range_user_id_is_unknown() {
        assert_eq!(parse_user_id(Some("-1")).unwrap(), None);
        assert_eq!(parse_user_id(Some("5000000000")).unwrap(), None);
    }
}
