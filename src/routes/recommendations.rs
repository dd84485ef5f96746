use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{error::AppResult, routes::AppState, services::recommendations};

#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    limit: Option<u32>,
}

/// Handler for the similar-titles endpoint
pub async fn similar(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
    Query(params): Query<SimilarQuery>,
) -> AppResult<Json<Vec<String>>> {
    let ids =
        recommendations::similar_titles(state.provider.as_ref(), &movie_id, params.limit).await?;
    Ok(Json(ids))
}
