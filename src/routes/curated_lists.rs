use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::SystemList,
    routes::AppState,
};

/// Handler for listing every curated list with its items
pub async fn list_all(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<Vec<SystemList>>> {
    let lists = state.store.lists_by_owner(state.curator_owner_id).await?;

    tracing::info!(
        request_id = %request_id,
        lists = lists.len(),
        "Curated lists served"
    );

    Ok(Json(lists))
}

/// Handler for a single curated list
///
/// Lists owned by end users, or private ones, are reported as missing.
pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Path(list_id): Path<i32>,
) -> AppResult<Json<SystemList>> {
    let list = state
        .store
        .find_list(list_id)
        .await?
        .filter(|list| list.owner_id == state.curator_owner_id && list.is_public)
        .ok_or_else(|| AppError::NotFound(format!("Curated list {} not found", list_id)))?;

    tracing::info!(
        request_id = %request_id,
        list_id,
        items = list.items.len(),
        "Curated list served"
    );

    Ok(Json(list))
}
