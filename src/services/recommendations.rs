use crate::{
    error::{AppError, AppResult},
    services::providers::RecommendationProvider,
};

pub const DEFAULT_SIMILAR_LIMIT: u32 = 20;
pub const MAX_SIMILAR_LIMIT: u32 = 100;

/// Finds titles similar to `movie_id`
///
/// Delegates to the recommendation provider after validating the request, so the
/// HTTP layer stays free of provider details.
pub async fn similar_titles(
    provider: &dyn RecommendationProvider,
    movie_id: &str,
    limit: Option<u32>,
) -> AppResult<Vec<String>> {
    let limit = limit.unwrap_or(DEFAULT_SIMILAR_LIMIT);
    if limit == 0 || limit > MAX_SIMILAR_LIMIT {
        return Err(AppError::InvalidInput(format!(
            "limit must be between 1 and {}",
            MAX_SIMILAR_LIMIT
        )));
    }

    let mut ids = provider.similar_to(movie_id, limit).await?;
    // The source title itself is never a useful suggestion
    ids.retain(|id| id != movie_id);
    ids.truncate(limit as usize);

    tracing::info!(
        movie_id = %movie_id,
        results = ids.len(),
        provider = provider.name(),
        "Similar titles fetched"
    );

    Ok(ids)
}
