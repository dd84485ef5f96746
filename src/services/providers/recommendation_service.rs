/// Recommendation microservice provider
///
/// The service exposes one GET endpoint per ranking, each answering with a bare JSON
/// array of `show_id`s:
/// - /recommendations/top-rated?limit=N
/// - /recommendations/popular?limit=N
/// - /recommendations/genre/{genre}?limit=N
/// - /recommendations/hidden-gems?limit=N
/// - /recommendations/similar-to/{show_id}?limit=N
use std::time::Duration;

use reqwest::{Client as HttpClient, Url};

use crate::{
    error::{AppError, AppResult},
    services::providers::RecommendationProvider,
};

const PROVIDER_NAME: &str = "recommendation_service";

#[derive(Clone)]
pub struct HttpRecommendationProvider {
    http_client: HttpClient,
    api_url: Url,
}

impl HttpRecommendationProvider {
    /// Creates a provider whose requests give up after `timeout`
    pub fn new(api_url: &str, timeout: Duration) -> AppResult<Self> {
        let api_url = Url::parse(api_url).map_err(|e| {
            AppError::InvalidInput(format!("Invalid recommendation service URL: {}", e))
        })?;

        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url,
        })
    }

    /// Builds `{base}/recommendations/{segments...}` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.api_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                AppError::Internal("Recommendation service URL cannot be a base".to_string())
            })?;
            path.pop_if_empty().push("recommendations");
            path.extend(segments);
        }
        Ok(url)
    }

    async fn fetch_ids(&self, segments: &[&str], limit: u32) -> AppResult<Vec<String>> {
        let url = self.endpoint(segments)?;

        let response = self
            .http_client
            .get(url.clone())
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(format!("GET {}", url))
                } else {
                    AppError::HttpClient(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Recommendation service returned status {}: {}",
                status, body
            )));
        }

        let ids: Vec<String> = response.json().await?;

        tracing::debug!(
            endpoint = %url.path(),
            limit,
            results = ids.len(),
            provider = PROVIDER_NAME,
            "Recommendations fetched"
        );

        Ok(ids)
    }
}

#[async_trait::async_trait]
impl RecommendationProvider for HttpRecommendationProvider {
    async fn top_rated(&self, limit: u32) -> AppResult<Vec<String>> {
        self.fetch_ids(&["top-rated"], limit).await
    }

    async fn popular(&self, limit: u32) -> AppResult<Vec<String>> {
        self.fetch_ids(&["popular"], limit).await
    }

    async fn by_genre(&self, genre: &str, limit: u32) -> AppResult<Vec<String>> {
        self.fetch_ids(&["genre", genre], limit).await
    }

    async fn hidden_gems(&self, limit: u32) -> AppResult<Vec<String>> {
        self.fetch_ids(&["hidden-gems"], limit).await
    }

    async fn similar_to(&self, movie_id: &str, limit: u32) -> AppResult<Vec<String>> {
        if movie_id.trim().is_empty() {
            return Err(AppError::InvalidInput("Movie id cannot be empty".to_string()));
        }
        self.fetch_ids(&["similar-to", movie_id], limit).await
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
