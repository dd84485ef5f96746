/// Recommendation provider abstraction
///
/// The curated lists and the similar-title lookup only need ranked movie ids, so
/// the provider surface is a handful of calls returning `show_id`s in rank order.
/// The HTTP microservice is the production implementation; tests use mocks.
use crate::error::AppResult;

pub mod recommendation_service;

pub use recommendation_service::HttpRecommendationProvider;

/// Trait for recommendation providers
///
/// Every method returns movie ids best first. An error means the provider could not
/// answer; callers decide whether that is fatal.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationProvider: Send + Sync {
    /// Highest rated titles overall
    async fn top_rated(&self, limit: u32) -> AppResult<Vec<String>>;

    /// Most watched / most rated titles
    async fn popular(&self, limit: u32) -> AppResult<Vec<String>>;

    /// Best titles of a single genre, e.g. "Comedies"
    async fn by_genre(&self, genre: &str, limit: u32) -> AppResult<Vec<String>>;

    /// Well rated titles with comparatively few ratings
    async fn hidden_gems(&self, limit: u32) -> AppResult<Vec<String>>;

    /// Titles similar in content to the given one
    async fn similar_to(&self, movie_id: &str, limit: u32) -> AppResult<Vec<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
