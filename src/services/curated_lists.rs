use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::{
    config::Config,
    db::ListStore,
    error::{AppError, AppResult},
    models::{NewListContents, SavedList},
    services::providers::RecommendationProvider,
};

pub const CRITICS_PICKS: &str = "Critics' Picks";
pub const HIDDEN_GEMS: &str = "Hidden Gems";
pub const FAN_FAVORITES: &str = "Fan Favorites";

/// Which provider ranking feeds a curated list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySource {
    TopRated,
    HiddenGems,
    Popular,
    Genre(String),
}

/// One curated list the generator maintains
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuratedCategory {
    pub source: CategorySource,
    pub list_name: String,
    pub description: String,
}

impl CuratedCategory {
    pub fn critics_picks() -> Self {
        Self {
            source: CategorySource::TopRated,
            list_name: CRITICS_PICKS.to_string(),
            description: "The highest-rated films curated by our recommendation system"
                .to_string(),
        }
    }

    pub fn hidden_gems() -> Self {
        Self {
            source: CategorySource::HiddenGems,
            list_name: HIDDEN_GEMS.to_string(),
            description: "Highly-rated films that deserve more attention".to_string(),
        }
    }

    pub fn fan_favorites() -> Self {
        Self {
            source: CategorySource::Popular,
            list_name: FAN_FAVORITES.to_string(),
            description: "The most popular films that everyone is watching".to_string(),
        }
    }

    pub fn best_of(genre: &str) -> Self {
        Self {
            source: CategorySource::Genre(genre.to_string()),
            list_name: format!("Best of {}", genre),
            description: format!(
                "A collection of the finest {} for your viewing pleasure",
                genre.to_lowercase()
            ),
        }
    }
}

/// The fixed lists followed by one "Best of" list per genre, in processing order
pub fn curated_categories(genres: &[String]) -> Vec<CuratedCategory> {
    let mut categories = vec![
        CuratedCategory::critics_picks(),
        CuratedCategory::hidden_gems(),
        CuratedCategory::fan_favorites(),
    ];
    categories.extend(genres.iter().map(|genre| CuratedCategory::best_of(genre)));
    categories
}

/// Runtime settings for the generator
#[derive(Debug, Clone)]
pub struct CuratorSettings {
    /// Identity that owns every curated list
    pub owner_id: i32,
    pub list_size: u32,
    pub provider_timeout: Duration,
    pub refresh_interval: Duration,
    pub categories: Vec<CuratedCategory>,
}

impl CuratorSettings {
    pub fn from_config(config: &Config, owner_id: i32) -> Self {
        Self {
            owner_id,
            list_size: config.curated_list_size,
            provider_timeout: config.provider_timeout(),
            refresh_interval: config.refresh_interval(),
            categories: curated_categories(&config.genres()),
        }
    }
}

/// How the curated list owner was determined at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerResolution {
    /// The configured system identity exists
    SystemIdentity(i32),
    /// The system identity is missing; the first admin identity is used instead
    AdminFallback(i32),
    /// Neither exists; lists are written under the configured id anyway
    Unresolved(i32),
}

impl OwnerResolution {
    pub fn owner_id(&self) -> i32 {
        match *self {
            OwnerResolution::SystemIdentity(id)
            | OwnerResolution::AdminFallback(id)
            | OwnerResolution::Unresolved(id) => id,
        }
    }
}

/// Resolves the identity that owns curated lists
///
/// Lookup failures are logged and treated as "not found"; this never aborts startup.
pub async fn resolve_owner(
    store: &dyn ListStore,
    system_owner_id: i32,
    admin_role: &str,
) -> OwnerResolution {
    match store.find_identity(system_owner_id).await {
        Ok(Some(identity)) => {
            tracing::info!(owner_id = identity.user_id, "Curated list owner found");
            return OwnerResolution::SystemIdentity(identity.user_id);
        }
        Ok(None) => {
            tracing::warn!(
                owner_id = system_owner_id,
                "System user for curated lists not found, looking for an admin user"
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, owner_id = system_owner_id, "System user lookup failed");
        }
    }

    match store.find_first_admin_identity(admin_role).await {
        Ok(Some(admin)) => {
            tracing::info!(owner_id = admin.user_id, role = %admin_role, "Using admin user as curated list owner");
            OwnerResolution::AdminFallback(admin.user_id)
        }
        Ok(None) => {
            tracing::warn!(
                owner_id = system_owner_id,
                "No admin user found, curated lists may not be generated properly"
            );
            OwnerResolution::Unresolved(system_owner_id)
        }
        Err(e) => {
            tracing::warn!(error = %e, owner_id = system_owner_id, "Admin user lookup failed");
            OwnerResolution::Unresolved(system_owner_id)
        }
    }
}

/// What happened to one category during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryOutcome {
    Created { list_id: i32, items: usize },
    Updated { list_id: i32, items: usize },
    /// Provider had nothing; the existing list (if any) was left alone
    SkippedEmpty,
    ProviderFailed(String),
    StoreFailed(String),
}

impl CategoryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            CategoryOutcome::Created { .. } | CategoryOutcome::Updated { .. }
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            CategoryOutcome::ProviderFailed(_) | CategoryOutcome::StoreFailed(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub list_name: String,
    pub outcome: CategoryOutcome,
}

/// Summary of one `regenerate_all` run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegenerationReport {
    pub categories: Vec<CategoryReport>,
    /// The run stopped before attempting every category
    pub cancelled: bool,
}

impl RegenerationReport {
    pub fn attempted(&self) -> usize {
        self.categories.len()
    }

    pub fn succeeded(&self) -> usize {
        self.categories
            .iter()
            .filter(|c| c.outcome.is_success())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.categories
            .iter()
            .filter(|c| c.outcome.is_failure())
            .count()
    }

    pub fn outcome(&self, list_name: &str) -> Option<&CategoryOutcome> {
        self.categories
            .iter()
            .find(|c| c.list_name == list_name)
            .map(|c| &c.outcome)
    }
}

/// Removes repeated ids, keeping the first occurrence. Returns how many were dropped.
fn dedupe_preserving_order(movie_ids: Vec<String>) -> (Vec<String>, usize) {
    let total = movie_ids.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<String> = movie_ids
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect();
    let dropped = total - unique.len();
    (unique, dropped)
}

/// Regenerates the system-owned curated lists from the recommendation provider
///
/// Categories are processed one at a time in a fixed order. Each category is isolated:
/// a provider or store failure is logged and the run moves on to the next one.
#[derive(Clone)]
pub struct CuratedListGenerator {
    provider: Arc<dyn RecommendationProvider>,
    store: Arc<dyn ListStore>,
    settings: CuratorSettings,
}

impl CuratedListGenerator {
    pub fn new(
        provider: Arc<dyn RecommendationProvider>,
        store: Arc<dyn ListStore>,
        settings: CuratorSettings,
    ) -> Self {
        Self {
            provider,
            store,
            settings,
        }
    }

    pub fn settings(&self) -> &CuratorSettings {
        &self.settings
    }

    /// Regenerates now, then again `refresh_interval` after each run finishes,
    /// until `cancel` fires
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            owner_id = self.settings.owner_id,
            categories = self.settings.categories.len(),
            refresh_interval_secs = self.settings.refresh_interval.as_secs(),
            provider = self.provider.name(),
            "Curated list generator started"
        );

        loop {
            let report = self.regenerate_all(&cancel).await;
            if report.cancelled {
                break;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.settings.refresh_interval) => {}
            }
        }

        tracing::info!("Curated list generator stopped");
    }

    /// Processes every configured category once
    ///
    /// Never fails; per-category results are in the returned report. Cancellation is
    /// checked before each category, so a requested shutdown waits for at most one.
    #[instrument(skip_all, fields(owner_id = self.settings.owner_id))]
    pub async fn regenerate_all(&self, cancel: &CancellationToken) -> RegenerationReport {
        tracing::info!(at = %Utc::now(), "Generating curated lists");

        let mut report = RegenerationReport::default();

        for category in &self.settings.categories {
            if cancel.is_cancelled() {
                tracing::info!(
                    remaining = self.settings.categories.len() - report.attempted(),
                    "Curated list generation cancelled"
                );
                report.cancelled = true;
                break;
            }

            let outcome = self.regenerate_category(category).await;
            report.categories.push(CategoryReport {
                list_name: category.list_name.clone(),
                outcome,
            });
        }

        tracing::info!(
            attempted = report.attempted(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            cancelled = report.cancelled,
            "Curated lists generation completed"
        );

        report
    }

    #[instrument(skip_all, fields(list = %category.list_name))]
    async fn regenerate_category(&self, category: &CuratedCategory) -> CategoryOutcome {
        let movie_ids = match self.fetch_movie_ids(&category.source).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(error = %e, "Recommendation provider failed, list left unchanged");
                return CategoryOutcome::ProviderFailed(e.to_string());
            }
        };

        if movie_ids.is_empty() {
            tracing::warn!("No movies returned, list left unchanged");
            return CategoryOutcome::SkippedEmpty;
        }

        match self
            .upsert_list(&category.list_name, &category.description, movie_ids)
            .await
        {
            Ok(saved) if saved.created => {
                tracing::info!(list_id = saved.list_id, count = saved.item_count, "Created new curated list");
                CategoryOutcome::Created {
                    list_id: saved.list_id,
                    items: saved.item_count,
                }
            }
            Ok(saved) => {
                tracing::info!(list_id = saved.list_id, count = saved.item_count, "Updated existing curated list");
                CategoryOutcome::Updated {
                    list_id: saved.list_id,
                    items: saved.item_count,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save curated list");
                CategoryOutcome::StoreFailed(e.to_string())
            }
        }
    }

    /// Calls the provider for one category, bounded by the provider timeout
    async fn fetch_movie_ids(&self, source: &CategorySource) -> AppResult<Vec<String>> {
        let limit = self.settings.list_size;
        let call = async {
            match source {
                CategorySource::TopRated => self.provider.top_rated(limit).await,
                CategorySource::HiddenGems => self.provider.hidden_gems(limit).await,
                CategorySource::Popular => self.provider.popular(limit).await,
                CategorySource::Genre(genre) => self.provider.by_genre(genre, limit).await,
            }
        };

        tokio::time::timeout(self.settings.provider_timeout, call)
            .await
            .map_err(|_| {
                AppError::Timeout(format!(
                    "{} call exceeded {:?}",
                    SourceLabel(source),
                    self.settings.provider_timeout
                ))
            })?
    }

    /// Creates or updates the curator's list called `name` so that it holds exactly
    /// `movie_ids`, in order
    ///
    /// Repeated ids are dropped (first occurrence wins) before saving.
    pub async fn upsert_list(
        &self,
        name: &str,
        description: &str,
        movie_ids: Vec<String>,
    ) -> AppResult<SavedList> {
        let (movie_ids, dropped) = dedupe_preserving_order(movie_ids);
        if dropped > 0 {
            tracing::warn!(list = %name, dropped, "Provider returned duplicate movie ids");
        }

        self.store
            .save_list_with_items(NewListContents {
                owner_id: self.settings.owner_id,
                name: name.to_string(),
                description: description.to_string(),
                movie_ids,
                generated_at: Utc::now(),
            })
            .await
    }
}

struct SourceLabel<'a>(&'a CategorySource);

impl Display for SourceLabel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            CategorySource::TopRated => write!(f, "top-rated"),
            CategorySource::HiddenGems => write!(f, "hidden-gems"),
            CategorySource::Popular => write!(f, "popular"),
            CategorySource::Genre(genre) => write!(f, "genre/{}", genre),
        }
    }
}
