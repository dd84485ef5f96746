use crate::{
    error::AppResult,
    models::{Identity, NewListContents, SavedList, SystemList},
};

/// Persistence operations needed by the curated list generator and the list API
///
/// Implementations must make `save_list_with_items` atomic: readers either see the
/// previous items or the new ones, never an empty or mixed list.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ListStore: Send + Sync {
    /// Find a list by its natural key, including its items
    ///
    /// Read-side lookup only. `save_list_with_items` resolves the same key itself
    /// under its own lock, so callers never need this before saving.
    async fn find_system_list(&self, owner_id: i32, name: &str) -> AppResult<Option<SystemList>>;

    /// Look up an identity by id
    async fn find_identity(&self, user_id: i32) -> AppResult<Option<Identity>>;

    /// First identity (lowest id) carrying the given role
    async fn find_first_admin_identity(&self, role: &str) -> AppResult<Option<Identity>>;

    /// Create or update the list keyed by `(owner_id, name)` and replace all of its items
    async fn save_list_with_items(&self, contents: NewListContents) -> AppResult<SavedList>;

    /// Public lists of one owner with their items, ordered by name
    async fn lists_by_owner(&self, owner_id: i32) -> AppResult<Vec<SystemList>>;

    /// Find a list by id, including its items
    async fn find_list(&self, list_id: i32) -> AppResult<Option<SystemList>>;
}
