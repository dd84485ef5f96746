use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod identity;

pub use identity::Identity;

// ============================================================================
// Movie Lists
// ============================================================================

/// A movie list together with its ordered items
///
/// Curated lists are ordinary `movie_lists` rows owned by the curator identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemList {
    pub list_id: i32,
    pub owner_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
    pub items: Vec<ListItem>,
}

impl SystemList {
    /// Movie ids in list order
    pub fn movie_ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.movie_id.as_str()).collect()
    }
}

/// One movie inside a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct ListItem {
    #[serde(skip_serializing)]
    pub list_id: i32,
    pub movie_id: String,
    /// 0-based position in the order the recommendation provider returned
    pub position: i32,
    pub date_added: DateTime<Utc>,
}

/// `movie_lists` row without its items
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MovieListRow {
    pub list_id: i32,
    pub owner_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
}

impl MovieListRow {
    pub fn with_items(self, items: Vec<ListItem>) -> SystemList {
        SystemList {
            list_id: self.list_id,
            owner_id: self.owner_id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            is_public: self.is_public,
            items,
        }
    }
}

/// Desired contents of a curated list after one regeneration
#[derive(Debug, Clone, PartialEq)]
pub struct NewListContents {
    pub owner_id: i32,
    pub name: String,
    pub description: String,
    /// Already deduplicated, in provider order
    pub movie_ids: Vec<String>,
    /// Stamped as `date_added` on every item, and as `created_at` for new lists
    pub generated_at: DateTime<Utc>,
}

/// Result of persisting a curated list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedList {
    pub list_id: i32,
    /// True when the list did not exist before this save
    pub created: bool,
    pub item_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(list_id: i32, movie_id: &str, position: i32) -> ListItem {
        ListItem {
            list_id,
            movie_id: movie_id.to_string(),
            position,
            date_added: Utc::now(),
        }
    }

    #[test]
    fn test_row_with_items_keeps_item_order() {
        let row = MovieListRow {
            list_id: 7,
            owner_id: 1,
            name: "Hidden Gems".to_string(),
            description: Some("Highly-rated films that deserve more attention".to_string()),
            created_at: Utc::now(),
            is_public: true,
        };

        let list = row.with_items(vec![item(7, "s3", 0), item(7, "s1", 1), item(7, "s2", 2)]);

        assert_eq!(list.list_id, 7);
        assert_eq!(list.movie_ids(), vec!["s3", "s1", "s2"]);
    }

    #[test]
    fn test_list_item_serialization_hides_list_id() {
        let json = serde_json::to_value(item(7, "s10", 0)).unwrap();

        assert!(json.get("list_id").is_none());
        assert_eq!(json["movie_id"], "s10");
        assert_eq!(json["position"], 0);
    }
}
