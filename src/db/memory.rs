//! In-memory `ListStore` used by unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::{
    db::ListStore,
    error::{AppError, AppResult},
    models::{Identity, ListItem, NewListContents, SavedList, SystemList},
};

#[derive(Default)]
struct State {
    lists: Vec<SystemList>,
    identities: Vec<Identity>,
    next_list_id: i32,
    failing_lists: HashSet<String>,
    save_calls: Vec<String>,
}

#[derive(Default)]
pub struct InMemoryListStore {
    state: Mutex<State>,
}

impl InMemoryListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identities(identities: Vec<Identity>) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().identities = identities;
        store
    }

    /// Make every save of the named list fail with a database-style error
    pub fn fail_saves_for(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_lists
            .insert(name.to_string());
    }

    pub fn lists(&self) -> Vec<SystemList> {
        self.state.lock().unwrap().lists.clone()
    }

    pub fn list_named(&self, name: &str) -> Option<SystemList> {
        self.lists().into_iter().find(|l| l.name == name)
    }

    /// Names passed to `save_list_with_items`, in call order
    pub fn save_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().save_calls.clone()
    }
}

#[async_trait::async_trait]
impl ListStore for InMemoryListStore {
    async fn find_system_list(&self, owner_id: i32, name: &str) -> AppResult<Option<SystemList>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .lists
            .iter()
            .find(|l| l.owner_id == owner_id && l.name == name)
            .cloned())
    }

    async fn find_identity(&self, user_id: i32) -> AppResult<Option<Identity>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .identities
            .iter()
            .find(|i| i.user_id == user_id)
            .cloned())
    }

    async fn find_first_admin_identity(&self, role: &str) -> AppResult<Option<Identity>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .identities
            .iter()
            .filter(|i| i.has_role(role))
            .min_by_key(|i| i.user_id)
            .cloned())
    }

    async fn save_list_with_items(&self, contents: NewListContents) -> AppResult<SavedList> {
        let mut state = self.state.lock().unwrap();
        state.save_calls.push(contents.name.clone());

        if state.failing_lists.contains(&contents.name) {
            return Err(AppError::Internal(format!(
                "simulated store failure for {}",
                contents.name
            )));
        }

        let existing = state
            .lists
            .iter()
            .position(|l| l.owner_id == contents.owner_id && l.name == contents.name);

        let (index, created) = match existing {
            Some(index) => (index, false),
            None => {
                state.next_list_id += 1;
                let list_id = state.next_list_id;
                state.lists.push(SystemList {
                    list_id,
                    owner_id: contents.owner_id,
                    name: contents.name.clone(),
                    description: None,
                    created_at: contents.generated_at,
                    is_public: true,
                    items: Vec::new(),
                });
                (state.lists.len() - 1, true)
            }
        };

        let list = &mut state.lists[index];
        let list_id = list.list_id;
        list.description = Some(contents.description);
        list.items = contents
            .movie_ids
            .iter()
            .enumerate()
            .map(|(position, movie_id)| ListItem {
                list_id,
                movie_id: movie_id.clone(),
                position: position as i32,
                date_added: contents.generated_at,
            })
            .collect();

        Ok(SavedList {
            list_id,
            created,
            item_count: list.items.len(),
        })
    }

    async fn lists_by_owner(&self, owner_id: i32) -> AppResult<Vec<SystemList>> {
        let state = self.state.lock().unwrap();
        let mut lists: Vec<SystemList> = state
            .lists
            .iter()
            .filter(|l| l.owner_id == owner_id && l.is_public)
            .cloned()
            .collect();
        lists.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(lists)
    }

    async fn find_list(&self, list_id: i32) -> AppResult<Option<SystemList>> {
        let state = self.state.lock().unwrap();
        Ok(state.lists.iter().find(|l| l.list_id == list_id).cloned())
    }
}
