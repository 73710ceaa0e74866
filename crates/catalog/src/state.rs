//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::CatalogStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and gives handlers access to
/// the catalog store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn CatalogStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `store` - Backend holding authors and books
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store }),
        }
    }

    /// Get a reference to the catalog store.
    #[must_use]
    pub fn store(&self) -> &dyn CatalogStore {
        self.inner.store.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryCatalogStore;
    use crate::models::AuthorInput;

    #[tokio::test]
    async fn test_clones_share_one_store() {
        let state = AppState::new(Arc::new(MemoryCatalogStore::new()));
        let clone = state.clone();

        let author = clone
            .store()
            .create_author(&AuthorInput {
                first_name: "Jane".to_string(),
                family_name: "Austen".to_string(),
                date_of_birth: None,
                date_of_death: None,
            })
            .await
            .unwrap();

        assert_eq!(state.store().get_author(author.id).await.unwrap(), Some(author));
    }
}
