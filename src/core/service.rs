use crate::adapters::memory_store::MemoryStore;
use crate::config::toml_config::{CacheConfig, LibraryConfig};
use crate::core::borrowing::BorrowingCoordinator;
use crate::core::cache::EntityCache;
use crate::core::catalog::CatalogManager;
use crate::core::membership::MembershipManager;
use crate::domain::ports::EntityStore;
use crate::utils::error::Result;
use std::sync::Arc;

/// The catalog, membership and borrowing components wired over one store.
pub struct LibraryService<S: EntityStore> {
    catalog: Arc<CatalogManager<S>>,
    membership: Arc<MembershipManager<S>>,
    borrowing: Arc<BorrowingCoordinator<S>>,
}

impl<S: EntityStore> LibraryService<S> {
    pub fn new(store: S, cache: &CacheConfig) -> Self {
        let store = Arc::new(store);
        let catalog = Arc::new(CatalogManager::new(
            Arc::clone(&store),
            Arc::new(EntityCache::new("books", cache)),
        ));
        let membership = Arc::new(MembershipManager::new(
            Arc::clone(&store),
            Arc::new(EntityCache::new("patrons", cache)),
        ));
        let borrowing = Arc::new(BorrowingCoordinator::new(
            store,
            Arc::clone(&catalog),
            Arc::clone(&membership),
        ));

        Self {
            catalog,
            membership,
            borrowing,
        }
    }

    pub fn catalog(&self) -> &CatalogManager<S> {
        &self.catalog
    }

    pub fn membership(&self) -> &MembershipManager<S> {
        &self.membership
    }

    pub fn borrowing(&self) -> &BorrowingCoordinator<S> {
        &self.borrowing
    }
}

impl LibraryService<MemoryStore> {
    /// Builds the service over the in-process store, restoring the snapshot
    /// when one is configured.
    pub fn from_config(config: &LibraryConfig) -> Result<Self> {
        let store = match config.snapshot_path() {
            Some(path) => MemoryStore::with_snapshot(path)?,
            None => MemoryStore::new(),
        };
        Ok(Self::new(store, &config.cache))
    }
}
