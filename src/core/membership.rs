use crate::core::cache::EntityCache;
use crate::core::unit_of_work::UnitOfWork;
use crate::domain::model::{Patron, PatronDetails, PatronId};
use crate::domain::ports::{EntityStore, StoreTransaction};
use crate::utils::error::{LibraryError, Result};
use std::sync::Arc;

/// Owns the patron lifecycle, with the same cache policy as the catalog.
pub struct MembershipManager<S: EntityStore> {
    store: Arc<S>,
    cache: Arc<EntityCache<PatronId, Patron>>,
}

impl<S: EntityStore> MembershipManager<S> {
    pub fn new(store: Arc<S>, cache: Arc<EntityCache<PatronId, Patron>>) -> Self {
        Self { store, cache }
    }

    pub fn cache(&self) -> &EntityCache<PatronId, Patron> {
        &self.cache
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Patron>> {
        let mut uow = UnitOfWork::begin(&*self.store).await?;
        let mut patrons = uow.tx().list_patrons().await?;
        patrons.sort_by_key(|patron| patron.id);
        Ok(patrons)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: PatronId) -> Result<Patron> {
        if let Some(patron) = self.cache.get(&id) {
            return Ok(patron);
        }

        let mut uow = UnitOfWork::begin(&*self.store).await?;
        let patron = self.get_in(&mut uow, id).await?;
        uow.commit().await?;
        Ok(patron)
    }

    #[tracing::instrument(skip(self, details))]
    pub async fn add(&self, details: PatronDetails) -> Result<Patron> {
        let mut uow = UnitOfWork::begin(&*self.store).await?;
        let patron = uow.tx().insert_patron(details).await?;
        uow.commit().await?;
        tracing::info!("Patron {} added", patron.id);
        Ok(patron)
    }

    #[tracing::instrument(skip(self, details))]
    pub async fn update(&self, id: PatronId, details: PatronDetails) -> Result<Patron> {
        let mut uow = UnitOfWork::begin(&*self.store).await?;
        let mut patron = self.get_in(&mut uow, id).await?;
        patron.apply_details(details);
        uow.tx().save_patron(&patron).await?;

        let cache = Arc::clone(&self.cache);
        let cached = patron.clone();
        uow.after_commit(move || cache.put(id, cached));
        uow.commit().await?;
        tracing::info!("Patron {} updated", id);
        Ok(patron)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: PatronId) -> Result<()> {
        let mut uow = UnitOfWork::begin(&*self.store).await?;
        self.get_in(&mut uow, id).await?;
        uow.tx().delete_patron(id).await?;

        let cache = Arc::clone(&self.cache);
        uow.after_commit(move || cache.evict(&id));
        uow.commit().await?;
        tracing::info!("Patron {} deleted", id);
        Ok(())
    }

    pub(crate) async fn get_in(
        &self,
        uow: &mut UnitOfWork<S::Tx>,
        id: PatronId,
    ) -> Result<Patron> {
        if let Some(patron) = self.cache.get(&id) {
            return Ok(patron);
        }

        let patron = uow
            .tx()
            .find_patron(id)
            .await?
            .ok_or_else(|| LibraryError::patron_not_found(id))?;
        tracing::debug!("Patron {} loaded from store", id);

        let cache = Arc::clone(&self.cache);
        let cached = patron.clone();
        uow.after_commit(move || cache.put(id, cached));
        Ok(patron)
    }
}
