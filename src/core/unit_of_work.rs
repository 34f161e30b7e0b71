use crate::domain::ports::{EntityStore, StoreTransaction};
use crate::utils::error::Result;

type Effect = Box<dyn FnOnce() + Send>;

/// A store transaction plus the cache updates that depend on it.
///
/// Cache effects are queued while the transaction runs and applied in order
/// after the store commit succeeds, before the transaction's lock is
/// released. Dropping an uncommitted unit discards both.
pub struct UnitOfWork<T: StoreTransaction> {
    tx: T,
    after_commit: Vec<Effect>,
}

impl<T: StoreTransaction> UnitOfWork<T> {
    pub async fn begin<S>(store: &S) -> Result<Self>
    where
        S: EntityStore<Tx = T>,
    {
        Ok(Self {
            tx: store.begin().await?,
            after_commit: Vec::new(),
        })
    }

    pub fn tx(&mut self) -> &mut T {
        &mut self.tx
    }

    pub fn after_commit<F>(&mut self, effect: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.after_commit.push(Box::new(effect));
    }

    pub async fn commit(mut self) -> Result<()> {
        self.tx.commit().await?;
        for effect in self.after_commit.drain(..) {
            effect();
        }
        Ok(())
    }
}
