use crate::core::cache::EntityCache;
use crate::core::unit_of_work::UnitOfWork;
use crate::domain::model::{Book, BookDetails, BookId};
use crate::domain::ports::{EntityStore, StoreTransaction};
use crate::utils::error::{LibraryError, Result};
use std::sync::Arc;

/// Owns the book lifecycle. Single-id reads go through the book cache and
/// every write is reflected there once its transaction commits.
pub struct CatalogManager<S: EntityStore> {
    store: Arc<S>,
    cache: Arc<EntityCache<BookId, Book>>,
}

impl<S: EntityStore> CatalogManager<S> {
    pub fn new(store: Arc<S>, cache: Arc<EntityCache<BookId, Book>>) -> Self {
        Self { store, cache }
    }

    pub fn cache(&self) -> &EntityCache<BookId, Book> {
        &self.cache
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Book>> {
        let mut uow = UnitOfWork::begin(&*self.store).await?;
        let mut books = uow.tx().list_books().await?;
        books.sort_by_key(|book| book.id);
        Ok(books)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: BookId) -> Result<Book> {
        if let Some(book) = self.cache.get(&id) {
            return Ok(book);
        }

        let mut uow = UnitOfWork::begin(&*self.store).await?;
        let book = self.get_in(&mut uow, id).await?;
        uow.commit().await?;
        Ok(book)
    }

    /// Persists a new book. A taken ISBN is reported by the store's unique
    /// index at write time.
    #[tracing::instrument(skip(self, details), fields(isbn = %details.isbn))]
    pub async fn add(&self, details: BookDetails) -> Result<Book> {
        let mut uow = UnitOfWork::begin(&*self.store).await?;
        let book = uow.tx().insert_book(details).await?;
        uow.commit().await?;
        tracing::info!("Book {} added", book.id);
        Ok(book)
    }

    /// Overwrites the informational fields; `borrowed` is left as stored.
    #[tracing::instrument(skip(self, details))]
    pub async fn update(&self, id: BookId, details: BookDetails) -> Result<Book> {
        let mut uow = UnitOfWork::begin(&*self.store).await?;
        let mut book = self.get_in(&mut uow, id).await?;
        book.apply_details(details);
        self.save_in(&mut uow, &book).await?;
        uow.commit().await?;
        tracing::info!("Book {} updated", id);
        Ok(book)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: BookId) -> Result<()> {
        let mut uow = UnitOfWork::begin(&*self.store).await?;
        let book = self.get_in(&mut uow, id).await?;
        if book.borrowed {
            tracing::warn!("Deleting book {} while it is borrowed", id);
        }
        uow.tx().delete_book(id).await?;

        let cache = Arc::clone(&self.cache);
        uow.after_commit(move || cache.evict(&id));
        uow.commit().await?;
        tracing::info!("Book {} deleted", id);
        Ok(())
    }

    /// Reads a book inside a running unit of work. A miss queues a cache fill
    /// that lands only if the unit commits.
    pub(crate) async fn get_in(
        &self,
        uow: &mut UnitOfWork<S::Tx>,
        id: BookId,
    ) -> Result<Book> {
        if let Some(book) = self.cache.get(&id) {
            return Ok(book);
        }

        let book = uow
            .tx()
            .find_book(id)
            .await?
            .ok_or_else(|| LibraryError::book_not_found(id))?;
        tracing::debug!("Book {} loaded from store", id);

        let cache = Arc::clone(&self.cache);
        let cached = book.clone();
        uow.after_commit(move || cache.put(id, cached));
        Ok(book)
    }

    /// Stores `book` as a full replacement and writes it through to the cache
    /// on commit.
    pub(crate) async fn save_in(&self, uow: &mut UnitOfWork<S::Tx>, book: &Book) -> Result<()> {
        uow.tx().save_book(book).await?;

        let cache = Arc::clone(&self.cache);
        let cached = book.clone();
        uow.after_commit(move || cache.put(cached.id, cached));
        Ok(())
    }
}
