pub mod borrowing;
pub mod cache;
pub mod catalog;
pub(crate) mod ledger;
pub mod membership;
pub mod service;
pub mod unit_of_work;

#[cfg(test)]
pub(crate) mod test_support {
    use super::catalog::CatalogManager;
    use super::cache::EntityCache;
    use super::membership::MembershipManager;
    use crate::adapters::memory_store::{MemoryStore, MemoryTransaction};
    use crate::config::toml_config::CacheConfig;
    use crate::domain::model::{
        Book, BookDetails, BookId, BorrowingRecord, NewBorrowingRecord, Patron, PatronDetails,
        PatronId,
    };
    use crate::domain::ports::{EntityStore, StoreTransaction};
    use crate::utils::error::{LibraryError, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Memory store that counts opened transactions, to tell cache hits from
    /// store reads.
    #[derive(Default)]
    pub struct CountingStore {
        inner: MemoryStore,
        begins: AtomicUsize,
    }

    impl CountingStore {
        pub fn begins(&self) -> usize {
            self.begins.load(Ordering::SeqCst)
        }
    }

    impl EntityStore for CountingStore {
        type Tx = MemoryTransaction;

        async fn begin(&self) -> Result<MemoryTransaction> {
            self.begins.fetch_add(1, Ordering::SeqCst);
            self.inner.begin().await
        }
    }

    /// Memory store whose transactions cannot open borrowing records, so a
    /// borrow fails after the book has already been staged as borrowed.
    #[derive(Default)]
    pub struct RecordlessStore {
        inner: MemoryStore,
    }

    impl EntityStore for RecordlessStore {
        type Tx = RecordlessTransaction;

        async fn begin(&self) -> Result<RecordlessTransaction> {
            Ok(RecordlessTransaction(self.inner.begin().await?))
        }
    }

    pub struct RecordlessTransaction(MemoryTransaction);

    #[async_trait]
    impl StoreTransaction for RecordlessTransaction {
        async fn list_books(&mut self) -> Result<Vec<Book>> {
            self.0.list_books().await
        }

        async fn find_book(&mut self, id: BookId) -> Result<Option<Book>> {
            self.0.find_book(id).await
        }

        async fn insert_book(&mut self, details: BookDetails) -> Result<Book> {
            self.0.insert_book(details).await
        }

        async fn save_book(&mut self, book: &Book) -> Result<()> {
            self.0.save_book(book).await
        }

        async fn delete_book(&mut self, id: BookId) -> Result<()> {
            self.0.delete_book(id).await
        }

        async fn list_patrons(&mut self) -> Result<Vec<Patron>> {
            self.0.list_patrons().await
        }

        async fn find_patron(&mut self, id: PatronId) -> Result<Option<Patron>> {
            self.0.find_patron(id).await
        }

        async fn insert_patron(&mut self, details: PatronDetails) -> Result<Patron> {
            self.0.insert_patron(details).await
        }

        async fn save_patron(&mut self, patron: &Patron) -> Result<()> {
            self.0.save_patron(patron).await
        }

        async fn delete_patron(&mut self, id: PatronId) -> Result<()> {
            self.0.delete_patron(id).await
        }

        async fn insert_record(&mut self, _record: NewBorrowingRecord) -> Result<BorrowingRecord> {
            Err(LibraryError::StoreError {
                message: "record table unavailable".to_string(),
            })
        }

        async fn save_record(&mut self, record: &BorrowingRecord) -> Result<()> {
            self.0.save_record(record).await
        }

        async fn find_open_record(
            &mut self,
            book_id: BookId,
            patron_id: PatronId,
        ) -> Result<Option<BorrowingRecord>> {
            self.0.find_open_record(book_id, patron_id).await
        }

        async fn list_records(&mut self) -> Result<Vec<BorrowingRecord>> {
            self.0.list_records().await
        }

        async fn commit(&mut self) -> Result<()> {
            self.0.commit().await
        }
    }

    pub fn cache_config() -> CacheConfig {
        CacheConfig {
            ttl_seconds: 600,
            max_entries: 100,
        }
    }

    pub fn catalog<S: EntityStore>(store: &Arc<S>) -> CatalogManager<S> {
        CatalogManager::new(
            Arc::clone(store),
            Arc::new(EntityCache::new("books", &cache_config())),
        )
    }

    pub fn membership<S: EntityStore>(store: &Arc<S>) -> MembershipManager<S> {
        MembershipManager::new(
            Arc::clone(store),
            Arc::new(EntityCache::new("patrons", &cache_config())),
        )
    }

    pub fn book_details(title: &str, isbn: &str) -> BookDetails {
        BookDetails {
            title: title.to_string(),
            author: "Frank Herbert".to_string(),
            publication_year: 1965,
            isbn: isbn.to_string(),
        }
    }

    pub fn patron_details(name: &str) -> PatronDetails {
        PatronDetails {
            name: name.to_string(),
            phone_number: "0123456789".to_string(),
            email_address: "reader@example.com".to_string(),
        }
    }
}
