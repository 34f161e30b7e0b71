use crate::domain::model::{
    Book, BookDetails, BookId, BorrowingRecord, NewBorrowingRecord, Patron, PatronDetails,
    PatronId,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Durable storage for books, patrons and borrowing records.
///
/// Every access goes through a transaction. A transaction that is dropped
/// without `commit` leaves no trace in the store.
pub trait EntityStore: Send + Sync + 'static {
    type Tx: StoreTransaction + 'static;

    /// Opens a transaction. Concurrent transactions are serialized: the
    /// returned handle sees no interleaved writes until it is dropped.
    fn begin(&self) -> impl std::future::Future<Output = Result<Self::Tx>> + Send;
}

#[async_trait]
pub trait StoreTransaction: Send {
    async fn list_books(&mut self) -> Result<Vec<Book>>;
    async fn find_book(&mut self, id: BookId) -> Result<Option<Book>>;
    /// Fails with `DuplicateIsbn` when the ISBN index already holds the value.
    async fn insert_book(&mut self, details: BookDetails) -> Result<Book>;
    /// Replaces the stored book wholesale. Fails with `DuplicateIsbn` when the
    /// new ISBN belongs to another book.
    async fn save_book(&mut self, book: &Book) -> Result<()>;
    async fn delete_book(&mut self, id: BookId) -> Result<()>;

    async fn list_patrons(&mut self) -> Result<Vec<Patron>>;
    async fn find_patron(&mut self, id: PatronId) -> Result<Option<Patron>>;
    async fn insert_patron(&mut self, details: PatronDetails) -> Result<Patron>;
    async fn save_patron(&mut self, patron: &Patron) -> Result<()>;
    async fn delete_patron(&mut self, id: PatronId) -> Result<()>;

    async fn insert_record(&mut self, record: NewBorrowingRecord) -> Result<BorrowingRecord>;
    async fn save_record(&mut self, record: &BorrowingRecord) -> Result<()>;
    /// The record for `(book_id, patron_id)` whose return timestamp is unset.
    async fn find_open_record(
        &mut self,
        book_id: BookId,
        patron_id: PatronId,
    ) -> Result<Option<BorrowingRecord>>;
    async fn list_records(&mut self) -> Result<Vec<BorrowingRecord>>;

    /// Publishes staged writes. The transaction stays exclusive until dropped.
    async fn commit(&mut self) -> Result<()>;
}
