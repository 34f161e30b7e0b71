use crate::core::catalog::CatalogManager;
use crate::core::ledger;
use crate::core::membership::MembershipManager;
use crate::core::unit_of_work::UnitOfWork;
use crate::domain::model::{BookId, BorrowingRecord, NewBorrowingRecord, PatronId};
use crate::domain::ports::EntityStore;
use crate::utils::error::{LibraryError, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

/// Runs the borrow/return state machine of a book:
/// `Available --borrow--> Borrowed --return--> Available`.
///
/// Each call is a single unit of work. The store transaction is exclusive, so
/// the availability check and the flag flip cannot interleave with another
/// borrow of the same book. Either the flag and the ledger both change, or
/// neither does; cache updates follow only a successful commit.
pub struct BorrowingCoordinator<S: EntityStore> {
    store: Arc<S>,
    catalog: Arc<CatalogManager<S>>,
    membership: Arc<MembershipManager<S>>,
}

impl<S: EntityStore> BorrowingCoordinator<S> {
    pub fn new(
        store: Arc<S>,
        catalog: Arc<CatalogManager<S>>,
        membership: Arc<MembershipManager<S>>,
    ) -> Self {
        Self {
            store,
            catalog,
            membership,
        }
    }

    /// Lends `book_id` to `patron_id`.
    ///
    /// Availability is checked before the patron is looked up, so a borrowed
    /// book reports `AlreadyBorrowed` even for an unknown patron.
    #[tracing::instrument(skip(self))]
    pub async fn borrow(&self, book_id: BookId, patron_id: PatronId) -> Result<BorrowingRecord> {
        let started = Instant::now();
        let mut uow = UnitOfWork::begin(&*self.store).await?;

        let mut book = self.catalog.get_in(&mut uow, book_id).await?;
        if book.borrowed {
            tracing::warn!("Book {} is already borrowed", book_id);
            return Err(LibraryError::AlreadyBorrowed { book_id });
        }

        let patron = self.membership.get_in(&mut uow, patron_id).await?;
        let loan = NewBorrowingRecord {
            book_id: book.id,
            patron_id: patron.id,
            borrowed_at: Utc::now(),
        };

        book.borrowed = true;
        self.catalog.save_in(&mut uow, &book).await?;
        let record = ledger::open_record(&mut uow, loan).await?;
        uow.commit().await?;

        tracing::info!(
            "Book {} borrowed by patron {} (record {}, {:?})",
            book_id,
            patron_id,
            record.id,
            started.elapsed()
        );
        Ok(record)
    }

    /// Closes the open loan of `book_id` by `patron_id` and makes the book
    /// available again.
    #[tracing::instrument(skip(self))]
    pub async fn return_book(
        &self,
        book_id: BookId,
        patron_id: PatronId,
    ) -> Result<BorrowingRecord> {
        let started = Instant::now();
        let mut uow = UnitOfWork::begin(&*self.store).await?;

        let record = ledger::close_record(&mut uow, book_id, patron_id).await?;

        let mut book = self.catalog.get_in(&mut uow, record.book_id).await?;
        if !book.borrowed {
            // The ledger had an open loan for a book flagged available. The
            // return still goes through; the mismatch is only reported.
            tracing::warn!(
                "Book {} was not flagged as borrowed but had open record {}",
                book_id,
                record.id
            );
        }
        book.borrowed = false;
        self.catalog.save_in(&mut uow, &book).await?;
        uow.commit().await?;

        tracing::info!(
            "Book {} returned by patron {} (record {}, {:?})",
            book_id,
            patron_id,
            record.id,
            started.elapsed()
        );
        Ok(record)
    }

    /// All loans still outstanding, oldest first.
    pub async fn open_loans(&self) -> Result<Vec<BorrowingRecord>> {
        let mut uow = UnitOfWork::begin(&*self.store).await?;
        ledger::open_records(&mut uow).await
    }

    /// Every loan of `book_id`, returned or not, oldest first.
    pub async fn history_for_book(&self, book_id: BookId) -> Result<Vec<BorrowingRecord>> {
        let mut uow = UnitOfWork::begin(&*self.store).await?;
        ledger::history_for_book(&mut uow, book_id).await
    }
}
