// Borrowing-record ledger: open, close and query loans inside a unit of work.

use crate::core::unit_of_work::UnitOfWork;
use crate::domain::model::{BookId, BorrowingRecord, NewBorrowingRecord, PatronId};
use crate::domain::ports::StoreTransaction;
use crate::utils::error::{LibraryError, Result};
use chrono::Utc;

pub(crate) async fn open_record<T: StoreTransaction>(
    uow: &mut UnitOfWork<T>,
    record: NewBorrowingRecord,
) -> Result<BorrowingRecord> {
    let record = uow.tx().insert_record(record).await?;
    tracing::debug!(
        "Opened borrowing record {} (book {}, patron {})",
        record.id,
        record.book_id,
        record.patron_id
    );
    Ok(record)
}

/// Stamps the open record for `(book_id, patron_id)` as returned.
pub(crate) async fn close_record<T: StoreTransaction>(
    uow: &mut UnitOfWork<T>,
    book_id: BookId,
    patron_id: PatronId,
) -> Result<BorrowingRecord> {
    let mut record = uow
        .tx()
        .find_open_record(book_id, patron_id)
        .await?
        .ok_or(LibraryError::BorrowingRecordNotFound { book_id, patron_id })?;

    // never earlier than the borrow, even if the wall clock stepped back
    record.returned_at = Some(Utc::now().max(record.borrowed_at));
    uow.tx().save_record(&record).await?;
    tracing::debug!("Closed borrowing record {}", record.id);
    Ok(record)
}

pub(crate) async fn open_records<T: StoreTransaction>(
    uow: &mut UnitOfWork<T>,
) -> Result<Vec<BorrowingRecord>> {
    let mut records: Vec<_> = uow
        .tx()
        .list_records()
        .await?
        .into_iter()
        .filter(BorrowingRecord::is_open)
        .collect();
    records.sort_by_key(|r| (r.borrowed_at, r.id));
    Ok(records)
}

pub(crate) async fn history_for_book<T: StoreTransaction>(
    uow: &mut UnitOfWork<T>,
    book_id: BookId,
) -> Result<Vec<BorrowingRecord>> {
    let mut records: Vec<_> = uow
        .tx()
        .list_records()
        .await?
        .into_iter()
        .filter(|r| r.book_id == book_id)
        .collect();
    records.sort_by_key(|r| (r.borrowed_at, r.id));
    Ok(records)
}
