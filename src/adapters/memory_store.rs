use crate::domain::model::{
    Book, BookDetails, BookId, BorrowingRecord, NewBorrowingRecord, Patron, PatronDetails,
    PatronId, RecordId,
};
use crate::domain::ports::{EntityStore, StoreTransaction};
use crate::utils::error::{LibraryError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, Default)]
struct Tables {
    books: HashMap<BookId, Book>,
    isbn_index: HashMap<String, BookId>,
    patrons: HashMap<PatronId, Patron>,
    records: HashMap<RecordId, BorrowingRecord>,
    sequences: Sequences,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Sequences {
    book: u64,
    patron: u64,
    record: u64,
}

/// On-disk layout of a snapshot file.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    books: Vec<Book>,
    patrons: Vec<Patron>,
    records: Vec<BorrowingRecord>,
    sequences: Sequences,
}

impl Tables {
    fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut tables = Tables {
            sequences: snapshot.sequences,
            ..Default::default()
        };
        for book in snapshot.books {
            if tables.isbn_index.insert(book.isbn.clone(), book.id).is_some() {
                return Err(LibraryError::StoreError {
                    message: format!("snapshot holds ISBN {} twice", book.isbn),
                });
            }
            tables.books.insert(book.id, book);
        }
        for patron in snapshot.patrons {
            tables.patrons.insert(patron.id, patron);
        }
        for record in snapshot.records {
            tables.records.insert(record.id, record);
        }
        tables.raise_sequences();
        Ok(tables)
    }

    /// Keeps every sequence at or above the highest id already stored, so a
    /// hand-edited or stale snapshot cannot make an insert reuse an id.
    fn raise_sequences(&mut self) {
        let highest_book = self.books.keys().map(|id| id.value()).max().unwrap_or(0);
        let highest_patron = self.patrons.keys().map(|id| id.value()).max().unwrap_or(0);
        let highest_record = self.records.keys().map(|id| id.value()).max().unwrap_or(0);

        let sequences = &mut self.sequences;
        if sequences.book < highest_book
            || sequences.patron < highest_patron
            || sequences.record < highest_record
        {
            tracing::warn!(
                "Snapshot sequences behind stored ids, raising to books {}, patrons {}, records {}",
                highest_book.max(sequences.book),
                highest_patron.max(sequences.patron),
                highest_record.max(sequences.record)
            );
        }
        sequences.book = sequences.book.max(highest_book);
        sequences.patron = sequences.patron.max(highest_patron);
        sequences.record = sequences.record.max(highest_record);
    }

    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            books: self.books.values().cloned().collect(),
            patrons: self.patrons.values().cloned().collect(),
            records: self.records.values().cloned().collect(),
            sequences: self.sequences.clone(),
        }
    }
}

/// Process-local entity store.
///
/// A single lock guards all tables, so transactions run one at a time
/// (serializable isolation). Writes are staged on a copy of the tables and
/// swapped in on commit. With a snapshot path, every commit is also written
/// to disk as JSON before it becomes visible.
///
/// Both the staging copy and the snapshot cover the whole data set, and the
/// ledger keeps every returned loan. A write transaction therefore costs time
/// linear in the total number of books, patrons and records, all of it spent
/// under the lock. That suits a single branch; larger collections need a
/// store that stages row-level changes.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            snapshot_path: None,
        }
    }

    /// Opens a store persisted at `path`, loading the snapshot if one exists.
    pub fn with_snapshot<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let tables = if path.exists() {
            let data = fs::read(&path)?;
            let snapshot: Snapshot = serde_json::from_slice(&data)?;
            tracing::info!(
                "Loaded snapshot from {} ({} books, {} patrons, {} records)",
                path.display(),
                snapshot.books.len(),
                snapshot.patrons.len(),
                snapshot.records.len()
            );
            Tables::from_snapshot(snapshot)?
        } else {
            tracing::info!("No snapshot at {}, starting empty", path.display());
            Tables::default()
        };

        Ok(Self {
            tables: Arc::new(Mutex::new(tables)),
            snapshot_path: Some(path),
        })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore for MemoryStore {
    type Tx = MemoryTransaction;

    async fn begin(&self) -> Result<MemoryTransaction> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        Ok(MemoryTransaction {
            guard,
            staged: None,
            snapshot_path: self.snapshot_path.clone(),
        })
    }
}

pub struct MemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    staged: Option<Tables>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryTransaction {
    fn view(&self) -> &Tables {
        match &self.staged {
            Some(staged) => staged,
            None => &*self.guard,
        }
    }

    fn stage(&mut self) -> &mut Tables {
        let committed = &self.guard;
        self.staged.get_or_insert_with(|| (**committed).clone())
    }
}

fn write_snapshot(path: &Path, tables: &Tables) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let data = serde_json::to_vec(&tables.to_snapshot())?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn list_books(&mut self) -> Result<Vec<Book>> {
        Ok(self.view().books.values().cloned().collect())
    }

    async fn find_book(&mut self, id: BookId) -> Result<Option<Book>> {
        Ok(self.view().books.get(&id).cloned())
    }

    async fn insert_book(&mut self, details: BookDetails) -> Result<Book> {
        let tables = self.stage();
        if tables.isbn_index.contains_key(&details.isbn) {
            return Err(LibraryError::DuplicateIsbn {
                isbn: details.isbn,
            });
        }
        tables.sequences.book += 1;
        let book = Book::from_details(BookId::new(tables.sequences.book), details);
        tables.isbn_index.insert(book.isbn.clone(), book.id);
        tables.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn save_book(&mut self, book: &Book) -> Result<()> {
        let tables = self.stage();
        let previous_isbn = match tables.books.get(&book.id) {
            Some(existing) => existing.isbn.clone(),
            None => return Err(LibraryError::book_not_found(book.id)),
        };
        if let Some(owner) = tables.isbn_index.get(&book.isbn) {
            if *owner != book.id {
                return Err(LibraryError::DuplicateIsbn {
                    isbn: book.isbn.clone(),
                });
            }
        }
        tables.isbn_index.remove(&previous_isbn);
        tables.isbn_index.insert(book.isbn.clone(), book.id);
        tables.books.insert(book.id, book.clone());
        Ok(())
    }

    async fn delete_book(&mut self, id: BookId) -> Result<()> {
        let tables = self.stage();
        let book = tables
            .books
            .remove(&id)
            .ok_or_else(|| LibraryError::book_not_found(id))?;
        tables.isbn_index.remove(&book.isbn);
        Ok(())
    }

    async fn list_patrons(&mut self) -> Result<Vec<Patron>> {
        Ok(self.view().patrons.values().cloned().collect())
    }

    async fn find_patron(&mut self, id: PatronId) -> Result<Option<Patron>> {
        Ok(self.view().patrons.get(&id).cloned())
    }

    async fn insert_patron(&mut self, details: PatronDetails) -> Result<Patron> {
        let tables = self.stage();
        tables.sequences.patron += 1;
        let patron = Patron::from_details(PatronId::new(tables.sequences.patron), details);
        tables.patrons.insert(patron.id, patron.clone());
        Ok(patron)
    }

    async fn save_patron(&mut self, patron: &Patron) -> Result<()> {
        let tables = self.stage();
        if !tables.patrons.contains_key(&patron.id) {
            return Err(LibraryError::patron_not_found(patron.id));
        }
        tables.patrons.insert(patron.id, patron.clone());
        Ok(())
    }

    async fn delete_patron(&mut self, id: PatronId) -> Result<()> {
        self.stage()
            .patrons
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| LibraryError::patron_not_found(id))
    }

    async fn insert_record(&mut self, record: NewBorrowingRecord) -> Result<BorrowingRecord> {
        let tables = self.stage();
        tables.sequences.record += 1;
        let record = BorrowingRecord::from_new(RecordId::new(tables.sequences.record), record);
        tables.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn save_record(&mut self, record: &BorrowingRecord) -> Result<()> {
        let tables = self.stage();
        if !tables.records.contains_key(&record.id) {
            return Err(LibraryError::StoreError {
                message: format!("borrowing record {} does not exist", record.id),
            });
        }
        tables.records.insert(record.id, record.clone());
        Ok(())
    }

    async fn find_open_record(
        &mut self,
        book_id: BookId,
        patron_id: PatronId,
    ) -> Result<Option<BorrowingRecord>> {
        Ok(self
            .view()
            .records
            .values()
            .find(|r| r.book_id == book_id && r.patron_id == patron_id && r.is_open())
            .cloned())
    }

    async fn list_records(&mut self) -> Result<Vec<BorrowingRecord>> {
        Ok(self.view().records.values().cloned().collect())
    }

    async fn commit(&mut self) -> Result<()> {
        if let Some(staged) = self.staged.take() {
            if let Some(path) = &self.snapshot_path {
                write_snapshot(path, &staged)?;
            }
            *self.guard = staged;
        }
        Ok(())
    }
}
