use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            pub fn value(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(BookId);
entity_id!(PatronId);
entity_id!(RecordId);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Book,
    Patron,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Book => write!(f, "Book"),
            EntityKind::Patron => write!(f, "Patron"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub isbn: String,
    pub borrowed: bool,
}

/// Informational fields of a book. The `borrowed` flag is owned by the
/// borrowing workflow and is never part of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetails {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub isbn: String,
}

impl Book {
    pub fn from_details(id: BookId, details: BookDetails) -> Self {
        Self {
            id,
            title: details.title,
            author: details.author,
            publication_year: details.publication_year,
            isbn: details.isbn,
            borrowed: false,
        }
    }

    pub fn apply_details(&mut self, details: BookDetails) {
        self.title = details.title;
        self.author = details.author;
        self.publication_year = details.publication_year;
        self.isbn = details.isbn;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patron {
    pub id: PatronId,
    pub name: String,
    pub phone_number: String,
    pub email_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatronDetails {
    pub name: String,
    pub phone_number: String,
    pub email_address: String,
}

impl Patron {
    pub fn from_details(id: PatronId, details: PatronDetails) -> Self {
        Self {
            id,
            name: details.name,
            phone_number: details.phone_number,
            email_address: details.email_address,
        }
    }

    pub fn apply_details(&mut self, details: PatronDetails) {
        self.name = details.name;
        self.phone_number = details.phone_number;
        self.email_address = details.email_address;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowingRecord {
    pub id: RecordId,
    pub book_id: BookId,
    pub patron_id: PatronId,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBorrowingRecord {
    pub book_id: BookId,
    pub patron_id: PatronId,
    pub borrowed_at: DateTime<Utc>,
}

impl BorrowingRecord {
    pub fn from_new(id: RecordId, record: NewBorrowingRecord) -> Self {
        Self {
            id,
            book_id: record.book_id,
            patron_id: record.patron_id,
            borrowed_at: record.borrowed_at,
            returned_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.returned_at.is_none()
    }
}
