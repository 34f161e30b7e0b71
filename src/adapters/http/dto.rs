use crate::domain::model::{Book, BookDetails, BorrowingRecord, Patron, PatronDetails};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub isbn: String,
}

impl Validate for BookRequest {
    fn validate(&self) -> Result<()> {
        validation::validate_title("title", &self.title)?;
        validation::validate_person_name("author", &self.author)?;
        validation::validate_publication_year("publicationYear", self.publication_year)?;
        validation::validate_isbn("isbn", &self.isbn)
    }
}

impl From<BookRequest> for BookDetails {
    fn from(request: BookRequest) -> Self {
        Self {
            title: request.title,
            author: request.author,
            publication_year: request.publication_year,
            isbn: request.isbn,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub publication_year: i32,
    pub isbn: String,
    pub is_borrowed: bool,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.value(),
            title: book.title,
            author: book.author,
            publication_year: book.publication_year,
            isbn: book.isbn,
            is_borrowed: book.borrowed,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatronRequest {
    pub name: String,
    pub phone_number: String,
    pub email_address: String,
}

impl Validate for PatronRequest {
    fn validate(&self) -> Result<()> {
        validation::validate_person_name("name", &self.name)?;
        validation::validate_phone_number("phoneNumber", &self.phone_number)?;
        validation::validate_email("emailAddress", &self.email_address)
    }
}

impl From<PatronRequest> for PatronDetails {
    fn from(request: PatronRequest) -> Self {
        Self {
            name: request.name,
            phone_number: request.phone_number,
            email_address: request.email_address,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatronResponse {
    pub id: u64,
    pub name: String,
    pub phone_number: String,
    pub email_address: String,
}

impl From<Patron> for PatronResponse {
    fn from(patron: Patron) -> Self {
        Self {
            id: patron.id.value(),
            name: patron.name,
            phone_number: patron.phone_number,
            email_address: patron.email_address,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanResponse {
    pub id: u64,
    pub book_id: u64,
    pub patron_id: u64,
    pub borrowed_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl From<BorrowingRecord> for LoanResponse {
    fn from(record: BorrowingRecord) -> Self {
        Self {
            id: record.id.value(),
            book_id: record.book_id.value(),
            patron_id: record.patron_id.value(),
            borrowed_at: record.borrowed_at,
            returned_at: record.returned_at,
        }
    }
}
