use super::dto::{BookRequest, BookResponse, LoanResponse, PatronRequest, PatronResponse};
use super::extract::{ValidJson, ValidPath};
use super::AppState;
use crate::domain::model::{BookId, PatronId};
use crate::utils::error::Result;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

// ---- books ----

pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<BookResponse>>> {
    let books = state.library.catalog().list().await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

pub async fn get_book(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<u64>,
) -> Result<Json<BookResponse>> {
    let book = state.library.catalog().get_by_id(BookId::new(id)).await?;
    Ok(Json(book.into()))
}

pub async fn add_book(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<BookRequest>,
) -> Result<(StatusCode, Json<BookResponse>)> {
    let book = state.library.catalog().add(request.into()).await?;
    Ok((StatusCode::CREATED, Json(book.into())))
}

pub async fn update_book(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<u64>,
    ValidJson(request): ValidJson<BookRequest>,
) -> Result<Json<BookResponse>> {
    let book = state
        .library
        .catalog()
        .update(BookId::new(id), request.into())
        .await?;
    Ok(Json(book.into()))
}

pub async fn delete_book(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<u64>,
) -> Result<StatusCode> {
    state.library.catalog().delete(BookId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn book_loans(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<u64>,
) -> Result<Json<Vec<LoanResponse>>> {
    let records = state
        .library
        .borrowing()
        .history_for_book(BookId::new(id))
        .await?;
    Ok(Json(records.into_iter().map(LoanResponse::from).collect()))
}

// ---- patrons ----

pub async fn list_patrons(State(state): State<AppState>) -> Result<Json<Vec<PatronResponse>>> {
    let patrons = state.library.membership().list().await?;
    Ok(Json(patrons.into_iter().map(PatronResponse::from).collect()))
}

pub async fn get_patron(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<u64>,
) -> Result<Json<PatronResponse>> {
    let patron = state
        .library
        .membership()
        .get_by_id(PatronId::new(id))
        .await?;
    Ok(Json(patron.into()))
}

pub async fn add_patron(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<PatronRequest>,
) -> Result<(StatusCode, Json<PatronResponse>)> {
    let patron = state.library.membership().add(request.into()).await?;
    Ok((StatusCode::CREATED, Json(patron.into())))
}

pub async fn update_patron(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<u64>,
    ValidJson(request): ValidJson<PatronRequest>,
) -> Result<Json<PatronResponse>> {
    let patron = state
        .library
        .membership()
        .update(PatronId::new(id), request.into())
        .await?;
    Ok(Json(patron.into()))
}

pub async fn delete_patron(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<u64>,
) -> Result<StatusCode> {
    state.library.membership().delete(PatronId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---- borrowing ----

pub async fn borrow_book(
    State(state): State<AppState>,
    ValidPath((book_id, patron_id)): ValidPath<(u64, u64)>,
) -> Result<StatusCode> {
    state
        .library
        .borrowing()
        .borrow(BookId::new(book_id), PatronId::new(patron_id))
        .await?;
    Ok(StatusCode::CREATED)
}

pub async fn return_book(
    State(state): State<AppState>,
    ValidPath((book_id, patron_id)): ValidPath<(u64, u64)>,
) -> Result<StatusCode> {
    state
        .library
        .borrowing()
        .return_book(BookId::new(book_id), PatronId::new(patron_id))
        .await?;
    Ok(StatusCode::OK)
}

pub async fn open_loans(State(state): State<AppState>) -> Result<Json<Vec<LoanResponse>>> {
    let records = state.library.borrowing().open_loans().await?;
    Ok(Json(records.into_iter().map(LoanResponse::from).collect()))
}

pub async fn no_route() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "No such route" })))
}
