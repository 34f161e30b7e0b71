//! JSON-over-HTTP surface. Handlers translate paths and bodies into calls on
//! [`LibraryService`] and errors into status codes; no lending rules live here.

pub mod auth;
pub mod dto;
mod error;
pub mod extract;
pub mod handlers;

use crate::adapters::memory_store::MemoryStore;
use crate::config::toml_config::AuthConfig;
use crate::core::service::LibraryService;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub library: Arc<LibraryService<MemoryStore>>,
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    pub fn new(library: LibraryService<MemoryStore>, auth: AuthConfig) -> Self {
        Self {
            library: Arc::new(library),
            auth: Arc::new(auth),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/books",
            get(handlers::list_books).post(handlers::add_book),
        )
        .route(
            "/books/:id",
            get(handlers::get_book)
                .put(handlers::update_book)
                .delete(handlers::delete_book),
        )
        .route("/books/:id/loans", get(handlers::book_loans))
        .route(
            "/patrons",
            get(handlers::list_patrons).post(handlers::add_patron),
        )
        .route(
            "/patrons/:id",
            get(handlers::get_patron)
                .put(handlers::update_patron)
                .delete(handlers::delete_patron),
        )
        .route("/borrow", get(handlers::open_loans))
        .route(
            "/borrow/:book_id/patron/:patron_id",
            post(handlers::borrow_book).put(handlers::return_book),
        );

    Router::new()
        .nest("/api", api)
        .fallback(handlers::no_route)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ))
        .with_state(state)
}

/// Serves `router` on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown: F,
) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Listening on http://{}", addr);
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
