use crate::utils::error::LibraryError;
use crate::utils::validation::Validate;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

/// JSON body that has been deserialized and passed its `Validate` rules.
/// Both kinds of failure surface as `ValidationError` (400).
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = LibraryError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| LibraryError::validation("body", rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Path parameters. A segment that does not parse (`/api/books/abc`) becomes
/// a `ValidationError`, so the 400 carries the same JSON body as any other.
pub struct ValidPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = LibraryError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| LibraryError::validation("path", rejection.body_text()))?;
        Ok(Self(value))
    }
}
