//! Request extractors.
//!
//! Wraps `axum::Json` so that body rejections (malformed JSON, missing
//! required fields) keep the `{"error": {...}}` envelope instead of axum's
//! plain-text rejection body.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
};

use crate::error::ServerError;

/// JSON body extractor whose rejection is a [`ServerError::Validation`].
pub struct Json<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(ServerError::Validation(rejection.body_text())),
        }
    }
}
