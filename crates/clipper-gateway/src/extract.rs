use crate::error::AppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user on whose behalf a request is made.
///
/// Taken from the `X-User-Id` header; a missing header means an anonymous
/// caller, represented by the empty id. Anonymous callers own nothing:
/// their user listing is empty and their deletions are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Owner(pub String);

impl Owner {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Owner {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.headers.get(USER_ID_HEADER) {
            None => Ok(Owner::default()),
            Some(value) => value
                .to_str()
                .map(|id| Owner(id.trim().to_owned()))
                .map_err(|_| AppError::BadRequest("user id must be visible ascii".to_string())),
        }
    }
}
