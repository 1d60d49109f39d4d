use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use clipper_core::ShortenerError;

pub type Result<T> = std::result::Result<T, AppError>;

/// Failure of a request, rendered as a status code and a plain-text reason.
#[derive(Debug)]
pub enum AppError {
    Shortener(ShortenerError),
    BadRequest(String),
}

impl From<ShortenerError> for AppError {
    fn from(error: ShortenerError) -> Self {
        AppError::Shortener(error)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Shortener(error) => match error {
                ShortenerError::NotFound(_) => StatusCode::NOT_FOUND,
                ShortenerError::Gone(_) => StatusCode::GONE,
                ShortenerError::NoContent => StatusCode::NO_CONTENT,
                ShortenerError::InvalidUrl(_) | ShortenerError::InvalidSlug(_) => {
                    StatusCode::BAD_REQUEST
                }
                ShortenerError::Generator(_) | ShortenerError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            // 204 must not carry a body
            AppError::Shortener(ShortenerError::NoContent) => status.into_response(),
            // backend details were logged by the service and stay server-side
            AppError::Shortener(error) if error.is_internal() => {
                (status, "internal server error").into_response()
            }
            AppError::Shortener(error) => (status, error.to_string()).into_response(),
            AppError::BadRequest(reason) => (status, reason).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipper_core::StorageError;

    #[test]
    fn maps_service_outcomes_to_status_codes() {
        let cases = [
            (ShortenerError::NotFound("a".into()), StatusCode::NOT_FOUND),
            (ShortenerError::Gone("a".into()), StatusCode::GONE),
            (ShortenerError::NoContent, StatusCode::NO_CONTENT),
            (ShortenerError::InvalidUrl("x".into()), StatusCode::BAD_REQUEST),
            (ShortenerError::InvalidSlug("x".into()), StatusCode::BAD_REQUEST),
            (
                ShortenerError::Generator("entropy".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ShortenerError::Storage(StorageError::Closed),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(AppError::from(error).status(), status);
        }
    }

    #[test]
    fn internal_errors_hide_details() {
        let error = AppError::from(ShortenerError::Storage(StorageError::Query(
            "relation \"shortener\" does not exist".into(),
        )));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
