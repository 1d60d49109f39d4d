use crate::error::Result;
use crate::extract::Owner;
use crate::model::{BatchRequest, BatchResponse, ShortenRequest, ShortenResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use clipper_core::{Shortened, Slug};

fn status_of(shortened: &Shortened) -> StatusCode {
    if shortened.is_conflict() {
        StatusCode::CONFLICT
    } else {
        StatusCode::CREATED
    }
}

/// `POST /` with the URL as the raw request body.
pub async fn shorten_text_handler(
    State(state): State<AppState>,
    owner: Owner,
    body: String,
) -> Result<(StatusCode, String)> {
    let shortened = state
        .shortener()
        .shorten(owner.as_str(), body.trim())
        .await?;
    Ok((status_of(&shortened), shortened.short_url().to_owned()))
}

pub async fn shorten_json_handler(
    State(state): State<AppState>,
    owner: Owner,
    Json(request): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>)> {
    let shortened = state
        .shortener()
        .shorten(owner.as_str(), request.url.trim())
        .await?;
    Ok((
        status_of(&shortened),
        Json(ShortenResponse {
            result: shortened.short_url().to_owned(),
        }),
    ))
}

pub async fn shorten_batch_handler(
    State(state): State<AppState>,
    owner: Owner,
    Json(batch): Json<Vec<BatchRequest>>,
) -> Result<(StatusCode, Json<Vec<BatchResponse>>)> {
    let responses = state
        .shortener()
        .shorten_batch(owner.as_str(), batch)
        .await?;
    Ok((StatusCode::CREATED, Json(responses)))
}

/// `GET /{slug}`: 307 to the original URL.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Redirect> {
    let slug = Slug::new(slug)?;
    let original_url = state.shortener().resolve(&slug).await?;
    Ok(Redirect::temporary(&original_url))
}
