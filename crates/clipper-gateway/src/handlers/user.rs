use crate::error::Result;
use crate::extract::Owner;
use crate::model::UserUrl;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use clipper_core::Slug;

pub async fn user_urls_handler(
    State(state): State<AppState>,
    owner: Owner,
) -> Result<Json<Vec<UserUrl>>> {
    Ok(Json(state.shortener().user_urls(owner.as_str()).await?))
}

/// Accepts the deletion and answers 202 before anything is deleted.
pub async fn delete_user_urls_handler(
    State(state): State<AppState>,
    owner: Owner,
    Json(slugs): Json<Vec<String>>,
) -> Result<StatusCode> {
    let slugs = slugs
        .into_iter()
        .map(Slug::new)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    state.shortener().delete_user_urls(owner.as_str(), slugs);
    Ok(StatusCode::ACCEPTED)
}
