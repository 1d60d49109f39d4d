use crate::error::Result;
use crate::model::Stats;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

pub async fn ping_handler(State(state): State<AppState>) -> Result<StatusCode> {
    state.shortener().ping().await?;
    Ok(StatusCode::OK)
}

pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<Stats>> {
    Ok(Json(state.shortener().stats().await?))
}
