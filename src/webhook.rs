use axum::{
    Json, Router, debug_handler,
    extract::State,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::{AppResult, AppState, Bot, Inbound, Outbound};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", post(receive))
        .route("/health", get(health))
}

/// One inbound event in, the actions to perform out. A 500 means the event was
/// not handled and may be retried.
#[debug_handler(state = AppState)]
pub(crate) async fn receive(
    State(bot): State<Bot>,
    Json(event): Json<Inbound>,
) -> AppResult<Json<Vec<Outbound>>> {
    Ok(Json(bot.handle(event).await?))
}

#[debug_handler(state = AppState)]
pub(crate) async fn health(State(bot): State<Bot>) -> AppResult<Json<Value>> {
    bot.store().ping().await?;
    Ok(Json(json!({ "status": "ok" })))
}
