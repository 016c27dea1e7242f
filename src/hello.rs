use axum::{extract::rejection::JsonRejection, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/hello", get(hello).post(echo))
        .route("/health", get(|| async { "ok" }))
}

async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello, world!" }))
}

async fn echo(payload: Result<Json<Value>, JsonRejection>) -> Result<Json<Value>, AppError> {
    let Json(data) = payload?;
    Ok(Json(json!({ "message": "Got some data!", "data": data })))
}
