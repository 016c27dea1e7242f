use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod manager;
pub mod model;
pub mod permissions;
pub mod service;
mod validation;

pub use service::ProfileService;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
