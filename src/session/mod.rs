mod dto;
pub mod handlers;
pub mod tokens;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::session_routes())
        .merge(handlers::me_routes())
}
