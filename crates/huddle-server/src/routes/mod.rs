//! Axum router construction.

mod assistant;
mod health;
mod history;

use crate::state::AppState;
use axum::Router;
use std::sync::Arc;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let workspace = Router::new()
        .merge(assistant::router())
        .merge(history::router());
    Router::new()
        .merge(health::router())
        .nest("/v1/workspaces/{workspace_id}", workspace)
        .with_state(state)
}
