// --- File: crates/meetslot_gcal/src/routes.rs ---

use crate::handlers::{
    book_handler, calendar_suggest_handler, root_handler, suggest_handler, GcalState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing every suggestion and booking route.
pub fn routes(state: Arc<GcalState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/suggest", get(suggest_handler))
        .route("/calendar/suggest", post(calendar_suggest_handler))
        .route("/book", post(book_handler))
        .with_state(state)
}
