//! HTTP routes for provisioning sessions.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    abandon_session, evaluate_cost, finalize_session, get_session, provision_session,
    select_service, start_session, SessionHandlers,
};

/// Creates the session router, mounted under `/api`.
pub fn session_routes(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/sessions", post(start_session))
        .route("/sessions/:id", get(get_session).delete(abandon_session))
        .route("/sessions/:id/service", put(select_service))
        .route("/sessions/:id/evaluate", post(evaluate_cost))
        .route("/sessions/:id/provision", post(provision_session))
        .route("/sessions/:id/finalize", post(finalize_session))
        .with_state(handlers)
}
