//! HTTP adapter for provisioning sessions.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    EvaluationResponse, FinalizeRequest, FinalizeResponse, ProvisionParams, SessionResponse,
    StartSessionRequest,
};
pub use handlers::SessionHandlers;
pub use routes::session_routes;
