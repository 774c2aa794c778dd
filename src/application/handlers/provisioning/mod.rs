//! Provisioning session handlers.
//!
//! Drive one user's request through `Open -> Configured -> Authorized |
//! Denied -> Finalized | Abandoned`.

mod abandon_session;
mod evaluate_cost;
mod finalize_session;
mod get_session;
mod provision_session;
mod select_service;
mod start_session;

pub use abandon_session::{AbandonSessionCommand, AbandonSessionHandler};
pub use evaluate_cost::{EvaluateCostCommand, EvaluateCostHandler, EvaluateCostResult};
pub use finalize_session::{
    FinalizeSessionCommand, FinalizeSessionHandler, FinalizeSessionResult,
};
pub use get_session::GetSessionHandler;
pub use provision_session::{ProvisionSessionCommand, ProvisionSessionHandler};
pub use select_service::{SelectServiceCommand, SelectServiceHandler};
pub use start_session::{StartSessionCommand, StartSessionHandler};

use crate::domain::foundation::{DomainError, SessionId, Username};
use crate::domain::provisioning::ProvisioningSession;
use crate::ports::SessionRepository;

/// Loads a session and checks that `actor` owns it.
///
/// # Errors
///
/// - `NotFound` if the session does not exist
/// - `Forbidden` if another user owns it
async fn load_owned_session(
    sessions: &dyn SessionRepository,
    id: &SessionId,
    actor: &Username,
) -> Result<ProvisioningSession, DomainError> {
    let session = sessions
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Session", id))?;
    session.authorize(actor)?;
    Ok(session)
}
