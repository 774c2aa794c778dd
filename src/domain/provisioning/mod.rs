//! Provisioning domain module.
//!
//! The provisioning session and its authorization state machine. The
//! session holds the user's chosen service, its cost estimate, and the
//! group it will be charged to until it is finalized or abandoned.

mod estimate;
mod session;
mod state;

pub use estimate::CostEstimate;
pub use session::ProvisioningSession;
pub use state::SessionState;
