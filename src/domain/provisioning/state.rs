//! Provisioning session lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Where a provisioning session is in the authorization workflow.
///
/// ```text
/// Open → Configured → Authorized → Finalized
///                   ↘ Denied     → Abandoned
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Started; no service chosen yet.
    Open,
    /// A service and its configuration are chosen.
    Configured,
    /// The estimate fit the remaining budget.
    Authorized,
    /// The estimate exceeded the remaining budget.
    Denied,
    /// Committed into a service record.
    Finalized,
    /// Discarded after denial.
    Abandoned,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Open => "open",
            SessionState::Configured => "configured",
            SessionState::Authorized => "authorized",
            SessionState::Denied => "denied",
            SessionState::Finalized => "finalized",
            SessionState::Abandoned => "abandoned",
        }
    }
}

impl StateMachine for SessionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionState::*;
        matches!(
            (self, target),
            (Open, Configured)
                | (Configured, Authorized)
                | (Configured, Denied)
                | (Authorized, Finalized)
                | (Denied, Abandoned)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionState::*;
        match self {
            Open => vec![Configured],
            Configured => vec![Authorized, Denied],
            Authorized => vec![Finalized],
            Denied => vec![Abandoned],
            Finalized | Abandoned => vec![],
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(SessionState::Open),
            "configured" => Ok(SessionState::Configured),
            "authorized" => Ok(SessionState::Authorized),
            "denied" => Ok(SessionState::Denied),
            "finalized" => Ok(SessionState::Finalized),
            "abandoned" => Ok(SessionState::Abandoned),
            other => Err(ValidationError::invalid_format(
                "state",
                format!("unknown session state '{}'", other),
            )),
        }
    }
}
