//! Request and response bodies for account endpoints.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::application::handlers::accounts::LoginResult;
use crate::domain::directory::{Account, Manager};
use crate::domain::foundation::{Role, Timestamp};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: SecretString,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub expires_at: Timestamp,
}

impl From<LoginResult> for LoginResponse {
    fn from(result: LoginResult) -> Self {
        Self {
            token: result.token,
            role: result.role,
            expires_at: result.expires_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateManagerRequest {
    pub username: String,
    pub password: SecretString,
    pub group_limit: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ManagerResponse {
    pub username: String,
    pub group_limit: u32,
    pub created_at: Timestamp,
}

impl From<Manager> for ManagerResponse {
    fn from(manager: Manager) -> Self {
        Self {
            username: manager.username().to_string(),
            group_limit: manager.group_limit(),
            created_at: *manager.created_at(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: SecretString,
}

/// An account without its password hash.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub username: String,
    pub role: Role,
    pub created_at: Timestamp,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            username: account.username().to_string(),
            role: account.role(),
            created_at: *account.created_at(),
        }
    }
}
