//! Login account entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Role, Timestamp, Username};

/// A login account with a password hash and a role tag.
///
/// The hash is an opaque PHC string produced by the `PasswordHasher` port.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    username: Username,
    password_hash: String,
    role: Role,
    created_at: Timestamp,
}

impl Account {
    pub fn new(username: Username, password_hash: String, role: Role) -> Self {
        Self {
            username,
            password_hash,
            role,
            created_at: Timestamp::now(),
        }
    }

    /// Reconstitute an account from persistence.
    pub fn reconstitute(
        username: Username,
        password_hash: String,
        role: Role,
        created_at: Timestamp,
    ) -> Self {
        Self {
            username,
            password_hash,
            role,
            created_at,
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_hash() {
        let account = Account::new(
            Username::new("erin").unwrap(),
            "$argon2id$secret".to_string(),
            Role::User,
        );
        let printed = format!("{:?}", account);
        assert!(!printed.contains("secret"));
        assert!(printed.contains("erin"));
    }
}
