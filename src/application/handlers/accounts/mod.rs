//! Account handlers: managers, users, login, and the bootstrap admin.

mod bootstrap_admin;
mod create_manager;
mod create_user;
mod delete_manager;
mod delete_user;
mod login;

pub use bootstrap_admin::BootstrapAdminHandler;
pub use create_manager::{CreateManagerCommand, CreateManagerHandler};
pub use create_user::{CreateUserCommand, CreateUserHandler};
pub use delete_manager::DeleteManagerHandler;
pub use delete_user::DeleteUserHandler;
pub use login::{LoginCommand, LoginHandler, LoginResult};

use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::{DomainError, ValidationError};
use crate::ports::PasswordHasher;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Checks the password length and hashes it.
///
/// # Errors
///
/// - `ValidationFailed` if the password length is out of range
/// - `InternalError` if hashing fails
fn hash_password(
    hasher: &dyn PasswordHasher,
    password: &SecretString,
) -> Result<String, DomainError> {
    let length = password.expose_secret().chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
        return Err(ValidationError::out_of_range(
            "password",
            MIN_PASSWORD_LENGTH as i64,
            MAX_PASSWORD_LENGTH as i64,
            length as i64,
        )
        .into());
    }
    Ok(hasher.hash(password.expose_secret())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::PlainHasher;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn short_password_is_rejected() {
        let err = hash_password(&PlainHasher, &SecretString::new("short".to_string())).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.detail("field"), Some("password"));
    }

    #[test]
    fn valid_password_is_hashed() {
        let hash =
            hash_password(&PlainHasher, &SecretString::new("correct horse".to_string())).unwrap();
        assert_ne!(hash, "correct horse");
    }
}
