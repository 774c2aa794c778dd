//! Authentication adapters.
//!
//! - `jwt` - HS256 bearer tokens implementing `TokenIssuer` and `TokenValidator`
//! - `argon` - Argon2id implementation of `PasswordHasher`

mod argon;
mod jwt;

pub use argon::Argon2PasswordHasher;
pub use jwt::JwtAuthenticator;
