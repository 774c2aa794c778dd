//! HTTP adapter for login and account administration.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AccountResponse, CreateManagerRequest, CreateUserRequest, LoginRequest, LoginResponse,
    ManagerResponse,
};
pub use handlers::AccountHandlers;
pub use routes::account_routes;
