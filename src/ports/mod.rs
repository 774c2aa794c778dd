//! Ports - interfaces between the application core and the outside world.
//!
//! Every collaborator the core depends on is a trait here and is injected
//! as an `Arc<dyn Trait>`:
//! - **Store**: account, group, budget, session and service record
//!   repositories, the finalize committer, and notifications
//! - **Provisioner**: the cloud API
//! - **PricingOracle**: unit prices
//! - **Authenticator**: token issuing/validation and password hashing

mod account_repository;
mod budget_repository;
mod finalize_committer;
mod group_repository;
mod notification_sink;
mod pricing_oracle;
mod provisioner;
mod service_record_repository;
mod session_repository;
mod token_service;

pub use account_repository::AccountRepository;
pub use budget_repository::BudgetRepository;
pub use finalize_committer::{FinalizeCommit, FinalizeCommitter};
pub use group_repository::GroupRepository;
pub use notification_sink::{NotificationReader, NotificationSink};
pub use pricing_oracle::PricingOracle;
pub use provisioner::Provisioner;
pub use service_record_repository::{ServiceFilter, ServiceRecordRepository};
pub use session_repository::SessionRepository;
pub use token_service::{IssuedToken, PasswordHasher, TokenIssuer, TokenValidator};
