//! Application services shared by several handlers.

mod cost_estimator;
mod dispatcher;
mod notifier;

pub use cost_estimator::CostEstimator;
pub use dispatcher::{ProvisioningDispatcher, DEFAULT_DISPATCH_TIMEOUT};
pub use notifier::Notifier;
