//! Service registry domain module.
//!
//! Records of provisioned resources and the deletion workflow they move
//! through: `Active → Deleting → Deleted`.

mod service_record;

pub use service_record::{Dependent, ServiceRecord, ServiceStatus};
