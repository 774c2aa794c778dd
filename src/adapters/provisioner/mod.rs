//! Provisioner adapters.

mod simulated;

pub use simulated::SimulatedProvisioner;
