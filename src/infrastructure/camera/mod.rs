//! Camera infrastructure module
//!
//! No native driver binding ships with this crate; the simulated stack
//! stands in for one behind the same ports.

mod simulated;

pub use simulated::{SimulatedCamera, SimulatedOutputs, INJECTED_FAILURE_CODE};
