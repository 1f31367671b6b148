//! wf-network: surface-network pressure propagation for wellflow.
//!
//! A network is an ordered chain of equipment nodes joined by pipe segments,
//! walked once per solve from the wellhead boundary to the outlet. Each node
//! applies its device model, each segment its hydraulic pressure drop, and
//! the fluid state is re-derived after every step. A negative computed
//! pressure is a terminal `Failed` state reported in the result (with the
//! partial results kept), never a panic or error return.

pub mod error;
pub mod result;
pub mod solver;
pub mod topology;

// Re-exports
pub use error::NetworkError;
pub use result::{Convergence, NetworkResult, NodeResult, SegmentRecord};
pub use solver::{SolverConfig, solve_network, solve_network_with};
pub use topology::{Network, NodeSpec};

// The node-kind dispatch lives with the equipment evaluators.
pub use wf_hydraulics::equipment::{HeaterMode, LossModel, NodeKind};
