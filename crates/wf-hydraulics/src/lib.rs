//! wf-hydraulics: flow-element calculations for wellflow.
//!
//! Provides the pressure-drop building blocks the network and wellbore
//! solvers chain together:
//! - Pipe segments with Darcy-Weisbach friction, fittings, elevation and
//!   acceleration terms plus Mach/erosional checks
//! - Multiphase holdup correlations (Beggs-Brill, Hagedorn-Brown, Duns-Ros,
//!   Ansari, Gray, single-phase)
//! - Chokes with sub-critical/critical (choked) flow detection
//! - Equipment models (separator, heater, K-loss devices)
//!
//! All calculations are deterministic functions of an upstream `FluidState`
//! and a flow rate; nothing here holds state between calls.

pub mod choke;
pub mod common;
pub mod correlations;
pub mod equipment;
pub mod error;
pub mod friction;
pub mod segment;

// Re-exports
pub use choke::{ChokeMode, ChokeRegime, ChokeResult, ChokeSettings, evaluate_choke};
pub use correlations::{FlowCorrelation, FlowPattern, HoldupResult, SuperficialFlow};
pub use equipment::{DeviceEffect, HeaterMode, LossModel, NodeKind, evaluate_device};
pub use error::{HydraulicsError, HydraulicsResult};
pub use segment::{ErosionalCheck, SegmentResult, SegmentSpec, calculate_segment};
