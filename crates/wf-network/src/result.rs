//! Result snapshot types.
//!
//! Plain serde-serializable records consumed by the presentation and
//! persistence collaborators. All values are SI; display-unit formatting
//! happens outside the core.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeResult {
    pub node_id: String,
    pub label: String,
    pub kind: String,
    pub pressure_pa: f64,
    pub temperature_k: f64,
    pub density_kg_m3: f64,
    /// Velocity in the adjoining segment, when one exists.
    pub velocity_m_s: Option<f64>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub segment_id: String,
    pub dp_friction_pa: f64,
    pub dp_elevation_pa: f64,
    pub dp_acceleration_pa: f64,
    pub dp_total_pa: f64,
    pub velocity_m_s: f64,
    pub reynolds: f64,
    pub mach: Option<f64>,
    pub is_erosional: bool,
    pub mach_limit_exceeded: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Convergence {
    pub converged: bool,
    pub iterations: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkResult {
    pub nodes: Vec<NodeResult>,
    pub segments: Vec<SegmentRecord>,
    /// Wellhead pressure minus the last computed node pressure.
    pub total_drawdown_pa: f64,
    pub convergence: Convergence,
    /// Non-blocking engineering warnings (erosional velocity, near-critical
    /// choke, velocity limit).
    pub warnings: Vec<String>,
    /// Blocking failures (negative computed pressure, fluid evaluation
    /// failure); presence implies `convergence.converged == false`.
    pub critical_alerts: Vec<String>,
}
