//! Single-pass network solver.
//!
//! Each solve walks the node/segment chain exactly once, wellhead to outlet:
//! `Initialized → Propagating → {Converged | Failed}`. Numeric failure
//! downstream (negative pressure, failed fluid evaluation) terminates the
//! walk but keeps every result computed up to that point, so callers can
//! render partial results and locate the failure.

use crate::result::{Convergence, NetworkResult, NodeResult, SegmentRecord};
use crate::topology::Network;
use tracing::{debug, warn};
use uom::si::area::square_meter;
use wf_core::units::{Area, Velocity, m3ps, mps, pa};
use wf_hydraulics::calculate_segment;
use wf_hydraulics::common::flow_area;
use wf_hydraulics::equipment::{NodeKind, evaluate_device};
use wf_pvt::{FluidSpec, evaluate_fluid_state};

/// Solver limits and warning thresholds.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Velocity above which a (non-blocking) warning is attached, on top of
    /// the erosional and Mach checks.
    pub max_pipe_velocity: Option<Velocity>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_pipe_velocity: Some(mps(20.0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SolvePhase {
    Initialized,
    Propagating,
    Converged,
    Failed,
}

/// Solve a network with the default configuration.
pub fn solve_network(network: &Network, fluid: &FluidSpec) -> NetworkResult {
    solve_network_with(network, fluid, &SolverConfig::default())
}

/// Solve a network, propagating pressure, temperature and fluid state from
/// the wellhead boundary through every device and segment.
pub fn solve_network_with(
    network: &Network,
    fluid: &FluidSpec,
    config: &SolverConfig,
) -> NetworkResult {
    let mut result = NetworkResult {
        nodes: Vec::with_capacity(network.nodes().len()),
        segments: Vec::with_capacity(network.segments().len()),
        total_drawdown_pa: 0.0,
        convergence: Convergence {
            converged: false,
            iterations: 0,
        },
        warnings: Vec::new(),
        critical_alerts: Vec::new(),
    };

    let mut phase = SolvePhase::Initialized;
    debug!(?phase, nodes = network.nodes().len(), "network solve starting");

    let (p_wellhead, t_wellhead, q_wellhead) = match &network.wellhead().kind {
        NodeKind::Wellhead {
            pressure,
            temperature,
            flow_rate,
        } => (*pressure, *temperature, *flow_rate),
        _ => {
            // Network::new guarantees this; report instead of panicking
            result
                .critical_alerts
                .push("network has no wellhead boundary".to_string());
            return result;
        }
    };

    let mut state = match evaluate_fluid_state(fluid, p_wellhead, t_wellhead) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "fluid evaluation failed at wellhead");
            result
                .critical_alerts
                .push(format!("fluid evaluation failed at wellhead: {e}"));
            return result;
        }
    };

    // The wellhead rate is the in-situ rate at wellhead conditions; the
    // local rate elsewhere follows from the volume-factor ratio.
    let q_reference = q_wellhead.value / state.volume_factor;

    let mut pressure = p_wellhead;
    let mut temperature = t_wellhead;
    phase = SolvePhase::Propagating;

    'walk: for (i, node) in network.nodes().iter().enumerate() {
        let q_local = q_reference * state.volume_factor;

        let adjoining_area = network
            .segments()
            .get(i)
            .or_else(|| i.checked_sub(1).and_then(|j| network.segments().get(j)))
            .map(|seg| Area::new::<square_meter>(flow_area(seg.inner_diameter.value)));

        let effect = match evaluate_device(&node.kind, &state, m3ps(q_local), adjoining_area) {
            Ok(eff) => eff,
            Err(e) => {
                result
                    .critical_alerts
                    .push(format!("device '{}' failed: {e}", node.label));
                phase = SolvePhase::Failed;
                break 'walk;
            }
        };

        if let Some(p_out) = effect.outlet_pressure {
            pressure = p_out;
        } else {
            pressure = pa(pressure.value - effect.delta_p.value);
        }
        if let Some(t_out) = effect.outlet_temperature {
            temperature = t_out;
        }

        if pressure.value <= 0.0 {
            result.critical_alerts.push(format!(
                "pressure drop exceeds available pressure at node '{}'",
                node.label
            ));
            phase = SolvePhase::Failed;
            break 'walk;
        }

        state = match evaluate_fluid_state(fluid, pressure, temperature) {
            Ok(s) => s,
            Err(e) => {
                result.critical_alerts.push(format!(
                    "fluid evaluation failed at node '{}': {e}",
                    node.label
                ));
                phase = SolvePhase::Failed;
                break 'walk;
            }
        };

        let q_local = q_reference * state.volume_factor;
        result.nodes.push(NodeResult {
            node_id: node.id.to_string(),
            label: node.label.clone(),
            kind: node.kind.name().to_string(),
            pressure_pa: pressure.value,
            temperature_k: temperature.value,
            density_kg_m3: state.density.value,
            velocity_m_s: adjoining_area.map(|a| q_local / a.value),
            warnings: effect.warnings,
        });

        let Some(segment) = network.segments().get(i) else {
            continue;
        };

        let seg_res = match calculate_segment(segment, &state, m3ps(q_local)) {
            Ok(r) => r,
            Err(e) => {
                result
                    .critical_alerts
                    .push(format!("segment {} failed: {e}", segment.id));
                phase = SolvePhase::Failed;
                break 'walk;
            }
        };

        if seg_res.erosional.is_erosional {
            result.warnings.push(format!(
                "erosional velocity exceeded on segment {}",
                segment.id
            ));
        }
        if seg_res.erosional.mach_limit_exceeded {
            result
                .warnings
                .push(format!("Mach limit exceeded on segment {}", segment.id));
        }
        if let Some(v_max) = config.max_pipe_velocity {
            if seg_res.velocity.value > v_max.value {
                result.warnings.push(format!(
                    "velocity {:.1} m/s exceeds configured maximum on segment {}",
                    seg_res.velocity.value, segment.id
                ));
            }
        }

        result.segments.push(SegmentRecord {
            segment_id: segment.id.to_string(),
            dp_friction_pa: seg_res.dp_friction.value,
            dp_elevation_pa: seg_res.dp_elevation.value,
            dp_acceleration_pa: seg_res.dp_acceleration.value,
            dp_total_pa: seg_res.dp_total.value,
            velocity_m_s: seg_res.velocity.value,
            reynolds: seg_res.reynolds,
            mach: seg_res.mach,
            is_erosional: seg_res.erosional.is_erosional,
            mach_limit_exceeded: seg_res.erosional.mach_limit_exceeded,
        });

        pressure = pa(pressure.value - seg_res.dp_total.value);
        if pressure.value <= 0.0 {
            let downstream = &network.nodes()[i + 1];
            warn!(node = %downstream.label, "computed pressure went non-positive");
            result.critical_alerts.push(format!(
                "pressure drop exceeds available wellhead pressure at node '{}'",
                downstream.label
            ));
            phase = SolvePhase::Failed;
            break 'walk;
        }

        state = match evaluate_fluid_state(fluid, pressure, temperature) {
            Ok(s) => s,
            Err(e) => {
                result.critical_alerts.push(format!(
                    "fluid evaluation failed downstream of segment {}: {e}",
                    segment.id
                ));
                phase = SolvePhase::Failed;
                break 'walk;
            }
        };
    }

    if phase == SolvePhase::Propagating {
        phase = SolvePhase::Converged;
    }

    let last_pressure = result
        .nodes
        .last()
        .map_or(p_wellhead.value, |n| n.pressure_pa);
    result.total_drawdown_pa = p_wellhead.value - last_pressure;
    result.convergence = Convergence {
        converged: phase == SolvePhase::Converged,
        iterations: 1,
    };

    debug!(
        converged = result.convergence.converged,
        drawdown_pa = result.total_drawdown_pa,
        "network solve finished"
    );
    result
}
