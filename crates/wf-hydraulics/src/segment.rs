//! Pipe segment pressure-drop calculation.
//!
//! Computes Darcy-Weisbach friction with fittings losses, hydrostatic
//! elevation change, and a compressible acceleration term, together with the
//! velocity-based engineering checks (API RP 14E erosional limit, Mach
//! number).

use crate::common::{EPSILON_FLOW, check_finite, flow_area};
use crate::error::{HydraulicsError, HydraulicsResult};
use crate::friction::friction_factor;
use wf_core::units::constants::G0_MPS2;
use wf_core::units::{Length, Pressure, Velocity, VolRate, mps, pa};
use wf_core::{NodeId, SegId};
use wf_pvt::FluidState;

/// API RP 14E erosional-velocity constant for continuous service, in the
/// field units it was published in [(ft/s)·(lbm/ft³)^½].
pub const EROSIONAL_C_CONTINUOUS: f64 = 100.0;

/// The same constant converted for v[m/s] = C/√(ρ[kg/m³]).
const EROSIONAL_C_SI: f64 = EROSIONAL_C_CONTINUOUS * 1.219_9;

/// Conservative Mach threshold above which incompressible-style pressure
/// drop assumptions lose accuracy.
pub const MACH_LIMIT: f64 = 0.3;

/// Acceleration (kinetic) term guard: beyond this the flow is effectively
/// approaching sonic and the pressure-drop model breaks down.
const EK_LIMIT: f64 = 0.9;

/// Pipe segment between two network nodes.
#[derive(Debug, Clone)]
pub struct SegmentSpec {
    pub id: SegId,
    pub from: NodeId,
    pub to: NodeId,
    pub length: Length,
    pub inner_diameter: Length,
    /// Absolute roughness.
    pub roughness: Length,
    /// Sum of K factors for fittings, bends, reducers.
    pub k_fittings: f64,
    /// Signed elevation change, positive upward in the flow direction.
    pub elevation_change: Length,
}

impl SegmentSpec {
    pub fn validate(&self) -> HydraulicsResult<()> {
        if !(self.length.value.is_finite() && self.length.value > 0.0) {
            return Err(HydraulicsError::InvalidSegmentGeometry {
                what: "length must be positive",
            });
        }
        if !(self.inner_diameter.value.is_finite() && self.inner_diameter.value > 0.0) {
            return Err(HydraulicsError::InvalidSegmentGeometry {
                what: "inner diameter must be positive",
            });
        }
        if !(self.roughness.value.is_finite() && self.roughness.value >= 0.0) {
            return Err(HydraulicsError::InvalidSegmentGeometry {
                what: "roughness must be non-negative",
            });
        }
        if !(self.k_fittings.is_finite() && self.k_fittings >= 0.0) {
            return Err(HydraulicsError::InvalidSegmentGeometry {
                what: "fittings K-factor must be non-negative",
            });
        }
        if !self.elevation_change.value.is_finite() {
            return Err(HydraulicsError::InvalidSegmentGeometry {
                what: "elevation change must be finite",
            });
        }
        Ok(())
    }
}

/// Velocity-limit checks, kept as separate flags so the presentation layer
/// can decide how to summarize them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErosionalCheck {
    pub is_erosional: bool,
    pub mach_limit_exceeded: bool,
}

/// Per-segment calculation result with each pressure-drop component
/// reported separately.
#[derive(Debug, Clone)]
pub struct SegmentResult {
    /// Friction loss including fittings.
    pub dp_friction: Pressure,
    /// Hydrostatic loss, signed (negative for downhill flow).
    pub dp_elevation: Pressure,
    /// Compressible acceleration term.
    pub dp_acceleration: Pressure,
    pub dp_total: Pressure,
    pub velocity: Velocity,
    pub reynolds: f64,
    pub friction_factor: f64,
    /// Mach number; absent for liquid-only states.
    pub mach: Option<f64>,
    pub erosional: ErosionalCheck,
}

/// API RP 14E erosional velocity limit for a mixture density [m/s].
pub fn erosional_velocity(density_kg_m3: f64) -> f64 {
    EROSIONAL_C_SI / density_kg_m3.sqrt()
}

/// Compute the pressure drop over one segment for a given in-situ
/// volumetric flow rate.
pub fn calculate_segment(
    segment: &SegmentSpec,
    upstream: &FluidState,
    flow_rate: VolRate,
) -> HydraulicsResult<SegmentResult> {
    segment.validate()?;

    let q = flow_rate.value;
    if !q.is_finite() || q < 0.0 {
        return Err(HydraulicsError::NonPhysicalFlow {
            what: "flow rate must be non-negative",
        });
    }

    let rho = upstream.density.value;
    let mu = upstream.viscosity.value;
    if !rho.is_finite() || rho <= 0.0 {
        return Err(HydraulicsError::NonPhysicalFlow { what: "density" });
    }
    if !mu.is_finite() || mu <= 0.0 {
        return Err(HydraulicsError::NonPhysicalFlow { what: "viscosity" });
    }

    let d = segment.inner_diameter.value;
    let dz = segment.elevation_change.value;
    let dp_elev = rho * G0_MPS2 * dz;

    if q < EPSILON_FLOW {
        // Static column: only the hydrostatic term remains
        return Ok(SegmentResult {
            dp_friction: pa(0.0),
            dp_elevation: pa(dp_elev),
            dp_acceleration: pa(0.0),
            dp_total: pa(dp_elev),
            velocity: mps(0.0),
            reynolds: 0.0,
            friction_factor: 0.0,
            mach: None,
            erosional: ErosionalCheck::default(),
        });
    }

    let area = flow_area(d);
    let velocity = q / area;
    let reynolds = rho * velocity * d / mu;
    check_finite(reynolds, "Reynolds number")?;

    let f = friction_factor(reynolds, segment.roughness.value / d)?;

    // ΔP = (f·L/D + ΣK) · ρv²/2
    let dyn_head = 0.5 * rho * velocity * velocity;
    let dp_fric = (f * segment.length.value / d + segment.k_fittings) * dyn_head;
    check_finite(dp_fric, "friction pressure drop")?;

    // Compressible acceleration term: dp_total = (dp_f + dp_e)/(1 - Ek)
    let mut dp_acc = 0.0;
    if upstream.has_free_gas() {
        let ek = rho * velocity * velocity / upstream.pressure.value;
        if ek >= EK_LIMIT {
            return Err(HydraulicsError::NonPhysicalFlow {
                what: "acceleration term approaching sonic",
            });
        }
        dp_acc = (dp_fric + dp_elev) * ek / (1.0 - ek);
    }

    let mach = upstream
        .sonic_velocity
        .map(|c| velocity / c.value)
        .filter(|m| m.is_finite());

    let erosional = ErosionalCheck {
        is_erosional: velocity > erosional_velocity(rho),
        mach_limit_exceeded: mach.is_some_and(|m| m > MACH_LIMIT),
    };

    let dp_total = dp_fric + dp_elev + dp_acc;
    check_finite(dp_total, "total pressure drop")?;

    Ok(SegmentResult {
        dp_friction: pa(dp_fric),
        dp_elevation: pa(dp_elev),
        dp_acceleration: pa(dp_acc),
        dp_total: pa(dp_total),
        velocity: mps(velocity),
        reynolds,
        friction_factor: f,
        mach,
        erosional,
    })
}
