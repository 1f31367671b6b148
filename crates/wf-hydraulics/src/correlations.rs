//! Multiphase liquid-holdup correlations.
//!
//! A closed set of correlation variants sharing one contract: superficial
//! phase velocities and phase properties in, in-situ liquid holdup, flow
//! pattern and a two-phase friction multiplier out. Beggs-Brill carries its
//! full flow-pattern map and inclination correction; the remaining
//! correlations use their published fitted/drift-flux forms. New variants
//! extend the enum without touching existing arms.

use crate::common::EPSILON_FLOW;
use crate::error::{HydraulicsError, HydraulicsResult};
use wf_core::units::constants::G0_MPS2;

/// Multiphase pressure-drop correlation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowCorrelation {
    /// No slip, no pattern logic; for dry gas or dead liquid.
    SinglePhase,
    BeggsBrill,
    HagedornBrown,
    DunsRos,
    Ansari,
    Gray,
}

/// Flow pattern reported by the correlations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPattern {
    SinglePhaseLiquid,
    SinglePhaseGas,
    Segregated,
    Intermittent,
    Distributed,
    Transition,
    Bubble,
    Slug,
    Annular,
    Mist,
}

/// Superficial-velocity flow description at one pipe station.
#[derive(Debug, Clone, Copy)]
pub struct SuperficialFlow {
    /// Superficial liquid velocity [m/s].
    pub vsl: f64,
    /// Superficial gas velocity [m/s].
    pub vsg: f64,
    /// Pipe inner diameter [m].
    pub diameter: f64,
    /// Inclination from horizontal, positive upward [rad].
    pub inclination: f64,
    pub rho_liquid: f64,
    pub rho_gas: f64,
    pub mu_liquid: f64,
    pub mu_gas: f64,
    /// Gas-liquid surface tension [N/m].
    pub surface_tension: f64,
    /// Local pressure [Pa], used by Hagedorn-Brown.
    pub pressure: f64,
}

impl SuperficialFlow {
    pub fn mixture_velocity(&self) -> f64 {
        self.vsl + self.vsg
    }

    /// Input liquid content (no-slip holdup).
    pub fn no_slip_holdup(&self) -> f64 {
        let vm = self.mixture_velocity();
        if vm <= 0.0 { 1.0 } else { self.vsl / vm }
    }

    /// Mixture density at a given liquid holdup.
    pub fn slip_density(&self, holdup: f64) -> f64 {
        self.rho_liquid * holdup + self.rho_gas * (1.0 - holdup)
    }

    fn validate(&self) -> HydraulicsResult<()> {
        for (v, what) in [
            (self.vsl, "superficial liquid velocity"),
            (self.vsg, "superficial gas velocity"),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(HydraulicsError::NonPhysicalFlow { what });
            }
        }
        if !(self.diameter.is_finite() && self.diameter > 0.0) {
            return Err(HydraulicsError::NonPhysicalFlow { what: "diameter" });
        }
        if !(self.rho_liquid.is_finite() && self.rho_liquid > 0.0) {
            return Err(HydraulicsError::NonPhysicalFlow {
                what: "liquid density",
            });
        }
        if !(self.surface_tension.is_finite() && self.surface_tension > 0.0) {
            return Err(HydraulicsError::NonPhysicalFlow {
                what: "surface tension",
            });
        }
        Ok(())
    }
}

/// Correlation output.
#[derive(Debug, Clone, Copy)]
pub struct HoldupResult {
    /// In-situ liquid fraction, in [no-slip, 1].
    pub liquid_holdup: f64,
    pub pattern: FlowPattern,
    /// Ratio of two-phase to no-slip friction factor.
    pub friction_multiplier: f64,
}

/// Evaluate the selected correlation.
pub fn liquid_holdup(
    correlation: FlowCorrelation,
    flow: &SuperficialFlow,
) -> HydraulicsResult<HoldupResult> {
    flow.validate()?;

    // Degenerate single-phase limits short-circuit every correlation
    if flow.vsg < EPSILON_FLOW {
        return Ok(HoldupResult {
            liquid_holdup: 1.0,
            pattern: FlowPattern::SinglePhaseLiquid,
            friction_multiplier: 1.0,
        });
    }
    if flow.vsl < EPSILON_FLOW {
        return Ok(HoldupResult {
            liquid_holdup: 0.0,
            pattern: FlowPattern::SinglePhaseGas,
            friction_multiplier: 1.0,
        });
    }

    match correlation {
        FlowCorrelation::SinglePhase => Ok(HoldupResult {
            liquid_holdup: flow.no_slip_holdup(),
            pattern: if flow.no_slip_holdup() > 0.5 {
                FlowPattern::SinglePhaseLiquid
            } else {
                FlowPattern::SinglePhaseGas
            },
            friction_multiplier: 1.0,
        }),
        FlowCorrelation::BeggsBrill => beggs_brill(flow),
        FlowCorrelation::HagedornBrown => hagedorn_brown(flow),
        FlowCorrelation::DunsRos => duns_ros(flow),
        FlowCorrelation::Ansari => ansari(flow),
        FlowCorrelation::Gray => gray(flow),
    }
}

/// Liquid velocity number Nvl = vsl·(ρl/(gσ))^¼.
fn velocity_number(v: f64, rho_l: f64, sigma: f64) -> f64 {
    v * (rho_l / (G0_MPS2 * sigma)).powf(0.25)
}

fn beggs_brill(flow: &SuperficialFlow) -> HydraulicsResult<HoldupResult> {
    let vm = flow.mixture_velocity();
    let lambda = flow.no_slip_holdup();
    let froude = vm * vm / (G0_MPS2 * flow.diameter);

    let l1 = 316.0 * lambda.powf(0.302);
    let l2 = 0.000_925_2 * lambda.powf(-2.4684);
    let l3 = 0.10 * lambda.powf(-1.4516);
    let l4 = 0.5 * lambda.powf(-6.738);

    let pattern = if (lambda < 0.01 && froude < l1) || (lambda >= 0.01 && froude < l2) {
        FlowPattern::Segregated
    } else if lambda >= 0.01 && froude >= l2 && froude <= l3 {
        FlowPattern::Transition
    } else if ((0.01..0.4).contains(&lambda) && froude > l3 && froude <= l1)
        || (lambda >= 0.4 && froude > l3 && froude <= l4)
    {
        FlowPattern::Intermittent
    } else {
        FlowPattern::Distributed
    };

    let nvl = velocity_number(flow.vsl, flow.rho_liquid, flow.surface_tension);

    let holdup = match pattern {
        FlowPattern::Transition => {
            // Weighted blend of the neighboring patterns
            let a = ((l3 - froude) / (l3 - l2)).clamp(0.0, 1.0);
            let h_seg = bb_inclined_holdup(FlowPattern::Segregated, lambda, froude, nvl, flow);
            let h_int = bb_inclined_holdup(FlowPattern::Intermittent, lambda, froude, nvl, flow);
            a * h_seg + (1.0 - a) * h_int
        }
        p => bb_inclined_holdup(p, lambda, froude, nvl, flow),
    };

    Ok(HoldupResult {
        liquid_holdup: holdup,
        pattern,
        friction_multiplier: bb_friction_multiplier(lambda, holdup),
    })
}

/// Horizontal holdup corrected for inclination, per Beggs-Brill.
fn bb_inclined_holdup(
    pattern: FlowPattern,
    lambda: f64,
    froude: f64,
    nvl: f64,
    flow: &SuperficialFlow,
) -> f64 {
    let (a, b, c) = match pattern {
        FlowPattern::Segregated => (0.98, 0.4846, 0.0868),
        FlowPattern::Intermittent => (0.845, 0.5351, 0.0173),
        _ => (1.065, 0.5824, 0.0609),
    };
    let h0 = (a * lambda.powf(b) / froude.powf(c)).max(lambda);

    let theta = flow.inclination;
    if theta.abs() < 1e-9 {
        return h0.clamp(0.0, 1.0);
    }

    let uphill = theta > 0.0;
    let coef = if uphill {
        match pattern {
            FlowPattern::Segregated => Some((0.011, -3.768, 3.539, -1.614)),
            FlowPattern::Intermittent => Some((2.96, 0.305, -0.4473, 0.0978)),
            // Distributed uphill flow needs no correction
            _ => None,
        }
    } else {
        Some((4.70, -0.3692, 0.1244, -0.5056))
    };

    let psi = match coef {
        None => 1.0,
        Some((d, e, f, g)) => {
            let arg = d * lambda.powf(e) * nvl.powf(f) * froude.powf(g);
            let c_factor = ((1.0 - lambda) * arg.ln()).max(0.0);
            let s = (1.8 * theta).sin();
            1.0 + c_factor * (s - s.powi(3) / 3.0)
        }
    };

    (h0 * psi).clamp(0.0, 1.0)
}

/// Two-phase friction multiplier ftp/fns = e^s.
fn bb_friction_multiplier(lambda: f64, holdup: f64) -> f64 {
    if holdup <= 0.0 || lambda <= 0.0 {
        return 1.0;
    }
    let y = lambda / (holdup * holdup);
    if y <= 0.0 {
        return 1.0;
    }
    let s = if (1.0..1.2).contains(&y) {
        // The general form is singular on this interval
        (2.2 * y - 1.2).ln()
    } else {
        let ln_y = y.ln();
        ln_y / (-0.0523 + 3.182 * ln_y - 0.8725 * ln_y.powi(2) + 0.018_53 * ln_y.powi(4))
    };
    s.exp().clamp(0.25, 10.0)
}

fn hagedorn_brown(flow: &SuperficialFlow) -> HydraulicsResult<HoldupResult> {
    let lambda = flow.no_slip_holdup();
    let sigma = flow.surface_tension;
    let rho_l = flow.rho_liquid;

    let nvl = velocity_number(flow.vsl, rho_l, sigma);
    let nvg = velocity_number(flow.vsg, rho_l, sigma);
    let nd = flow.diameter * (rho_l * G0_MPS2 / sigma).sqrt();
    let nl = flow.mu_liquid * (G0_MPS2 / (rho_l * sigma.powi(3))).powf(0.25);

    let cnl = (0.061 * nl.powi(3) - 0.0929 * nl.powi(2) + 0.0505 * nl + 0.0019).max(0.002);

    let h = (nvl / nvg.powf(0.575)) * (flow.pressure / 101_325.0).powf(0.1) * (cnl / nd);
    let hl_over_psi = ((0.0047 + 1123.32 * h + 729_489.64 * h * h)
        / (1.0 + 1097.1566 * h + 722_153.97 * h * h))
        .sqrt();

    let b = nvg * nl.powf(0.38) / nd.powf(2.14);
    let psi = if b <= 0.025 {
        27_170.0 * b.powi(3) - 317.52 * b * b + 0.547_2 * b + 0.999_9
    } else if b <= 0.055 {
        -533.33 * b * b + 58.524 * b + 0.117_1
    } else {
        2.571_4 * b + 1.596_2
    }
    .max(1.0);

    let holdup = (hl_over_psi * psi).clamp(lambda, 1.0);

    Ok(HoldupResult {
        liquid_holdup: holdup,
        pattern: if lambda > 0.7 {
            FlowPattern::Bubble
        } else {
            FlowPattern::Slug
        },
        friction_multiplier: 1.0,
    })
}

fn duns_ros(flow: &SuperficialFlow) -> HydraulicsResult<HoldupResult> {
    let vm = flow.mixture_velocity();
    let lambda = flow.no_slip_holdup();
    let ngv = velocity_number(flow.vsg, flow.rho_liquid, flow.surface_tension);

    // High gas-velocity number region: mist flow, effectively no slip
    if ngv > 75.0 {
        return Ok(HoldupResult {
            liquid_holdup: lambda,
            pattern: FlowPattern::Mist,
            friction_multiplier: 1.0,
        });
    }

    let drho = (flow.rho_liquid - flow.rho_gas).max(1.0);
    let vd = 0.35 * (G0_MPS2 * flow.diameter * drho / flow.rho_liquid).sqrt();
    let holdup = (1.0 - flow.vsg / (1.2 * vm + vd)).clamp(lambda, 1.0);

    let pattern = if flow.vsg / vm < 0.25 {
        FlowPattern::Bubble
    } else {
        FlowPattern::Slug
    };

    Ok(HoldupResult {
        liquid_holdup: holdup,
        pattern,
        friction_multiplier: 1.0,
    })
}

fn ansari(flow: &SuperficialFlow) -> HydraulicsResult<HoldupResult> {
    let vm = flow.mixture_velocity();
    let lambda = flow.no_slip_holdup();
    let drho = (flow.rho_liquid - flow.rho_gas).max(1.0);
    let sigma = flow.surface_tension;

    // Annular transition: gas core fast enough to suspend the film
    let rho_g = flow.rho_gas.max(0.1);
    let vsg_annular = 3.1 * (G0_MPS2 * sigma * drho / (rho_g * rho_g)).powf(0.25);
    if flow.vsg > vsg_annular {
        return Ok(HoldupResult {
            liquid_holdup: lambda,
            pattern: FlowPattern::Annular,
            friction_multiplier: 1.0,
        });
    }

    let (pattern, vd) = if flow.vsg / vm < 0.25 {
        let vd = 1.53 * (G0_MPS2 * sigma * drho / (flow.rho_liquid * flow.rho_liquid)).powf(0.25);
        (FlowPattern::Bubble, vd)
    } else {
        let vd = 0.35 * (G0_MPS2 * flow.diameter * drho / flow.rho_liquid).sqrt();
        (FlowPattern::Slug, vd)
    };

    let holdup = (1.0 - flow.vsg / (1.2 * vm + vd)).clamp(lambda, 1.0);

    Ok(HoldupResult {
        liquid_holdup: holdup,
        pattern,
        friction_multiplier: 1.0,
    })
}

fn gray(flow: &SuperficialFlow) -> HydraulicsResult<HoldupResult> {
    let vm = flow.mixture_velocity();
    let lambda = flow.no_slip_holdup();
    let drho = (flow.rho_liquid - flow.rho_gas).max(1.0);
    let sigma = flow.surface_tension;

    let rho_ns = flow.slip_density(lambda);
    let r = flow.vsl / flow.vsg;

    let n1 = rho_ns * rho_ns * vm.powi(4) / (G0_MPS2 * sigma * drho);
    let n2 = G0_MPS2 * flow.diameter * flow.diameter * drho / sigma;

    let b = 0.0814 * (1.0 - 0.0554 * (1.0 + 730.0 * r / (r + 1.0)).ln());
    let f1 = -2.314 * (n1 * (1.0 + 205.0 / n2)).powf(b);

    let holdup = (1.0 - (1.0 - lambda) * (1.0 - f1.exp())).clamp(lambda, 1.0);

    Ok(HoldupResult {
        liquid_holdup: holdup,
        pattern: FlowPattern::Annular,
        friction_multiplier: 1.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_flow() -> SuperficialFlow {
        SuperficialFlow {
            vsl: 0.5,
            vsg: 1.5,
            diameter: 0.062,
            inclination: std::f64::consts::FRAC_PI_2,
            rho_liquid: 800.0,
            rho_gas: 40.0,
            mu_liquid: 2.0e-3,
            mu_gas: 1.5e-5,
            surface_tension: 0.03,
            pressure: 5.0e6,
        }
    }

    #[test]
    fn single_phase_limits() {
        let mut flow = base_flow();
        flow.vsg = 0.0;
        let res = liquid_holdup(FlowCorrelation::BeggsBrill, &flow).unwrap();
        assert_eq!(res.liquid_holdup, 1.0);
        assert_eq!(res.pattern, FlowPattern::SinglePhaseLiquid);

        let mut flow = base_flow();
        flow.vsl = 0.0;
        let res = liquid_holdup(FlowCorrelation::Gray, &flow).unwrap();
        assert_eq!(res.liquid_holdup, 0.0);
        assert_eq!(res.pattern, FlowPattern::SinglePhaseGas);
    }

    #[test]
    fn holdup_at_least_no_slip_for_upflow() {
        let flow = base_flow();
        let lambda = flow.no_slip_holdup();
        for corr in [
            FlowCorrelation::BeggsBrill,
            FlowCorrelation::HagedornBrown,
            FlowCorrelation::DunsRos,
            FlowCorrelation::Ansari,
            FlowCorrelation::Gray,
        ] {
            let res = liquid_holdup(corr, &flow).unwrap();
            assert!(
                res.liquid_holdup >= lambda - 1e-12,
                "{corr:?}: HL {} < λ {lambda}",
                res.liquid_holdup
            );
            assert!(res.liquid_holdup <= 1.0);
        }
    }

    #[test]
    fn beggs_brill_pattern_changes_with_rate() {
        // Slow segregated-ish flow vs fast distributed flow
        let mut slow = base_flow();
        slow.inclination = 0.0;
        slow.vsl = 0.05;
        slow.vsg = 0.3;
        let slow_res = liquid_holdup(FlowCorrelation::BeggsBrill, &slow).unwrap();

        let mut fast = base_flow();
        fast.inclination = 0.0;
        fast.vsl = 4.0;
        fast.vsg = 16.0;
        let fast_res = liquid_holdup(FlowCorrelation::BeggsBrill, &fast).unwrap();

        assert_ne!(slow_res.pattern, fast_res.pattern);
    }

    #[test]
    fn gray_approaches_no_slip_at_high_rate() {
        let mut flow = base_flow();
        flow.vsl = 0.3;
        flow.vsg = 30.0;
        let fast = liquid_holdup(FlowCorrelation::Gray, &flow).unwrap();

        flow.vsg = 1.0;
        let slow = liquid_holdup(FlowCorrelation::Gray, &flow).unwrap();

        // More gas energy strips the film toward the no-slip limit
        let lambda_fast = 0.3 / 30.3;
        assert!(fast.liquid_holdup - lambda_fast < slow.liquid_holdup);
    }

    #[test]
    fn duns_ros_mist_at_high_gas_number() {
        let mut flow = base_flow();
        flow.vsg = 60.0;
        let res = liquid_holdup(FlowCorrelation::DunsRos, &flow).unwrap();
        assert_eq!(res.pattern, FlowPattern::Mist);
        assert!((res.liquid_holdup - flow.no_slip_holdup()).abs() < 1e-12);
    }

    #[test]
    fn friction_multiplier_reasonable() {
        let res = liquid_holdup(FlowCorrelation::BeggsBrill, &base_flow()).unwrap();
        assert!(res.friction_multiplier > 0.25 && res.friction_multiplier < 10.0);
    }

    #[test]
    fn rejects_negative_velocity() {
        let mut flow = base_flow();
        flow.vsl = -1.0;
        assert!(liquid_holdup(FlowCorrelation::BeggsBrill, &flow).is_err());
    }
}
