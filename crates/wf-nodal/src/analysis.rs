//! Nodal analysis: IPR/VLP operating-point search.
//!
//! Defines f(q) = IPR_Pwf(q) − VLP_Pwf(q) and bisects it over the rate
//! domain after a bracketing scan. Non-convergence and missing
//! intersections are reported in the result structure, never thrown.

use crate::curve::Curve;
use crate::error::AnalysisResult;
use crate::ipr::{IprModel, calculate_ipr};
use crate::survey::DeviationSurvey;
use crate::vlp::{Completion, VlpSettings, bottomhole_pressure, calculate_vlp};
use serde::{Deserialize, Serialize};
use tracing::debug;
use wf_core::linspace;
use wf_core::units::{Pressure, kpa};
use wf_pvt::FluidSpec;

/// Iteration and tolerance budget for the operating-point search.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisConstraints {
    pub max_iterations: usize,
    /// Convergence tolerance on |IPR − VLP|.
    pub tolerance: Pressure,
    /// Number of rate samples for the curves and the bracketing scan.
    pub curve_points: usize,
}

impl Default for AnalysisConstraints {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            tolerance: kpa(7.0),
            curve_points: 30,
        }
    }
}

/// The IPR/VLP intersection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OperatingPoint {
    /// Stock-tank rate [m³/s].
    pub rate: f64,
    /// Flowing bottomhole pressure [Pa].
    pub pwf: f64,
    /// Wellhead pressure the VLP was run against [Pa].
    pub whp: f64,
}

/// Nodal analysis outcome: best-effort even when not converged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodalResult {
    /// Absent when the curves do not intersect within the rate range.
    pub operating_point: Option<OperatingPoint>,
    pub converged: bool,
    pub iterations: usize,
    pub ipr_curve: Curve,
    pub vlp_curve: Curve,
    pub warnings: Vec<String>,
}

/// Find the rate at which reservoir inflow matches tubing outflow.
pub fn perform_nodal_analysis(
    ipr: &IprModel,
    vlp: &VlpSettings,
    fluid: &FluidSpec,
    survey: &DeviationSurvey,
    completion: &Completion,
    constraints: &AnalysisConstraints,
) -> AnalysisResult<NodalResult> {
    ipr.validate()?;

    let aof = ipr.max_rate();
    let n = constraints.curve_points.max(3);
    let rates = linspace(aof * 0.02, aof * 0.98, n);

    let ipr_curve = calculate_ipr(ipr, fluid, &rates)?;
    let vlp_curve = calculate_vlp(vlp, fluid, survey, completion, &rates)?;

    // f(q) = IPR(q) − VLP(q); a VLP failure makes the sample unusable
    let f = |q: f64| -> Option<f64> {
        let pwf_ipr = ipr.pwf_at_rate(q).ok()?;
        let pwf_vlp = bottomhole_pressure(vlp, fluid, survey, completion, q).ok()?;
        Some(pwf_ipr - pwf_vlp)
    };

    // Bracketing scan over the sampled rates
    let mut bracket = None;
    let mut prev: Option<(f64, f64)> = None;
    for &q in &rates {
        let Some(fq) = f(q) else {
            prev = None;
            continue;
        };
        if let Some((q_prev, f_prev)) = prev {
            if f_prev.signum() != fq.signum() {
                bracket = Some(((q_prev, f_prev), (q, fq)));
                break;
            }
        }
        prev = Some((q, fq));
    }

    let Some(((mut q_lo, mut f_lo), (mut q_hi, _f_hi))) = bracket else {
        debug!("no IPR/VLP intersection within the rate range");
        return Ok(NodalResult {
            operating_point: None,
            converged: false,
            iterations: 0,
            ipr_curve,
            vlp_curve,
            warnings: vec![
                "no operating point found: IPR and VLP curves do not intersect within the solved range"
                    .to_string(),
            ],
        });
    };

    // Bisection on the bracket
    let tol = constraints.tolerance.value;
    let mut warnings = Vec::new();
    let mut iterations = 0;
    let mut best_rate = 0.5 * (q_lo + q_hi);
    let mut converged = false;

    while iterations < constraints.max_iterations {
        iterations += 1;
        let q_mid = 0.5 * (q_lo + q_hi);
        best_rate = q_mid;

        let Some(f_mid) = f(q_mid) else {
            warnings.push(format!(
                "curve evaluation failed at rate {q_mid:.6e} during bisection"
            ));
            break;
        };

        if f_mid.abs() < tol {
            converged = true;
            break;
        }

        if f_mid.signum() == f_lo.signum() {
            q_lo = q_mid;
            f_lo = f_mid;
        } else {
            q_hi = q_mid;
        }
    }

    if !converged && iterations >= constraints.max_iterations {
        warnings.push(format!(
            "operating-point search did not converge within {} iterations",
            constraints.max_iterations
        ));
    }

    let pwf = ipr.pwf_at_rate(best_rate)?;
    debug!(
        rate = best_rate,
        pwf, converged, iterations, "nodal analysis finished"
    );

    Ok(NodalResult {
        operating_point: Some(OperatingPoint {
            rate: best_rate,
            pwf,
            whp: vlp.wellhead_pressure.value,
        }),
        converged,
        iterations,
        ipr_curve,
        vlp_curve,
        warnings,
    })
}
