//! VLP data matching against field-measured test points.
//!
//! Fits 1–3 correlation bias factors (friction, holdup, temperature) by
//! damped Gauss-Newton least squares: finite-difference Jacobian, normal
//! equations with Levenberg damping, factors clamped to a physical band.
//! Goodness of fit is reported as RMSE, mean absolute percent error and R².

use crate::error::{AnalysisResult, NodalError};
use crate::survey::DeviationSurvey;
use crate::vlp::{Completion, VlpSettings, bottomhole_pressure};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::debug;
use wf_core::units::pa;
use wf_pvt::FluidSpec;

/// A field-measured well test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestPoint {
    /// Stock-tank rate [m³/s].
    pub rate: f64,
    /// Measured flowing bottomhole pressure [Pa].
    pub pwf_pa: f64,
    /// Wellhead pressure during the test; the VLP setting is used when
    /// absent.
    pub whp_pa: Option<f64>,
    /// GOR during the test [sm³/sm³].
    pub gor: Option<f64>,
    /// Water cut during the test.
    pub water_cut: Option<f64>,
    pub date: Option<String>,
}

/// Which bias factors the fit may adjust.
#[derive(Debug, Clone, Copy)]
pub struct MatchOptions {
    pub fit_friction: bool,
    pub fit_holdup: bool,
    pub fit_temperature: bool,
    pub max_iterations: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            fit_friction: true,
            fit_holdup: true,
            fit_temperature: false,
            max_iterations: 25,
        }
    }
}

/// Matching outcome with fitted factors and goodness of fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingResult {
    pub bias: crate::vlp::BiasFactors,
    pub rmse_pa: f64,
    pub mean_absolute_percent_error: f64,
    pub r_squared: f64,
    pub converged: bool,
    pub iterations: usize,
    pub warnings: Vec<String>,
}

/// Bounds keeping the fitted multipliers physically plausible.
const FACTOR_MIN: f64 = 0.1;
const FACTOR_MAX: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Param {
    Friction,
    Holdup,
    Temperature,
}

/// Fit bias factors with the default options (friction + holdup).
pub fn match_vlp_to_test_points(
    settings: &VlpSettings,
    fluid: &FluidSpec,
    survey: &DeviationSurvey,
    completion: &Completion,
    points: &[TestPoint],
) -> AnalysisResult<MatchingResult> {
    match_vlp_with_options(
        settings,
        fluid,
        survey,
        completion,
        points,
        &MatchOptions::default(),
    )
}

/// Fit the selected bias factors to the test points.
pub fn match_vlp_with_options(
    settings: &VlpSettings,
    fluid: &FluidSpec,
    survey: &DeviationSurvey,
    completion: &Completion,
    points: &[TestPoint],
    options: &MatchOptions,
) -> AnalysisResult<MatchingResult> {
    if points.is_empty() {
        return Err(NodalError::InsufficientData {
            what: "at least one test point is required",
        });
    }
    for point in points {
        if !point.rate.is_finite() || point.rate < 0.0 {
            return Err(NodalError::InvalidTestPoint {
                what: "rate must be non-negative",
            });
        }
        if !point.pwf_pa.is_finite() || point.pwf_pa <= 0.0 {
            return Err(NodalError::InvalidTestPoint {
                what: "measured Pwf must be positive",
            });
        }
    }

    let mut params = Vec::new();
    if options.fit_friction {
        params.push(Param::Friction);
    }
    if options.fit_holdup {
        params.push(Param::Holdup);
    }
    if options.fit_temperature {
        params.push(Param::Temperature);
    }
    if params.is_empty() {
        return Err(NodalError::InsufficientData {
            what: "at least one bias factor must be selected for fitting",
        });
    }

    let mut warnings = Vec::new();
    if points.len() < params.len() {
        warnings.push(format!(
            "under-determined fit: {} test point(s) for {} free factor(s)",
            points.len(),
            params.len()
        ));
    }

    let apply = |x: &DVector<f64>| {
        let mut bias = settings.bias;
        for (i, p) in params.iter().enumerate() {
            match p {
                Param::Friction => bias.friction = x[i],
                Param::Holdup => bias.holdup = x[i],
                Param::Temperature => bias.temperature = x[i],
            }
        }
        bias
    };

    // Residuals: predicted minus measured Pwf per test point
    let residuals = |x: &DVector<f64>| -> AnalysisResult<DVector<f64>> {
        let bias = apply(x);
        let mut r = DVector::zeros(points.len());
        for (i, point) in points.iter().enumerate() {
            let mut point_settings = *settings;
            point_settings.bias = bias;
            if let Some(whp) = point.whp_pa {
                point_settings.wellhead_pressure = pa(whp);
            }

            let mut point_fluid = fluid.clone();
            if let Some(gor) = point.gor {
                point_fluid.gor = Some(gor);
            }
            if let Some(wct) = point.water_cut {
                point_fluid.water_cut = Some(wct);
            }

            let predicted =
                bottomhole_pressure(&point_settings, &point_fluid, survey, completion, point.rate)?;
            r[i] = predicted - point.pwf_pa;
        }
        Ok(r)
    };

    let mut x = DVector::from_element(params.len(), 1.0);
    let mut r = residuals(&x)?;
    let mut ssq = r.norm_squared();
    let mut lambda = 1e-3;
    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iterations {
        iterations += 1;

        let jac = finite_difference_jacobian(&x, &residuals)?;
        let jt = jac.transpose();
        let jtj = &jt * &jac;
        let rhs = -(&jt * &r);

        // Levenberg-damped normal equations; raise damping until the step
        // both solves and improves
        let mut improved = false;
        for _ in 0..8 {
            let damped = &jtj + DMatrix::identity(params.len(), params.len()) * lambda;
            let Some(dx) = damped.lu().solve(&rhs) else {
                lambda *= 10.0;
                continue;
            };

            let mut x_new = &x + dx;
            for v in x_new.iter_mut() {
                *v = v.clamp(FACTOR_MIN, FACTOR_MAX);
            }

            let r_new = residuals(&x_new)?;
            let ssq_new = r_new.norm_squared();
            if ssq_new < ssq {
                let step = (&x_new - &x).norm();
                let improvement = (ssq - ssq_new) / ssq.max(1e-30);
                x = x_new;
                r = r_new;
                ssq = ssq_new;
                lambda = (lambda / 3.0).max(1e-9);
                improved = true;

                if step < 1e-8 || improvement < 1e-10 {
                    converged = true;
                }
                break;
            }
            lambda *= 5.0;
        }

        if !improved {
            // Damping exhausted: already at a (local) minimum
            converged = true;
            break;
        }
        if converged {
            break;
        }

        let rmse = (ssq / points.len() as f64).sqrt();
        if rmse < 1.0 {
            // Sub-pascal residuals: done
            converged = true;
            break;
        }
    }

    let n = points.len() as f64;
    let rmse = (ssq / n).sqrt();
    let ape = points
        .iter()
        .enumerate()
        .map(|(i, p)| (r[i] / p.pwf_pa).abs())
        .sum::<f64>()
        / n
        * 100.0;

    let mean_pwf = points.iter().map(|p| p.pwf_pa).sum::<f64>() / n;
    let sstot: f64 = points.iter().map(|p| (p.pwf_pa - mean_pwf).powi(2)).sum();
    let r_squared = if sstot > f64::EPSILON {
        1.0 - ssq / sstot
    } else if ssq < 1.0 {
        1.0
    } else {
        0.0
    };

    let bias = apply(&x);
    debug!(?bias, rmse, iterations, "VLP matching finished");

    Ok(MatchingResult {
        bias,
        rmse_pa: rmse,
        mean_absolute_percent_error: ape,
        r_squared,
        converged,
        iterations,
        warnings,
    })
}

/// Forward finite-difference Jacobian of the residual vector.
fn finite_difference_jacobian<F>(x: &DVector<f64>, f: &F) -> AnalysisResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> AnalysisResult<DVector<f64>>,
{
    let f_x = f(x)?;
    let m = f_x.len();
    let n = x.len();
    let mut jac = DMatrix::zeros(m, n);

    for j in 0..n {
        let mut x_pert = x.clone();
        let dx = 1e-6 * x[j].abs().max(1.0);
        x_pert[j] += dx;

        let f_pert = f(&x_pert)?;
        let df = (f_pert - &f_x) / dx;
        for i in 0..m {
            jac[(i, j)] = df[i];
        }
    }

    Ok(jac)
}
