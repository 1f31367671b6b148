//! Darcy friction factor.
//!
//! Laminar flow uses the exact 64/Re; turbulent flow solves Colebrook-White
//! iteratively, seeded with the explicit Swamee-Jain approximation.

use crate::error::{HydraulicsError, HydraulicsResult};

/// Laminar/turbulent transition Reynolds number.
pub const RE_LAMINAR_LIMIT: f64 = 2300.0;

const COLEBROOK_MAX_ITER: usize = 25;
const COLEBROOK_TOL: f64 = 1e-10;

/// Swamee-Jain explicit approximation to Colebrook-White.
fn swamee_jain(reynolds: f64, rel_roughness: f64) -> f64 {
    let a = rel_roughness / 3.7;
    let b = 5.74 / reynolds.powf(0.9);
    0.25 / (a + b).log10().powi(2)
}

/// Darcy friction factor for pipe flow.
///
/// `rel_roughness` is absolute roughness over diameter.
pub fn friction_factor(reynolds: f64, rel_roughness: f64) -> HydraulicsResult<f64> {
    if !reynolds.is_finite() || reynolds <= 0.0 {
        return Err(HydraulicsError::NonPhysicalFlow {
            what: "Reynolds number",
        });
    }

    if reynolds < RE_LAMINAR_LIMIT {
        return Ok(64.0 / reynolds);
    }

    // Colebrook-White fixed-point iteration on x = 1/sqrt(f):
    //   x = -2 log10(e/3.7D + 2.51 x / Re)
    let mut x = 1.0 / swamee_jain(reynolds, rel_roughness).sqrt();
    for _ in 0..COLEBROOK_MAX_ITER {
        let x_next = -2.0 * (rel_roughness / 3.7 + 2.51 * x / reynolds).log10();
        if (x_next - x).abs() < COLEBROOK_TOL {
            x = x_next;
            break;
        }
        x = x_next;
    }

    let f = (1.0 / (x * x)).max(1e-4);
    if !f.is_finite() {
        return Err(HydraulicsError::NonPhysicalFlow {
            what: "friction factor",
        });
    }
    Ok(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn laminar_is_exact() {
        // f = 64/Re at Re = 2000
        let f = friction_factor(2000.0, 1e-4).unwrap();
        assert!((f - 0.032).abs() < 1e-6);
    }

    #[test]
    fn turbulent_smooth_pipe_magnitude() {
        // Smooth pipe at Re = 1e5 sits near 0.018
        let f = friction_factor(1.0e5, 0.0).unwrap();
        assert!(f > 0.015 && f < 0.02, "f = {f}");
    }

    #[test]
    fn rough_pipe_has_more_friction() {
        let smooth = friction_factor(1.0e6, 1e-6).unwrap();
        let rough = friction_factor(1.0e6, 1e-3).unwrap();
        assert!(rough > smooth);
    }

    #[test]
    fn colebrook_agrees_with_swamee_jain() {
        // The iterative solution stays within a few percent of the seed
        for (re, e) in [(1.0e4, 1e-4), (1.0e5, 4.4e-4), (3.8e6, 4.4e-4)] {
            let f = friction_factor(re, e).unwrap();
            let sj = swamee_jain(re, e);
            assert!((f - sj).abs() / sj < 0.05, "Re={re} e={e}: f={f} sj={sj}");
        }
    }

    #[test]
    fn rejects_non_physical_reynolds() {
        assert!(friction_factor(-10.0, 1e-4).is_err());
        assert!(friction_factor(f64::NAN, 1e-4).is_err());
    }
}
