//! Common utilities for flow-element calculations.

use crate::error::{HydraulicsError, HydraulicsResult};
use wf_core::numeric::ensure_finite;

/// Small epsilon for volumetric flow rate (m³/s)
pub const EPSILON_FLOW: f64 = 1e-12;

/// Small epsilon for pressure differences (Pa)
pub const EPSILON_PRESSURE: f64 = 1e-3;

/// Ensure a value is finite, returning NonPhysicalFlow if not.
pub fn check_finite(value: f64, what: &'static str) -> HydraulicsResult<()> {
    ensure_finite(value, what).map_err(|_| HydraulicsError::NonPhysicalFlow { what })?;
    Ok(())
}

/// Circular cross-section area from diameter.
pub fn flow_area(diameter_m: f64) -> f64 {
    std::f64::consts::FRAC_PI_4 * diameter_m * diameter_m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_finite() {
        assert!(check_finite(1.0, "test").is_ok());
        assert!(check_finite(f64::INFINITY, "test").is_err());
        assert!(check_finite(f64::NAN, "test").is_err());
    }

    #[test]
    fn test_flow_area() {
        let a = flow_area(0.1);
        assert!((a - 0.007_853_98).abs() < 1e-6);
    }
}
