//! Choke flow element with sub-critical and critical (choked) flow.
//!
//! Compressible flow through the choke is checked against the critical
//! pressure ratio (2/(k+1))^(k/(k-1)); at or below it the flow chokes and
//! the rate depends on upstream conditions only. That transition is modeled
//! explicitly, not approximated with the sub-critical formula.

use crate::common::{EPSILON_FLOW, check_finite, flow_area};
use crate::error::{HydraulicsError, HydraulicsResult};
use wf_core::units::{Length, Pressure, VolRate, m3ps, pa};
use wf_pvt::FluidState;

/// Choke opening specification.
#[derive(Debug, Clone, Copy)]
pub enum ChokeMode {
    /// Fixed bean (orifice) of the given diameter.
    FixedBean { bean_diameter: Length },
    /// Adjustable choke at a percent opening of the maximum bean.
    PercentOpen {
        percent: f64,
        max_bean_diameter: Length,
    },
}

/// Choke configuration.
#[derive(Debug, Clone, Copy)]
pub struct ChokeSettings {
    pub mode: ChokeMode,
    /// Upstream line inner diameter, for the bean ratio.
    pub inlet_diameter: Length,
    /// Direct discharge-coefficient override; the empirical curve is used
    /// when absent.
    pub discharge_coefficient: Option<f64>,
}

impl ChokeSettings {
    fn validate(&self) -> HydraulicsResult<()> {
        if !(self.inlet_diameter.value.is_finite() && self.inlet_diameter.value > 0.0) {
            return Err(HydraulicsError::InvalidDeviceConfig {
                what: "choke inlet diameter must be positive",
            });
        }
        match self.mode {
            ChokeMode::FixedBean { bean_diameter } => {
                if !(bean_diameter.value.is_finite() && bean_diameter.value > 0.0) {
                    return Err(HydraulicsError::InvalidDeviceConfig {
                        what: "bean diameter must be positive",
                    });
                }
                if bean_diameter.value >= self.inlet_diameter.value {
                    return Err(HydraulicsError::InvalidDeviceConfig {
                        what: "bean diameter must be smaller than the inlet",
                    });
                }
            }
            ChokeMode::PercentOpen {
                percent,
                max_bean_diameter,
            } => {
                if !(percent.is_finite() && (0.0..=100.0).contains(&percent)) {
                    return Err(HydraulicsError::InvalidDeviceConfig {
                        what: "percent open must be in [0, 100]",
                    });
                }
                if !(max_bean_diameter.value.is_finite() && max_bean_diameter.value > 0.0) {
                    return Err(HydraulicsError::InvalidDeviceConfig {
                        what: "max bean diameter must be positive",
                    });
                }
            }
        }
        if let Some(cd) = self.discharge_coefficient {
            if !(cd.is_finite() && cd > 0.0 && cd <= 1.0) {
                return Err(HydraulicsError::InvalidDeviceConfig {
                    what: "discharge coefficient must be in (0, 1]",
                });
            }
        }
        Ok(())
    }

    /// Effective throat area; percent-open scales the maximum bean area
    /// linearly.
    pub fn effective_area(&self) -> f64 {
        match self.mode {
            ChokeMode::FixedBean { bean_diameter } => flow_area(bean_diameter.value),
            ChokeMode::PercentOpen {
                percent,
                max_bean_diameter,
            } => flow_area(max_bean_diameter.value) * (percent / 100.0).clamp(0.0, 1.0),
        }
    }

    /// Discharge coefficient from the empirical opening curves, unless
    /// overridden. Both curves are monotone increasing with opening,
    /// anchored at sharp-edged-orifice values.
    pub fn discharge_coefficient(&self) -> f64 {
        if let Some(cd) = self.discharge_coefficient {
            return cd;
        }
        match self.mode {
            ChokeMode::FixedBean { bean_diameter } => {
                let beta = (bean_diameter.value / self.inlet_diameter.value).clamp(0.0, 0.99);
                (0.60 + 0.25 * beta).min(0.85)
            }
            ChokeMode::PercentOpen { percent, .. } => {
                let frac = (percent / 100.0).clamp(0.0, 1.0);
                0.60 + 0.22 * frac
            }
        }
    }
}

/// Flow regime across the choke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChokeRegime {
    SubCritical,
    /// Choked: rate independent of downstream pressure.
    Critical,
}

/// Result of a choke evaluation.
#[derive(Debug, Clone)]
pub struct ChokeResult {
    pub delta_p: Pressure,
    pub regime: ChokeRegime,
    pub discharge_coefficient: f64,
    pub warnings: Vec<String>,
}

/// Critical (choked) pressure ratio for an isentropic exponent k.
pub fn critical_pressure_ratio(k: f64) -> f64 {
    (2.0 / (k + 1.0)).powf(k / (k - 1.0))
}

/// Margin above the critical ratio at which a near-critical warning is
/// attached.
const NEAR_CRITICAL_MARGIN: f64 = 0.05;

/// Evaluate the choke pressure drop for a known in-situ flow rate.
pub fn evaluate_choke(
    settings: &ChokeSettings,
    state: &FluidState,
    flow_rate: VolRate,
) -> HydraulicsResult<ChokeResult> {
    settings.validate()?;

    let q = flow_rate.value;
    if !q.is_finite() || q < 0.0 {
        return Err(HydraulicsError::NonPhysicalFlow {
            what: "flow rate through choke",
        });
    }

    let cd = settings.discharge_coefficient();
    if q < EPSILON_FLOW {
        return Ok(ChokeResult {
            delta_p: pa(0.0),
            regime: ChokeRegime::SubCritical,
            discharge_coefficient: cd,
            warnings: Vec::new(),
        });
    }

    let rho = state.density.value;
    if !rho.is_finite() || rho <= 0.0 {
        return Err(HydraulicsError::NonPhysicalFlow { what: "density" });
    }

    let area = settings.effective_area();
    if area <= 0.0 {
        return Err(HydraulicsError::InvalidDeviceConfig {
            what: "choke is fully closed",
        });
    }

    // Orifice relation q = Cd·A·√(2ΔP/ρ), inverted for ΔP
    let mut dp = rho * q * q / (2.0 * cd * cd * area * area);
    check_finite(dp, "choke pressure drop")?;

    let p_up = state.pressure.value;
    let mut regime = ChokeRegime::SubCritical;
    let mut warnings = Vec::new();

    if state.has_free_gas() {
        let r_crit = critical_pressure_ratio(state.heat_capacity_ratio);
        let ratio = (p_up - dp) / p_up;

        if ratio <= r_crit {
            // Choked: the throat reaches sonic conditions and the drop is
            // pinned at the critical ratio
            regime = ChokeRegime::Critical;
            dp = p_up * (1.0 - r_crit);
            warnings.push(
                "choke in critical (choked) flow: rate independent of downstream pressure"
                    .to_string(),
            );
        } else if ratio <= r_crit + NEAR_CRITICAL_MARGIN {
            warnings.push("approaching choke critical flow".to_string());
        }
    }

    Ok(ChokeResult {
        delta_p: pa(dp),
        regime,
        discharge_coefficient: cd,
        warnings,
    })
}

/// Flow rate through the choke for a known downstream pressure.
///
/// In the choked branch the returned rate is a function of upstream state
/// only; further reductions in downstream pressure do not change it.
pub fn choke_rate_for_pressures(
    settings: &ChokeSettings,
    state: &FluidState,
    downstream: Pressure,
) -> HydraulicsResult<(VolRate, ChokeRegime)> {
    settings.validate()?;

    let p_up = state.pressure.value;
    let p_down = downstream.value;
    if !p_down.is_finite() || p_down < 0.0 || p_down > p_up {
        return Err(HydraulicsError::NonPhysicalFlow {
            what: "downstream pressure",
        });
    }

    let rho = state.density.value;
    let cd = settings.discharge_coefficient();
    let area = settings.effective_area();
    if area <= 0.0 {
        return Ok((m3ps(0.0), ChokeRegime::SubCritical));
    }

    if state.has_free_gas() {
        let k = state.heat_capacity_ratio;
        let r_crit = critical_pressure_ratio(k);
        if p_down / p_up <= r_crit {
            // Choked mass flux: G = Cd·A·√(kρP·(2/(k+1))^((k+1)/(k-1)))
            let exp = (k + 1.0) / (k - 1.0);
            let mdot = cd * area * (k * rho * p_up * (2.0 / (k + 1.0)).powf(exp)).sqrt();
            return Ok((m3ps(mdot / rho), ChokeRegime::Critical));
        }
    }

    let dp = p_up - p_down;
    let q = cd * area * (2.0 * dp / rho).sqrt();
    check_finite(q, "choke flow rate")?;
    Ok((m3ps(q), ChokeRegime::SubCritical))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_core::units::{k, kpa, m};
    use wf_pvt::{FluidSpec, evaluate_fluid_state};

    fn gas_state_5000_kpa() -> FluidState {
        let spec = FluidSpec::gas(0.65);
        evaluate_fluid_state(&spec, kpa(5_000.0), k(333.0)).unwrap()
    }

    fn bean_choke(bean_m: f64) -> ChokeSettings {
        ChokeSettings {
            mode: ChokeMode::FixedBean {
                bean_diameter: m(bean_m),
            },
            inlet_diameter: m(0.1023),
            discharge_coefficient: None,
        }
    }

    #[test]
    fn critical_ratio_magnitude() {
        // Typical gases choke near 0.5-0.55
        let r = critical_pressure_ratio(1.28);
        assert!(r > 0.5 && r < 0.56, "r = {r}");
    }

    #[test]
    fn cd_curve_monotone_in_bean() {
        let cd_small = bean_choke(0.01).discharge_coefficient();
        let cd_large = bean_choke(0.05).discharge_coefficient();
        assert!(cd_large > cd_small);
        assert!(cd_small >= 0.6 && cd_large <= 0.85);
    }

    #[test]
    fn cd_curve_monotone_in_percent() {
        let make = |pct| ChokeSettings {
            mode: ChokeMode::PercentOpen {
                percent: pct,
                max_bean_diameter: m(0.03),
            },
            inlet_diameter: m(0.1023),
            discharge_coefficient: None,
        };
        let mut prev = 0.0;
        for pct in [10.0, 30.0, 50.0, 80.0, 100.0] {
            let cd = make(pct).discharge_coefficient();
            assert!(cd > prev, "Cd not monotone at {pct}%");
            prev = cd;
        }
    }

    #[test]
    fn choked_branch_reported_below_critical_ratio() {
        // 1000/5000 = 0.2, well below the ~0.55 critical ratio
        let state = gas_state_5000_kpa();
        let (_, regime) =
            choke_rate_for_pressures(&bean_choke(0.02), &state, kpa(1_000.0)).unwrap();
        assert_eq!(regime, ChokeRegime::Critical);
    }

    #[test]
    fn choked_rate_independent_of_downstream() {
        let state = gas_state_5000_kpa();
        let settings = bean_choke(0.02);

        let (q1, r1) = choke_rate_for_pressures(&settings, &state, kpa(1_000.0)).unwrap();
        let (q2, r2) = choke_rate_for_pressures(&settings, &state, kpa(500.0)).unwrap();

        assert_eq!(r1, ChokeRegime::Critical);
        assert_eq!(r2, ChokeRegime::Critical);
        assert_eq!(q1.value, q2.value);
        assert!(q1.value > 0.0);
    }

    #[test]
    fn sub_critical_rate_depends_on_downstream() {
        let state = gas_state_5000_kpa();
        let settings = bean_choke(0.02);

        let (q_hi, r) = choke_rate_for_pressures(&settings, &state, kpa(4_500.0)).unwrap();
        assert_eq!(r, ChokeRegime::SubCritical);
        let (q_lo, _) = choke_rate_for_pressures(&settings, &state, kpa(4_000.0)).unwrap();
        assert!(q_lo.value > q_hi.value);
    }

    #[test]
    fn evaluate_choke_flags_choked_flow() {
        let state = gas_state_5000_kpa();
        let settings = bean_choke(0.01);

        // Force a large drop through a small bean
        let res = evaluate_choke(&settings, &state, wf_core::units::m3ps(0.05)).unwrap();
        assert_eq!(res.regime, ChokeRegime::Critical);
        assert!(!res.warnings.is_empty());
        // The drop is pinned at the critical ratio
        let expected = state.pressure.value * (1.0 - critical_pressure_ratio(1.28));
        assert!((res.delta_p.value - expected).abs() < 1.0);
    }

    #[test]
    fn rejects_bean_larger_than_inlet() {
        let settings = bean_choke(0.2);
        let state = gas_state_5000_kpa();
        assert!(evaluate_choke(&settings, &state, wf_core::units::m3ps(0.01)).is_err());
    }
}
