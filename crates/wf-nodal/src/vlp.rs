//! Vertical lift performance.
//!
//! Integrates the wellbore pressure profile from the wellhead down to
//! bottomhole along the deviation survey, one survey interval at a time:
//! fluid state re-derived at each step, liquid holdup from the selected
//! multiphase correlation, friction from the Darcy factor with the
//! correlation's two-phase multiplier. Correlation bias factors (friction,
//! holdup, temperature) scale the respective terms for data matching.

use crate::curve::Curve;
use crate::error::{AnalysisResult, NodalError};
use crate::survey::DeviationSurvey;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use wf_core::units::constants::G0_MPS2;
use wf_core::units::{Length, Pressure, Temperature};
use wf_hydraulics::HydraulicsError;
use wf_hydraulics::common::{EPSILON_FLOW, flow_area};
use wf_hydraulics::correlations::{FlowCorrelation, SuperficialFlow, liquid_holdup};
use wf_hydraulics::friction::friction_factor;
use wf_pvt::{FluidSpec, evaluate_fluid_state};

/// Tunable correlation multipliers fitted by the data matcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiasFactors {
    pub friction: f64,
    pub holdup: f64,
    pub temperature: f64,
}

impl Default for BiasFactors {
    fn default() -> Self {
        Self {
            friction: 1.0,
            holdup: 1.0,
            temperature: 1.0,
        }
    }
}

/// Tubing/completion geometry.
#[derive(Debug, Clone, Copy)]
pub struct Completion {
    pub tubing_inner_diameter: Length,
    pub roughness: Length,
}

impl Completion {
    fn validate(&self) -> AnalysisResult<()> {
        if !(self.tubing_inner_diameter.value.is_finite() && self.tubing_inner_diameter.value > 0.0)
        {
            return Err(NodalError::InvalidVlpSettings {
                what: "tubing inner diameter must be positive",
            });
        }
        if !(self.roughness.value.is_finite() && self.roughness.value >= 0.0) {
            return Err(NodalError::InvalidVlpSettings {
                what: "roughness must be non-negative",
            });
        }
        Ok(())
    }
}

/// VLP configuration.
#[derive(Debug, Clone, Copy)]
pub struct VlpSettings {
    pub correlation: FlowCorrelation,
    /// Fixed wellhead (outlet) pressure the curve is computed against.
    pub wellhead_pressure: Pressure,
    pub surface_temperature: Temperature,
    /// Linear geothermal gradient [K/m of TVD].
    pub geothermal_gradient: f64,
    /// Gas-liquid surface tension for the holdup correlations [N/m].
    pub surface_tension: f64,
    pub bias: BiasFactors,
}

impl VlpSettings {
    pub fn new(correlation: FlowCorrelation, wellhead_pressure: Pressure) -> Self {
        Self {
            correlation,
            wellhead_pressure,
            surface_temperature: wf_core::units::k(288.15),
            geothermal_gradient: 0.03,
            surface_tension: 0.03,
            bias: BiasFactors::default(),
        }
    }

    fn validate(&self) -> AnalysisResult<()> {
        if !(self.wellhead_pressure.value.is_finite() && self.wellhead_pressure.value > 0.0) {
            return Err(NodalError::InvalidVlpSettings {
                what: "wellhead pressure must be positive",
            });
        }
        if !(self.surface_temperature.value.is_finite() && self.surface_temperature.value > 0.0) {
            return Err(NodalError::InvalidVlpSettings {
                what: "surface temperature must be positive",
            });
        }
        if !(self.geothermal_gradient.is_finite() && self.geothermal_gradient >= 0.0) {
            return Err(NodalError::InvalidVlpSettings {
                what: "geothermal gradient must be non-negative",
            });
        }
        for (v, what) in [
            (self.bias.friction, "friction bias factor"),
            (self.bias.holdup, "holdup bias factor"),
            (self.bias.temperature, "temperature bias factor"),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(NodalError::InvalidVlpSettings { what });
            }
        }
        Ok(())
    }
}

/// Upper bound on the integrated pressure; beyond this the profile has
/// diverged and the point is reported invalid.
const PRESSURE_CEILING_PA: f64 = 5.0e8;

/// Integrate the wellbore from wellhead to bottomhole at one stock-tank
/// rate [m³/s], returning the required flowing bottomhole pressure [Pa].
pub fn bottomhole_pressure(
    settings: &VlpSettings,
    fluid: &FluidSpec,
    survey: &DeviationSurvey,
    completion: &Completion,
    rate: f64,
) -> AnalysisResult<f64> {
    settings.validate()?;
    completion.validate()?;
    fluid.validate()?;
    if !rate.is_finite() || rate < 0.0 {
        return Err(NodalError::InvalidVlpSettings {
            what: "rate must be non-negative",
        });
    }

    let d = completion.tubing_inner_diameter.value;
    let area = flow_area(d);
    let rel_roughness = completion.roughness.value / d;

    let mut pressure = settings.wellhead_pressure.value;
    let mut tvd = 0.0;

    for seg in survey.segments() {
        let tvd_mid = tvd + seg.delta_tvd / 2.0;
        let t = settings.surface_temperature.value
            + settings.geothermal_gradient * tvd_mid * settings.bias.temperature;

        let state = evaluate_fluid_state(
            fluid,
            wf_core::units::pa(pressure),
            wf_core::units::k(t),
        )?;

        let q_insitu = rate * state.volume_factor;

        let (dp_hydro, dp_fric) = if q_insitu < EPSILON_FLOW {
            // Static column
            (state.density.value * G0_MPS2 * seg.delta_tvd, 0.0)
        } else {
            let vsg = q_insitu * state.gas_fraction / area;
            let vsl = q_insitu * (1.0 - state.gas_fraction) / area;

            let flow = SuperficialFlow {
                vsl,
                vsg,
                diameter: d,
                // Correlations take inclination from horizontal
                inclination: std::f64::consts::FRAC_PI_2 - seg.inclination,
                rho_liquid: state
                    .liquid_density
                    .map_or(state.density.value, |rho| rho.value),
                rho_gas: state.gas_density.map_or(0.0, |rho| rho.value),
                mu_liquid: state
                    .liquid_viscosity
                    .map_or(state.viscosity.value, |mu| mu.value),
                mu_gas: state.gas_viscosity.map_or(0.0, |mu| mu.value),
                surface_tension: settings.surface_tension,
                pressure,
            };

            let holdup_res = liquid_holdup(settings.correlation, &flow)?;
            let lambda = flow.no_slip_holdup();
            let hl = (holdup_res.liquid_holdup * settings.bias.holdup).clamp(lambda.min(1.0), 1.0);
            let rho_slip = flow.slip_density(hl);

            let vm = q_insitu / area;
            let rho_ns = state.density.value;
            let reynolds = rho_ns * vm * d / state.viscosity.value;
            let f = friction_factor(reynolds, rel_roughness)?
                * holdup_res.friction_multiplier
                * settings.bias.friction;

            let dp_f = f * seg.delta_md / d * rho_ns * vm * vm / 2.0;

            // Kinetic term guard; near-sonic flow makes the point invalid
            let ek = rho_ns * vm * vm / pressure;
            if ek >= 0.9 {
                return Err(NodalError::Hydraulics(HydraulicsError::NonPhysicalFlow {
                    what: "acceleration term approaching sonic in tubing",
                }));
            }

            let dp_hydro = rho_slip * G0_MPS2 * seg.delta_tvd;
            // Fold the kinetic term into the friction component
            (dp_hydro, dp_f / (1.0 - ek))
        };

        pressure += dp_hydro + dp_fric;
        tvd += seg.delta_tvd;

        if !pressure.is_finite() || pressure <= 0.0 || pressure > PRESSURE_CEILING_PA {
            return Err(NodalError::Hydraulics(HydraulicsError::NonPhysicalFlow {
                what: "integrated wellbore pressure out of range",
            }));
        }
    }

    Ok(pressure)
}

/// Generate the VLP curve at the given stock-tank rates.
///
/// Rate samples are independent and evaluated in parallel; samples whose
/// integration fails are dropped from the curve rather than failing the
/// whole sweep.
pub fn calculate_vlp(
    settings: &VlpSettings,
    fluid: &FluidSpec,
    survey: &DeviationSurvey,
    completion: &Completion,
    rates: &[f64],
) -> AnalysisResult<Curve> {
    settings.validate()?;
    completion.validate()?;

    if rates.is_empty() {
        return Err(NodalError::InvalidCurve {
            what: "at least one rate sample is required",
        });
    }

    let points: Vec<Option<(f64, f64)>> = rates
        .par_iter()
        .map(|&q| {
            bottomhole_pressure(settings, fluid, survey, completion, q)
                .ok()
                .map(|pwf| (q, pwf))
        })
        .collect();

    let num_failed = points.iter().filter(|p| p.is_none()).count();
    if num_failed > 0 {
        debug!(num_failed, "VLP sweep dropped invalid rate samples");
    }

    let valid: Vec<(f64, f64)> = points.into_iter().flatten().collect();
    if valid.is_empty() {
        return Err(NodalError::InsufficientData {
            what: "no VLP rate sample produced a valid bottomhole pressure",
        });
    }

    Curve::from_points(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_core::linspace;
    use wf_core::units::{kpa, m};

    fn completion() -> Completion {
        Completion {
            tubing_inner_diameter: m(0.062),
            roughness: m(4.5e-5),
        }
    }

    fn survey() -> DeviationSurvey {
        DeviationSurvey::vertical(m(3_000.0), m(100.0)).unwrap()
    }

    #[test]
    fn static_column_matches_hydrostatic_estimate() {
        // Dead oil, zero rate: the profile is pure hydrostatic
        let settings = VlpSettings::new(FlowCorrelation::SinglePhase, kpa(1_000.0));
        let fluid = FluidSpec::oil(35.0, 0.65, 0.0);

        let pwf =
            bottomhole_pressure(&settings, &fluid, &survey(), &completion(), 0.0).unwrap();

        // ~850 kg/m³ over 3,000 m is roughly 25 MPa on top of the wellhead
        assert!(pwf > 20.0e6 && pwf < 30.0e6, "pwf = {pwf}");
    }

    #[test]
    fn pwf_increases_with_rate_for_single_phase_liquid() {
        let settings = VlpSettings::new(FlowCorrelation::SinglePhase, kpa(1_000.0));
        let fluid = FluidSpec::oil(35.0, 0.65, 0.0);
        let rates = linspace(1.0e-4, 6.0e-3, 15);

        let curve =
            calculate_vlp(&settings, &fluid, &survey(), &completion(), &rates).unwrap();
        let p = curve.pressures();
        for w in p.windows(2) {
            assert!(w[1] >= w[0], "friction must grow with rate: {p:?}");
        }
    }

    #[test]
    fn gas_well_much_lighter_than_oil_well() {
        let settings = VlpSettings::new(FlowCorrelation::SinglePhase, kpa(2_000.0));
        let oil = FluidSpec::oil(35.0, 0.65, 0.0);
        let gas = FluidSpec::gas(0.65);

        let pwf_oil =
            bottomhole_pressure(&settings, &oil, &survey(), &completion(), 1.0e-3).unwrap();
        let pwf_gas =
            bottomhole_pressure(&settings, &gas, &survey(), &completion(), 1.0e-3).unwrap();

        assert!(pwf_gas < pwf_oil / 2.0, "gas {pwf_gas}, oil {pwf_oil}");
    }

    #[test]
    fn friction_bias_raises_required_pressure() {
        let fluid = FluidSpec::two_phase(35.0, 0.65, 100.0, 0.1);
        let mut settings = VlpSettings::new(FlowCorrelation::BeggsBrill, kpa(690.0));
        let base =
            bottomhole_pressure(&settings, &fluid, &survey(), &completion(), 3.0e-3).unwrap();

        settings.bias.friction = 2.0;
        let biased =
            bottomhole_pressure(&settings, &fluid, &survey(), &completion(), 3.0e-3).unwrap();

        assert!(biased > base);
    }

    #[test]
    fn holdup_bias_raises_hydrostatic_head() {
        let fluid = FluidSpec::two_phase(35.0, 0.65, 100.0, 0.1);
        let mut settings = VlpSettings::new(FlowCorrelation::BeggsBrill, kpa(690.0));
        let base =
            bottomhole_pressure(&settings, &fluid, &survey(), &completion(), 3.0e-3).unwrap();

        settings.bias.holdup = 1.3;
        let biased =
            bottomhole_pressure(&settings, &fluid, &survey(), &completion(), 3.0e-3).unwrap();

        assert!(biased > base, "heavier column with more holdup");
    }

    #[test]
    fn rejects_invalid_settings() {
        let mut settings = VlpSettings::new(FlowCorrelation::BeggsBrill, kpa(-10.0));
        let fluid = FluidSpec::gas(0.65);
        assert!(
            bottomhole_pressure(&settings, &fluid, &survey(), &completion(), 1e-3).is_err()
        );

        settings = VlpSettings::new(FlowCorrelation::BeggsBrill, kpa(1_000.0));
        settings.bias.friction = 0.0;
        assert!(
            bottomhole_pressure(&settings, &fluid, &survey(), &completion(), 1e-3).is_err()
        );
    }
}
