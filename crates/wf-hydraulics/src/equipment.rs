//! Surface-equipment node models.
//!
//! Each node kind imposes its own pressure/temperature rule: chokes use the
//! orifice model with choked-flow detection, separators hold their set
//! pressure, heaters set an outlet temperature or apply a duty, and the
//! remaining devices default to a K-factor or user-entered pressure loss.

use crate::choke::{ChokeSettings, evaluate_choke};
use crate::common::{EPSILON_FLOW, check_finite};
use crate::error::{HydraulicsError, HydraulicsResult};
use wf_core::units::constants::R_UNIVERSAL;
use wf_core::units::{Area, Power, Pressure, Temperature, VolRate, pa};
use wf_pvt::FluidState;

/// Heater operating mode.
#[derive(Debug, Clone, Copy)]
pub enum HeaterMode {
    /// Hold a fixed outlet temperature.
    OutletTemperature(Temperature),
    /// Apply a fixed duty; ΔT follows from the mass flow and heat capacity.
    Duty(Power),
}

/// Pressure-loss model for pass-through devices.
#[derive(Debug, Clone, Copy)]
pub enum LossModel {
    /// Velocity-head loss ΔP = K·ρv²/2, sized by the adjoining pipe.
    KFactor(f64),
    /// Direct user-entered pressure drop.
    FixedDrop(Pressure),
}

/// Node kind with its kind-specific configuration.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Boundary node fixing pressure, temperature and rate.
    Wellhead {
        pressure: Pressure,
        temperature: Temperature,
        flow_rate: VolRate,
    },
    Esd(LossModel),
    SandFilter(LossModel),
    Choke(ChokeSettings),
    Separator { set_pressure: Pressure },
    Heater(HeaterMode),
    Manifold(LossModel),
    Valve(LossModel),
    Meter(LossModel),
    Flare(LossModel),
    Custom(LossModel),
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wellhead { .. } => "wellhead",
            Self::Esd(_) => "ESD",
            Self::SandFilter(_) => "sand filter",
            Self::Choke(_) => "choke",
            Self::Separator { .. } => "separator",
            Self::Heater(_) => "heater",
            Self::Manifold(_) => "manifold",
            Self::Valve(_) => "valve",
            Self::Meter(_) => "meter",
            Self::Flare(_) => "flare",
            Self::Custom(_) => "custom",
        }
    }
}

/// Pressure/temperature change imposed by a device, plus device warnings.
#[derive(Debug, Clone, Default)]
pub struct DeviceEffect {
    /// Pressure loss across the device (positive = drop).
    pub delta_p: Pressure,
    /// Absolute outlet pressure override (separators).
    pub outlet_pressure: Option<Pressure>,
    /// Outlet temperature override (heaters).
    pub outlet_temperature: Option<Temperature>,
    pub warnings: Vec<String>,
}

/// Liquid heat capacity used for duty-based heater ΔT [J/(kg·K)].
const CP_LIQUID: f64 = 2_100.0;

/// Evaluate the pressure/temperature effect of a node device.
///
/// `flow_area` is the adjoining pipe's cross-section, used to size the
/// velocity for K-factor losses.
pub fn evaluate_device(
    kind: &NodeKind,
    state: &FluidState,
    flow_rate: VolRate,
    adjoining_area: Option<Area>,
) -> HydraulicsResult<DeviceEffect> {
    match kind {
        NodeKind::Wellhead { .. } => Ok(DeviceEffect::default()),

        NodeKind::Esd(loss)
        | NodeKind::SandFilter(loss)
        | NodeKind::Manifold(loss)
        | NodeKind::Valve(loss)
        | NodeKind::Meter(loss)
        | NodeKind::Flare(loss)
        | NodeKind::Custom(loss) => evaluate_loss(kind, loss, state, flow_rate, adjoining_area),

        NodeKind::Choke(settings) => {
            let res = evaluate_choke(settings, state, flow_rate)?;
            Ok(DeviceEffect {
                delta_p: res.delta_p,
                outlet_pressure: None,
                outlet_temperature: None,
                warnings: res.warnings,
            })
        }

        NodeKind::Separator { set_pressure } => {
            let mut warnings = Vec::new();
            if set_pressure.value > state.pressure.value {
                warnings.push(format!(
                    "separator set pressure {:.0} kPa exceeds upstream pressure",
                    set_pressure.value / 1_000.0
                ));
            }
            if state.gas_fraction > 0.95 {
                warnings.push("separator liquid carryover risk at high gas fraction".to_string());
            }
            Ok(DeviceEffect {
                delta_p: pa(0.0),
                outlet_pressure: Some(*set_pressure),
                outlet_temperature: None,
                warnings,
            })
        }

        NodeKind::Heater(mode) => evaluate_heater(mode, state, flow_rate),
    }
}

fn evaluate_loss(
    kind: &NodeKind,
    loss: &LossModel,
    state: &FluidState,
    flow_rate: VolRate,
    adjoining_area: Option<Area>,
) -> HydraulicsResult<DeviceEffect> {
    match loss {
        LossModel::FixedDrop(dp) => {
            if !(dp.value.is_finite() && dp.value >= 0.0) {
                return Err(HydraulicsError::InvalidDeviceConfig {
                    what: "fixed pressure drop must be non-negative",
                });
            }
            Ok(DeviceEffect {
                delta_p: *dp,
                ..DeviceEffect::default()
            })
        }
        LossModel::KFactor(k_factor) => {
            if !(k_factor.is_finite() && *k_factor >= 0.0) {
                return Err(HydraulicsError::InvalidDeviceConfig {
                    what: "K-factor must be non-negative",
                });
            }
            let q = flow_rate.value;
            if q < EPSILON_FLOW {
                return Ok(DeviceEffect::default());
            }

            let Some(area) = adjoining_area else {
                return Ok(DeviceEffect {
                    warnings: vec![format!(
                        "{} has no adjoining segment to size its K-loss; loss ignored",
                        kind.name()
                    )],
                    ..DeviceEffect::default()
                });
            };

            let v = q / area.value;
            let dp = k_factor * 0.5 * state.density.value * v * v;
            check_finite(dp, "device pressure drop")?;
            Ok(DeviceEffect {
                delta_p: pa(dp),
                ..DeviceEffect::default()
            })
        }
    }
}

fn evaluate_heater(
    mode: &HeaterMode,
    state: &FluidState,
    flow_rate: VolRate,
) -> HydraulicsResult<DeviceEffect> {
    match mode {
        HeaterMode::OutletTemperature(t_out) => {
            if !(t_out.value.is_finite() && t_out.value > 0.0) {
                return Err(HydraulicsError::InvalidDeviceConfig {
                    what: "heater outlet temperature must be positive",
                });
            }
            Ok(DeviceEffect {
                outlet_temperature: Some(*t_out),
                ..DeviceEffect::default()
            })
        }
        HeaterMode::Duty(duty) => {
            let mdot = state.density.value * flow_rate.value;
            if mdot < EPSILON_FLOW {
                return Ok(DeviceEffect::default());
            }
            let cp = if state.is_single_phase_gas() {
                // Ideal-gas cp = kR/((k-1)·M), with M from ρ = PM/ZRT
                let k = state.heat_capacity_ratio;
                let m = state.density.value * state.z_factor * R_UNIVERSAL
                    * state.temperature.value
                    / state.pressure.value;
                k * R_UNIVERSAL / ((k - 1.0) * m)
            } else {
                CP_LIQUID
            };
            let dt = duty.value / (mdot * cp);
            check_finite(dt, "heater temperature rise")?;
            Ok(DeviceEffect {
                outlet_temperature: Some(wf_core::units::k(state.temperature.value + dt)),
                ..DeviceEffect::default()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uom::si::area::square_meter;
    use uom::si::power::watt;
    use wf_core::units::{k, kpa, m3ps};
    use wf_pvt::{FluidSpec, evaluate_fluid_state};

    fn gas_state() -> FluidState {
        let spec = FluidSpec::gas(0.65);
        evaluate_fluid_state(&spec, kpa(5_000.0), k(333.0)).unwrap()
    }

    #[test]
    fn wellhead_is_pass_through() {
        let kind = NodeKind::Wellhead {
            pressure: kpa(5_000.0),
            temperature: k(333.0),
            flow_rate: m3ps(0.1),
        };
        let eff = evaluate_device(&kind, &gas_state(), m3ps(0.1), None).unwrap();
        assert_eq!(eff.delta_p.value, 0.0);
        assert!(eff.warnings.is_empty());
    }

    #[test]
    fn k_loss_scales_with_velocity_head() {
        let kind = NodeKind::Esd(LossModel::KFactor(2.0));
        let area = Area::new::<square_meter>(8.2e-3);
        let state = gas_state();

        let dp_lo = evaluate_device(&kind, &state, m3ps(0.05), Some(area))
            .unwrap()
            .delta_p
            .value;
        let dp_hi = evaluate_device(&kind, &state, m3ps(0.1), Some(area))
            .unwrap()
            .delta_p
            .value;

        assert!(dp_hi > 3.9 * dp_lo && dp_hi < 4.1 * dp_lo, "quadratic in q");
    }

    #[test]
    fn k_loss_without_area_warns() {
        let kind = NodeKind::Meter(LossModel::KFactor(1.0));
        let eff = evaluate_device(&kind, &gas_state(), m3ps(0.1), None).unwrap();
        assert_eq!(eff.delta_p.value, 0.0);
        assert_eq!(eff.warnings.len(), 1);
    }

    #[test]
    fn fixed_drop_passes_through() {
        let kind = NodeKind::Valve(LossModel::FixedDrop(kpa(50.0)));
        let eff = evaluate_device(&kind, &gas_state(), m3ps(0.1), None).unwrap();
        assert!((eff.delta_p.value - 50_000.0).abs() < 1e-9);
    }

    #[test]
    fn separator_overrides_pressure() {
        let kind = NodeKind::Separator {
            set_pressure: kpa(2_000.0),
        };
        let eff = evaluate_device(&kind, &gas_state(), m3ps(0.1), None).unwrap();
        assert_eq!(eff.outlet_pressure.unwrap().value, 2.0e6);
        // Dry gas always carries the carryover warning
        assert!(!eff.warnings.is_empty());
    }

    #[test]
    fn separator_warns_when_set_above_upstream() {
        let kind = NodeKind::Separator {
            set_pressure: kpa(8_000.0),
        };
        let eff = evaluate_device(&kind, &gas_state(), m3ps(0.1), None).unwrap();
        assert!(eff.warnings.iter().any(|w| w.contains("exceeds upstream")));
    }

    #[test]
    fn heater_fixed_outlet_temperature() {
        let kind = NodeKind::Heater(HeaterMode::OutletTemperature(k(350.0)));
        let eff = evaluate_device(&kind, &gas_state(), m3ps(0.1), None).unwrap();
        assert_eq!(eff.outlet_temperature.unwrap().value, 350.0);
    }

    #[test]
    fn heater_duty_raises_temperature() {
        let kind = NodeKind::Heater(HeaterMode::Duty(Power::new::<watt>(100_000.0)));
        let state = gas_state();
        let eff = evaluate_device(&kind, &state, m3ps(0.1), None).unwrap();
        let t_out = eff.outlet_temperature.unwrap().value;
        assert!(t_out > state.temperature.value);
        assert!(t_out < state.temperature.value + 50.0, "ΔT = {}", t_out - 333.0);
    }
}
