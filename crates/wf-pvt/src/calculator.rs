//! Fluid state evaluation entry point.

use crate::error::{PvtError, PvtResult};
use crate::gas;
use crate::oil;
use crate::spec::{FluidKind, FluidSpec};
use crate::state::FluidState;
use crate::water;
use wf_core::units::{Pressure, Temperature, kgpm3, mps, pas};

/// Evaluate the in-situ fluid state at a pressure/temperature point.
///
/// Validates the spec and the state inputs first (`InvalidFluidState` before
/// any numeric work), then dispatches on fluid kind. The returned state is a
/// fresh value; calling twice with identical inputs yields identical output.
pub fn evaluate_fluid_state(
    spec: &FluidSpec,
    pressure: Pressure,
    temperature: Temperature,
) -> PvtResult<FluidState> {
    spec.validate()?;

    let p = pressure.value;
    let t = temperature.value;
    if !p.is_finite() || p <= 0.0 {
        return Err(PvtError::InvalidFluidState {
            what: "pressure must be positive and finite",
        });
    }
    if !t.is_finite() || t <= 0.0 {
        return Err(PvtError::InvalidFluidState {
            what: "temperature must be positive and finite",
        });
    }

    match spec.kind {
        FluidKind::Gas | FluidKind::GasCondensate => evaluate_gas(spec, pressure, temperature),
        FluidKind::Oil | FluidKind::TwoPhase => evaluate_black_oil(spec, pressure, temperature),
    }
}

fn evaluate_gas(
    spec: &FluidSpec,
    pressure: Pressure,
    temperature: Temperature,
) -> PvtResult<FluidState> {
    let p = pressure.value;
    let t = temperature.value;
    let sg = spec.gas_specific_gravity.expect("validated");

    let m = spec.molecular_weight.unwrap_or_else(|| gas::molar_mass(sg));
    let z = match spec.z_override {
        Some(z) => z,
        None => gas::z_factor(p, t, sg)?,
    };

    let rho = gas::density(p, t, m, z);
    if !rho.is_finite() || rho <= 0.0 {
        return Err(PvtError::NonPhysical { what: "gas density" });
    }

    let mu = match spec.viscosity_override {
        Some(mu) => mu.value,
        None => gas::viscosity(t, m, rho),
    };
    let c = gas::sonic_velocity(spec.heat_capacity_ratio, z, t, m);

    // Condensate gravity is carried for reporting only; the stream is
    // treated as gas-dominated above the dew point.
    let liquid_density = match (spec.kind, spec.api_gravity) {
        (FluidKind::GasCondensate, Some(api)) => {
            Some(kgpm3(oil::specific_gravity(api) * 999.016))
        }
        _ => None,
    };

    Ok(FluidState {
        pressure,
        temperature,
        density: kgpm3(rho),
        viscosity: pas(mu),
        z_factor: z,
        gas_fraction: 1.0,
        liquid_density,
        liquid_viscosity: None,
        gas_density: Some(kgpm3(rho)),
        gas_viscosity: Some(pas(mu)),
        bubble_point: None,
        sonic_velocity: Some(mps(c)),
        heat_capacity_ratio: spec.heat_capacity_ratio,
        volume_factor: gas::formation_volume_factor(p, t, z),
    })
}

fn evaluate_black_oil(
    spec: &FluidSpec,
    pressure: Pressure,
    temperature: Temperature,
) -> PvtResult<FluidState> {
    let p = pressure.value;
    let t = temperature.value;
    let gas_sg = spec.gas_specific_gravity.expect("validated");
    let api = spec.api_gravity.expect("validated");
    let gor_sm3 = spec.gor.expect("validated");
    let wct = spec.effective_water_cut();

    let t_f = oil::kelvin_to_fahrenheit(t);
    if t_f <= 32.0 {
        return Err(PvtError::OutOfRange {
            what: "temperature below black-oil correlation range",
        });
    }

    let gor_scf = gor_sm3 * oil::SCF_STB_PER_SM3_SM3;
    let p_psia = p / oil::PA_PER_PSI;

    let pb_psia = oil::bubble_point_psia(gor_scf, gas_sg, api, t_f)?;
    let pb_pa = pb_psia * oil::PA_PER_PSI;

    // Below bubble point gas evolves from solution
    let rs_scf = if p_psia >= pb_psia {
        gor_scf
    } else {
        oil::solution_gor_scf_stb(p_psia, gas_sg, api, t_f).min(gor_scf)
    };

    let oil_sg = oil::specific_gravity(api);
    let bo = oil::formation_volume_factor(rs_scf, gas_sg, oil_sg, t_f);
    let rho_o = oil::density(oil_sg, gas_sg, rs_scf, bo);
    let mu_dead = oil::dead_oil_viscosity_cp(api, t_f)?;
    let mu_o = oil::live_oil_viscosity_cp(mu_dead, rs_scf) * 1.0e-3;

    let rho_w = water::density(t);
    let mu_w = water::viscosity(t);

    // In-situ volumes per stock-tank m³ of produced liquid (Bw taken as 1)
    let v_oil = (1.0 - wct) * bo;
    let v_wat = wct;
    let v_liq = v_oil + v_wat;
    let rho_l = (rho_o * v_oil + rho_w * v_wat) / v_liq;
    let mu_l = (mu_o * v_oil + mu_w * v_wat) / v_liq;

    let free_gas_sm3 = ((gor_scf - rs_scf) / oil::SCF_STB_PER_SM3_SM3).max(0.0) * (1.0 - wct);

    let (v_gas, gas_density, gas_viscosity, z, sonic) = if free_gas_sm3 > 0.0 {
        let m = gas::molar_mass(gas_sg);
        let z = match spec.z_override {
            Some(z) => z,
            None => gas::z_factor(p, t, gas_sg)?,
        };
        let rho_g = gas::density(p, t, m, z);
        let mu_g = gas::viscosity(t, m, rho_g);
        let bg = gas::formation_volume_factor(p, t, z);
        let c = gas::sonic_velocity(spec.heat_capacity_ratio, z, t, m);
        (
            free_gas_sm3 * bg,
            Some(kgpm3(rho_g)),
            Some(pas(mu_g)),
            z,
            Some(mps(c)),
        )
    } else {
        (0.0, None, None, 1.0, None)
    };

    let gas_fraction = v_gas / (v_gas + v_liq);
    let rho_g_val = gas_density.map_or(0.0, |d| d.value);
    let mu_g_val = gas_viscosity.map_or(0.0, |m| m.value);

    let rho_mix = rho_l * (1.0 - gas_fraction) + rho_g_val * gas_fraction;
    let mu_mix = match spec.viscosity_override {
        Some(mu) => mu.value,
        None => mu_l * (1.0 - gas_fraction) + mu_g_val * gas_fraction,
    };

    if !rho_mix.is_finite() || rho_mix <= 0.0 {
        return Err(PvtError::NonPhysical {
            what: "mixture density",
        });
    }

    Ok(FluidState {
        pressure,
        temperature,
        density: kgpm3(rho_mix),
        viscosity: pas(mu_mix),
        z_factor: z,
        gas_fraction,
        liquid_density: Some(kgpm3(rho_l)),
        liquid_viscosity: Some(pas(mu_l)),
        gas_density,
        gas_viscosity,
        bubble_point: Some(Pressure::new::<uom::si::pressure::pascal>(pb_pa)),
        sonic_velocity: sonic,
        heat_capacity_ratio: spec.heat_capacity_ratio,
        volume_factor: v_liq + v_gas,
    })
}
