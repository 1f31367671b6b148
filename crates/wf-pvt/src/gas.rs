//! Real-gas property correlations.
//!
//! Pseudo-critical properties follow Sutton's fit for sweet natural gas;
//! the compressibility factor uses the explicit Brill & Beggs fit (valid in
//! the pseudo-reduced ranges typical of producing wells); viscosity uses
//! Lee-Gonzalez-Eakin. Correlations work in the field units they were
//! published in, with conversion at the function boundary.

use crate::error::{PvtError, PvtResult};
use wf_core::units::constants::{M_AIR, P_STANDARD_PA, R_UNIVERSAL, T_STANDARD_K};

const PA_PER_PSI: f64 = 6_894.757_293_168;
const RANKINE_PER_KELVIN: f64 = 1.8;

/// Pseudo-critical point of a natural gas, in the units Sutton published.
#[derive(Debug, Clone, Copy)]
pub struct PseudoCritical {
    pub temperature_r: f64,
    pub pressure_psia: f64,
}

/// Sutton pseudo-critical properties from gas specific gravity.
pub fn pseudo_critical(gas_sg: f64) -> PseudoCritical {
    PseudoCritical {
        temperature_r: 169.2 + 349.5 * gas_sg - 74.0 * gas_sg * gas_sg,
        pressure_psia: 756.8 - 131.0 * gas_sg - 3.6 * gas_sg * gas_sg,
    }
}

/// Gas molar mass [kg/mol] from specific gravity.
pub fn molar_mass(gas_sg: f64) -> f64 {
    gas_sg * M_AIR
}

/// Brill & Beggs explicit Z-factor.
///
/// Pseudo-reduced temperature is clamped to the fit's validity band; the
/// clamp matters only for states far outside producing-well conditions.
pub fn z_factor(pressure_pa: f64, temperature_k: f64, gas_sg: f64) -> PvtResult<f64> {
    let pc = pseudo_critical(gas_sg);
    let tpr = (temperature_k * RANKINE_PER_KELVIN / pc.temperature_r).clamp(1.05, 3.0);
    let ppr = (pressure_pa / PA_PER_PSI / pc.pressure_psia).clamp(0.0, 15.0);

    let a = 1.39 * (tpr - 0.92).sqrt() - 0.36 * tpr - 0.101;
    let b = (0.62 - 0.23 * tpr) * ppr
        + (0.066 / (tpr - 0.86) - 0.037) * ppr.powi(2)
        + 0.32 * ppr.powi(6) / 10f64.powf(9.0 * (tpr - 1.0));
    let c = 0.132 - 0.32 * tpr.log10();
    let d = 10f64.powf(0.3106 - 0.49 * tpr + 0.1824 * tpr * tpr);

    // e^b overflows to +inf for extreme Ppr; the term then vanishes, which
    // is the correct limit of the fit.
    let z = a + (1.0 - a) / b.exp() + c * ppr.powf(d);

    if !z.is_finite() || z <= 0.0 {
        return Err(PvtError::NonPhysical { what: "Z-factor" });
    }
    Ok(z)
}

/// Real-gas density ρ = PM/(ZRT) [kg/m³].
pub fn density(pressure_pa: f64, temperature_k: f64, molar_mass_kg_mol: f64, z: f64) -> f64 {
    pressure_pa * molar_mass_kg_mol / (z * R_UNIVERSAL * temperature_k)
}

/// Lee-Gonzalez-Eakin gas viscosity [Pa·s].
pub fn viscosity(temperature_k: f64, molar_mass_kg_mol: f64, density_kg_m3: f64) -> f64 {
    let m = molar_mass_kg_mol * 1_000.0; // g/mol
    let t = temperature_k * RANKINE_PER_KELVIN; // °R
    let rho = density_kg_m3 / 1_000.0; // g/cm³

    let k = (9.4 + 0.02 * m) * t.powf(1.5) / (209.0 + 19.0 * m + t);
    let x = 3.5 + 986.0 / t + 0.01 * m;
    let y = 2.4 - 0.2 * x;

    let mu_cp = 1.0e-4 * k * (x * rho.powf(y)).exp();
    mu_cp * 1.0e-3
}

/// Sonic velocity c = √(kZRT/M) [m/s].
pub fn sonic_velocity(
    heat_capacity_ratio: f64,
    z: f64,
    temperature_k: f64,
    molar_mass_kg_mol: f64,
) -> f64 {
    (heat_capacity_ratio * z * R_UNIVERSAL * temperature_k / molar_mass_kg_mol).sqrt()
}

/// Gas formation volume factor Bg = (Psc/P)(T/Tsc)Z [m³/sm³].
pub fn formation_volume_factor(pressure_pa: f64, temperature_k: f64, z: f64) -> f64 {
    (P_STANDARD_PA / pressure_pa) * (temperature_k / T_STANDARD_K) * z
}
