//! Black-oil correlations.
//!
//! Bubble point, solution GOR and formation volume factor follow Standing;
//! viscosity follows Beggs-Robinson (dead oil) with the Beggs-Robinson live
//! oil adjustment. Correlations work in their published field units (psia,
//! °F, scf/STB) with conversion at the function boundary.

use crate::error::{PvtError, PvtResult};

pub const PA_PER_PSI: f64 = 6_894.757_293_168;
/// scf/STB per sm³/sm³.
pub const SCF_STB_PER_SM3_SM3: f64 = 5.614_583;
const LBM_FT3_TO_KG_M3: f64 = 16.018_463_374;

/// Stock-tank oil specific gravity from API gravity.
pub fn specific_gravity(api: f64) -> f64 {
    141.5 / (131.5 + api)
}

#[inline]
pub fn kelvin_to_fahrenheit(t_k: f64) -> f64 {
    t_k * 1.8 - 459.67
}

/// Standing bubble-point pressure [psia].
pub fn bubble_point_psia(gor_scf_stb: f64, gas_sg: f64, api: f64, t_f: f64) -> PvtResult<f64> {
    if gor_scf_stb < 0.0 {
        return Err(PvtError::NonPhysical {
            what: "solution GOR",
        });
    }
    if gor_scf_stb == 0.0 {
        // Dead oil: bubble point at atmospheric
        return Ok(14.7);
    }
    let a = 0.000_91 * t_f - 0.0125 * api;
    let pb = 18.2 * ((gor_scf_stb / gas_sg).powf(0.83) * 10f64.powf(a) - 1.4);
    Ok(pb.max(14.7))
}

/// Standing solution GOR at pressure [scf/STB], the inverse of the
/// bubble-point relation.
pub fn solution_gor_scf_stb(p_psia: f64, gas_sg: f64, api: f64, t_f: f64) -> f64 {
    if p_psia <= 14.7 {
        return 0.0;
    }
    let a = 0.0125 * api - 0.000_91 * t_f;
    gas_sg * ((p_psia / 18.2 + 1.4) * 10f64.powf(a)).powf(1.2048)
}

/// Standing oil formation volume factor [bbl/STB].
pub fn formation_volume_factor(rs_scf_stb: f64, gas_sg: f64, oil_sg: f64, t_f: f64) -> f64 {
    let f = rs_scf_stb * (gas_sg / oil_sg).sqrt() + 1.25 * t_f;
    0.9759 + 1.2e-4 * f.powf(1.2)
}

/// Live oil density [kg/m³] from dissolved gas and shrinkage.
pub fn density(oil_sg: f64, gas_sg: f64, rs_scf_stb: f64, bo: f64) -> f64 {
    let rho_lbm_ft3 = (62.4 * oil_sg + 0.0136 * rs_scf_stb * gas_sg) / bo;
    rho_lbm_ft3 * LBM_FT3_TO_KG_M3
}

/// Beggs-Robinson dead-oil viscosity [cp].
pub fn dead_oil_viscosity_cp(api: f64, t_f: f64) -> PvtResult<f64> {
    if t_f <= 0.0 {
        return Err(PvtError::OutOfRange {
            what: "temperature for dead-oil viscosity",
        });
    }
    let x = 10f64.powf(3.0324 - 0.020_23 * api) * t_f.powf(-1.163);
    Ok(10f64.powf(x) - 1.0)
}

/// Beggs-Robinson live-oil viscosity [cp] from the dead-oil value and
/// solution GOR.
pub fn live_oil_viscosity_cp(mu_dead_cp: f64, rs_scf_stb: f64) -> f64 {
    let a = 10.715 * (rs_scf_stb + 100.0).powf(-0.515);
    let b = 5.44 * (rs_scf_stb + 150.0).powf(-0.338);
    a * mu_dead_cp.powf(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specific_gravity_anchor() {
        // 10 °API is water
        assert!((specific_gravity(10.0) - 1.0).abs() < 1e-12);
        assert!(specific_gravity(35.0) < 0.9);
    }

    #[test]
    fn bubble_point_rises_with_gor() {
        let pb_lo = bubble_point_psia(200.0, 0.65, 35.0, 180.0).unwrap();
        let pb_hi = bubble_point_psia(800.0, 0.65, 35.0, 180.0).unwrap();
        assert!(pb_hi > pb_lo);
    }

    #[test]
    fn solution_gor_inverts_bubble_point() {
        // Rs evaluated at the bubble point recovers the input GOR
        let gor = 500.0;
        let pb = bubble_point_psia(gor, 0.65, 35.0, 180.0).unwrap();
        let rs = solution_gor_scf_stb(pb, 0.65, 35.0, 180.0);
        assert!(
            (rs - gor).abs() / gor < 0.02,
            "rs = {rs}, expected ~{gor}"
        );
    }

    #[test]
    fn bo_exceeds_unity() {
        let bo = formation_volume_factor(500.0, 0.65, specific_gravity(35.0), 180.0);
        assert!(bo > 1.0 && bo < 2.0, "Bo = {bo}");
    }

    #[test]
    fn live_oil_thinner_than_dead() {
        let mu_dead = dead_oil_viscosity_cp(35.0, 180.0).unwrap();
        let mu_live = live_oil_viscosity_cp(mu_dead, 500.0);
        assert!(mu_live < mu_dead);
        assert!(mu_live > 0.0);
    }

    #[test]
    fn density_magnitude() {
        let sg = specific_gravity(35.0);
        let bo = formation_volume_factor(500.0, 0.65, sg, 180.0);
        let rho = density(sg, 0.65, 500.0, bo);
        assert!(rho > 600.0 && rho < 900.0, "rho = {rho}");
    }
}
