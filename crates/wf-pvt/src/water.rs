//! Produced-water properties for water-cut mixing.

/// Fresh-water density [kg/m³]; linear fit adequate for the wellbore
/// temperature band.
pub fn density(temperature_k: f64) -> f64 {
    let t_c = temperature_k - 273.15;
    (999.1 - 0.4 * (t_c - 15.0).max(0.0)).max(900.0)
}

/// Water viscosity [Pa·s] from the standard temperature fit.
pub fn viscosity(temperature_k: f64) -> f64 {
    let t_f = temperature_k * 1.8 - 459.67;
    let mu_cp = (1.003 - 1.479e-2 * t_f + 1.982e-5 * t_f * t_f).exp();
    mu_cp * 1.0e-3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_near_1000_at_ambient() {
        let rho = density(288.15);
        assert!((rho - 999.1).abs() < 1.0);
    }

    #[test]
    fn viscosity_thins_with_temperature() {
        assert!(viscosity(350.0) < viscosity(290.0));
    }
}
