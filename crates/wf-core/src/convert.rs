//! Field/imperial unit conversion at the display boundary.
//!
//! Internal computation is always SI (Pa, K, m, m³/s, kg/m³). Callers that
//! accept or render field units (psi, °F, bbl/d, Mscf/d, °API) convert here,
//! once, at the boundary. Nothing below this layer knows about field units.
//!
//! Conversions are exact linear scalings except temperature (affine) and
//! API gravity (reciprocal), so `from_si(to_si(x, u), u) == x` holds within
//! floating-point tolerance for every supported unit.

use std::fmt;
use thiserror::Error;

/// A display/field unit with a fixed SI counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldUnit {
    /// Pounds per square inch (absolute) → Pa
    Psi,
    /// Bar → Pa
    Bar,
    /// Kilopascal → Pa
    Kilopascal,
    /// Megapascal → Pa
    Megapascal,
    /// Degrees Fahrenheit → K
    DegF,
    /// Degrees Celsius → K
    DegC,
    /// Feet → m
    Foot,
    /// Inches → m
    Inch,
    /// Stock-tank barrels per day → m³/s
    BblPerDay,
    /// Thousand standard cubic feet per day → m³/s
    MscfPerDay,
    /// Cubic meters per day → m³/s
    M3PerDay,
    /// Pounds-mass per cubic foot → kg/m³
    LbmPerFt3,
    /// Degrees API → kg/m³ (stock-tank oil density)
    ApiGravity,
}

impl fmt::Display for FieldUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Psi => "psi",
            Self::Bar => "bar",
            Self::Kilopascal => "kPa",
            Self::Megapascal => "MPa",
            Self::DegF => "°F",
            Self::DegC => "°C",
            Self::Foot => "ft",
            Self::Inch => "in",
            Self::BblPerDay => "bbl/d",
            Self::MscfPerDay => "Mscf/d",
            Self::M3PerDay => "m³/d",
            Self::LbmPerFt3 => "lbm/ft³",
            Self::ApiGravity => "°API",
        };
        write!(f, "{s}")
    }
}

/// Error in unit conversion.
#[derive(Debug, Clone, Error)]
pub enum ConvertError {
    #[error("Value {value} out of range for {unit}: {reason}")]
    OutOfRange {
        value: f64,
        unit: FieldUnit,
        reason: &'static str,
    },
}

const PSI_TO_PA: f64 = 6_894.757_293_168;
const FT_TO_M: f64 = 0.3048;
const IN_TO_M: f64 = 0.0254;
const BBL_TO_M3: f64 = 0.158_987_294_928;
const FT3_TO_M3: f64 = 0.028_316_846_592;
const LBM_PER_FT3_TO_KG_PER_M3: f64 = 16.018_463_374;
const SECONDS_PER_DAY: f64 = 86_400.0;
/// Density of fresh water at 60 °F, the API gravity reference [kg/m³].
const RHO_WATER_60F: f64 = 999.016;

/// Convert a field-unit value to its SI counterpart.
pub fn to_si(value: f64, unit: FieldUnit) -> Result<f64, ConvertError> {
    let si = match unit {
        FieldUnit::Psi => value * PSI_TO_PA,
        FieldUnit::Bar => value * 1.0e5,
        FieldUnit::Kilopascal => value * 1.0e3,
        FieldUnit::Megapascal => value * 1.0e6,
        FieldUnit::DegF => {
            let kelvin = (value + 459.67) * 5.0 / 9.0;
            if kelvin <= 0.0 {
                return Err(ConvertError::OutOfRange {
                    value,
                    unit,
                    reason: "absolute temperature must be > 0 K",
                });
            }
            kelvin
        }
        FieldUnit::DegC => {
            let kelvin = value + 273.15;
            if kelvin <= 0.0 {
                return Err(ConvertError::OutOfRange {
                    value,
                    unit,
                    reason: "absolute temperature must be > 0 K",
                });
            }
            kelvin
        }
        FieldUnit::Foot => value * FT_TO_M,
        FieldUnit::Inch => value * IN_TO_M,
        FieldUnit::BblPerDay => value * BBL_TO_M3 / SECONDS_PER_DAY,
        FieldUnit::MscfPerDay => value * 1_000.0 * FT3_TO_M3 / SECONDS_PER_DAY,
        FieldUnit::M3PerDay => value / SECONDS_PER_DAY,
        FieldUnit::LbmPerFt3 => value * LBM_PER_FT3_TO_KG_PER_M3,
        FieldUnit::ApiGravity => {
            if value <= -131.5 {
                return Err(ConvertError::OutOfRange {
                    value,
                    unit,
                    reason: "API gravity must exceed -131.5",
                });
            }
            141.5 / (131.5 + value) * RHO_WATER_60F
        }
    };
    Ok(si)
}

/// Convert an SI value back to the given field unit.
pub fn from_si(value: f64, unit: FieldUnit) -> Result<f64, ConvertError> {
    let field = match unit {
        FieldUnit::Psi => value / PSI_TO_PA,
        FieldUnit::Bar => value / 1.0e5,
        FieldUnit::Kilopascal => value / 1.0e3,
        FieldUnit::Megapascal => value / 1.0e6,
        FieldUnit::DegF => value * 9.0 / 5.0 - 459.67,
        FieldUnit::DegC => value - 273.15,
        FieldUnit::Foot => value / FT_TO_M,
        FieldUnit::Inch => value / IN_TO_M,
        FieldUnit::BblPerDay => value * SECONDS_PER_DAY / BBL_TO_M3,
        FieldUnit::MscfPerDay => value * SECONDS_PER_DAY / (1_000.0 * FT3_TO_M3),
        FieldUnit::M3PerDay => value * SECONDS_PER_DAY,
        FieldUnit::LbmPerFt3 => value / LBM_PER_FT3_TO_KG_PER_M3,
        FieldUnit::ApiGravity => {
            if value <= 0.0 {
                return Err(ConvertError::OutOfRange {
                    value,
                    unit,
                    reason: "density must be positive",
                });
            }
            141.5 * RHO_WATER_60F / value - 131.5
        }
    };
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn psi_to_pa_reference_point() {
        // 14.696 psi is one standard atmosphere
        let pa = to_si(14.695_95, FieldUnit::Psi).unwrap();
        assert!((pa - 101_325.0).abs() < 1.0);
    }

    #[test]
    fn fahrenheit_reference_points() {
        let freezing = to_si(32.0, FieldUnit::DegF).unwrap();
        assert!((freezing - 273.15).abs() < 1e-9);
        let sixty = to_si(60.0, FieldUnit::DegF).unwrap();
        assert!((sixty - 288.705_56).abs() < 1e-2);
    }

    #[test]
    fn api_gravity_water_is_ten() {
        // 10 °API is the density of water by definition
        let rho = to_si(10.0, FieldUnit::ApiGravity).unwrap();
        assert!((rho - RHO_WATER_60F).abs() < 1e-6);
    }

    #[test]
    fn rejects_impossible_temperature() {
        assert!(to_si(-500.0, FieldUnit::DegF).is_err());
        assert!(to_si(-300.0, FieldUnit::DegC).is_err());
    }

    #[test]
    fn bbl_per_day_magnitude() {
        // 1000 bbl/d is about 1.84e-3 m³/s
        let q = to_si(1_000.0, FieldUnit::BblPerDay).unwrap();
        assert!((q - 1.840e-3).abs() < 1e-5);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::numeric::{Tolerances, nearly_equal};
    use proptest::prelude::*;

    const ALL_UNITS: [FieldUnit; 13] = [
        FieldUnit::Psi,
        FieldUnit::Bar,
        FieldUnit::Kilopascal,
        FieldUnit::Megapascal,
        FieldUnit::DegF,
        FieldUnit::DegC,
        FieldUnit::Foot,
        FieldUnit::Inch,
        FieldUnit::BblPerDay,
        FieldUnit::MscfPerDay,
        FieldUnit::M3PerDay,
        FieldUnit::LbmPerFt3,
        FieldUnit::ApiGravity,
    ];

    proptest! {
        #[test]
        fn round_trip_preserves_value(x in 0.1_f64..1.0e6_f64, idx in 0_usize..13) {
            let unit = ALL_UNITS[idx];
            if let Ok(si) = to_si(x, unit) {
                let back = from_si(si, unit).unwrap();
                let tol = Tolerances { abs: 1e-9, rel: 1e-12 };
                prop_assert!(nearly_equal(back, x, tol), "{x} {unit} -> {si} -> {back}");
            }
        }
    }
}
