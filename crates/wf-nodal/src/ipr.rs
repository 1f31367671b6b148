//! Inflow performance relationship models.
//!
//! Closed-form rate ↔ flowing-bottomhole-pressure relations for the
//! supported reservoir inflow models. Every model produces a monotonically
//! decreasing Pwf-vs-rate curve bounded at q = 0 → Pwf = reservoir pressure
//! and at Pwf = 0 → q = absolute open flow.

use crate::curve::Curve;
use crate::error::{AnalysisResult, NodalError};
use rayon::prelude::*;
use wf_core::units::Pressure;
use wf_pvt::FluidSpec;

/// Reservoir inflow model selector with model-specific parameters.
#[derive(Debug, Clone, Copy)]
pub enum IprModel {
    /// Composite Vogel (Standing): straight-line PI above the bubble point,
    /// Vogel's quadratic below it. Collapses to pure Vogel for saturated
    /// reservoirs (bubble point at reservoir pressure).
    Vogel {
        reservoir_pressure: Pressure,
        /// Productivity index [m³/(s·Pa)].
        productivity_index: f64,
        bubble_point: Pressure,
    },
    /// Fetkovich isochronal: q = C·(Pr² − Pwf²)^n.
    Fetkovich {
        reservoir_pressure: Pressure,
        coefficient: f64,
        exponent: f64,
    },
    /// Straight-line Darcy inflow: q = J·(Pr − Pwf).
    DarcyLinear {
        reservoir_pressure: Pressure,
        productivity_index: f64,
    },
    /// Jones (rate-dependent skin): Pr − Pwf = a·q² + b·q.
    Jones {
        reservoir_pressure: Pressure,
        /// Turbulent coefficient a [Pa/(m³/s)²].
        turbulent_coefficient: f64,
        /// Laminar coefficient b [Pa/(m³/s)].
        laminar_coefficient: f64,
    },
    /// Gas-well back-pressure (deliverability): q = C·(Pr² − Pwf²)^n.
    BackPressure {
        reservoir_pressure: Pressure,
        coefficient: f64,
        exponent: f64,
    },
}

impl IprModel {
    pub fn reservoir_pressure(&self) -> Pressure {
        match *self {
            Self::Vogel {
                reservoir_pressure, ..
            }
            | Self::Fetkovich {
                reservoir_pressure, ..
            }
            | Self::DarcyLinear {
                reservoir_pressure, ..
            }
            | Self::Jones {
                reservoir_pressure, ..
            }
            | Self::BackPressure {
                reservoir_pressure, ..
            } => reservoir_pressure,
        }
    }

    /// Validate the model's parameters before any curve generation.
    pub fn validate(&self) -> AnalysisResult<()> {
        let pr = self.reservoir_pressure().value;
        if !pr.is_finite() || pr <= 0.0 {
            return Err(NodalError::InvalidIprParameters {
                what: "reservoir pressure must be positive",
            });
        }

        match *self {
            Self::Vogel {
                productivity_index,
                bubble_point,
                ..
            } => {
                if !productivity_index.is_finite() || productivity_index <= 0.0 {
                    return Err(NodalError::InvalidIprParameters {
                        what: "productivity index must be positive",
                    });
                }
                let pb = bubble_point.value;
                if !pb.is_finite() || pb <= 0.0 {
                    return Err(NodalError::InvalidIprParameters {
                        what: "bubble point must be positive",
                    });
                }
                if pb > pr {
                    return Err(NodalError::InvalidIprParameters {
                        what: "bubble point must not exceed reservoir pressure",
                    });
                }
            }
            Self::Fetkovich {
                coefficient,
                exponent,
                ..
            }
            | Self::BackPressure {
                coefficient,
                exponent,
                ..
            } => {
                if !coefficient.is_finite() || coefficient <= 0.0 {
                    return Err(NodalError::InvalidIprParameters {
                        what: "deliverability coefficient must be positive",
                    });
                }
                if !exponent.is_finite() || !(0.5..=1.0).contains(&exponent) {
                    return Err(NodalError::InvalidIprParameters {
                        what: "deliverability exponent must be in [0.5, 1.0]",
                    });
                }
            }
            Self::DarcyLinear {
                productivity_index, ..
            } => {
                if !productivity_index.is_finite() || productivity_index <= 0.0 {
                    return Err(NodalError::InvalidIprParameters {
                        what: "productivity index must be positive",
                    });
                }
            }
            Self::Jones {
                turbulent_coefficient,
                laminar_coefficient,
                ..
            } => {
                if !turbulent_coefficient.is_finite() || turbulent_coefficient < 0.0 {
                    return Err(NodalError::InvalidIprParameters {
                        what: "turbulent coefficient must be non-negative",
                    });
                }
                if !laminar_coefficient.is_finite() || laminar_coefficient <= 0.0 {
                    return Err(NodalError::InvalidIprParameters {
                        what: "laminar coefficient must be positive",
                    });
                }
            }
        }
        Ok(())
    }

    /// Absolute open flow: the rate at Pwf = 0 [m³/s].
    pub fn max_rate(&self) -> f64 {
        match *self {
            Self::Vogel {
                reservoir_pressure,
                productivity_index,
                bubble_point,
            } => {
                let pr = reservoir_pressure.value;
                let pb = bubble_point.value.min(pr);
                let q_bubble = productivity_index * (pr - pb);
                q_bubble + productivity_index * pb / 1.8
            }
            Self::Fetkovich {
                reservoir_pressure,
                coefficient,
                exponent,
            }
            | Self::BackPressure {
                reservoir_pressure,
                coefficient,
                exponent,
            } => {
                let pr = reservoir_pressure.value;
                coefficient * (pr * pr).powf(exponent)
            }
            Self::DarcyLinear {
                reservoir_pressure,
                productivity_index,
            } => productivity_index * reservoir_pressure.value,
            Self::Jones {
                reservoir_pressure,
                turbulent_coefficient: a,
                laminar_coefficient: b,
            } => {
                let pr = reservoir_pressure.value;
                if a > 0.0 {
                    (-b + (b * b + 4.0 * a * pr).sqrt()) / (2.0 * a)
                } else {
                    pr / b
                }
            }
        }
    }

    /// Flowing bottomhole pressure at a rate [Pa], clamped at zero beyond
    /// the absolute open flow.
    pub fn pwf_at_rate(&self, rate: f64) -> AnalysisResult<f64> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(NodalError::InvalidIprParameters {
                what: "rate must be non-negative",
            });
        }

        let pwf = match *self {
            Self::Vogel {
                reservoir_pressure,
                productivity_index: j,
                bubble_point,
            } => {
                let pr = reservoir_pressure.value;
                let pb = bubble_point.value.min(pr);
                let q_bubble = j * (pr - pb);
                if rate <= q_bubble {
                    pr - rate / j
                } else {
                    // Vogel below the bubble point, solved for Pwf/Pb
                    let u = (rate - q_bubble) * 1.8 / (j * pb);
                    let radicand = 0.04 + 3.2 * (1.0 - u);
                    if radicand <= 0.0 {
                        0.0
                    } else {
                        let x = (-0.2 + radicand.sqrt()) / 1.6;
                        (x * pb).max(0.0)
                    }
                }
            }
            Self::Fetkovich {
                reservoir_pressure,
                coefficient,
                exponent,
            }
            | Self::BackPressure {
                reservoir_pressure,
                coefficient,
                exponent,
            } => {
                let pr = reservoir_pressure.value;
                let delta = (rate / coefficient).powf(1.0 / exponent);
                (pr * pr - delta).max(0.0).sqrt()
            }
            Self::DarcyLinear {
                reservoir_pressure,
                productivity_index,
            } => (reservoir_pressure.value - rate / productivity_index).max(0.0),
            Self::Jones {
                reservoir_pressure,
                turbulent_coefficient: a,
                laminar_coefficient: b,
            } => (reservoir_pressure.value - b * rate - a * rate * rate).max(0.0),
        };

        Ok(pwf)
    }
}

/// Generate the IPR curve at the given stock-tank rates [m³/s].
///
/// Rates beyond the absolute open flow are dropped, keeping the curve
/// bounded. Samples are independent and evaluated in parallel.
pub fn calculate_ipr(
    model: &IprModel,
    fluid: &FluidSpec,
    rates: &[f64],
) -> AnalysisResult<Curve> {
    model.validate()?;
    fluid.validate()?;

    if rates.is_empty() {
        return Err(NodalError::InvalidCurve {
            what: "at least one rate sample is required",
        });
    }

    let aof = model.max_rate();
    let points = rates
        .par_iter()
        .filter(|&&q| q <= aof)
        .map(|&q| model.pwf_at_rate(q).map(|pwf| (q, pwf)))
        .collect::<AnalysisResult<Vec<_>>>()?;

    Curve::from_points(points)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn vogel_pwf_within_bounds(
            pr_mpa in 5.0_f64..50.0,
            pb_frac in 0.1_f64..1.0,
            j in 1e-11_f64..1e-9,
            q_frac in 0.0_f64..1.0,
        ) {
            let pr = pr_mpa * 1.0e6;
            let model = IprModel::Vogel {
                reservoir_pressure: wf_core::units::pa(pr),
                productivity_index: j,
                bubble_point: wf_core::units::pa(pr * pb_frac),
            };
            let q = model.max_rate() * q_frac;
            let pwf = model.pwf_at_rate(q).unwrap();
            prop_assert!(pwf >= 0.0);
            prop_assert!(pwf <= pr + 1.0);
        }
    }
}
