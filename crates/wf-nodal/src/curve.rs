//! Rate/pressure curves.

use crate::error::{AnalysisResult, NodalError};
use serde::{Deserialize, Serialize};

/// A generated IPR or VLP curve: parallel rate and pressure arrays,
/// strictly increasing in rate. Regenerable deterministically from the same
/// inputs; never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Curve {
    rates: Vec<f64>,
    pressures: Vec<f64>,
    max_rate: f64,
    max_pressure: f64,
}

impl Curve {
    /// Build a curve from (rate, pressure) points.
    ///
    /// Rates must be finite, non-negative and strictly increasing;
    /// pressures must be finite and non-negative.
    pub fn from_points(points: Vec<(f64, f64)>) -> AnalysisResult<Self> {
        if points.is_empty() {
            return Err(NodalError::InvalidCurve {
                what: "curve needs at least one point",
            });
        }

        let mut prev_rate = f64::NEG_INFINITY;
        for &(rate, pressure) in &points {
            if !rate.is_finite() || rate < 0.0 {
                return Err(NodalError::InvalidCurve {
                    what: "rates must be finite and non-negative",
                });
            }
            if rate <= prev_rate {
                return Err(NodalError::InvalidCurve {
                    what: "rates must be strictly increasing",
                });
            }
            if !pressure.is_finite() || pressure < 0.0 {
                return Err(NodalError::InvalidCurve {
                    what: "pressures must be finite and non-negative",
                });
            }
            prev_rate = rate;
        }

        let max_rate = points.last().map(|p| p.0).unwrap_or(0.0);
        let max_pressure = points.iter().map(|p| p.1).fold(0.0, f64::max);
        let (rates, pressures) = points.into_iter().unzip();

        Ok(Self {
            rates,
            pressures,
            max_rate,
            max_pressure,
        })
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn pressures(&self) -> &[f64] {
        &self.pressures
    }

    pub fn max_rate(&self) -> f64 {
        self.max_rate
    }

    pub fn max_pressure(&self) -> f64 {
        self.max_pressure
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Linear interpolation of pressure at a rate; None outside the curve's
    /// rate range.
    pub fn interpolate(&self, rate: f64) -> Option<f64> {
        if self.rates.is_empty() || rate < self.rates[0] || rate > self.max_rate {
            return None;
        }
        let idx = match self
            .rates
            .binary_search_by(|r| r.partial_cmp(&rate).expect("rates are finite"))
        {
            Ok(i) => return Some(self.pressures[i]),
            Err(i) => i,
        };
        let (r0, r1) = (self.rates[idx - 1], self.rates[idx]);
        let (p0, p1) = (self.pressures[idx - 1], self.pressures[idx]);
        Some(p0 + (p1 - p0) * (rate - r0) / (r1 - r0))
    }
}
