//! Deviation survey and wellbore trajectory.
//!
//! Converts measured-depth survey stations (inclination from vertical,
//! azimuth) into true vertical depth increments using the minimum-curvature
//! method, and reports dogleg severity per interval. The VLP integrator
//! consumes the resulting segments; the summary scalars feed trajectory
//! reporting.

use crate::error::{AnalysisResult, NodalError};
use wf_core::units::Length;

/// One survey station.
#[derive(Debug, Clone, Copy)]
pub struct SurveyStation {
    /// Measured depth along the hole.
    pub md: Length,
    /// Inclination from vertical [deg]; 0 = vertical, 90 = horizontal.
    pub inclination_deg: f64,
    /// Azimuth [deg].
    pub azimuth_deg: f64,
}

/// One interval between consecutive stations, ready for path integration.
#[derive(Debug, Clone, Copy)]
pub struct SurveySegment {
    pub delta_md: f64,
    pub delta_tvd: f64,
    /// Mean inclination from vertical over the interval [rad].
    pub inclination: f64,
    /// Dogleg severity [deg per 30 m].
    pub dogleg_severity: f64,
}

/// A validated wellbore trajectory.
#[derive(Debug, Clone)]
pub struct DeviationSurvey {
    stations: Vec<SurveyStation>,
    segments: Vec<SurveySegment>,
    total_tvd: f64,
}

impl DeviationSurvey {
    /// Build a survey from raw stations, computing TVD increments by the
    /// minimum-curvature method.
    pub fn from_stations(stations: Vec<SurveyStation>) -> AnalysisResult<Self> {
        if stations.len() < 2 {
            return Err(NodalError::InvalidSurvey {
                what: "at least two stations are required",
            });
        }

        let mut prev_md = f64::NEG_INFINITY;
        for st in &stations {
            let md = st.md.value;
            if !md.is_finite() || md < 0.0 {
                return Err(NodalError::InvalidSurvey {
                    what: "measured depth must be finite and non-negative",
                });
            }
            if md <= prev_md {
                return Err(NodalError::InvalidSurvey {
                    what: "measured depth must be strictly increasing",
                });
            }
            if !st.inclination_deg.is_finite() || !(0.0..=180.0).contains(&st.inclination_deg) {
                return Err(NodalError::InvalidSurvey {
                    what: "inclination must be in [0, 180] degrees",
                });
            }
            if !st.azimuth_deg.is_finite() {
                return Err(NodalError::InvalidSurvey {
                    what: "azimuth must be finite",
                });
            }
            prev_md = md;
        }

        let mut segments = Vec::with_capacity(stations.len() - 1);
        let mut total_tvd = 0.0;

        for pair in stations.windows(2) {
            let (s1, s2) = (pair[0], pair[1]);
            let delta_md = s2.md.value - s1.md.value;
            let i1 = s1.inclination_deg.to_radians();
            let i2 = s2.inclination_deg.to_radians();
            let da = (s2.azimuth_deg - s1.azimuth_deg).to_radians();

            // Dogleg angle between the two station directions
            let cos_beta =
                (i1.cos() * i2.cos() + i1.sin() * i2.sin() * da.cos()).clamp(-1.0, 1.0);
            let beta = cos_beta.acos();
            let ratio_factor = if beta < 1e-6 {
                1.0
            } else {
                2.0 / beta * (beta / 2.0).tan()
            };

            let delta_tvd = delta_md / 2.0 * (i1.cos() + i2.cos()) * ratio_factor;
            total_tvd += delta_tvd;

            segments.push(SurveySegment {
                delta_md,
                delta_tvd,
                inclination: 0.5 * (i1 + i2),
                dogleg_severity: beta.to_degrees() * 30.0 / delta_md,
            });
        }

        Ok(Self {
            stations,
            segments,
            total_tvd,
        })
    }

    /// Straight vertical well of the given depth, stationed every `step`.
    pub fn vertical(depth: Length, step: Length) -> AnalysisResult<Self> {
        let d = depth.value;
        let s = step.value;
        if !(d.is_finite() && d > 0.0) {
            return Err(NodalError::InvalidSurvey {
                what: "depth must be positive",
            });
        }
        if !(s.is_finite() && s > 0.0) {
            return Err(NodalError::InvalidSurvey {
                what: "station step must be positive",
            });
        }

        let n = (d / s).ceil() as usize;
        let mut stations = Vec::with_capacity(n + 1);
        for i in 0..=n {
            let md = (i as f64 * s).min(d);
            stations.push(SurveyStation {
                md: wf_core::units::m(md),
                inclination_deg: 0.0,
                azimuth_deg: 0.0,
            });
        }
        Self::from_stations(stations)
    }

    pub fn stations(&self) -> &[SurveyStation] {
        &self.stations
    }

    pub fn segments(&self) -> &[SurveySegment] {
        &self.segments
    }

    pub fn total_md(&self) -> f64 {
        self.stations.last().map_or(0.0, |s| s.md.value)
    }

    pub fn total_tvd(&self) -> f64 {
        self.total_tvd
    }

    pub fn max_inclination_deg(&self) -> f64 {
        self.stations
            .iter()
            .map(|s| s.inclination_deg)
            .fold(0.0, f64::max)
    }

    pub fn max_dogleg_severity(&self) -> f64 {
        self.segments
            .iter()
            .map(|s| s.dogleg_severity)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_core::units::m;

    #[test]
    fn vertical_survey_tvd_equals_md() {
        let survey = DeviationSurvey::vertical(m(3_000.0), m(100.0)).unwrap();
        assert!((survey.total_tvd() - 3_000.0).abs() < 1e-9);
        assert!((survey.total_md() - 3_000.0).abs() < 1e-9);
        assert_eq!(survey.max_inclination_deg(), 0.0);
        assert_eq!(survey.max_dogleg_severity(), 0.0);
    }

    #[test]
    fn deviated_survey_tvd_shorter_than_md() {
        // Build from vertical to 60° over three stations
        let stations = vec![
            SurveyStation {
                md: m(0.0),
                inclination_deg: 0.0,
                azimuth_deg: 0.0,
            },
            SurveyStation {
                md: m(1_000.0),
                inclination_deg: 30.0,
                azimuth_deg: 0.0,
            },
            SurveyStation {
                md: m(2_000.0),
                inclination_deg: 60.0,
                azimuth_deg: 0.0,
            },
        ];
        let survey = DeviationSurvey::from_stations(stations).unwrap();
        assert!(survey.total_tvd() < survey.total_md());
        assert!(survey.total_tvd() > 1_000.0);
        // 30° per 1,000 m is 0.9°/30 m
        assert!((survey.max_dogleg_severity() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn horizontal_section_adds_no_tvd() {
        let stations = vec![
            SurveyStation {
                md: m(0.0),
                inclination_deg: 90.0,
                azimuth_deg: 0.0,
            },
            SurveyStation {
                md: m(500.0),
                inclination_deg: 90.0,
                azimuth_deg: 0.0,
            },
        ];
        let survey = DeviationSurvey::from_stations(stations).unwrap();
        assert!(survey.total_tvd().abs() < 1e-9);
    }

    #[test]
    fn rejects_unsorted_md() {
        let stations = vec![
            SurveyStation {
                md: m(100.0),
                inclination_deg: 0.0,
                azimuth_deg: 0.0,
            },
            SurveyStation {
                md: m(50.0),
                inclination_deg: 0.0,
                azimuth_deg: 0.0,
            },
        ];
        assert!(DeviationSurvey::from_stations(stations).is_err());
    }

    #[test]
    fn rejects_single_station() {
        let stations = vec![SurveyStation {
            md: m(0.0),
            inclination_deg: 0.0,
            azimuth_deg: 0.0,
        }];
        assert!(DeviationSurvey::from_stations(stations).is_err());
    }
}
