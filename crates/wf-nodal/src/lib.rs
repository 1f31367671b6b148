//! wf-nodal: inflow/outflow curve generation and nodal analysis.
//!
//! Provides:
//! - IPR models (Vogel composite, Fetkovich, Darcy linear, Jones,
//!   gas back-pressure) and curve generation
//! - Deviation surveys with minimum-curvature TVD and dogleg severity
//! - VLP curves by integrating the wellbore with a multiphase correlation
//! - The nodal-analysis operating-point search (bisection over the rate
//!   domain, structured convergence reporting)
//! - VLP data matching against measured test points
//!
//! Everything is a pure function of its inputs: curves and analyses are
//! regenerable deterministically, and non-convergence is reported in the
//! result structures rather than raised.

pub mod analysis;
pub mod curve;
pub mod error;
pub mod ipr;
pub mod matcher;
pub mod survey;
pub mod vlp;

// Re-exports
pub use analysis::{AnalysisConstraints, NodalResult, OperatingPoint, perform_nodal_analysis};
pub use curve::Curve;
pub use error::{AnalysisResult, NodalError};
pub use ipr::{IprModel, calculate_ipr};
pub use matcher::{
    MatchOptions, MatchingResult, TestPoint, match_vlp_to_test_points, match_vlp_with_options,
};
pub use survey::{DeviationSurvey, SurveySegment, SurveyStation};
pub use vlp::{BiasFactors, Completion, VlpSettings, bottomhole_pressure, calculate_vlp};
