//! Errors for IPR/VLP/nodal calculations.

use thiserror::Error;
use wf_core::WfError;
use wf_hydraulics::HydraulicsError;
use wf_pvt::PvtError;

/// Result type for nodal-analysis operations.
pub type AnalysisResult<T> = Result<T, NodalError>;

#[derive(Error, Debug)]
pub enum NodalError {
    #[error("Invalid IPR parameters: {what}")]
    InvalidIprParameters { what: &'static str },

    #[error("Invalid deviation survey: {what}")]
    InvalidSurvey { what: &'static str },

    #[error("Invalid VLP settings: {what}")]
    InvalidVlpSettings { what: &'static str },

    #[error("Invalid curve: {what}")]
    InvalidCurve { what: &'static str },

    #[error("Insufficient data: {what}")]
    InsufficientData { what: &'static str },

    #[error("Invalid test point: {what}")]
    InvalidTestPoint { what: &'static str },

    #[error(transparent)]
    Hydraulics(#[from] HydraulicsError),

    #[error(transparent)]
    Pvt(#[from] PvtError),
}

impl From<NodalError> for WfError {
    fn from(e: NodalError) -> Self {
        match e {
            NodalError::Hydraulics(inner) => inner.into(),
            NodalError::Pvt(inner) => inner.into(),
            NodalError::InvalidIprParameters { what }
            | NodalError::InvalidSurvey { what }
            | NodalError::InvalidVlpSettings { what }
            | NodalError::InvalidCurve { what }
            | NodalError::InsufficientData { what }
            | NodalError::InvalidTestPoint { what } => WfError::InvalidArg { what },
        }
    }
}
