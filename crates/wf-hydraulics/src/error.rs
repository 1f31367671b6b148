//! Error types for hydraulic calculations.

use thiserror::Error;
use wf_core::WfError;
use wf_pvt::PvtError;

/// Errors that can occur during flow-element calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HydraulicsError {
    #[error("Invalid segment geometry: {what}")]
    InvalidSegmentGeometry { what: &'static str },

    #[error("Invalid device configuration: {what}")]
    InvalidDeviceConfig { what: &'static str },

    #[error("Non-physical flow: {what}")]
    NonPhysicalFlow { what: &'static str },

    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    #[error("Fluid property error: {0}")]
    Pvt(#[from] PvtError),
}

pub type HydraulicsResult<T> = Result<T, HydraulicsError>;

impl From<HydraulicsError> for WfError {
    fn from(e: HydraulicsError) -> Self {
        match e {
            HydraulicsError::InvalidSegmentGeometry { what } => WfError::InvalidArg { what },
            HydraulicsError::InvalidDeviceConfig { what } => WfError::InvalidArg { what },
            HydraulicsError::NonPhysicalFlow { what } => WfError::Invariant { what },
            HydraulicsError::NotSupported { what } => WfError::InvalidArg { what },
            HydraulicsError::Pvt(e) => e.into(),
        }
    }
}
