//! Fluid property errors.

use thiserror::Error;
use wf_core::WfError;

/// Result type for PVT operations.
pub type PvtResult<T> = Result<T, PvtError>;

/// Errors that can occur during fluid property evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PvtError {
    /// Pressure/temperature outside the physical domain, or descriptor
    /// values that cannot describe a real fluid.
    #[error("Invalid fluid state: {what}")]
    InvalidFluidState { what: &'static str },

    /// A descriptor required by the selected fluid kind was not supplied.
    #[error("Missing descriptor for {kind} fluid: {field}")]
    MissingDescriptor {
        kind: &'static str,
        field: &'static str,
    },

    /// Non-physical intermediate value (negative density, NaN, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Correlation input outside its validity range.
    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },
}

impl From<PvtError> for WfError {
    fn from(err: PvtError) -> Self {
        match err {
            PvtError::InvalidFluidState { what } => WfError::InvalidArg { what },
            PvtError::MissingDescriptor { field, .. } => WfError::InvalidArg { what: field },
            PvtError::NonPhysical { what } => WfError::Invariant { what },
            PvtError::OutOfRange { what } => WfError::InvalidArg { what },
        }
    }
}
