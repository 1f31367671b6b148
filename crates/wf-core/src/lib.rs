//! wf-core: stable foundation for wellflow.
//!
//! Contains:
//! - units (uom SI types + constructors + physical constants)
//! - convert (field/imperial unit conversion at the display boundary)
//! - numeric (Real + tolerances + float helpers)
//! - ids (stable compact IDs for network objects)
//! - error (shared error types)

pub mod convert;
pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use convert::{FieldUnit, from_si, to_si};
pub use error::{WfError, WfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
