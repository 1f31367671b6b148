//! wf-pvt: fluid property evaluation for wellflow.
//!
//! Provides:
//! - Fluid descriptors (`FluidSpec`) validated per fluid kind
//! - In-situ state representation (`FluidState`)
//! - Real-gas correlations (Sutton pseudo-criticals, Brill & Beggs Z-factor,
//!   Lee-Gonzalez-Eakin viscosity)
//! - Black-oil correlations (Standing Pb/Rs/Bo, Beggs-Robinson viscosity)
//! - Water properties for water-cut mixing
//!
//! # Architecture
//!
//! The crate is a pure, stateless function of state: `evaluate_fluid_state`
//! takes an immutable `FluidSpec` plus pressure and temperature and returns a
//! freshly derived `FluidState`. All correlations live in per-phase modules
//! (`gas`, `oil`, `water`) so additional correlation sets can be added without
//! touching the evaluation entry point.
//!
//! # Example
//!
//! ```
//! use wf_pvt::{FluidSpec, evaluate_fluid_state};
//! use wf_core::units::{kpa, k};
//!
//! let fluid = FluidSpec::gas(0.65);
//! let state = evaluate_fluid_state(&fluid, kpa(5_000.0), k(333.0)).unwrap();
//! assert!(state.density.value > 0.0);
//! assert!(state.z_factor > 0.0 && state.z_factor < 1.2);
//! ```

pub mod calculator;
pub mod error;
pub mod gas;
pub mod oil;
pub mod spec;
pub mod state;
pub mod water;

// Re-exports for ergonomics
pub use calculator::evaluate_fluid_state;
pub use error::{PvtError, PvtResult};
pub use spec::{FluidKind, FluidSpec};
pub use state::FluidState;
