//! In-situ fluid state.

use wf_core::units::{Density, DynVisc, Pressure, Temperature, Velocity};

/// Derived fluid state at a single pressure/temperature point.
///
/// All fields are evaluated together by `evaluate_fluid_state` and never
/// mutated afterwards; a new state is derived at every node of a network
/// solve or depth step of a wellbore integration.
#[derive(Debug, Clone)]
pub struct FluidState {
    pub pressure: Pressure,
    pub temperature: Temperature,
    /// No-slip (homogeneous) mixture density.
    pub density: Density,
    /// No-slip mixture viscosity.
    pub viscosity: DynVisc,
    /// Gas-phase compressibility factor (1.0 for liquid-only states).
    pub z_factor: f64,
    /// In-situ volumetric gas fraction in [0, 1].
    pub gas_fraction: f64,
    /// Liquid-phase properties; absent for dry-gas states.
    pub liquid_density: Option<Density>,
    pub liquid_viscosity: Option<DynVisc>,
    /// Gas-phase properties; absent when no free gas exists at this state.
    pub gas_density: Option<Density>,
    pub gas_viscosity: Option<DynVisc>,
    /// Bubble-point pressure for oil systems at this temperature.
    pub bubble_point: Option<Pressure>,
    /// Sonic velocity of the gas phase; absent for liquid-only states.
    pub sonic_velocity: Option<Velocity>,
    /// Isentropic exponent carried from the spec for choke calculations.
    pub heat_capacity_ratio: f64,
    /// In-situ volume per standard volume of produced stream [m³/sm³].
    ///
    /// Gas: the gas formation volume factor. Oil/two-phase: in-situ volume
    /// (oil + water + free gas) per stock-tank m³ of liquid.
    pub volume_factor: f64,
}

impl FluidState {
    /// True when the state is entirely free gas.
    pub fn is_single_phase_gas(&self) -> bool {
        self.gas_fraction >= 1.0
    }

    /// True when any free gas is present.
    pub fn has_free_gas(&self) -> bool {
        self.gas_fraction > 0.0
    }
}
