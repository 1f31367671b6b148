//! Fluid descriptors.

use crate::error::{PvtError, PvtResult};
use wf_core::units::DynVisc;

/// Kind of produced fluid. Selects which descriptors are required and which
/// correlation set evaluates the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FluidKind {
    /// Dry gas.
    Gas,
    /// Black oil, possibly with solution gas below bubble point.
    Oil,
    /// Oil + free gas + water cut.
    TwoPhase,
    /// Gas-condensate (gas-dominated; condensate reported, not flashed).
    GasCondensate,
}

impl FluidKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Gas => "gas",
            Self::Oil => "oil",
            Self::TwoPhase => "two-phase",
            Self::GasCondensate => "gas-condensate",
        }
    }
}

/// Immutable fluid description, owned by the caller and passed by reference
/// into every evaluation. A subset of the descriptors is required depending
/// on `kind`; `validate` enforces that before any numeric work.
#[derive(Debug, Clone)]
pub struct FluidSpec {
    pub kind: FluidKind,
    /// Gas specific gravity (air = 1.0).
    pub gas_specific_gravity: Option<f64>,
    /// Stock-tank oil gravity [°API].
    pub api_gravity: Option<f64>,
    /// Producing gas-oil ratio [sm³/sm³].
    pub gor: Option<f64>,
    /// Water cut: fraction of produced liquid that is water.
    pub water_cut: Option<f64>,
    /// Direct viscosity override (lab-measured); skips correlations.
    pub viscosity_override: Option<DynVisc>,
    /// Direct Z-factor override (lab-measured); skips correlations.
    pub z_override: Option<f64>,
    /// Isentropic exponent Cp/Cv for the gas phase.
    pub heat_capacity_ratio: f64,
    /// Gas molar mass override [kg/mol]; derived from specific gravity
    /// when absent.
    pub molecular_weight: Option<f64>,
}

impl FluidSpec {
    /// Dry gas of the given specific gravity.
    pub fn gas(gas_specific_gravity: f64) -> Self {
        Self {
            kind: FluidKind::Gas,
            gas_specific_gravity: Some(gas_specific_gravity),
            api_gravity: None,
            gor: None,
            water_cut: None,
            viscosity_override: None,
            z_override: None,
            heat_capacity_ratio: 1.28,
            molecular_weight: None,
        }
    }

    /// Black oil with solution gas.
    pub fn oil(api_gravity: f64, gas_specific_gravity: f64, gor: f64) -> Self {
        Self {
            kind: FluidKind::Oil,
            gas_specific_gravity: Some(gas_specific_gravity),
            api_gravity: Some(api_gravity),
            gor: Some(gor),
            water_cut: None,
            viscosity_override: None,
            z_override: None,
            heat_capacity_ratio: 1.28,
            molecular_weight: None,
        }
    }

    /// Oil with free gas and water cut.
    pub fn two_phase(api_gravity: f64, gas_specific_gravity: f64, gor: f64, water_cut: f64) -> Self {
        Self {
            kind: FluidKind::TwoPhase,
            gas_specific_gravity: Some(gas_specific_gravity),
            api_gravity: Some(api_gravity),
            gor: Some(gor),
            water_cut: Some(water_cut),
            viscosity_override: None,
            z_override: None,
            heat_capacity_ratio: 1.28,
            molecular_weight: None,
        }
    }

    /// Gas-condensate stream; condensate gravity is optional and only used
    /// for reporting.
    pub fn gas_condensate(gas_specific_gravity: f64, condensate_api: Option<f64>) -> Self {
        Self {
            kind: FluidKind::GasCondensate,
            gas_specific_gravity: Some(gas_specific_gravity),
            api_gravity: condensate_api,
            gor: None,
            water_cut: None,
            viscosity_override: None,
            z_override: None,
            heat_capacity_ratio: 1.28,
            molecular_weight: None,
        }
    }

    /// Check that every descriptor required by `kind` is present and in
    /// physical range. Runs before any correlation is touched.
    pub fn validate(&self) -> PvtResult<()> {
        let kind = self.kind.name();

        let sg = self
            .gas_specific_gravity
            .ok_or(PvtError::MissingDescriptor {
                kind,
                field: "gas_specific_gravity",
            })?;
        if !sg.is_finite() || sg <= 0.0 {
            return Err(PvtError::InvalidFluidState {
                what: "gas specific gravity must be positive",
            });
        }

        if !self.heat_capacity_ratio.is_finite() || self.heat_capacity_ratio <= 1.0 {
            return Err(PvtError::InvalidFluidState {
                what: "heat capacity ratio must exceed 1",
            });
        }

        match self.kind {
            FluidKind::Gas | FluidKind::GasCondensate => {}
            FluidKind::Oil | FluidKind::TwoPhase => {
                let api = self.api_gravity.ok_or(PvtError::MissingDescriptor {
                    kind,
                    field: "api_gravity",
                })?;
                if !api.is_finite() || api <= 0.0 || api >= 100.0 {
                    return Err(PvtError::InvalidFluidState {
                        what: "API gravity must be in (0, 100)",
                    });
                }

                let gor = self.gor.ok_or(PvtError::MissingDescriptor {
                    kind,
                    field: "gor",
                })?;
                if !gor.is_finite() || gor < 0.0 {
                    return Err(PvtError::InvalidFluidState {
                        what: "GOR must be non-negative",
                    });
                }

                if self.kind == FluidKind::TwoPhase {
                    let wct = self.water_cut.ok_or(PvtError::MissingDescriptor {
                        kind,
                        field: "water_cut",
                    })?;
                    if !wct.is_finite() || !(0.0..=1.0).contains(&wct) {
                        return Err(PvtError::InvalidFluidState {
                            what: "water cut must be in [0, 1]",
                        });
                    }
                }
            }
        }

        if let Some(z) = self.z_override {
            if !z.is_finite() || z <= 0.0 {
                return Err(PvtError::InvalidFluidState {
                    what: "Z-factor override must be positive",
                });
            }
        }

        Ok(())
    }

    /// Water cut with the per-kind default applied.
    pub fn effective_water_cut(&self) -> f64 {
        self.water_cut.unwrap_or(0.0)
    }
}
