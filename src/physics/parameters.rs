//! Parameter snapshot supplied to the simulation before each step

use super::integrators::IntegratorKind;
use super::math::{GRAVITY, MIN_MASS, Scalar};
use forcedrift_macros::{ConfigDefaults, Sanitize};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Air drag model selected when drag is enabled
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DragModel {
    /// F = -k·v
    Linear,
    /// F = -½·ρ·Cd·A·v·|v|
    #[default]
    Quadratic,
}

impl FromStr for DragModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(DragModel::Linear),
            "quadratic" => Ok(DragModel::Quadratic),
            other => Err(format!(
                "Unknown drag model: '{other}'. Expected 'linear' or 'quadratic'"
            )),
        }
    }
}

/// Resolved drag law with its coefficients
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragLaw {
    None,
    Linear {
        coefficient: Scalar,
    },
    Quadratic {
        air_density: Scalar,
        drag_coefficient: Scalar,
        reference_area: Scalar,
    },
}

/// Inputs to the force model.
///
/// A driver may replace any field between ticks; the simulation keeps no
/// copy of its own. Values are passed through [`SimulationParameters::sanitized`]
/// before use, so out-of-range or non-finite input never reaches the physics.
#[derive(ConfigDefaults, Sanitize, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimulationParameters {
    /// Body mass in kg
    #[default(1000.0)]
    #[clamp(MIN_MASS, Scalar::MAX)]
    #[fallback(MIN_MASS)]
    pub mass: Scalar,

    /// Applied force in N, signed
    #[default(2000.0)]
    #[fallback(0.0)]
    pub applied_force: Scalar,

    /// Coulomb friction coefficient, shared by the static and kinetic regimes
    #[default(0.3)]
    #[clamp(0.0, 1.0)]
    #[fallback(0.0)]
    pub friction_coefficient: Scalar,

    #[default(true)]
    pub friction_enabled: bool,

    /// Velocity in m/s adopted on reset
    #[default(0.0)]
    #[fallback(0.0)]
    pub initial_velocity: Scalar,

    #[default(false)]
    pub drag_enabled: bool,

    #[default(DragModel::Quadratic)]
    pub drag_model: DragModel,

    /// ρ in kg/m³
    #[default(1.225)]
    #[clamp(0.0, Scalar::MAX)]
    pub air_density: Scalar,

    /// Cd, dimensionless
    #[default(0.32)]
    #[clamp(0.0, Scalar::MAX)]
    pub drag_coefficient: Scalar,

    /// A in m²
    #[default(2.2)]
    #[clamp(0.0, Scalar::MAX)]
    pub reference_area: Scalar,

    /// k in N·s/m for the linear model
    #[default(12.0)]
    #[clamp(0.0, Scalar::MAX)]
    pub linear_drag_coefficient: Scalar,

    #[default(IntegratorKind::Euler)]
    pub integrator: IntegratorKind,
}

impl SimulationParameters {
    /// Mass floored at [`MIN_MASS`], safe to divide by
    #[inline]
    pub fn effective_mass(&self) -> Scalar {
        if self.mass.is_finite() {
            self.mass.max(MIN_MASS)
        } else {
            MIN_MASS
        }
    }

    /// Largest friction magnitude, μ·m·g, or zero with friction disabled
    #[inline]
    pub fn max_friction(&self) -> Scalar {
        if self.friction_enabled {
            self.friction_coefficient * self.effective_mass() * GRAVITY
        } else {
            0.0
        }
    }

    /// Drag law in effect for these parameters
    pub fn drag_law(&self) -> DragLaw {
        if !self.drag_enabled {
            return DragLaw::None;
        }

        match self.drag_model {
            DragModel::Linear => DragLaw::Linear {
                coefficient: self.linear_drag_coefficient,
            },
            DragModel::Quadratic => DragLaw::Quadratic {
                air_density: self.air_density,
                drag_coefficient: self.drag_coefficient,
                reference_area: self.reference_area,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_fallbacks() {
        let params = SimulationParameters::default();
        assert_eq!(params.air_density, 1.225);
        assert_eq!(params.drag_coefficient, 0.32);
        assert_eq!(params.reference_area, 2.2);
        assert_eq!(params.linear_drag_coefficient, 12.0);
        assert_eq!(params.integrator, IntegratorKind::Euler);
        assert!(!params.drag_enabled);
    }

    #[test]
    fn test_sanitized_clamps_mass_and_mu() {
        let params = SimulationParameters {
            mass: 0.0,
            friction_coefficient: 3.0,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(params.mass, MIN_MASS);
        assert_eq!(params.friction_coefficient, 1.0);

        let params = SimulationParameters {
            mass: -20.0,
            friction_coefficient: -0.5,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(params.mass, MIN_MASS);
        assert_eq!(params.friction_coefficient, 0.0);
    }

    #[test]
    fn test_sanitized_replaces_non_numeric_input() {
        let params = SimulationParameters {
            mass: Scalar::NAN,
            applied_force: Scalar::INFINITY,
            friction_coefficient: Scalar::NAN,
            initial_velocity: Scalar::NAN,
            air_density: Scalar::NAN,
            drag_coefficient: Scalar::NAN,
            reference_area: Scalar::NEG_INFINITY,
            linear_drag_coefficient: Scalar::NAN,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(params.mass, MIN_MASS);
        assert_eq!(params.applied_force, 0.0);
        assert_eq!(params.friction_coefficient, 0.0);
        assert_eq!(params.initial_velocity, 0.0);
        assert_eq!(params.air_density, 1.225);
        assert_eq!(params.drag_coefficient, 0.32);
        assert_eq!(params.reference_area, 2.2);
        assert_eq!(params.linear_drag_coefficient, 12.0);
    }

    #[test]
    fn test_effective_mass_never_zero() {
        let params = SimulationParameters {
            mass: 0.0,
            ..Default::default()
        };
        assert_eq!(params.effective_mass(), MIN_MASS);

        let params = SimulationParameters {
            mass: Scalar::NAN,
            ..Default::default()
        };
        assert_eq!(params.effective_mass(), MIN_MASS);
    }

    #[test]
    fn test_max_friction() {
        let params = SimulationParameters {
            mass: 1000.0,
            friction_coefficient: 0.3,
            friction_enabled: true,
            ..Default::default()
        };
        assert!((params.max_friction() - 2943.0).abs() < 1e-9);

        let params = SimulationParameters {
            friction_enabled: false,
            ..params
        };
        assert_eq!(params.max_friction(), 0.0);
    }

    #[test]
    fn test_drag_law_selection() {
        let mut params = SimulationParameters::default();
        assert_eq!(params.drag_law(), DragLaw::None);

        params.drag_enabled = true;
        params.drag_model = DragModel::Linear;
        params.linear_drag_coefficient = 4.0;
        assert_eq!(params.drag_law(), DragLaw::Linear { coefficient: 4.0 });

        params.drag_model = DragModel::Quadratic;
        assert_eq!(
            params.drag_law(),
            DragLaw::Quadratic {
                air_density: 1.225,
                drag_coefficient: 0.32,
                reference_area: 2.2,
            }
        );
    }

    #[test]
    fn test_drag_model_from_str() {
        assert_eq!("linear".parse::<DragModel>(), Ok(DragModel::Linear));
        assert_eq!("quadratic".parse::<DragModel>(), Ok(DragModel::Quadratic));
        assert!("cubic".parse::<DragModel>().is_err());
    }

    #[test]
    fn test_parameters_deserialize_partial_toml() {
        let params: SimulationParameters = toml::from_str(
            r#"
            mass = 2.5
            drag_enabled = true
            drag_model = "linear"
            integrator = "rk4"
            "#,
        )
        .unwrap();

        assert_eq!(params.mass, 2.5);
        assert_eq!(params.drag_model, DragModel::Linear);
        assert_eq!(params.integrator, IntegratorKind::RungeKuttaFourthOrder);
        assert_eq!(params.applied_force, 2000.0);
    }
}
