//! Numerical integration methods for the one-dimensional state `(x, v)`
//!
//! The governing system is `dx/dt = v`, `dv/dt = a(v)`. Because every force
//! in the model depends on velocity alone, an [`AccelerationField`] is
//! evaluated at a velocity rather than a position.

use crate::physics::forces::ForceBreakdown;
use crate::physics::math::Scalar;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod explicit_euler;
pub mod registry;
pub mod runge_kutta;

pub use explicit_euler::ExplicitEuler;
pub use runge_kutta::RungeKuttaFourthOrder;

/// Trait for computing the acceleration and force breakdown at a velocity.
///
/// This abstraction lets integrators evaluate forces at the intermediate
/// velocities of multi-stage methods.
pub trait AccelerationField {
    fn at(&self, velocity: Scalar) -> ForceBreakdown;
}

/// New state produced by one integration step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub position: Scalar,
    pub velocity: Scalar,
    /// Forces evaluated at the post-step velocity
    pub forces: ForceBreakdown,
}

/// Base trait for all integrators
pub trait Integrator: Send + Sync {
    /// Clone this integrator into a new box
    fn clone_box(&self) -> Box<dyn Integrator>;

    /// Advance `(position, velocity)` by `dt`.
    ///
    /// Implementations are pure: identical input always yields identical
    /// output. The reported forces are re-evaluated at the new velocity so
    /// that what a caller displays matches the state just entered.
    fn step(
        &self,
        position: Scalar,
        velocity: Scalar,
        field: &dyn AccelerationField,
        dt: Scalar,
    ) -> StepOutcome;

    /// Order of the global truncation error
    fn convergence_order(&self) -> usize;

    /// Canonical name used in configuration and on the command line
    fn name(&self) -> &'static str;

    /// Alternative names accepted for this integrator
    fn aliases(&self) -> Vec<&'static str> {
        Vec::new()
    }
}

/// Integrator selected in a parameter snapshot
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IntegratorKind {
    #[default]
    #[serde(rename = "euler", alias = "explicit_euler", alias = "forward_euler")]
    Euler,
    #[serde(
        rename = "rk4",
        alias = "runge_kutta_4",
        alias = "runge_kutta_fourth_order"
    )]
    RungeKuttaFourthOrder,
}

static EXPLICIT_EULER: ExplicitEuler = ExplicitEuler;
static RUNGE_KUTTA_FOURTH_ORDER: RungeKuttaFourthOrder = RungeKuttaFourthOrder;

impl IntegratorKind {
    pub const ALL: [IntegratorKind; 2] = [Self::Euler, Self::RungeKuttaFourthOrder];

    /// Stateless integrator implementing this kind
    pub fn integrator(self) -> &'static dyn Integrator {
        match self {
            Self::Euler => &EXPLICIT_EULER,
            Self::RungeKuttaFourthOrder => &RUNGE_KUTTA_FOURTH_ORDER,
        }
    }

    pub fn name(self) -> &'static str {
        self.integrator().name()
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IntegratorKind {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        registry::IntegratorRegistry::default().resolve(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_maps_to_matching_integrator() {
        assert_eq!(IntegratorKind::Euler.name(), "euler");
        assert_eq!(IntegratorKind::RungeKuttaFourthOrder.name(), "rk4");
        assert_eq!(IntegratorKind::Euler.integrator().convergence_order(), 1);
        assert_eq!(
            IntegratorKind::RungeKuttaFourthOrder
                .integrator()
                .convergence_order(),
            4
        );
    }

    #[test]
    fn test_kind_from_str_accepts_aliases() {
        assert_eq!(
            "forward_euler".parse::<IntegratorKind>(),
            Ok(IntegratorKind::Euler)
        );
        assert_eq!(
            "runge_kutta_4".parse::<IntegratorKind>(),
            Ok(IntegratorKind::RungeKuttaFourthOrder)
        );
        assert!("verlet".parse::<IntegratorKind>().is_err());
    }

    #[test]
    fn test_kind_serde_names_agree_with_integrator_names() {
        for kind in IntegratorKind::ALL {
            let encoded = toml::to_string(&Wrapper { kind }).unwrap();
            assert_eq!(encoded.trim(), format!("kind = \"{}\"", kind.name()));
        }

        #[derive(Serialize)]
        struct Wrapper {
            kind: IntegratorKind,
        }
    }
}
