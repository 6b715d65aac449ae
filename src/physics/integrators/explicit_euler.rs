//! Explicit Euler integration method (forward Euler)
//!
//! First-order and cheap. With velocity-dependent drag its error grows
//! quickly at the step sizes a frame-driven loop produces, which is why
//! RK4 is offered alongside it.

use super::{AccelerationField, Integrator, StepOutcome};
use crate::physics::math::Scalar;

/// Explicit Euler integrator (forward Euler method)
///
/// # Algorithm
///
/// ```text
/// a(t)     = f(v(t))
/// v(t+dt)  = v(t) + a(t) * dt
/// x(t+dt)  = x(t) + v(t) * dt     (pre-step velocity)
/// ```
///
/// # Mathematical Properties
///
/// - **Order of accuracy**: O(dt) global, O(dt²) local truncation error
/// - **Force evaluations**: 1 per step, plus 1 to report forces at the new velocity
/// - **Stability**: Conditionally stable; stiff linear drag (large k/m) needs dt < 2m/k
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitEuler;

impl Integrator for ExplicitEuler {
    fn clone_box(&self) -> Box<dyn Integrator> {
        Box::new(*self)
    }

    fn step(
        &self,
        position: Scalar,
        velocity: Scalar,
        field: &dyn AccelerationField,
        dt: Scalar,
    ) -> StepOutcome {
        let acceleration = field.at(velocity).acceleration;

        // Position advances with the velocity at the start of the step
        let next_position = position + velocity * dt;
        let next_velocity = velocity + acceleration * dt;

        StepOutcome {
            position: next_position,
            velocity: next_velocity,
            forces: field.at(next_velocity),
        }
    }

    fn convergence_order(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "euler"
    }

    fn aliases(&self) -> Vec<&'static str> {
        vec!["explicit_euler", "forward_euler"]
    }
}
