//! Runge-Kutta integration methods

use super::{AccelerationField, Integrator, StepOutcome};
use crate::physics::math::Scalar;

/// Fourth-order Runge-Kutta integrator (RK4)
///
/// A classic multi-stage integrator that provides fourth-order accuracy
/// by combining four intermediate evaluations of the derivative of the
/// state `(x, v)`, whose derivative is `(v, a(v))`.
///
/// The RK4 algorithm:
/// 1. k1 = f(v)
/// 2. k2 = f(v + k1*dt/2)
/// 3. k3 = f(v + k2*dt/2)
/// 4. k4 = f(v + k3*dt)
/// 5. y(t+dt) = y(t) + dt/6 * (k1 + 2*k2 + 2*k3 + k4)
///
/// The position derivative at each stage is that stage's velocity.
#[derive(Debug, Clone, Copy, Default)]
pub struct RungeKuttaFourthOrder;

impl Integrator for RungeKuttaFourthOrder {
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
        // Stage 1: k1 at the current velocity
        let k1_x = velocity;
        let k1_v = field.at(velocity).acceleration;

        // Stage 2: k2 at the midpoint using k1
        let k2_x = velocity + k1_v * (dt * 0.5);
        let k2_v = field.at(k2_x).acceleration;

        // Stage 3: k3 at the midpoint using k2
        let k3_x = velocity + k2_v * (dt * 0.5);
        let k3_v = field.at(k3_x).acceleration;

        // Stage 4: k4 at the endpoint using k3
        let k4_x = velocity + k3_v * dt;
        let k4_v = field.at(k4_x).acceleration;

        // y_n+1 = y_n + dt/6 * (k1 + 2*k2 + 2*k3 + k4)
        let next_position = position + (k1_x + k2_x * 2.0 + k3_x * 2.0 + k4_x) * (dt / 6.0);
        let next_velocity = velocity + (k1_v + k2_v * 2.0 + k3_v * 2.0 + k4_v) * (dt / 6.0);

        StepOutcome {
            position: next_position,
            velocity: next_velocity,
            forces: field.at(next_velocity),
        }
    }

    fn convergence_order(&self) -> usize {
        4
    }

    fn name(&self) -> &'static str {
        "rk4"
    }

    fn aliases(&self) -> Vec<&'static str> {
        vec!["runge_kutta_4", "runge_kutta_fourth_order"]
    }
}
