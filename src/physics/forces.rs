//! Force model: Coulomb friction, air drag and the resulting acceleration
//!
//! Every force here depends on velocity alone. The applied force is taken as
//! constant for the duration of a step, which is what lets the integrators
//! treat `dv/dt` as a function of `v` only.

use super::integrators::AccelerationField;
use super::math::{GRAVITY, Scalar, sign};
use super::parameters::{DragLaw, SimulationParameters};

/// Below this speed (m/s) the body counts as being at rest for friction
pub const VELOCITY_THRESHOLD: Scalar = 1e-3;

/// Result of the friction evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrictionOutcome {
    /// Friction force in N
    pub force: Scalar,
    /// Static friction exactly cancels the applied force
    pub static_hold: bool,
}

/// Forces acting on the body at a given velocity, and the acceleration they produce
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ForceBreakdown {
    pub acceleration: Scalar,
    pub applied: Scalar,
    pub friction: Scalar,
    pub drag: Scalar,
    pub net: Scalar,
}

impl ForceBreakdown {
    /// Breakdown of a body held at rest by static friction
    pub fn at_rest(applied: Scalar) -> Self {
        Self {
            acceleration: 0.0,
            applied,
            friction: -applied,
            drag: 0.0,
            net: 0.0,
        }
    }
}

/// Coulomb friction for the given applied force and velocity.
///
/// Near rest the body stays put while `|F| <= μ·m·g`; past that, or while
/// moving, friction has the full kinetic magnitude and opposes the actual
/// (or impending) direction of motion.
pub fn friction(
    applied_force: Scalar,
    velocity: Scalar,
    friction_coefficient: Scalar,
    mass: Scalar,
    friction_enabled: bool,
) -> FrictionOutcome {
    let max_friction = if friction_enabled {
        friction_coefficient * mass * GRAVITY
    } else {
        0.0
    };

    if velocity.abs() < VELOCITY_THRESHOLD {
        if applied_force.abs() <= max_friction {
            return FrictionOutcome {
                force: -applied_force,
                static_hold: true,
            };
        }

        return FrictionOutcome {
            force: -sign(applied_force) * max_friction,
            static_hold: false,
        };
    }

    FrictionOutcome {
        force: -sign(velocity) * max_friction,
        static_hold: false,
    }
}

/// Drag force for the given velocity; always opposes motion
pub fn drag(velocity: Scalar, law: DragLaw) -> Scalar {
    match law {
        DragLaw::None => 0.0,
        DragLaw::Linear { coefficient } => -coefficient * velocity,
        DragLaw::Quadratic {
            air_density,
            drag_coefficient,
            reference_area,
        } => -0.5 * air_density * drag_coefficient * reference_area * velocity * velocity.abs(),
    }
}

/// Whether the body sits in the static-friction regime at this velocity
#[inline]
pub fn is_static_hold(velocity: Scalar, params: &SimulationParameters) -> bool {
    velocity.abs() < VELOCITY_THRESHOLD && params.applied_force.abs() <= params.max_friction()
}

/// Full force breakdown and acceleration at `velocity`.
///
/// During static hold the acceleration, drag and net force are all zero and
/// friction balances the applied force.
pub fn acceleration(velocity: Scalar, params: &SimulationParameters) -> ForceBreakdown {
    let mass = params.effective_mass();
    let applied = params.applied_force;
    let friction = friction(
        applied,
        velocity,
        params.friction_coefficient,
        mass,
        params.friction_enabled,
    );

    if friction.static_hold {
        return ForceBreakdown {
            acceleration: 0.0,
            applied,
            friction: friction.force,
            drag: 0.0,
            net: 0.0,
        };
    }

    let drag = drag(velocity, params.drag_law());
    let net = applied + friction.force + drag;

    ForceBreakdown {
        acceleration: net / mass,
        applied,
        friction: friction.force,
        drag,
        net,
    }
}

/// Acceleration field over a borrowed parameter snapshot
#[derive(Debug, Clone, Copy)]
pub struct ForceModel<'a> {
    params: &'a SimulationParameters,
}

impl<'a> ForceModel<'a> {
    pub fn new(params: &'a SimulationParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SimulationParameters {
        self.params
    }
}

impl AccelerationField for ForceModel<'_> {
    fn at(&self, velocity: Scalar) -> ForceBreakdown {
        acceleration(velocity, self.params)
    }
}
