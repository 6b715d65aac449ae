//! Simulation state machine
//!
//! [`SimulationState`] owns the kinematic state and the sample history. All
//! mutation goes through [`SimulationState::step`], [`SimulationState::reset`]
//! and [`SimulationState::clear_history`], which keeps the invariants below
//! checkable:
//!
//! - time never decreases and each step advances it by at most [`MAX_STEP`]
//! - acceleration is always derived from the current velocity, never integrated
//! - every step appends exactly one sample to the history

use super::forces::{ForceBreakdown, ForceModel, is_static_hold};
use super::history::{HistoryBuffer, HistorySample};
use super::math::Scalar;
use super::parameters::SimulationParameters;

/// Largest time step, in seconds, a single call to `step` will integrate
pub const MAX_STEP: Scalar = 0.05;

/// Residual speed (m/s) snapped to zero after a step when friction can hold the body
pub const REST_SNAP_VELOCITY: Scalar = 1e-4;

/// Time, position, velocity and derived acceleration
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KinematicState {
    pub time: Scalar,
    pub position: Scalar,
    pub velocity: Scalar,
    pub acceleration: Scalar,
}

/// Whether the last step left the body held by static friction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MotionPhase {
    #[default]
    AtRest,
    Moving,
}

/// Output of one tick, for rendering and plotting collaborators
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    pub time: Scalar,
    pub position: Scalar,
    pub velocity: Scalar,
    pub acceleration: Scalar,
    pub applied_force: Scalar,
    pub friction_force: Scalar,
    pub drag_force: Scalar,
    pub net_force: Scalar,
    pub phase: MotionPhase,
}

impl From<&StepReport> for HistorySample {
    fn from(report: &StepReport) -> Self {
        Self {
            time: report.time,
            position: report.position,
            velocity: report.velocity,
            applied_force: report.applied_force,
            friction_force: report.friction_force,
            drag_force: report.drag_force,
            net_force: report.net_force,
        }
    }
}

/// Clamp a driver-supplied time step into `[0, MAX_STEP]`
#[inline]
pub fn clamp_step(dt: Scalar) -> Scalar {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_STEP)
    } else {
        0.0
    }
}

#[derive(Debug, Clone)]
pub struct SimulationState {
    kinematics: KinematicState,
    forces: ForceBreakdown,
    phase: MotionPhase,
    history: HistoryBuffer,
    last_report: Option<StepReport>,
}

impl SimulationState {
    /// State at `t = 0`, `x = 0` moving with `initial_velocity`
    pub fn new(initial_velocity: Scalar) -> Self {
        Self::with_history(initial_velocity, HistoryBuffer::new())
    }

    pub fn with_history(initial_velocity: Scalar, history: HistoryBuffer) -> Self {
        let mut history = history;
        history.clear();

        Self {
            kinematics: KinematicState {
                velocity: finite_or_zero(initial_velocity),
                ..Default::default()
            },
            forces: ForceBreakdown::default(),
            phase: MotionPhase::AtRest,
            history,
            last_report: None,
        }
    }

    /// Advance the simulation by `dt` seconds under `params`.
    ///
    /// `dt` is clamped to `[0, MAX_STEP]`. While static friction can hold the
    /// body no integration happens; otherwise the integrator selected in
    /// `params` advances `(x, v)`. Afterwards a residual velocity below
    /// [`REST_SNAP_VELOCITY`] is snapped to zero when friction can hold the
    /// body, and the resulting sample is appended to the history.
    pub fn step(&mut self, dt: Scalar, params: &SimulationParameters) -> StepReport {
        let params = params.sanitized();
        let dt = clamp_step(dt);
        let velocity = self.kinematics.velocity;

        if is_static_hold(velocity, &params) {
            self.hold_at_rest(params.applied_force);
        } else {
            let model = ForceModel::new(&params);
            let outcome = params.integrator.integrator().step(
                self.kinematics.position,
                velocity,
                &model,
                dt,
            );

            self.kinematics.position = outcome.position;
            self.kinematics.velocity = outcome.velocity;
            self.kinematics.acceleration = outcome.forces.acceleration;
            self.forces = outcome.forces;
            self.phase = MotionPhase::Moving;
        }

        self.kinematics.time += dt;

        let velocity = self.kinematics.velocity;
        if velocity.abs() < REST_SNAP_VELOCITY
            && params.applied_force.abs() <= params.max_friction()
        {
            self.hold_at_rest(params.applied_force);
        }

        let report = self.report();
        self.history.push(HistorySample::from(&report));
        self.last_report = Some(report);
        report
    }

    /// Return to `t = 0`, `x = 0`, `v = initial_velocity` and clear the history
    pub fn reset(&mut self, initial_velocity: Scalar) {
        self.kinematics = KinematicState {
            velocity: finite_or_zero(initial_velocity),
            ..Default::default()
        };
        self.forces = ForceBreakdown::default();
        self.phase = MotionPhase::AtRest;
        self.last_report = None;
        self.history.clear();
    }

    /// Overwrite the current velocity without advancing time.
    ///
    /// Intended for a paused driver that lets the user edit the velocity in
    /// place. Position, time and history are left untouched.
    pub fn set_velocity(&mut self, velocity: Scalar) {
        self.kinematics.velocity = finite_or_zero(velocity);
    }

    /// Drop all recorded samples, keeping the current kinematic state
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn kinematics(&self) -> &KinematicState {
        &self.kinematics
    }

    pub fn forces(&self) -> &ForceBreakdown {
        &self.forces
    }

    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn last_report(&self) -> Option<&StepReport> {
        self.last_report.as_ref()
    }

    fn hold_at_rest(&mut self, applied_force: Scalar) {
        self.kinematics.velocity = 0.0;
        self.kinematics.acceleration = 0.0;
        self.forces = ForceBreakdown::at_rest(applied_force);
        self.phase = MotionPhase::AtRest;
    }

    fn report(&self) -> StepReport {
        StepReport {
            time: self.kinematics.time,
            position: self.kinematics.position,
            velocity: self.kinematics.velocity,
            acceleration: self.kinematics.acceleration,
            applied_force: self.forces.applied,
            friction_force: self.forces.friction,
            drag_force: self.forces.drag,
            net_force: self.forces.net,
            phase: self.phase,
        }
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

fn finite_or_zero(value: Scalar) -> Scalar {
    if value.is_finite() { value } else { 0.0 }
}
