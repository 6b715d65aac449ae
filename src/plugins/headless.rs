//! Headless run plugin
//!
//! Drives the simulation with a fixed manual frame delta, then exports the
//! history and exits once the configured duration has elapsed.
//!
//! The run is finished after the frame's tick: the simulation is paused so
//! no further sample is recorded, and the export and quit commands are
//! handled at the start of the next frame.

use crate::plugins::simulation::SimulationSet;
use crate::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

/// Smallest frame delta the runner accepts, in seconds
const MIN_FRAME_DT: Scalar = 1e-6;

pub struct HeadlessRunPlugin {
    frame_dt: Scalar,
    duration: Scalar,
}

impl HeadlessRunPlugin {
    pub fn new(frame_dt: Scalar, duration: Scalar) -> Self {
        Self { frame_dt, duration }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.driver.frame_dt, config.driver.duration)
    }
}

/// Driver-time budget for a headless run
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct RunDuration(pub Scalar);

impl Plugin for HeadlessRunPlugin {
    fn build(&self, app: &mut App) {
        let frame_dt = if self.frame_dt.is_finite() {
            self.frame_dt.max(MIN_FRAME_DT)
        } else {
            warn!(
                "Invalid frame delta {}; using {} s",
                self.frame_dt, MIN_FRAME_DT
            );
            MIN_FRAME_DT
        };
        let duration = if self.duration.is_finite() {
            self.duration.max(0.0)
        } else {
            0.0
        };

        info!("Headless run: {duration} s at {frame_dt} s per frame");

        app.insert_resource(TimeUpdateStrategy::ManualDuration(
            Duration::from_secs_f64(frame_dt),
        ));
        app.insert_resource(RunDuration(duration));
        app.add_systems(Update, finish_run.after(SimulationSet::Physics));
    }
}

/// Once the run duration has elapsed, stop ticking and request an export (if enabled) and quit
pub fn finish_run(
    time: Res<Time>,
    duration: Res<RunDuration>,
    settings: Res<ExportSettings>,
    mut finished: Local<bool>,
    mut next_state: ResMut<NextState<AppState>>,
    mut simulation_commands: EventWriter<SimulationCommand>,
) {
    if *finished || time.elapsed_secs_f64() < duration.0 {
        return;
    }
    *finished = true;
    next_state.set(AppState::Paused);

    info!("Run finished after {:.3} s", time.elapsed_secs_f64());
    if settings.on_exit {
        simulation_commands.write(SimulationCommand::Export(settings.mode));
    }
    simulation_commands.write(SimulationCommand::Quit);
}
