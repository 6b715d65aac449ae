use crate::config::SimulationConfig;
use crate::physics::export::ExportMode;
use crate::physics::history::HistoryBuffer;
use crate::physics::math::Scalar;
use crate::physics::parameters::SimulationParameters;
use crate::physics::state::{SimulationState, StepReport};
use bevy::prelude::*;
use std::path::PathBuf;

/// The simulation owned by the app; only `Update` systems mutate it
#[derive(Resource, Deref, DerefMut, Debug, Clone, Default)]
pub struct Simulation(pub SimulationState);

impl Simulation {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self(SimulationState::with_history(
            config.parameters.initial_velocity,
            HistoryBuffer::with_capacity(config.history.capacity),
        ))
    }
}

/// Parameter snapshot read by the simulation on every tick
#[derive(Resource, Deref, DerefMut, Debug, Clone, Default, PartialEq)]
pub struct Parameters(pub SimulationParameters);

/// Output of the most recent tick, `None` before the first one or after a reset
#[derive(Resource, Deref, DerefMut, Debug, Clone, Copy, Default, PartialEq)]
pub struct LatestReport(pub Option<StepReport>);

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Mode used when a run finishes
    pub mode: ExportMode,
    pub output_dir: PathBuf,
    pub on_exit: bool,
}

impl ExportSettings {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            mode: config.export_mode(),
            output_dir: PathBuf::from(&config.export.output_dir),
            on_exit: config.export.on_exit,
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

/// Simulated time at which telemetry was last logged
#[derive(Resource, Deref, DerefMut, Debug, Clone, Copy, Default, PartialEq)]
pub struct TelemetryClock(pub Option<Scalar>);
