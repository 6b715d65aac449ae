//! Action handlers for simulation commands
//!
//! This module contains handlers for SimulationCommand events: pause/resume,
//! reset, history clearing, export and quit.

use crate::physics::export::write_export;
use crate::prelude::*;

pub fn handle_toggle_pause_simulation_event(
    mut commands_reader: EventReader<SimulationCommand>,
    current_state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for command in commands_reader.read() {
        if !matches!(command, SimulationCommand::TogglePause) {
            continue;
        }
        match current_state.get() {
            AppState::Running => {
                info!("Simulation paused");
                next_state.set(AppState::Paused);
            }
            AppState::Paused => {
                info!("Simulation resumed");
                next_state.set(AppState::Running);
            }
        }
    }
}

pub fn handle_reset_simulation_event(
    mut commands_reader: EventReader<SimulationCommand>,
    parameters: Res<Parameters>,
    mut simulation: ResMut<Simulation>,
    mut latest: ResMut<LatestReport>,
    mut clock: ResMut<TelemetryClock>,
) {
    for command in commands_reader.read() {
        if !matches!(command, SimulationCommand::Reset) {
            continue;
        }

        let initial_velocity = parameters.sanitized().initial_velocity;
        simulation.reset(initial_velocity);
        **latest = None;
        **clock = None;
        info!("Simulation reset (v0 = {initial_velocity} m/s)");
    }
}

pub fn handle_clear_history_event(
    mut commands_reader: EventReader<SimulationCommand>,
    mut simulation: ResMut<Simulation>,
) {
    for command in commands_reader.read() {
        if !matches!(command, SimulationCommand::ClearHistory) {
            continue;
        }

        let dropped = simulation.history().len();
        simulation.clear_history();
        info!("Cleared {dropped} history samples");
    }
}

pub fn handle_export_event(
    mut commands_reader: EventReader<SimulationCommand>,
    simulation: Res<Simulation>,
    settings: Res<ExportSettings>,
    mut written: EventWriter<ExportWritten>,
) {
    for command in commands_reader.read() {
        let SimulationCommand::Export(mode) = *command else {
            continue;
        };

        match write_export(simulation.history(), mode, &settings.output_dir) {
            Ok(path) => {
                let samples = match mode {
                    ExportMode::All => simulation.history().len(),
                    ExportMode::Window(seconds) => simulation.history().query_window(seconds).len(),
                };
                info!("Exported {samples} samples to {}", path.display());
                written.write(ExportWritten { path, samples });
            }
            Err(e) => warn!("Export skipped: {e}"),
        }
    }
}

pub fn handle_quit_event(
    mut commands_reader: EventReader<SimulationCommand>,
    mut exit: EventWriter<AppExit>,
) {
    for command in commands_reader.read() {
        if matches!(command, SimulationCommand::Quit) {
            exit.write(AppExit::Success);
        }
    }
}
