//! Simulation plugin - Self-contained plugin pattern
//!
//! This plugin owns the simulation resources, advances the simulation once
//! per frame while running and reacts to [`SimulationCommand`] events.

use crate::prelude::*;

mod actions;
mod physics;

use actions::{
    handle_clear_history_event, handle_export_event, handle_quit_event,
    handle_reset_simulation_event, handle_toggle_pause_simulation_event,
};
use physics::{PhysicsSet, advance_simulation, apply_paused_velocity, log_telemetry};

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Input,
    Physics,
}

pub struct SimulationPlugin {
    config: Option<SimulationConfig>,
}

impl SimulationPlugin {
    pub fn new() -> Self {
        Self { config: None }
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = self
            .config
            .clone()
            .unwrap_or_else(SimulationConfig::load_from_user_config);

        match toml::to_string_pretty(&config) {
            Ok(toml_string) => {
                debug!("=== Current Configuration (TOML) ===\n{}", toml_string);
                debug!("=== End Configuration ===");
            }
            Err(e) => {
                error!("Failed to serialize configuration to TOML: {}", e);
            }
        }

        let parameters = config.parameters.sanitized();
        if parameters != config.parameters {
            warn!("Out-of-range simulation parameters were clamped: {parameters:?}");
        }
        info!(
            "Simulating m={} kg, F={} N, mu={} with the {} integrator",
            parameters.mass,
            parameters.applied_force,
            parameters.friction_coefficient,
            parameters.integrator
        );

        app.insert_resource(Simulation::from_config(&config));
        app.insert_resource(Parameters(config.parameters.clone()));
        app.insert_resource(ExportSettings::from_config(&config));
        app.init_resource::<LatestReport>();
        app.init_resource::<TelemetryClock>();
        app.insert_resource(config.clone());

        app.add_event::<SimulationCommand>();
        app.add_event::<ExportWritten>();

        app.insert_state(if config.driver.start_paused {
            AppState::Paused
        } else {
            AppState::Running
        });

        app.configure_sets(
            Update,
            (SimulationSet::Input, SimulationSet::Physics).chain(),
        );
        app.configure_sets(
            Update,
            (PhysicsSet::Advance, PhysicsSet::Telemetry)
                .chain()
                .in_set(SimulationSet::Physics),
        );

        app.add_systems(
            Update,
            (
                handle_toggle_pause_simulation_event,
                handle_reset_simulation_event,
                handle_clear_history_event,
                handle_export_event,
                handle_quit_event,
            )
                .chain()
                .in_set(SimulationSet::Input),
        );
        app.add_systems(
            Update,
            apply_paused_velocity
                .after(handle_reset_simulation_event)
                .in_set(SimulationSet::Input),
        );
        app.add_systems(
            Update,
            (
                advance_simulation
                    .in_set(PhysicsSet::Advance)
                    .run_if(in_state(AppState::Running)),
                log_telemetry.in_set(PhysicsSet::Telemetry),
            ),
        );
    }
}
