use bevy::app::ScheduleRunnerPlugin;
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use clap::Parser;
use forcedrift::cli::{Args, handle_list_integrators, load_and_apply_config};
use forcedrift::{HeadlessRunPlugin, SimulationPlugin};
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    let args = Args::parse();

    if args.list_integrators {
        handle_list_integrators();
        return ExitCode::SUCCESS;
    }

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let mut app = App::new();

    // Logging first so configuration fallbacks are reported
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)),
        LogPlugin {
            level: log_level,
            ..default()
        },
        StatesPlugin,
    ));

    let config = match load_and_apply_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    app.add_plugins((
        SimulationPlugin::with_config(config.clone()),
        HeadlessRunPlugin::from_config(&config),
    ));

    match app.run() {
        AppExit::Success => ExitCode::SUCCESS,
        AppExit::Error(code) => ExitCode::from(code.get()),
    }
}
