//! Forcedrift library
//!
//! This provides the core functionality of forcedrift as a library
//! to enable integration testing.

pub mod cli;
pub mod config;
pub mod events;
pub mod physics;
pub mod plugins;
pub mod prelude;
pub mod resources;
pub mod states;

// Test utilities are public for integration tests
pub mod test_utils;

// Re-export commonly used items
pub use config::SimulationConfig;
pub use events::*;
pub use physics::{
    export::{ExportError, ExportMode, export_csv, write_export},
    history::{HistoryBuffer, HistorySample},
    integrators,
    math::Scalar,
    parameters::{DragModel, SimulationParameters},
    state::{SimulationState, StepReport},
};
pub use plugins::{headless::HeadlessRunPlugin, simulation::SimulationPlugin};
pub use states::AppState;
