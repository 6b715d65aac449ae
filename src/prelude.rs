//! Forcedrift prelude module
//!
//! This module re-exports the most commonly used types, traits, and functions
//! across the Forcedrift application to reduce import boilerplate.

// External crate re-exports
pub use bevy::prelude::*;

// Internal re-exports - Config
pub use crate::config::SimulationConfig;

// Internal re-exports - States
pub use crate::states::AppState;

// Internal re-exports - Events
pub use crate::events::{ExportWritten, SimulationCommand};

// Internal re-exports - Resources
pub use crate::resources::{ExportSettings, LatestReport, Parameters, Simulation, TelemetryClock};

// Internal re-exports - Physics
pub use crate::physics::export::ExportMode;
pub use crate::physics::math::Scalar;
pub use crate::physics::state::StepReport;
