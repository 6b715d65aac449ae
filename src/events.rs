//! Centralized event definitions
//!
//! Events are the only way drivers and UI collaborators act on the running
//! simulation:
//! - Simulation command pattern
//! - Export notifications

use crate::physics::export::ExportMode;
use bevy::prelude::*;
use std::path::PathBuf;

// Unified simulation command pattern
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum SimulationCommand {
    TogglePause,
    /// Return to `t = 0` with the configured initial velocity
    Reset,
    ClearHistory,
    Export(ExportMode),
    Quit,
}

/// Sent after an export file has been written
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ExportWritten {
    pub path: PathBuf,
    pub samples: usize,
}
