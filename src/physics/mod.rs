//! One-dimensional force, friction and drag physics
//!
//! The core is free of any driver: a caller owns a [`state::SimulationState`]
//! and advances it with a parameter snapshot and a time step.

pub mod export;
pub mod forces;
pub mod history;
pub mod integrators;
pub mod math;
pub mod parameters;
pub mod state;
