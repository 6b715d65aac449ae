pub mod headless;
pub mod simulation;
