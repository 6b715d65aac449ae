//! Tick systems: advance the simulation by the frame delta and log telemetry

use crate::prelude::*;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PhysicsSet {
    Advance,
    Telemetry,
}

/// Step the simulation once per frame with the clamped frame delta
pub fn advance_simulation(
    time: Res<Time>,
    config: Res<SimulationConfig>,
    parameters: Res<Parameters>,
    mut simulation: ResMut<Simulation>,
    mut latest: ResMut<LatestReport>,
) {
    let dt = time.delta_secs_f64().min(config.driver.max_step);
    let report = simulation.step(dt, &parameters);
    **latest = Some(report);
}

/// While paused, an edited `initial_velocity` becomes the current velocity.
///
/// Edits made while running only take effect on the next reset.
pub fn apply_paused_velocity(
    state: Res<State<AppState>>,
    parameters: Res<Parameters>,
    mut simulation: ResMut<Simulation>,
    mut last_seen: Local<Option<Scalar>>,
) {
    let velocity = parameters.sanitized().initial_velocity;
    let edited = last_seen.is_some_and(|last| last != velocity);
    *last_seen = Some(velocity);

    if edited && *state.get() == AppState::Paused {
        debug!("Velocity set to {velocity} m/s while paused");
        simulation.set_velocity(velocity);
    }
}

/// Log the latest report at most once per `driver.telemetry_interval` of simulated time
pub fn log_telemetry(
    config: Res<SimulationConfig>,
    latest: Res<LatestReport>,
    mut clock: ResMut<TelemetryClock>,
) {
    let Some(report) = **latest else {
        return;
    };

    let due = match **clock {
        None => true,
        Some(last) => {
            report.time < last || report.time - last >= config.driver.telemetry_interval
        }
    };
    if !due {
        return;
    }

    debug!(
        "t={:.3}s x={:.3}m v={:.3}m/s a={:.3}m/s² F_applied={:.1}N F_friction={:.1}N F_drag={:.1}N F_net={:.1}N ({:?})",
        report.time,
        report.position,
        report.velocity,
        report.acceleration,
        report.applied_force,
        report.friction_force,
        report.drag_force,
        report.net_force,
        report.phase
    );
    **clock = Some(report.time);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::state::MAX_STEP;
    use crate::test_utils::{create_test_app, run_frames};
    use std::time::Duration;

    fn app_with_frame(frame: Duration) -> App {
        let mut app = create_test_app();
        app.insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(frame));
        app.add_plugins(crate::plugins::simulation::SimulationPlugin::with_config(
            SimulationConfig::default(),
        ));
        app
    }

    #[test]
    fn test_advance_records_one_sample_per_frame() {
        let mut app = app_with_frame(Duration::from_millis(10));

        run_frames(&mut app, 5);

        let simulation = app.world().resource::<Simulation>();
        assert_eq!(simulation.history().len(), 5);
        let latest = app.world().resource::<LatestReport>();
        assert_eq!(latest.map(|report| report.time), Some(simulation.kinematics().time));
    }

    #[test]
    fn test_frame_delta_is_clamped() {
        let mut app = app_with_frame(Duration::from_millis(200));

        run_frames(&mut app, 4);

        let simulation = app.world().resource::<Simulation>();
        let history = simulation.history();
        assert!(
            history
                .iter()
                .zip(history.iter().skip(1))
                .all(|(a, b)| b.time - a.time <= MAX_STEP + 1e-12)
        );
        assert!(simulation.kinematics().time <= 4.0 * MAX_STEP + 1e-12);
    }

    #[test]
    fn test_velocity_edit_while_paused_applies_immediately() {
        let mut app = app_with_frame(Duration::from_millis(20));
        app.world_mut().resource_mut::<Parameters>().applied_force = 0.0;
        app.update();
        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Paused);
        app.update();
        let samples = app.world().resource::<Simulation>().history().len();

        app.world_mut().resource_mut::<Parameters>().initial_velocity = 4.0;
        app.update();

        let simulation = app.world().resource::<Simulation>();
        assert_eq!(simulation.kinematics().velocity, 4.0);
        assert_eq!(simulation.history().len(), samples);

        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Running);
        app.update();
        assert!(app.world().resource::<Simulation>().kinematics().position > 0.0);
    }

    #[test]
    fn test_velocity_edit_while_running_waits_for_reset() {
        let mut app = app_with_frame(Duration::from_millis(20));
        app.update();

        app.world_mut().resource_mut::<Parameters>().initial_velocity = 4.0;
        app.update();

        // Default force is held by static friction
        assert_eq!(app.world().resource::<Simulation>().kinematics().velocity, 0.0);

        // Pausing afterwards does not pick up the earlier edit
        app.world_mut()
            .resource_mut::<NextState<AppState>>()
            .set(AppState::Paused);
        app.update();
        app.update();
        assert_eq!(app.world().resource::<Simulation>().kinematics().velocity, 0.0);
    }

    #[test]
    fn test_parameter_changes_apply_on_next_tick() {
        let mut app = app_with_frame(Duration::from_millis(20));
        app.update();

        app.world_mut().resource_mut::<Parameters>().applied_force = 9000.0;
        app.update();
        app.update();

        let latest = app.world().resource::<LatestReport>();
        let report = latest.unwrap();
        assert_eq!(report.applied_force, 9000.0);
        assert!(report.velocity > 0.0);
    }
}
