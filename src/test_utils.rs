//! Test utilities for plugin testing

use bevy::prelude::*;

/// Creates a minimal headless app with the core Bevy plugins the simulation needs
pub fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins((MinimalPlugins, bevy::state::app::StatesPlugin));

    app
}

/// Advance `app` by `frames` updates
pub fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_app() {
        let app = create_test_app();
        assert!(app.world().contains_resource::<Time>());
    }

    #[test]
    fn test_run_frames_advances_frame_count() {
        let mut app = create_test_app();
        run_frames(&mut app, 3);
        let frames = app.world().resource::<bevy::diagnostic::FrameCount>();
        assert_eq!(frames.0, 3);
    }
}
