use std::time::Duration;

use bevy::prelude::*;

use crate::{data::rng::RngPlugin, systems::tween::TweenPlugin};

/// Bare app with a manually driven clock and the tween systems.
pub fn widget_test_app() -> App {
    let mut app = App::new();
    app.init_resource::<Time>();
    app.add_plugins((RngPlugin, TweenPlugin));
    app
}

/// Advances the clock by `seconds` and runs one frame.
pub fn advance(app: &mut App, seconds: f32) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(seconds));
    app.update();
}

/// Runs frames of `step` seconds until `seconds` have elapsed.
pub fn advance_in_steps(app: &mut App, seconds: f32, step: f32) {
    let mut elapsed = 0.0;
    while elapsed < seconds {
        advance(app, step);
        elapsed += step;
    }
}

pub fn drain_events<E: Event + Clone>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}
