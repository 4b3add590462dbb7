use bevy::{color::palettes::css::BLACK, prelude::*};

use crate::{
    data::{config::ConfigPlugin, rng::RngPlugin},
    systems::{
        particles::ParticlePlugin,
        tween::TweenPlugin,
        ui::{WidgetSystems, WidgetsPlugin},
    },
};

pub mod shortcuts;

pub struct StartupPlugin;
impl Plugin for StartupPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((ConfigPlugin, RngPlugin, TweenPlugin, ParticlePlugin, WidgetsPlugin))
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (
                    shortcuts::close_on_esc,
                    shortcuts::front_end_shortcuts.in_set(WidgetSystems::Input),
                ),
            );
    }
}

fn setup_camera(mut commands: Commands, mut clear_color: ResMut<ClearColor>) {
    clear_color.0 = BLACK.into();
    commands.spawn(Camera2d);
}
