use bevy::{log::LogPlugin, prelude::*};

mod data;
mod scenes;
mod startup;
mod systems;

use scenes::ScenePlugin;
use startup::StartupPlugin;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Front End".into(),
                        resolution: (540.0, 960.0).into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    level: bevy::log::Level::INFO,
                    filter: "wgpu=error,naga=warn".into(),
                    ..default()
                }),
        )
        .add_plugins((StartupPlugin, ScenePlugin))
        .run();
}
