pub mod menu;

use bevy::prelude::*;

use menu::MenuScenePlugin;

pub struct ScenePlugin;
impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MenuScenePlugin);
    }
}
