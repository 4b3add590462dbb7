//! Front-end menu widgets.
//!
//! Each widget is a component plus a plugin; widgets are driven by request
//! events and pointer `Interaction`, and animate through `systems::tween`:
//! - segmented bottom navigation bar (`bottom_bar`)
//! - modal popup (`popup`)
//! - staged level-complete reveal (`level_complete`)
//! - animated toggle switch (`toggle_switch`)
use bevy::prelude::*;

use crate::systems::tween::TweenSystems;

pub mod bottom_bar;
pub mod level_complete;
pub mod popup;
pub mod toggle_switch;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum WidgetSystems {
    /// Pointer interaction turned into request events.
    Input,
    /// Requests applied to widget state; tweens started.
    Apply,
    /// Reactions to finished tweens.
    Complete,
}

pub(crate) fn configure_widget_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            WidgetSystems::Input,
            WidgetSystems::Apply,
            TweenSystems::Animate,
            WidgetSystems::Complete,
        )
            .chain(),
    );
}

pub struct WidgetsPlugin;

impl Plugin for WidgetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            bottom_bar::BottomBarPlugin,
            popup::PopupPlugin,
            level_complete::LevelCompletePlugin,
            toggle_switch::ToggleSwitchPlugin,
        ));
    }
}
