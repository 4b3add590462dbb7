use bevy::app::AppExit;
use bevy::prelude::*;

use crate::{
    scenes::menu::FrontEndEntities,
    systems::ui::{
        bottom_bar::BarRequest, level_complete::LevelCompleteRequest, popup::PopupRequest,
    },
};

const DIGIT_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

pub fn close_on_esc(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut app_exit_events: EventWriter<AppExit>,
) {
    if keyboard_input.just_pressed(KeyCode::Escape) {
        app_exit_events.write(AppExit::Success);
    }
}

/// P toggles the popup, L the level-complete screen, 1-9 select bar buttons
/// and Backspace closes the bar.
pub fn front_end_shortcuts(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    entities: Option<Res<FrontEndEntities>>,
    mut bar_requests: EventWriter<BarRequest>,
    mut popup_requests: EventWriter<PopupRequest>,
    mut level_requests: EventWriter<LevelCompleteRequest>,
) {
    let Some(entities) = entities else {
        return;
    };

    if keyboard_input.just_pressed(KeyCode::KeyP) {
        popup_requests.write(PopupRequest::Toggle(entities.popup));
    }
    if keyboard_input.just_pressed(KeyCode::KeyL) {
        level_requests.write(LevelCompleteRequest::Toggle(entities.level_complete));
    }
    if keyboard_input.just_pressed(KeyCode::Backspace) {
        bar_requests.write(BarRequest::Close { bar: entities.bar });
    }
    for (index, key) in DIGIT_KEYS.iter().enumerate() {
        if keyboard_input.just_pressed(*key) {
            bar_requests.write(BarRequest::Select {
                bar: entities.bar,
                index,
            });
        }
    }
}
