use bevy::prelude::*;

use super::{
    BarButton, BarButtonOf, BarIndicator, BarStyle, BarTracker, BottomBar, ButtonVisual,
};

const BAR_HEIGHT: f32 = 88.0;
const ICON_SIZE: f32 = 28.0;

#[derive(Clone, Debug, Default)]
pub struct BarButtonSpec {
    pub label: String,
    pub callback: String,
    pub locked: bool,
}

#[derive(Clone, Debug)]
pub struct BottomBarSpec {
    pub buttons: Vec<BarButtonSpec>,
    pub default_index: Option<usize>,
    pub style: BarStyle,
    pub background: Color,
    pub indicator_color: Color,
}

/// Builds the bar hierarchy (tracker row, indicator, display row) and
/// configures the `BottomBar` on its root.
pub fn spawn_bottom_bar(
    commands: &mut Commands,
    spec: &BottomBarSpec,
    event_handler: Option<Entity>,
) -> Entity {
    let root = commands
        .spawn((
            Name::new("bottom_bar"),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                right: Val::Px(0.0),
                bottom: Val::Px(0.0),
                height: Val::Px(BAR_HEIGHT),
                ..default()
            },
            BackgroundColor(spec.background),
        ))
        .id();

    let mut trackers = Vec::with_capacity(spec.buttons.len());
    commands
        .spawn((
            Name::new("bottom_bar_trackers"),
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Row,
                ..default()
            },
            Visibility::Hidden,
            ChildOf(root),
        ))
        .with_children(|row| {
            for (index, _) in spec.buttons.iter().enumerate() {
                trackers.push(
                    row.spawn((
                        Name::new(format!("bottom_bar_tracker_{index}")),
                        BarTracker,
                        Node {
                            height: Val::Percent(100.0),
                            flex_basis: Val::Px(0.0),
                            ..default()
                        },
                    ))
                    .id(),
                );
            }
        });

    let indicator = commands
        .spawn((
            Name::new("bottom_bar_indicator"),
            BarIndicator,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(0.0),
                height: Val::Percent(100.0),
                left: Val::Percent(0.0),
                width: Val::Percent(0.0),
                ..default()
            },
            BackgroundColor(spec.indicator_color),
            Transform::from_scale(Vec3::new(0.0, 0.0, 1.0)),
            Visibility::Hidden,
            ChildOf(root),
        ))
        .id();

    let unselected_icon = spec.style.icon_colors[ButtonVisual::Unselected];
    let unselected_label = spec.style.label_colors[ButtonVisual::Unselected];
    let mut buttons = Vec::with_capacity(spec.buttons.len());
    commands
        .spawn((
            Name::new("bottom_bar_buttons"),
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Row,
                ..default()
            },
            ChildOf(root),
        ))
        .with_children(|row| {
            for (index, (button, tracker)) in spec.buttons.iter().zip(&trackers).enumerate() {
                let mut icon = Entity::PLACEHOLDER;
                let mut label = Entity::PLACEHOLDER;
                let display = row
                    .spawn((
                        Name::new(format!("bottom_bar_button_{index}")),
                        Button,
                        BarButtonOf { bar: root, index },
                        Node {
                            height: Val::Percent(100.0),
                            flex_basis: Val::Px(0.0),
                            flex_direction: FlexDirection::Column,
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            row_gap: Val::Px(6.0),
                            ..default()
                        },
                    ))
                    .with_children(|slot| {
                        icon = slot
                            .spawn((
                                Node {
                                    width: Val::Px(ICON_SIZE),
                                    height: Val::Px(ICON_SIZE),
                                    ..default()
                                },
                                BackgroundColor(unselected_icon),
                            ))
                            .id();
                        label = slot
                            .spawn((
                                Text::new(button.label.clone()),
                                TextFont {
                                    font_size: 14.0,
                                    ..default()
                                },
                                TextColor(unselected_label),
                            ))
                            .id();
                    })
                    .id();

                buttons.push(BarButton {
                    display,
                    tracker: *tracker,
                    icon: Some(icon),
                    label_entity: Some(label),
                    label: button.label.clone(),
                    locked: button.locked,
                    callback: button.callback.clone(),
                });
            }
        });

    let mut bar = BottomBar::new(spec.style.clone()).with_indicator(indicator);
    if let Some(handler) = event_handler {
        bar = bar.with_event_handler(handler);
    }
    if let Err(error) = bar.configure(buttons, spec.default_index) {
        debug!("BottomBar {root:?} spawned inert: {error}");
    }
    commands.entity(root).insert(bar);
    root
}
