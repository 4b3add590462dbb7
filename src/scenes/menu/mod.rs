//! Front-end demo screen: content caption, bottom bar, popup, level-complete
//! screen, and a toggle switch, all built from `FrontEndConfig`.
use std::fmt;

use bevy::{prelude::*, ui::FocusPolicy};

use crate::{
    data::config::{FrontEndConfig, LevelCompleteConfig, PopupConfig, ToggleConfig},
    systems::{
        particles::StarBurst,
        ui::{
            bottom_bar::{spawn_bottom_bar, BackgroundCatcher, UiEventManager},
            level_complete::{LevelCompleteRequest, LevelCompleteScreen},
            popup::{Popup, PopupCloseButton},
            toggle_switch::{ToggleChanged, ToggleSwitch},
            WidgetSystems,
        },
    },
};

pub struct MenuScenePlugin;
impl Plugin for MenuScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveContent>()
            .add_systems(Startup, MenuScene::setup)
            .add_systems(
                Update,
                (
                    ContinueButton::send_requests.in_set(WidgetSystems::Input),
                    ContentCaption::refresh.run_if(resource_changed::<ActiveContent>),
                    log_toggle_changes,
                ),
            );
    }
}

/// Pages the bar's callbacks switch between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentPage {
    Default,
    Home,
    Shop,
    Story,
    Settings,
}

impl ContentPage {
    pub const ALL: [ContentPage; 5] = [
        ContentPage::Default,
        ContentPage::Home,
        ContentPage::Shop,
        ContentPage::Story,
        ContentPage::Settings,
    ];

    pub fn callback_key(self) -> &'static str {
        match self {
            ContentPage::Default => "ActivateDefault",
            ContentPage::Home => "ActivateHome",
            ContentPage::Shop => "ActivateShop",
            ContentPage::Story => "ActivateStory",
            ContentPage::Settings => "ActivateSettings",
        }
    }
}

impl fmt::Display for ContentPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentPage::Default => "Default",
            ContentPage::Home => "Home",
            ContentPage::Shop => "Shop",
            ContentPage::Story => "Story",
            ContentPage::Settings => "Settings",
        };
        f.write_str(name)
    }
}

#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActiveContent {
    pub page: Option<ContentPage>,
}

impl ActiveContent {
    pub fn activate(&mut self, page: ContentPage) {
        info!("ContentActivated: {page}");
        self.page = Some(page);
    }
}

/// Registers one callback per page on a fresh `UiEventManager`.
pub fn page_callbacks(commands: &mut Commands) -> UiEventManager {
    ContentPage::ALL
        .into_iter()
        .fold(UiEventManager::default(), |manager, page| {
            let callback =
                commands.register_system(move |mut content: ResMut<ActiveContent>| {
                    content.activate(page)
                });
            manager.with_callback(page.callback_key(), callback)
        })
}

/// Handles to the demo widgets, for keyboard shortcuts.
#[derive(Resource, Clone, Copy, Debug)]
pub struct FrontEndEntities {
    pub bar: Entity,
    pub popup: Entity,
    pub level_complete: Entity,
}

#[derive(Component)]
struct ContentCaption;

impl ContentCaption {
    fn refresh(content: Res<ActiveContent>, mut captions: Query<&mut Text, With<ContentCaption>>) {
        let caption = match content.page {
            Some(page) => format!("{page}"),
            None => "Nothing selected".to_owned(),
        };
        for mut text in captions.iter_mut() {
            text.0 = caption.clone();
        }
    }
}

#[derive(Component, Clone, Copy, Debug)]
struct ContinueButton {
    screen: Entity,
}

impl ContinueButton {
    fn send_requests(
        buttons: Query<(&Interaction, &ContinueButton), Changed<Interaction>>,
        mut requests: EventWriter<LevelCompleteRequest>,
    ) {
        for (interaction, button) in buttons.iter() {
            if *interaction == Interaction::Pressed {
                requests.write(LevelCompleteRequest::Hide(button.screen));
            }
        }
    }
}

fn log_toggle_changes(mut changes: EventReader<ToggleChanged>) {
    for change in changes.read() {
        let state = if change.on { "on" } else { "off" };
        info!("Toggle {:?} switched {state}", change.toggle);
    }
}

#[derive(Component)]
struct MenuScene;

impl MenuScene {
    const CAPTION_FONT_SIZE: f32 = 42.0;
    const TEXT_COLOR: Color = Color::srgb(0.92, 0.93, 0.96);
    const PANEL_COLOR: Color = Color::srgb(0.16, 0.18, 0.24);
    const STAR_COLOR: Color = Color::srgb(1.0, 0.82, 0.2);
    const REWARD_COLOR: Color = Color::srgb(0.3, 0.55, 0.95);

    fn setup(mut commands: Commands, config: Res<FrontEndConfig>) {
        commands.spawn((
            Name::new("background_catcher"),
            BackgroundCatcher::default(),
            Button,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
        ));

        commands.spawn((
            Name::new("content_caption"),
            MenuScene,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Percent(40.0),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
            FocusPolicy::Pass,
            children![(
                ContentCaption,
                Text::new("Nothing selected"),
                TextFont {
                    font_size: Self::CAPTION_FONT_SIZE,
                    ..default()
                },
                TextColor(Self::TEXT_COLOR),
            )],
        ));

        let manager = page_callbacks(&mut commands);
        debug!("MenuScene: page callbacks {:?}", manager.keys());
        let handler = commands.spawn((Name::new("ui_event_manager"), manager)).id();
        let bar = spawn_bottom_bar(&mut commands, &config.bottom_bar.to_spec(), Some(handler));

        let popup = Self::spawn_popup(&mut commands, &config.popup, &config.toggle);
        let level_complete = Self::spawn_level_complete(&mut commands, &config.level_complete);

        commands.insert_resource(FrontEndEntities {
            bar,
            popup,
            level_complete,
        });
    }

    fn spawn_popup(
        commands: &mut Commands,
        config: &PopupConfig,
        toggle_config: &ToggleConfig,
    ) -> Entity {
        let root = commands
            .spawn((
                Name::new("popup"),
                MenuScene,
                Node {
                    position_type: PositionType::Absolute,
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    justify_content: JustifyContent::FlexEnd,
                    overflow: Overflow::clip(),
                    ..default()
                },
                GlobalZIndex(10),
            ))
            .id();

        let dim = commands
            .spawn((
                Name::new("popup_dim"),
                Node {
                    position_type: PositionType::Absolute,
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
                BackgroundColor(Color::BLACK),
                ChildOf(root),
            ))
            .id();

        let panel = commands
            .spawn((
                Name::new("popup_panel"),
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Px(config.panel_height),
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::SpaceEvenly,
                    ..default()
                },
                BackgroundColor(Self::PANEL_COLOR),
                ChildOf(root),
            ))
            .id();

        commands.spawn((
            Text::new("Settings"),
            TextFont {
                font_size: 28.0,
                ..default()
            },
            TextColor(Self::TEXT_COLOR),
            ChildOf(panel),
        ));

        Self::spawn_toggle(commands, toggle_config, panel);

        commands.spawn((
            Name::new("popup_close"),
            PopupCloseButton { popup: root },
            Button,
            Node {
                padding: UiRect::axes(Val::Px(24.0), Val::Px(10.0)),
                ..default()
            },
            BackgroundColor(Color::srgb(0.3, 0.32, 0.4)),
            ChildOf(panel),
            children![(Text::new("Close"), TextColor(Self::TEXT_COLOR))],
        ));

        commands.entity(root).insert(
            Popup::new(panel, dim, config.panel_height)
                .with_slide_duration(config.slide_duration)
                .with_dim_alpha(config.dim_alpha),
        );
        root
    }

    fn spawn_toggle(commands: &mut Commands, config: &ToggleConfig, parent: Entity) {
        let root = commands
            .spawn((
                Name::new("toggle_switch"),
                Node::default(),
                BackgroundColor(config.background_off.0),
                BorderRadius::MAX,
                ChildOf(parent),
            ))
            .id();
        let handle = commands
            .spawn((
                Name::new("toggle_handle"),
                Node::default(),
                BackgroundColor(config.handle_off.0),
                BorderRadius::MAX,
                FocusPolicy::Pass,
                ChildOf(root),
            ))
            .id();

        let mut toggle = ToggleSwitch::new(handle, Vec2::new(config.width, config.height))
            .with_animation_duration(config.animation_duration)
            .with_ease(config.ease);
        if config.recolor_background {
            toggle = toggle.with_background_colors(config.background_off.0, config.background_on.0);
        }
        if config.recolor_handle {
            toggle = toggle.with_handle_colors(config.handle_off.0, config.handle_on.0);
        }
        commands.entity(root).insert(toggle.with_value(config.start_on));
    }

    fn spawn_level_complete(commands: &mut Commands, config: &LevelCompleteConfig) -> Entity {
        let root = commands
            .spawn((
                Name::new("level_complete"),
                MenuScene,
                Node {
                    position_type: PositionType::Absolute,
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Center,
                    justify_content: JustifyContent::Center,
                    row_gap: Val::Px(28.0),
                    ..default()
                },
                BackgroundColor(Color::srgb(0.04, 0.05, 0.08)),
                GlobalZIndex(20),
            ))
            .id();

        let title = commands
            .spawn((
                Name::new("level_complete_title"),
                Text::new("Level Complete"),
                TextFont {
                    font_size: 56.0,
                    ..default()
                },
                TextColor(Self::TEXT_COLOR),
                ChildOf(root),
            ))
            .id();

        let stars = commands
            .spawn((
                Name::new("level_complete_stars"),
                Node {
                    column_gap: Val::Px(16.0),
                    ..default()
                },
                ChildOf(root),
            ))
            .with_children(|row| {
                for _ in 0..3 {
                    row.spawn((
                        Node {
                            width: Val::Px(48.0),
                            height: Val::Px(48.0),
                            ..default()
                        },
                        BackgroundColor(Self::STAR_COLOR),
                    ));
                }
            })
            .id();

        let star_burst = commands
            .spawn((
                Name::new("level_complete_star_burst"),
                StarBurst {
                    color: Self::STAR_COLOR,
                    ..default()
                },
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Percent(50.0),
                    top: Val::Percent(50.0),
                    ..default()
                },
                FocusPolicy::Pass,
                ChildOf(stars),
            ))
            .id();

        let rewards_row = commands
            .spawn((
                Node {
                    column_gap: Val::Px(20.0),
                    ..default()
                },
                ChildOf(root),
            ))
            .id();
        let rewards: Vec<Entity> = (0..config.reward_count)
            .map(|index| {
                commands
                    .spawn((
                        Name::new(format!("level_complete_reward_{index}")),
                        Node {
                            width: Val::Px(72.0),
                            height: Val::Px(72.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(Self::REWARD_COLOR),
                        ChildOf(rewards_row),
                        children![(
                            Text::new(format!("+{}", (index + 1) * 50)),
                            TextColor(Self::TEXT_COLOR),
                        )],
                    ))
                    .id()
            })
            .collect();

        let bottom_buttons = commands
            .spawn((
                Name::new("level_complete_bottom_buttons"),
                Node::default(),
                ChildOf(root),
            ))
            .id();
        commands.spawn((
            ContinueButton { screen: root },
            Button,
            Node {
                padding: UiRect::axes(Val::Px(32.0), Val::Px(12.0)),
                ..default()
            },
            BackgroundColor(Self::PANEL_COLOR),
            ChildOf(bottom_buttons),
            children![(Text::new("Continue"), TextColor(Self::TEXT_COLOR))],
        ));

        let mut screen = LevelCompleteScreen::new(config.timings.clone())
            .with_title(title)
            .with_stars(stars)
            .with_rewards(rewards)
            .with_bottom_buttons(bottom_buttons)
            .with_star_burst(star_burst);
        screen.canvas_alpha = config.canvas_alpha;
        commands.entity(root).insert(screen);
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_page_registers_its_callback() {
        let mut world = World::new();
        world.init_resource::<ActiveContent>();
        let manager = {
            let mut commands = world.commands();
            page_callbacks(&mut commands)
        };
        world.flush();

        assert_eq!(
            manager.keys(),
            vec![
                "ActivateDefault",
                "ActivateHome",
                "ActivateSettings",
                "ActivateShop",
                "ActivateStory",
            ]
        );

        let shop = manager.resolve("ActivateShop").expect("shop callback");
        world.run_system(shop).expect("callback runs");
        assert_eq!(
            world.resource::<ActiveContent>().page,
            Some(ContentPage::Shop)
        );
    }
}
