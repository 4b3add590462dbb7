use bevy::{
    color::Mix,
    ecs::{component::HookContext, world::DeferredWorld},
    prelude::*,
};

use crate::systems::{
    tween::{Ease, Tween, TweenAppExt, TweenLens, TweenPlugin, TweenProperty},
    ui::{configure_widget_sets, WidgetSystems},
};

pub struct ToggleSwitchPlugin;

impl Plugin for ToggleSwitchPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<TweenPlugin>() {
            app.add_plugins(TweenPlugin);
        }
        configure_widget_sets(app);

        app.add_event::<ToggleChanged>()
            .add_tween_lens::<ToggleSliderLens>()
            .add_systems(Update, ToggleSwitch::on_click.in_set(WidgetSystems::Input))
            .add_systems(
                Update,
                ToggleSwitch::sync_visuals.in_set(WidgetSystems::Complete),
            );
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToggleColors {
    pub background_off: Color,
    pub background_on: Color,
    pub handle_off: Color,
    pub handle_on: Color,
}

impl Default for ToggleColors {
    fn default() -> Self {
        Self {
            background_off: Color::WHITE,
            background_on: Color::WHITE,
            handle_off: Color::WHITE,
            handle_on: Color::WHITE,
        }
    }
}

/// Two-state switch. `slider_value` runs from 0 (off) to 1 (on) and drives
/// the handle position and both colors.
#[derive(Component, Clone, Debug)]
#[require(Button, Node, BackgroundColor)]
#[component(on_insert = ToggleSwitch::on_insert)]
pub struct ToggleSwitch {
    current_value: bool,
    pub slider_value: f32,
    pub animation_duration: f32,
    pub ease: Ease,
    pub handle: Entity,
    /// Full switch size; the handle is a square of the switch height.
    pub size: Vec2,
    pub recolor_background: bool,
    pub recolor_handle: bool,
    pub colors: ToggleColors,
}

impl ToggleSwitch {
    pub fn new(handle: Entity, size: Vec2) -> Self {
        Self {
            current_value: false,
            slider_value: 0.0,
            animation_duration: 0.5,
            ease: Ease::SmoothStep,
            handle,
            size: size.max(Vec2::ONE),
            recolor_background: false,
            recolor_handle: false,
            colors: ToggleColors::default(),
        }
    }

    /// Starts in `on` with the slider already at rest.
    pub fn with_value(mut self, on: bool) -> Self {
        self.current_value = on;
        self.slider_value = if on { 1.0 } else { 0.0 };
        self
    }

    pub fn with_animation_duration(mut self, animation_duration: f32) -> Self {
        self.animation_duration = animation_duration.clamp(0.0, 1.0);
        self
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn with_background_colors(mut self, off: Color, on: Color) -> Self {
        self.recolor_background = true;
        self.colors.background_off = off;
        self.colors.background_on = on;
        self
    }

    pub fn with_handle_colors(mut self, off: Color, on: Color) -> Self {
        self.recolor_handle = true;
        self.colors.handle_off = off;
        self.colors.handle_on = on;
        self
    }

    pub fn current_value(&self) -> bool {
        self.current_value
    }

    /// Horizontal distance the handle covers between off and on.
    pub fn travel(&self) -> f32 {
        (self.size.x - self.size.y).max(0.0)
    }

    pub fn background_color(&self) -> Color {
        lerp_color(
            self.colors.background_off,
            self.colors.background_on,
            self.slider_value,
        )
    }

    pub fn handle_color(&self) -> Color {
        lerp_color(self.colors.handle_off, self.colors.handle_on, self.slider_value)
    }

    fn on_insert(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
        let Some(toggle) = world.entity(entity).get::<ToggleSwitch>().cloned() else {
            return;
        };

        if let Some(mut node) = world.get_mut::<Node>(entity) {
            node.width = Val::Px(toggle.size.x);
            node.height = Val::Px(toggle.size.y);
        }
        if let Some(mut handle) = world.get_mut::<Node>(toggle.handle) {
            handle.position_type = PositionType::Absolute;
            handle.width = Val::Px(toggle.size.y);
            handle.height = Val::Px(toggle.size.y);
        } else {
            warn!("ToggleSwitch: handle {:?} has no Node", toggle.handle);
        }
    }

    /// Flips the state and restarts the slide from the current slider value.
    fn flip(&mut self) -> Tween<ToggleSliderLens> {
        self.current_value = !self.current_value;
        let end = if self.current_value { 1.0 } else { 0.0 };
        Tween::new(end, self.animation_duration, self.ease).from(self.slider_value)
    }

    fn on_click(
        mut commands: Commands,
        mut toggles: Query<(Entity, &Interaction, &mut ToggleSwitch), Changed<Interaction>>,
        mut changes: EventWriter<ToggleChanged>,
    ) {
        for (entity, interaction, mut toggle) in toggles.iter_mut() {
            if *interaction != Interaction::Pressed {
                continue;
            }
            let tween = toggle.flip();
            commands.entity(entity).insert(tween);
            changes.write(ToggleChanged {
                toggle: entity,
                on: toggle.current_value,
            });
        }
    }

    fn sync_visuals(
        toggles: Query<(Entity, &ToggleSwitch), Changed<ToggleSwitch>>,
        mut nodes: Query<&mut Node>,
        mut backgrounds: Query<&mut BackgroundColor>,
    ) {
        for (entity, toggle) in toggles.iter() {
            if let Ok(mut handle) = nodes.get_mut(toggle.handle) {
                handle.left = Val::Px(toggle.slider_value * toggle.travel());
            }
            if toggle.recolor_background {
                if let Ok(mut background) = backgrounds.get_mut(entity) {
                    background.0 = toggle.background_color();
                }
            }
            if toggle.recolor_handle {
                if let Ok(mut handle) = backgrounds.get_mut(toggle.handle) {
                    handle.0 = toggle.handle_color();
                }
            }
        }
    }
}

fn lerp_color(from: Color, to: Color, t: f32) -> Color {
    from.to_srgba().mix(&to.to_srgba(), t.clamp(0.0, 1.0)).into()
}

/// Fired once per flip, never per animation frame.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleChanged {
    pub toggle: Entity,
    pub on: bool,
}

pub struct ToggleSliderLens;

impl TweenLens for ToggleSliderLens {
    type Target = ToggleSwitch;
    const PROPERTY: TweenProperty = TweenProperty::ToggleSlider;

    fn read(target: &ToggleSwitch) -> f32 {
        target.slider_value
    }

    fn write(target: &mut ToggleSwitch, value: f32) {
        target.slider_value = value.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::test_support::{advance, advance_in_steps, drain_events, widget_test_app};

    const OFF: Color = Color::srgb(0.2, 0.2, 0.2);
    const ON: Color = Color::srgb(0.2, 0.8, 0.4);

    struct ToggleFixture {
        app: App,
        toggle: Entity,
        handle: Entity,
    }

    impl ToggleFixture {
        fn new() -> Self {
            let mut app = widget_test_app();
            app.add_plugins(ToggleSwitchPlugin);

            let world = app.world_mut();
            let handle = world
                .spawn((Node::default(), BackgroundColor(Color::WHITE)))
                .id();
            let toggle = world
                .spawn(
                    ToggleSwitch::new(handle, Vec2::new(80.0, 40.0))
                        .with_background_colors(OFF, ON),
                )
                .id();
            world.entity_mut(handle).insert(ChildOf(toggle));
            world.flush();

            let mut fixture = Self {
                app,
                toggle,
                handle,
            };
            advance(&mut fixture.app, 0.016);
            fixture
        }

        fn click(&mut self) {
            let world = self.app.world_mut();
            world.entity_mut(self.toggle).insert(Interaction::Pressed);
            advance(&mut self.app, 0.016);
            self.app
                .world_mut()
                .entity_mut(self.toggle)
                .insert(Interaction::None);
        }

        fn toggle(&self) -> &ToggleSwitch {
            self.app
                .world()
                .get::<ToggleSwitch>(self.toggle)
                .expect("toggle")
        }

        fn handle_left(&self) -> Val {
            self.app.world().get::<Node>(self.handle).expect("handle").left
        }

        fn background(&self) -> Color {
            self.app
                .world()
                .get::<BackgroundColor>(self.toggle)
                .expect("background")
                .0
        }
    }

    #[test]
    fn insertion_sizes_switch_and_handle() {
        let fixture = ToggleFixture::new();
        let world = fixture.app.world();

        let root = world.get::<Node>(fixture.toggle).expect("node");
        assert_eq!(root.width, Val::Px(80.0));
        let handle = world.get::<Node>(fixture.handle).expect("handle");
        assert_eq!(handle.width, Val::Px(40.0));
        assert_eq!(fixture.handle_left(), Val::Px(0.0));
        assert_eq!(fixture.background(), OFF);
    }

    #[test]
    fn click_turns_on_fires_once_and_animates() {
        let mut fixture = ToggleFixture::new();
        drain_events::<ToggleChanged>(&mut fixture.app);
        fixture.click();

        assert!(fixture.toggle().current_value());
        let changes = drain_events::<ToggleChanged>(&mut fixture.app);
        assert_eq!(
            changes,
            vec![ToggleChanged {
                toggle: fixture.toggle,
                on: true
            }]
        );

        advance(&mut fixture.app, 0.25);
        let midway = fixture.toggle().slider_value;
        assert!(midway > 0.0 && midway < 1.0);

        advance_in_steps(&mut fixture.app, 0.5, 0.05);
        assert_eq!(fixture.toggle().slider_value, 1.0);
        assert_eq!(fixture.handle_left(), Val::Px(40.0));
        assert_eq!(fixture.background(), ON);
        assert!(drain_events::<ToggleChanged>(&mut fixture.app).is_empty());
    }

    #[test]
    fn click_mid_animation_reverses_from_current_value() {
        let mut fixture = ToggleFixture::new();
        fixture.click();
        advance(&mut fixture.app, 0.2);
        let reached = fixture.toggle().slider_value;

        fixture.click();
        assert!(!fixture.toggle().current_value());
        assert!(fixture.toggle().slider_value <= reached);

        advance_in_steps(&mut fixture.app, 0.6, 0.05);
        assert_eq!(fixture.toggle().slider_value, 0.0);
        assert_eq!(fixture.background(), OFF);
    }

    #[test]
    fn colors_interpolate_with_slider_value() {
        let handle = Entity::PLACEHOLDER;
        let mut toggle = ToggleSwitch::new(handle, Vec2::new(80.0, 40.0))
            .with_handle_colors(Color::BLACK, Color::WHITE);
        toggle.slider_value = 0.5;

        let mid = toggle.handle_color().to_srgba();
        assert!((mid.red - 0.5).abs() < 1e-5);
        assert_eq!(toggle.travel(), 40.0);
    }
}
