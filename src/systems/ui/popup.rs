//! Modal popup with a sliding panel over a dimmed backdrop.
use bevy::{
    color::Alpha,
    ecs::{component::HookContext, world::DeferredWorld},
    prelude::*,
    ui::FocusPolicy,
};

use crate::systems::{
    tween::{
        BackgroundAlphaLens, Ease, TopPxLens, Tween, TweenFinished, TweenPlugin, TweenProperty,
    },
    ui::{configure_widget_sets, WidgetSystems},
};

pub struct PopupPlugin;

impl Plugin for PopupPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<TweenPlugin>() {
            app.add_plugins(TweenPlugin);
        }
        configure_widget_sets(app);

        app.add_event::<PopupRequest>()
            .add_systems(
                Update,
                PopupCloseButton::send_requests.in_set(WidgetSystems::Input),
            )
            .add_systems(Update, Popup::handle_requests.in_set(WidgetSystems::Apply))
            .add_systems(Update, Popup::finish_hide.in_set(WidgetSystems::Complete));
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PopupState {
    #[default]
    Hidden,
    Visible,
    Hiding,
}

/// Popup root. The panel rests at `top: 0` and hides one panel height below.
#[derive(Component, Clone, Debug)]
#[component(on_insert = Popup::on_insert)]
pub struct Popup {
    pub panel: Entity,
    pub dim: Entity,
    pub panel_height: f32,
    pub slide_duration: f32,
    pub dim_alpha: f32,
    state: PopupState,
}

impl Popup {
    pub fn new(panel: Entity, dim: Entity, panel_height: f32) -> Self {
        Self {
            panel,
            dim,
            panel_height,
            slide_duration: 0.25,
            dim_alpha: 0.6,
            state: PopupState::Hidden,
        }
    }

    pub fn with_slide_duration(mut self, slide_duration: f32) -> Self {
        self.slide_duration = slide_duration.max(0.0);
        self
    }

    pub fn with_dim_alpha(mut self, dim_alpha: f32) -> Self {
        self.dim_alpha = dim_alpha.clamp(0.0, 1.0);
        self
    }

    pub fn hidden_offset(&self) -> f32 {
        self.panel_height
    }

    fn on_insert(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
        let Some(popup) = world.entity(entity).get::<Popup>().cloned() else {
            return;
        };

        if let Some(mut panel) = world.get_mut::<Node>(popup.panel) {
            panel.top = Val::Px(popup.hidden_offset());
        } else {
            warn!("Popup: panel {:?} has no Node", popup.panel);
        }
        if let Some(mut dim) = world.get_mut::<BackgroundColor>(popup.dim) {
            dim.0.set_alpha(0.0);
        }
        world
            .commands()
            .entity(entity)
            .insert((Visibility::Hidden, FocusPolicy::Pass));
    }

    fn show(&mut self, commands: &mut Commands, root: Entity) {
        self.state = PopupState::Visible;
        commands
            .entity(root)
            .insert((Visibility::Inherited, FocusPolicy::Block));
        commands.entity(self.panel).insert(
            Tween::<TopPxLens>::new(0.0, self.slide_duration, Ease::CubicOut)
                .from(self.hidden_offset()),
        );
        commands.entity(self.dim).insert(Tween::<BackgroundAlphaLens>::new(
            self.dim_alpha,
            self.slide_duration,
            Ease::QuadOut,
        ));
    }

    fn hide(&mut self, commands: &mut Commands) {
        if self.state == PopupState::Hidden {
            return;
        }
        self.state = PopupState::Hiding;
        commands.entity(self.panel).insert(Tween::<TopPxLens>::new(
            self.hidden_offset(),
            self.slide_duration,
            Ease::CubicIn,
        ));
        commands.entity(self.dim).insert(Tween::<BackgroundAlphaLens>::new(
            0.0,
            self.slide_duration,
            Ease::QuadOut,
        ));
    }

    fn handle_requests(
        mut commands: Commands,
        mut requests: EventReader<PopupRequest>,
        mut popups: Query<&mut Popup>,
    ) {
        for request in requests.read() {
            let root = request.popup();
            let Ok(mut popup) = popups.get_mut(root) else {
                warn!("Popup: request for unknown popup {root:?}");
                continue;
            };
            match *request {
                PopupRequest::Show(_) => popup.show(&mut commands, root),
                PopupRequest::Hide(_) => popup.hide(&mut commands),
                PopupRequest::Toggle(_) => {
                    if popup.state == PopupState::Visible {
                        popup.hide(&mut commands);
                    } else {
                        popup.show(&mut commands, root);
                    }
                }
            }
        }
    }

    /// Drops interactivity once the hide slide has completed.
    fn finish_hide(
        mut commands: Commands,
        mut finished: EventReader<TweenFinished>,
        mut popups: Query<(Entity, &mut Popup)>,
    ) {
        for event in finished.read() {
            if event.property != TweenProperty::TopPx {
                continue;
            }
            for (root, mut popup) in popups.iter_mut() {
                if popup.panel == event.entity && popup.state == PopupState::Hiding {
                    popup.state = PopupState::Hidden;
                    commands
                        .entity(root)
                        .insert((Visibility::Hidden, FocusPolicy::Pass));
                }
            }
        }
    }
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopupRequest {
    Show(Entity),
    Hide(Entity),
    Toggle(Entity),
}

impl PopupRequest {
    pub fn popup(&self) -> Entity {
        match *self {
            PopupRequest::Show(popup) | PopupRequest::Hide(popup) | PopupRequest::Toggle(popup) => {
                popup
            }
        }
    }
}

#[derive(Component, Clone, Copy, Debug)]
pub struct PopupCloseButton {
    pub popup: Entity,
}

impl PopupCloseButton {
    fn send_requests(
        buttons: Query<(&Interaction, &PopupCloseButton), Changed<Interaction>>,
        mut requests: EventWriter<PopupRequest>,
    ) {
        for (interaction, button) in buttons.iter() {
            if *interaction == Interaction::Pressed {
                requests.write(PopupRequest::Hide(button.popup));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::test_support::{advance, advance_in_steps, widget_test_app};

    struct PopupFixture {
        app: App,
        root: Entity,
        panel: Entity,
        dim: Entity,
    }

    impl PopupFixture {
        fn new() -> Self {
            let mut app = widget_test_app();
            app.add_plugins(PopupPlugin);

            let world = app.world_mut();
            let root = world.spawn(Node::default()).id();
            let dim = world
                .spawn((Node::default(), BackgroundColor(Color::BLACK), ChildOf(root)))
                .id();
            let panel = world
                .spawn((
                    Node {
                        height: Val::Px(300.0),
                        ..default()
                    },
                    ChildOf(root),
                ))
                .id();
            world.entity_mut(root).insert(Popup::new(panel, dim, 300.0));
            world.flush();

            Self {
                app,
                root,
                panel,
                dim,
            }
        }

        fn request(&mut self, request: PopupRequest) {
            self.app.world_mut().send_event(request);
            advance(&mut self.app, 0.016);
        }

        fn panel_top(&self) -> Val {
            self.app.world().get::<Node>(self.panel).expect("panel").top
        }

        fn dim_alpha(&self) -> f32 {
            self.app
                .world()
                .get::<BackgroundColor>(self.dim)
                .expect("dim")
                .0
                .alpha()
        }

        fn state(&self) -> PopupState {
            self.app.world().get::<Popup>(self.root).expect("popup").state
        }

        fn visibility(&self) -> Visibility {
            *self.app.world().get::<Visibility>(self.root).expect("visibility")
        }

        fn focus(&self) -> FocusPolicy {
            *self.app.world().get::<FocusPolicy>(self.root).expect("focus")
        }
    }

    #[test]
    fn starts_hidden_below_its_resting_place() {
        let fixture = PopupFixture::new();

        assert_eq!(fixture.panel_top(), Val::Px(300.0));
        assert_eq!(fixture.dim_alpha(), 0.0);
        assert_eq!(fixture.visibility(), Visibility::Hidden);
        assert_eq!(fixture.focus(), FocusPolicy::Pass);
    }

    #[test]
    fn show_slides_panel_in_and_dims_background() {
        let mut fixture = PopupFixture::new();
        fixture.request(PopupRequest::Show(fixture.root));

        assert_eq!(fixture.state(), PopupState::Visible);
        assert_eq!(fixture.visibility(), Visibility::Inherited);
        assert_eq!(fixture.focus(), FocusPolicy::Block);

        advance_in_steps(&mut fixture.app, 0.5, 0.05);
        assert_eq!(fixture.panel_top(), Val::Px(0.0));
        assert!((fixture.dim_alpha() - 0.6).abs() < 1e-5);
    }

    #[test]
    fn hide_disables_interaction_only_after_slide_completes() {
        let mut fixture = PopupFixture::new();
        fixture.request(PopupRequest::Show(fixture.root));
        advance_in_steps(&mut fixture.app, 0.5, 0.05);

        fixture.request(PopupRequest::Hide(fixture.root));
        assert_eq!(fixture.state(), PopupState::Hiding);
        assert_eq!(fixture.focus(), FocusPolicy::Block);

        advance_in_steps(&mut fixture.app, 0.5, 0.05);
        assert_eq!(fixture.state(), PopupState::Hidden);
        assert_eq!(fixture.panel_top(), Val::Px(300.0));
        assert_eq!(fixture.dim_alpha(), 0.0);
        assert_eq!(fixture.visibility(), Visibility::Hidden);
        assert_eq!(fixture.focus(), FocusPolicy::Pass);
    }

    #[test]
    fn show_during_hide_cancels_the_pending_deactivation() {
        let mut fixture = PopupFixture::new();
        fixture.request(PopupRequest::Show(fixture.root));
        advance_in_steps(&mut fixture.app, 0.5, 0.05);
        fixture.request(PopupRequest::Hide(fixture.root));
        fixture.request(PopupRequest::Show(fixture.root));

        advance_in_steps(&mut fixture.app, 0.5, 0.05);
        assert_eq!(fixture.state(), PopupState::Visible);
        assert_eq!(fixture.visibility(), Visibility::Inherited);
        assert_eq!(fixture.panel_top(), Val::Px(0.0));
    }

    #[test]
    fn close_button_hides_the_popup() {
        let mut fixture = PopupFixture::new();
        fixture.request(PopupRequest::Toggle(fixture.root));
        assert_eq!(fixture.state(), PopupState::Visible);

        let button = fixture
            .app
            .world_mut()
            .spawn((Node::default(), PopupCloseButton { popup: fixture.root }))
            .id();
        advance(&mut fixture.app, 0.016);
        fixture
            .app
            .world_mut()
            .entity_mut(button)
            .insert(Interaction::Pressed);
        advance(&mut fixture.app, 0.016);

        assert_eq!(fixture.state(), PopupState::Hiding);
    }
}
