//! Level-complete celebration screen.
//!
//! Showing the screen plays a staged reveal laid out on a `Timeline`: the
//! canvas fades in, the title pops, the stars pop together with a star burst,
//! each reward fades and pops in turn, and finally the bottom buttons pop.
use bevy::{
    color::Alpha,
    ecs::{component::HookContext, world::DeferredWorld},
    prelude::*,
    ui::FocusPolicy,
};
use serde::Deserialize;

use crate::systems::{
    particles::{ParticlePlugin, StarBurst},
    tween::{
        timeline::{Timeline, TimelinePlayer},
        BackgroundAlphaLens, Ease, ScaleLens, TextAlphaLens, Tween, TweenFinished, TweenPlugin,
        TweenProperty,
    },
    ui::{configure_widget_sets, WidgetSystems},
};

pub struct LevelCompletePlugin;

impl Plugin for LevelCompletePlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<TweenPlugin>() {
            app.add_plugins(TweenPlugin);
        }
        if !app.is_plugin_added::<ParticlePlugin>() {
            app.add_plugins(ParticlePlugin);
        }
        configure_widget_sets(app);

        app.add_event::<LevelCompleteRequest>()
            .add_systems(
                Update,
                (
                    LevelCompleteScreen::handle_requests,
                    RevealSequence::enact,
                )
                    .chain()
                    .in_set(WidgetSystems::Apply),
            )
            .add_systems(
                Update,
                LevelCompleteScreen::finish_hide.in_set(WidgetSystems::Complete),
            );
    }
}

/// Durations and gaps of the reveal, in seconds.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RevealTimings {
    pub fade: f32,
    pub title_pop: f32,
    pub star_pop: f32,
    pub star_vfx_delay: f32,
    pub reward_pop: f32,
    pub reward_delay: f32,
    pub reward_fade: f32,
    pub bottom_pop: f32,
    pub delay_between_layers: f32,
    pub bottom_button_extra_delay: f32,
}

impl Default for RevealTimings {
    fn default() -> Self {
        Self {
            fade: 0.3,
            title_pop: 0.6,
            star_pop: 0.5,
            star_vfx_delay: 0.0,
            reward_pop: 0.4,
            reward_delay: 0.2,
            reward_fade: 0.2,
            bottom_pop: 0.4,
            delay_between_layers: 0.2,
            bottom_button_extra_delay: 0.15,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RevealState {
    #[default]
    Hidden,
    Showing,
    Shown,
    Hiding,
}

/// An element that pops from zero scale back to its cached default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopTarget {
    pub entity: Entity,
    pub scale: f32,
}

impl PopTarget {
    fn new(entity: Entity) -> Self {
        Self { entity, scale: 1.0 }
    }
}

#[derive(Component, Clone, Debug)]
#[component(on_insert = LevelCompleteScreen::on_insert)]
pub struct LevelCompleteScreen {
    pub title: Option<PopTarget>,
    pub stars: Option<PopTarget>,
    pub rewards: Vec<PopTarget>,
    pub bottom_buttons: Option<PopTarget>,
    pub star_burst: Option<Entity>,
    /// Backdrop opacity once faded in.
    pub canvas_alpha: f32,
    pub timings: RevealTimings,
    state: RevealState,
    /// `(reward, text)` pairs found under each reward on insertion.
    reward_labels: Vec<(Entity, Entity)>,
}

impl LevelCompleteScreen {
    pub fn new(timings: RevealTimings) -> Self {
        Self {
            title: None,
            stars: None,
            rewards: Vec::new(),
            bottom_buttons: None,
            star_burst: None,
            canvas_alpha: 1.0,
            timings,
            state: RevealState::Hidden,
            reward_labels: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: Entity) -> Self {
        self.title = Some(PopTarget::new(title));
        self
    }

    pub fn with_stars(mut self, stars: Entity) -> Self {
        self.stars = Some(PopTarget::new(stars));
        self
    }

    pub fn with_rewards(mut self, rewards: impl IntoIterator<Item = Entity>) -> Self {
        self.rewards = rewards.into_iter().map(PopTarget::new).collect();
        self
    }

    pub fn with_bottom_buttons(mut self, bottom_buttons: Entity) -> Self {
        self.bottom_buttons = Some(PopTarget::new(bottom_buttons));
        self
    }

    pub fn with_star_burst(mut self, star_burst: Entity) -> Self {
        self.star_burst = Some(star_burst);
        self
    }

    fn pop_targets(&self) -> impl Iterator<Item = &PopTarget> {
        self.title
            .iter()
            .chain(self.stars.iter())
            .chain(self.rewards.iter())
            .chain(self.bottom_buttons.iter())
    }

    fn pop_targets_mut(&mut self) -> impl Iterator<Item = &mut PopTarget> {
        self.title
            .iter_mut()
            .chain(self.stars.iter_mut())
            .chain(self.rewards.iter_mut())
            .chain(self.bottom_buttons.iter_mut())
    }

    /// Caches default scales, then resets the screen to hidden.
    fn on_insert(mut world: DeferredWorld, HookContext { entity, .. }: HookContext) {
        let Some(mut screen) = world.entity(entity).get::<LevelCompleteScreen>().cloned() else {
            return;
        };

        for target in screen.pop_targets_mut() {
            match world.get::<Transform>(target.entity) {
                // A zero scale means the element was already reset; keep unit scale.
                Some(transform) if transform.scale.x > 0.0 => target.scale = transform.scale.x,
                Some(_) => target.scale = 1.0,
                None => warn!(
                    "LevelCompleteScreen: element {:?} has no Transform",
                    target.entity
                ),
            }
        }

        screen.reward_labels.clear();
        for reward in &screen.rewards {
            let children: Vec<Entity> = world
                .get::<Children>(reward.entity)
                .map(|children| children.to_vec())
                .unwrap_or_default();
            for child in children {
                if let Some(mut text) = world.get_mut::<TextColor>(child) {
                    text.0.set_alpha(0.0);
                    screen.reward_labels.push((reward.entity, child));
                }
            }
        }

        if let Some(mut canvas) = world.get_mut::<BackgroundColor>(entity) {
            canvas.0.set_alpha(0.0);
        }
        for target in screen.pop_targets() {
            if let Some(mut transform) = world.get_mut::<Transform>(target.entity) {
                transform.scale = Vec3::new(0.0, 0.0, 1.0);
            }
        }
        for reward in &screen.rewards {
            if let Some(mut color) = world.get_mut::<BackgroundColor>(reward.entity) {
                color.0.set_alpha(0.0);
            }
        }

        screen.state = RevealState::Hidden;
        if let Some(mut stored) = world.get_mut::<LevelCompleteScreen>(entity) {
            *stored = screen;
        }
        world
            .commands()
            .entity(entity)
            .insert((Visibility::Hidden, FocusPolicy::Pass));
    }

    /// Zero scale and cancelled pops on every element, zero reward and reward
    /// text opacity.
    fn reset_elements(&self, commands: &mut Commands) {
        for target in self.pop_targets() {
            commands
                .entity(target.entity)
                .insert(Tween::<ScaleLens>::new(0.0, 0.0, Ease::Linear));
        }
        for reward in &self.rewards {
            commands.entity(reward.entity).insert(
                Tween::<BackgroundAlphaLens>::new(0.0, 0.0, Ease::Linear),
            );
        }
        for &(_, label) in &self.reward_labels {
            commands
                .entity(label)
                .insert(Tween::<TextAlphaLens>::new(0.0, 0.0, Ease::Linear));
        }
    }

    fn show(&mut self, commands: &mut Commands, root: Entity) {
        self.state = RevealState::Showing;
        self.reset_elements(commands);
        if let Some(burst) = self.star_burst {
            commands.entity(burst).queue(stop_burst);
        }

        commands
            .entity(root)
            .insert((
                Visibility::Inherited,
                FocusPolicy::Block,
                RevealSequence(TimelinePlayer::new(reveal_timeline(self))),
            ))
            .remove::<Tween<BackgroundAlphaLens>>();
        info!("LevelCompleteScreen: reveal started");
    }

    fn hide(&mut self, commands: &mut Commands, root: Entity) {
        if self.state == RevealState::Hidden {
            return;
        }
        self.state = RevealState::Hiding;
        if let Some(burst) = self.star_burst {
            commands.entity(burst).queue(stop_burst);
        }
        commands
            .entity(root)
            .remove::<RevealSequence>()
            .insert(Tween::<BackgroundAlphaLens>::new(
                0.0,
                self.timings.fade,
                Ease::QuadOut,
            ));
    }

    fn handle_requests(
        mut commands: Commands,
        mut requests: EventReader<LevelCompleteRequest>,
        mut screens: Query<&mut LevelCompleteScreen>,
    ) {
        for request in requests.read() {
            let root = request.screen();
            let Ok(mut screen) = screens.get_mut(root) else {
                warn!("LevelCompleteScreen: request for unknown screen {root:?}");
                continue;
            };
            match *request {
                LevelCompleteRequest::Show(_) => screen.show(&mut commands, root),
                LevelCompleteRequest::Hide(_) => screen.hide(&mut commands, root),
                LevelCompleteRequest::Toggle(_) => match screen.state {
                    RevealState::Showing | RevealState::Shown => {
                        screen.hide(&mut commands, root)
                    }
                    RevealState::Hidden | RevealState::Hiding => {
                        screen.show(&mut commands, root)
                    }
                },
            }
        }
    }

    fn finish_hide(
        mut commands: Commands,
        mut finished: EventReader<TweenFinished>,
        mut screens: Query<&mut LevelCompleteScreen>,
    ) {
        for event in finished.read() {
            if event.property != TweenProperty::BackgroundAlpha {
                continue;
            }
            let Ok(mut screen) = screens.get_mut(event.entity) else {
                continue;
            };
            if screen.state != RevealState::Hiding {
                continue;
            }
            screen.state = RevealState::Hidden;
            screen.reset_elements(&mut commands);
            commands
                .entity(event.entity)
                .insert((Visibility::Hidden, FocusPolicy::Pass));
        }
    }
}

fn stop_burst(mut entity: EntityWorldMut) {
    if let Some(mut burst) = entity.get_mut::<StarBurst>() {
        burst.stop_and_clear();
    }
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelCompleteRequest {
    Show(Entity),
    Hide(Entity),
    Toggle(Entity),
}

impl LevelCompleteRequest {
    pub fn screen(&self) -> Entity {
        match *self {
            LevelCompleteRequest::Show(screen)
            | LevelCompleteRequest::Hide(screen)
            | LevelCompleteRequest::Toggle(screen) => screen,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RevealAction {
    FadeCanvas { alpha: f32, duration: f32 },
    Pop { target: PopTarget, duration: f32 },
    /// Fades and pops one reward; runs as a zero-length callback.
    RevealReward { target: PopTarget },
    Burst { delay: f32 },
}

/// Lays out the reveal for `screen`. Missing elements are skipped along with
/// the gaps that precede them.
pub fn reveal_timeline(screen: &LevelCompleteScreen) -> Timeline<RevealAction> {
    let timings = &screen.timings;
    let mut timeline = Timeline::new();

    timeline.append(
        RevealAction::FadeCanvas {
            alpha: screen.canvas_alpha,
            duration: timings.fade,
        },
        timings.fade,
    );

    if let Some(title) = screen.title {
        timeline.append(
            RevealAction::Pop {
                target: title,
                duration: timings.title_pop,
            },
            timings.title_pop,
        );
    }

    if let Some(stars) = screen.stars {
        timeline
            .append_interval(timings.delay_between_layers)
            .append_callback(RevealAction::Burst {
                delay: timings.star_vfx_delay,
            })
            .join(
                RevealAction::Pop {
                    target: stars,
                    duration: timings.star_pop,
                },
                timings.star_pop,
            );
    }

    for reward in &screen.rewards {
        timeline
            .append_interval(timings.reward_delay)
            .append_callback(RevealAction::RevealReward { target: *reward });
    }

    if let Some(bottom) = screen.bottom_buttons {
        timeline
            .append_interval(timings.delay_between_layers + timings.bottom_button_extra_delay)
            .append(
                RevealAction::Pop {
                    target: bottom,
                    duration: timings.bottom_pop,
                },
                timings.bottom_pop,
            );
    }

    timeline
}

/// Running reveal on a screen root. Removing it cancels the remaining steps.
#[derive(Component, Clone, Debug)]
pub struct RevealSequence(pub TimelinePlayer<RevealAction>);

impl RevealSequence {
    fn enact(
        mut commands: Commands,
        time: Res<Time>,
        mut sequences: Query<(Entity, &mut RevealSequence, &mut LevelCompleteScreen)>,
    ) {
        for (root, mut sequence, mut screen) in sequences.iter_mut() {
            for action in sequence.0.advance(time.delta_secs()) {
                match action {
                    RevealAction::FadeCanvas { alpha, duration } => {
                        commands.entity(root).insert(
                            Tween::<BackgroundAlphaLens>::new(alpha, duration, Ease::QuadOut)
                                .from(0.0),
                        );
                    }
                    RevealAction::Pop { target, duration } => {
                        commands.entity(target.entity).insert(
                            Tween::<ScaleLens>::new(target.scale, duration, Ease::BackOut)
                                .from(0.0),
                        );
                    }
                    RevealAction::RevealReward { target } => {
                        commands.entity(target.entity).insert((
                            Tween::<ScaleLens>::new(
                                target.scale,
                                screen.timings.reward_pop,
                                Ease::BackOut,
                            )
                            .from(0.0),
                            Tween::<BackgroundAlphaLens>::new(
                                1.0,
                                screen.timings.reward_fade,
                                Ease::QuadOut,
                            )
                            .from(0.0),
                        ));
                        for &(_, label) in screen
                            .reward_labels
                            .iter()
                            .filter(|(reward, _)| *reward == target.entity)
                        {
                            commands.entity(label).insert(
                                Tween::<TextAlphaLens>::new(
                                    1.0,
                                    screen.timings.reward_fade,
                                    Ease::QuadOut,
                                )
                                .from(0.0),
                            );
                        }
                    }
                    RevealAction::Burst { delay } => {
                        if let Some(burst) = screen.star_burst {
                            commands.entity(burst).queue(move |mut entity: EntityWorldMut| {
                                if let Some(mut burst) = entity.get_mut::<StarBurst>() {
                                    burst.stop_and_clear();
                                    burst.play_after(delay);
                                }
                            });
                        }
                    }
                }
            }

            if sequence.0.is_finished() {
                screen.state = RevealState::Shown;
                commands.entity(root).remove::<RevealSequence>();
            }
        }
    }
}
