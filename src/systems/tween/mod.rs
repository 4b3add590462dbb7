//! Timer-driven property tweens.
//!
//! A `Tween<L>` animates one scalar property (selected by the lens `L`) of the
//! entity it sits on. Inserting a new `Tween<L>` replaces whatever tween of
//! the same lens was in flight, so the last request always wins and a
//! replaced tween never reports completion. Finished tweens remove
//! themselves and emit `TweenFinished`.
use std::{marker::PhantomData, time::Duration};

use bevy::{
    color::Alpha,
    ecs::component::Mutable,
    math::curve::{Curve, EaseFunction},
    prelude::*,
};
use serde::Deserialize;

pub mod timeline;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum TweenSystems {
    Animate,
}

pub struct TweenPlugin;

impl Plugin for TweenPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TweenFinished>()
            .add_tween_lens::<ScaleLens>()
            .add_tween_lens::<FlexGrowLens>()
            .add_tween_lens::<LeftPercentLens>()
            .add_tween_lens::<TopPxLens>()
            .add_tween_lens::<BackgroundAlphaLens>()
            .add_tween_lens::<TextAlphaLens>();
    }
}

pub trait TweenAppExt {
    /// Registers the per-frame animation system for a lens.
    fn add_tween_lens<L: TweenLens>(&mut self) -> &mut Self;
}

impl TweenAppExt for App {
    fn add_tween_lens<L: TweenLens>(&mut self) -> &mut Self {
        self.add_systems(Update, Tween::<L>::enact.in_set(TweenSystems::Animate))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TweenProperty {
    Scale,
    FlexGrow,
    LeftPercent,
    TopPx,
    BackgroundAlpha,
    TextAlpha,
    ToggleSlider,
}

/// Selects which scalar of which component a tween drives.
pub trait TweenLens: Send + Sync + 'static {
    type Target: Component<Mutability = Mutable>;
    const PROPERTY: TweenProperty;

    fn read(target: &Self::Target) -> f32;
    fn write(target: &mut Self::Target, value: f32);
}

/// Easing curves used by the widgets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum Ease {
    Linear,
    #[default]
    QuadOut,
    CubicIn,
    CubicOut,
    BackIn,
    BackOut,
    /// Hermite ease-in-out through (0,0) and (1,1) with flat tangents.
    SmoothStep,
}

impl Ease {
    pub fn sample(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadOut => EaseFunction::QuadraticOut.sample_clamped(t),
            Ease::CubicIn => EaseFunction::CubicIn.sample_clamped(t),
            Ease::CubicOut => EaseFunction::CubicOut.sample_clamped(t),
            Ease::BackIn => EaseFunction::BackIn.sample_clamped(t),
            Ease::BackOut => EaseFunction::BackOut.sample_clamped(t),
            Ease::SmoothStep => t * t * (3.0 - 2.0 * t),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TweenCompletion {
    #[default]
    Keep,
    /// Sets `Visibility::Hidden` on the tweened entity once finished.
    Hide,
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TweenFinished {
    pub entity: Entity,
    pub property: TweenProperty,
}

#[derive(Component)]
pub struct Tween<L: TweenLens> {
    /// Start value; read from the target on the first tick when unset.
    pub start: Option<f32>,
    pub end: f32,
    pub ease: Ease,
    pub timer: Timer,
    pub on_complete: TweenCompletion,
    _lens: PhantomData<fn() -> L>,
}

impl<L: TweenLens> Tween<L> {
    pub fn new(end: f32, duration_secs: f32, ease: Ease) -> Self {
        Self {
            start: None,
            end,
            ease,
            timer: Timer::new(
                Duration::from_secs_f32(duration_secs.max(0.0)),
                TimerMode::Once,
            ),
            on_complete: TweenCompletion::Keep,
            _lens: PhantomData,
        }
    }

    pub fn from(mut self, start: f32) -> Self {
        self.start = Some(start);
        self
    }

    pub fn hide_on_complete(mut self) -> Self {
        self.on_complete = TweenCompletion::Hide;
        self
    }

    /// Value at the current timer position, once the start is known.
    pub fn value(&self) -> Option<f32> {
        let start = self.start?;
        let eased = self.ease.sample(self.timer.fraction());
        Some(start + (self.end - start) * eased)
    }

    pub fn enact(
        mut commands: Commands,
        time: Res<Time>,
        mut query: Query<(Entity, &mut Tween<L>, &mut L::Target)>,
        mut finished: EventWriter<TweenFinished>,
    ) {
        for (entity, mut tween, mut target) in query.iter_mut() {
            if tween.start.is_none() {
                tween.start = Some(L::read(&target));
            }

            tween.timer.tick(time.delta());

            if tween.timer.finished() {
                L::write(&mut target, tween.end);
                commands.entity(entity).remove::<Tween<L>>();
                if tween.on_complete == TweenCompletion::Hide {
                    commands.entity(entity).insert(Visibility::Hidden);
                }
                finished.write(TweenFinished {
                    entity,
                    property: L::PROPERTY,
                });
            } else if let Some(value) = tween.value() {
                L::write(&mut target, value);
            }
        }
    }
}

/// Uniform 2D scale of a `Transform`.
pub struct ScaleLens;

impl TweenLens for ScaleLens {
    type Target = Transform;
    const PROPERTY: TweenProperty = TweenProperty::Scale;

    fn read(target: &Transform) -> f32 {
        target.scale.x
    }

    fn write(target: &mut Transform, value: f32) {
        target.scale = Vec3::new(value, value, 1.0);
    }
}

pub struct FlexGrowLens;

impl TweenLens for FlexGrowLens {
    type Target = Node;
    const PROPERTY: TweenProperty = TweenProperty::FlexGrow;

    fn read(target: &Node) -> f32 {
        target.flex_grow
    }

    fn write(target: &mut Node, value: f32) {
        target.flex_grow = value;
    }
}

/// `Node::left` as a percentage of the parent width.
pub struct LeftPercentLens;

impl TweenLens for LeftPercentLens {
    type Target = Node;
    const PROPERTY: TweenProperty = TweenProperty::LeftPercent;

    fn read(target: &Node) -> f32 {
        match target.left {
            Val::Percent(percent) => percent,
            _ => 0.0,
        }
    }

    fn write(target: &mut Node, value: f32) {
        target.left = Val::Percent(value);
    }
}

/// `Node::top` in logical pixels.
pub struct TopPxLens;

impl TweenLens for TopPxLens {
    type Target = Node;
    const PROPERTY: TweenProperty = TweenProperty::TopPx;

    fn read(target: &Node) -> f32 {
        match target.top {
            Val::Px(px) => px,
            _ => 0.0,
        }
    }

    fn write(target: &mut Node, value: f32) {
        target.top = Val::Px(value);
    }
}

pub struct BackgroundAlphaLens;

impl TweenLens for BackgroundAlphaLens {
    type Target = BackgroundColor;
    const PROPERTY: TweenProperty = TweenProperty::BackgroundAlpha;

    fn read(target: &BackgroundColor) -> f32 {
        target.0.alpha()
    }

    fn write(target: &mut BackgroundColor, value: f32) {
        target.0.set_alpha(value.clamp(0.0, 1.0));
    }
}

pub struct TextAlphaLens;

impl TweenLens for TextAlphaLens {
    type Target = TextColor;
    const PROPERTY: TweenProperty = TweenProperty::TextAlpha;

    fn read(target: &TextColor) -> f32 {
        target.0.alpha()
    }

    fn write(target: &mut TextColor, value: f32) {
        target.0.set_alpha(value.clamp(0.0, 1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::test_support::{advance, drain_events, widget_test_app};

    #[test]
    fn ease_curves_hit_their_endpoints() {
        for ease in [
            Ease::Linear,
            Ease::QuadOut,
            Ease::CubicIn,
            Ease::CubicOut,
            Ease::BackIn,
            Ease::BackOut,
            Ease::SmoothStep,
        ] {
            assert!(ease.sample(0.0).abs() < 1e-4, "{ease:?} at 0");
            assert!((ease.sample(1.0) - 1.0).abs() < 1e-4, "{ease:?} at 1");
        }
        assert_eq!(Ease::SmoothStep.sample(0.5), 0.5);
        assert!(Ease::BackOut.sample(0.6) > 1.0);
    }

    #[test]
    fn tween_reaches_end_value_and_removes_itself() {
        let mut app = widget_test_app();
        let entity = app
            .world_mut()
            .spawn((
                Node::default(),
                Tween::<FlexGrowLens>::new(40.0, 0.5, Ease::Linear).from(20.0),
            ))
            .id();

        advance(&mut app, 0.25);
        let halfway = app.world().get::<Node>(entity).expect("node").flex_grow;
        assert!((halfway - 30.0).abs() < 1e-3);

        advance(&mut app, 0.3);
        assert_eq!(app.world().get::<Node>(entity).expect("node").flex_grow, 40.0);
        assert!(app.world().get::<Tween<FlexGrowLens>>(entity).is_none());

        let finished = drain_events::<TweenFinished>(&mut app);
        assert_eq!(
            finished,
            vec![TweenFinished {
                entity,
                property: TweenProperty::FlexGrow
            }]
        );
    }

    #[test]
    fn tween_without_start_reads_current_value() {
        let mut app = widget_test_app();
        let entity = app
            .world_mut()
            .spawn((
                Node {
                    left: Val::Percent(10.0),
                    ..default()
                },
                Tween::<LeftPercentLens>::new(50.0, 1.0, Ease::Linear),
            ))
            .id();

        advance(&mut app, 0.5);
        let node = app.world().get::<Node>(entity).expect("node");
        assert_eq!(node.left, Val::Percent(30.0));
    }

    #[test]
    fn inserting_a_new_tween_replaces_the_running_one() {
        let mut app = widget_test_app();
        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                Tween::<ScaleLens>::new(0.0, 1.0, Ease::Linear).hide_on_complete(),
            ))
            .id();

        advance(&mut app, 0.5);
        app.world_mut()
            .entity_mut(entity)
            .insert(Tween::<ScaleLens>::new(1.0, 0.2, Ease::Linear));
        advance(&mut app, 0.3);
        advance(&mut app, 0.8);

        let transform = app.world().get::<Transform>(entity).expect("transform");
        assert_eq!(transform.scale.x, 1.0);
        assert!(app.world().get::<Visibility>(entity).is_none());
        assert_eq!(drain_events::<TweenFinished>(&mut app).len(), 1);
    }

    #[test]
    fn hide_on_complete_hides_entity() {
        let mut app = widget_test_app();
        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                Visibility::Inherited,
                Tween::<ScaleLens>::new(0.0, 0.1, Ease::BackIn).hide_on_complete(),
            ))
            .id();

        advance(&mut app, 0.2);
        assert_eq!(
            app.world().get::<Visibility>(entity).copied(),
            Some(Visibility::Hidden)
        );
        assert_eq!(
            app.world().get::<Transform>(entity).expect("transform").scale.x,
            0.0
        );
    }

    #[test]
    fn zero_duration_tween_snaps_on_first_tick() {
        let mut app = widget_test_app();
        let entity = app
            .world_mut()
            .spawn((
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.0)),
                Tween::<BackgroundAlphaLens>::new(0.6, 0.0, Ease::QuadOut),
            ))
            .id();

        advance(&mut app, 0.016);
        let alpha = app
            .world()
            .get::<BackgroundColor>(entity)
            .expect("background")
            .0
            .alpha();
        assert!((alpha - 0.6).abs() < 1e-5);
    }
}
