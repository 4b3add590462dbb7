//! Segmented bottom navigation bar.
//!
//! A `BottomBar` owns an ordered list of `BarButton`s. Each button has a
//! display entity (visible, width animated) and a tracker entity (laid out in
//! an invisible row, width applied immediately). The shared indicator is
//! positioned from the settled tracker widths, so it never measures a
//! mid-animation layout.
//!
//! External code drives the bar only through `BarRequest` events; pointer
//! clicks on buttons and on a `BackgroundCatcher` are translated into those
//! requests here.
use bevy::{ecs::system::SystemParam, prelude::*};
use enum_map::{enum_map, Enum, EnumMap};
use smallvec::SmallVec;

use crate::systems::{
    tween::{Ease, FlexGrowLens, LeftPercentLens, ScaleLens, Tween, TweenPlugin},
    ui::{configure_widget_sets, WidgetSystems},
};

pub mod dispatch;
pub mod selection;
mod spawn;

pub use dispatch::UiEventManager;
pub use selection::{BarTransition, SelectionState};
pub use spawn::{spawn_bottom_bar, BarButtonSpec, BottomBarSpec};

use dispatch::dispatch_callback;
use selection::{indicator_span, BarWidths};

pub struct BottomBarPlugin;

impl Plugin for BottomBarPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<TweenPlugin>() {
            app.add_plugins(TweenPlugin);
        }
        configure_widget_sets(app);

        app.add_event::<BarRequest>()
            .add_event::<BarSelectionChanged>()
            .add_systems(
                Update,
                (BarButtonOf::send_requests, BackgroundCatcher::send_requests)
                    .in_set(WidgetSystems::Input),
            )
            .add_systems(
                Update,
                (BottomBar::refresh_layout, BottomBar::handle_requests)
                    .chain()
                    .in_set(WidgetSystems::Apply),
            );
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Enum)]
pub enum ButtonVisual {
    Unselected,
    Selected,
}

impl ButtonVisual {
    pub fn from_selected(selected: bool) -> Self {
        if selected {
            ButtonVisual::Selected
        } else {
            ButtonVisual::Unselected
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarStyle {
    pub icon_colors: EnumMap<ButtonVisual, Color>,
    pub label_colors: EnumMap<ButtonVisual, Color>,
    /// Extra flexible width (in percent) given to the selected button.
    pub selected_width_increase: f32,
    pub width_tween_duration: f32,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            icon_colors: enum_map! {
                ButtonVisual::Selected => Color::srgb(0.0, 0.0, 1.0),
                ButtonVisual::Unselected => Color::srgb(0.5, 0.5, 0.5),
            },
            label_colors: enum_map! {
                ButtonVisual::Selected => Color::WHITE,
                ButtonVisual::Unselected => Color::srgb(0.5, 0.5, 0.5),
            },
            selected_width_increase: 20.0,
            width_tween_duration: 0.25,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarButton {
    /// Visible button node.
    pub display: Entity,
    /// Invisible layout proxy measured by the indicator.
    pub tracker: Entity,
    pub icon: Option<Entity>,
    pub label_entity: Option<Entity>,
    pub label: String,
    pub locked: bool,
    pub callback: String,
}

impl BarButton {
    pub fn new(display: Entity, tracker: Entity) -> Self {
        Self {
            display,
            tracker,
            icon: None,
            label_entity: None,
            label: String::new(),
            locked: false,
            callback: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarConfigError {
    NoButtons,
}

impl std::fmt::Display for BarConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoButtons => write!(f, "bottom bar has no buttons"),
        }
    }
}

impl std::error::Error for BarConfigError {}

#[derive(Component, Clone, Debug)]
pub struct BottomBar {
    buttons: SmallVec<[BarButton; 6]>,
    selection: SelectionState,
    needs_layout: bool,
    pub indicator: Option<Entity>,
    /// Entity carrying the `UiEventManager` that button callbacks resolve against.
    pub event_handler: Option<Entity>,
    pub style: BarStyle,
}

impl BottomBar {
    pub fn new(style: BarStyle) -> Self {
        Self {
            buttons: SmallVec::new(),
            selection: SelectionState::Unselected,
            needs_layout: true,
            indicator: None,
            event_handler: None,
            style,
        }
    }

    pub fn with_indicator(mut self, indicator: Entity) -> Self {
        self.indicator = Some(indicator);
        self
    }

    pub fn with_event_handler(mut self, handler: Entity) -> Self {
        self.event_handler = Some(handler);
        self
    }

    pub fn buttons(&self) -> &[BarButton] {
        &self.buttons
    }

    /// Snaps every button and the indicator to the current selection after
    /// (re)configuration.
    fn refresh_layout(mut bars: Query<&mut BottomBar>, mut visuals: BarVisuals) {
        for mut bar in bars.iter_mut() {
            if !bar.needs_layout {
                continue;
            }
            bar.needs_layout = false;

            let widths = bar.widths();
            let current = bar.current();
            for (index, button) in bar.buttons.iter().enumerate() {
                visuals.apply_button(button, current == Some(index), widths, &bar.style, false);
            }

            match current {
                Some(index) => {
                    if let Some(span) = visuals.measure(&bar, index) {
                        visuals.show_indicator_at(&bar, span);
                    }
                }
                None => visuals.hide_indicator(&bar),
            }
        }
    }

    fn handle_requests(
        mut requests: EventReader<BarRequest>,
        mut bars: Query<&mut BottomBar>,
        handlers: Query<&UiEventManager>,
        mut visuals: BarVisuals,
        mut changed: EventWriter<BarSelectionChanged>,
    ) {
        for request in requests.read() {
            let Ok(mut bar) = bars.get_mut(request.bar()) else {
                warn!("BottomBar: request for unknown bar {:?}", request.bar());
                continue;
            };

            let transition = match *request {
                BarRequest::Select { index, .. } => bar.select(index),
                BarRequest::Close { .. } => bar.close(),
            };

            let Some(transition) = transition else {
                if matches!(request, BarRequest::Close { .. }) {
                    visuals.hide_indicator(&bar);
                }
                continue;
            };

            visuals.apply_transition(&bar, transition);
            changed.write(BarSelectionChanged {
                bar: request.bar(),
                previous: transition.previous(),
                current: transition.next(),
            });

            if let BarTransition::Disappear { .. } = transition {
                info!("BottomBar: selection cleared");
                continue;
            }
            info!("BottomBar: selected index {}", bar.current_index());
            if let Some(button) = transition.next().and_then(|index| bar.buttons.get(index)) {
                let handler = bar
                    .event_handler
                    .and_then(|handler| handlers.get(handler).ok());
                dispatch_callback(&mut visuals.commands, &button.callback, handler);
            }
        }
    }
}

/// Inbound requests; the only way to change a bar's selection.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarRequest {
    Select { bar: Entity, index: usize },
    Close { bar: Entity },
}

impl BarRequest {
    pub fn bar(&self) -> Entity {
        match *self {
            BarRequest::Select { bar, .. } | BarRequest::Close { bar } => bar,
        }
    }
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarSelectionChanged {
    pub bar: Entity,
    pub previous: Option<usize>,
    pub current: Option<usize>,
}

/// Marks a display button and the bar slot it selects.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarButtonOf {
    pub bar: Entity,
    pub index: usize,
}

impl BarButtonOf {
    fn send_requests(
        buttons: Query<(&Interaction, &BarButtonOf), Changed<Interaction>>,
        mut requests: EventWriter<BarRequest>,
    ) {
        for (interaction, button) in buttons.iter() {
            if *interaction == Interaction::Pressed {
                requests.write(BarRequest::Select {
                    bar: button.bar,
                    index: button.index,
                });
            }
        }
    }
}

#[derive(Component, Clone, Copy, Debug)]
pub struct BarTracker;

#[derive(Component, Clone, Copy, Debug)]
pub struct BarIndicator;

/// Full-screen node behind the bar; clicking it closes the bar.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct BackgroundCatcher {
    /// Bar to close; falls back to the only bar present when unset.
    pub bar: Option<Entity>,
}

impl BackgroundCatcher {
    fn send_requests(
        catchers: Query<(&Interaction, &BackgroundCatcher), Changed<Interaction>>,
        bars: Query<Entity, With<BottomBar>>,
        mut requests: EventWriter<BarRequest>,
    ) {
        for (interaction, catcher) in catchers.iter() {
            if *interaction != Interaction::Pressed {
                continue;
            }
            let Some(bar) = catcher.bar.or_else(|| bars.single().ok()) else {
                warn!("BackgroundCatcher: no BottomBar assigned or found");
                continue;
            };
            requests.write(BarRequest::Close { bar });
        }
    }
}

#[derive(SystemParam)]
struct BarVisuals<'w, 's> {
    commands: Commands<'w, 's>,
    nodes: Query<'w, 's, &'static mut Node>,
    icons: Query<'w, 's, &'static mut BackgroundColor>,
    labels: Query<'w, 's, &'static mut TextColor>,
    indicators: Query<
        'w,
        's,
        (
            &'static mut Transform,
            &'static mut Visibility,
            Has<Tween<ScaleLens>>,
        ),
        With<BarIndicator>,
    >,
}

impl BarVisuals<'_, '_> {
    /// Colors the button and sizes it. The tracker width is always applied
    /// immediately; the display width is tweened when `animate` is set.
    fn apply_button(
        &mut self,
        button: &BarButton,
        selected: bool,
        widths: BarWidths,
        style: &BarStyle,
        animate: bool,
    ) {
        let visual = ButtonVisual::from_selected(selected);
        if let Some(mut icon) = button.icon.and_then(|icon| self.icons.get_mut(icon).ok()) {
            icon.0 = style.icon_colors[visual];
        }
        if let Some(mut label) = button
            .label_entity
            .and_then(|label| self.labels.get_mut(label).ok())
        {
            label.0 = style.label_colors[visual];
        }

        let target = widths.for_state(selected);
        if let Ok(mut tracker) = self.nodes.get_mut(button.tracker) {
            tracker.flex_grow = target;
        }

        if animate {
            self.commands.entity(button.display).insert(Tween::<FlexGrowLens>::new(
                target,
                style.width_tween_duration,
                Ease::QuadOut,
            ));
        } else {
            self.commands
                .entity(button.display)
                .remove::<Tween<FlexGrowLens>>();
            if let Ok(mut display) = self.nodes.get_mut(button.display) {
                display.flex_grow = target;
            }
        }
    }

    fn measure(&self, bar: &BottomBar, index: usize) -> Option<selection::IndicatorSpan> {
        let widths: Vec<f32> = bar
            .buttons
            .iter()
            .map(|button| {
                self.nodes
                    .get(button.tracker)
                    .map(|node| node.flex_grow)
                    .unwrap_or(0.0)
            })
            .collect();
        indicator_span(&widths, index)
    }

    fn apply_transition(&mut self, bar: &BottomBar, transition: BarTransition) {
        let widths = bar.widths();
        if let Some(button) = transition.previous().and_then(|index| bar.buttons.get(index)) {
            self.apply_button(button, false, widths, &bar.style, true);
        }
        if let Some(button) = transition.next().and_then(|index| bar.buttons.get(index)) {
            self.apply_button(button, true, widths, &bar.style, true);
        }

        let Some(indicator) = bar.indicator else {
            return;
        };
        let duration = bar.style.width_tween_duration;
        match transition {
            BarTransition::Appear { to } => {
                let Some(span) = self.measure(bar, to) else {
                    return;
                };
                self.show_indicator_at(bar, span);
                if let Ok((mut transform, _, _)) = self.indicators.get_mut(indicator) {
                    transform.scale = Vec3::new(0.0, 0.0, 1.0);
                }
                self.commands
                    .entity(indicator)
                    .insert(Tween::<ScaleLens>::new(1.0, duration, Ease::BackOut).from(0.0));
            }
            BarTransition::Slide { to, .. } => {
                let Some(span) = self.measure(bar, to) else {
                    return;
                };
                if let Ok(mut node) = self.nodes.get_mut(indicator) {
                    node.width = Val::Percent(span.width);
                }
                self.commands.entity(indicator).insert(Tween::<LeftPercentLens>::new(
                    span.left,
                    duration,
                    Ease::QuadOut,
                ));
            }
            BarTransition::Disappear { .. } => {
                self.commands.entity(indicator).insert(
                    Tween::<ScaleLens>::new(0.0, duration, Ease::BackIn).hide_on_complete(),
                );
            }
        }
    }

    /// Places the indicator without animating its position and makes it visible.
    fn show_indicator_at(&mut self, bar: &BottomBar, span: selection::IndicatorSpan) {
        let Some(indicator) = bar.indicator else {
            return;
        };
        self.commands
            .entity(indicator)
            .remove::<Tween<LeftPercentLens>>();
        if let Ok(mut node) = self.nodes.get_mut(indicator) {
            node.left = Val::Percent(span.left);
            node.width = Val::Percent(span.width);
        }
        if let Ok((mut transform, mut visibility, _)) = self.indicators.get_mut(indicator) {
            transform.scale = Vec3::ONE;
            *visibility = Visibility::Inherited;
        }
    }

    /// Forces the indicator hidden unless a disappear animation is running.
    fn hide_indicator(&mut self, bar: &BottomBar) {
        let Some(indicator) = bar.indicator else {
            return;
        };
        let Ok((mut transform, mut visibility, animating)) = self.indicators.get_mut(indicator)
        else {
            return;
        };
        if animating {
            return;
        }
        transform.scale = Vec3::new(0.0, 0.0, 1.0);
        *visibility = Visibility::Hidden;
    }
}
