//! Selection state machine for the bottom bar.
//!
//! States are `Unselected` and `Selected(i)`. Every accepted request yields a
//! `BarTransition` describing how the shared indicator has to move; rejected
//! requests (out of range, locked, already selected) yield nothing.
use bevy::prelude::*;

use super::{BarButton, BarConfigError, BottomBar};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Unselected,
    Selected(usize),
}

impl SelectionState {
    pub fn index(self) -> Option<usize> {
        match self {
            SelectionState::Unselected => None,
            SelectionState::Selected(index) => Some(index),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarTransition {
    /// Unselected → Selected: snap the indicator, then play its appear animation.
    Appear { to: usize },
    /// Selected → Selected: slide the indicator, no appear/disappear.
    Slide { from: usize, to: usize },
    /// Selected → Unselected: play the disappear animation.
    Disappear { from: usize },
}

impl BarTransition {
    pub fn previous(self) -> Option<usize> {
        match self {
            BarTransition::Appear { .. } => None,
            BarTransition::Slide { from, .. } | BarTransition::Disappear { from } => Some(from),
        }
    }

    pub fn next(self) -> Option<usize> {
        match self {
            BarTransition::Appear { to } | BarTransition::Slide { to, .. } => Some(to),
            BarTransition::Disappear { .. } => None,
        }
    }
}

/// Flexible widths, in percent of the bar, for a bar of `count` buttons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarWidths {
    pub normal: f32,
    pub selected: f32,
}

impl BarWidths {
    pub fn for_state(self, selected: bool) -> f32 {
        if selected {
            self.selected
        } else {
            self.normal
        }
    }
}

pub fn bar_widths(count: usize, increase: f32) -> BarWidths {
    if count == 0 {
        return BarWidths {
            normal: 0.0,
            selected: 0.0,
        };
    }
    let normal = 100.0 / count as f32;
    BarWidths {
        normal,
        selected: normal + increase,
    }
}

/// Horizontal span of one segment, in percent of the bar width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndicatorSpan {
    pub left: f32,
    pub width: f32,
}

/// Measures segment `index` from the settled flexible widths of every segment.
pub fn indicator_span(flex_widths: &[f32], index: usize) -> Option<IndicatorSpan> {
    let target = *flex_widths.get(index)?;
    let total: f32 = flex_widths.iter().sum();
    if total <= 0.0 {
        return None;
    }
    let before: f32 = flex_widths[..index].iter().sum();
    Some(IndicatorSpan {
        left: before / total * 100.0,
        width: target / total * 100.0,
    })
}

impl BottomBar {
    /// Replaces the button set and applies the default selection.
    ///
    /// An empty list leaves the bar inert with nothing selected. A default
    /// that is out of range or locked resolves to no selection.
    pub fn configure(
        &mut self,
        buttons: impl IntoIterator<Item = BarButton>,
        default_index: Option<usize>,
    ) -> Result<(), BarConfigError> {
        self.buttons = buttons.into_iter().collect();
        self.selection = SelectionState::Unselected;
        self.needs_layout = true;

        if self.buttons.is_empty() {
            warn!("BottomBar: no buttons configured, bar stays inert");
            return Err(BarConfigError::NoButtons);
        }

        if let Some(index) = default_index.filter(|&index| self.is_selectable(index)) {
            self.selection = SelectionState::Selected(index);
        }
        Ok(())
    }

    pub fn select(&mut self, index: usize) -> Option<BarTransition> {
        let Some(button) = self.buttons.get(index) else {
            return None;
        };
        if button.locked {
            debug!("BottomBar: button {index} ({}) is locked", button.label);
            return None;
        }

        let transition = match self.selection {
            SelectionState::Selected(current) if current == index => return None,
            SelectionState::Selected(from) => BarTransition::Slide { from, to: index },
            SelectionState::Unselected => BarTransition::Appear { to: index },
        };
        self.selection = SelectionState::Selected(index);
        Some(transition)
    }

    pub fn close(&mut self) -> Option<BarTransition> {
        let SelectionState::Selected(from) = self.selection else {
            return None;
        };
        self.selection = SelectionState::Unselected;
        Some(BarTransition::Disappear { from })
    }

    pub fn current(&self) -> Option<usize> {
        self.selection.index()
    }

    /// Current selection with `-1` standing for "nothing selected".
    pub fn current_index(&self) -> i32 {
        self.current()
            .and_then(|index| i32::try_from(index).ok())
            .unwrap_or(-1)
    }

    pub fn widths(&self) -> BarWidths {
        bar_widths(self.buttons.len(), self.style.selected_width_increase)
    }

    pub fn is_selectable(&self, index: usize) -> bool {
        self.buttons.get(index).is_some_and(|button| !button.locked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::ui::bottom_bar::BarStyle;

    fn buttons(count: usize, locked: &[usize]) -> Vec<BarButton> {
        (0..count)
            .map(|index| BarButton {
                label: format!("button {index}"),
                locked: locked.contains(&index),
                ..BarButton::new(Entity::PLACEHOLDER, Entity::PLACEHOLDER)
            })
            .collect()
    }

    fn configured(count: usize, locked: &[usize], default: Option<usize>) -> BottomBar {
        let mut bar = BottomBar::new(BarStyle::default());
        bar.configure(buttons(count, locked), default)
            .expect("non-empty bar");
        bar
    }

    #[test]
    fn configure_uses_valid_default() {
        let bar = configured(4, &[], Some(1));
        assert_eq!(bar.current_index(), 1);
        assert_eq!(bar.widths().for_state(true), 25.0 + bar.style.selected_width_increase);
    }

    #[test]
    fn configure_rejects_out_of_range_and_locked_defaults() {
        assert_eq!(configured(3, &[], Some(3)).current_index(), -1);
        assert_eq!(configured(3, &[2], Some(2)).current_index(), -1);
        assert_eq!(configured(3, &[], None).current_index(), -1);
    }

    #[test]
    fn configure_with_no_buttons_is_inert() {
        let mut bar = BottomBar::new(BarStyle::default());
        assert_eq!(
            bar.configure(Vec::new(), Some(0)),
            Err(BarConfigError::NoButtons)
        );
        assert_eq!(bar.current(), None);
        assert_eq!(bar.select(0), None);
        assert_eq!(bar.widths(), bar_widths(0, 20.0));
    }

    #[test]
    fn transitions_follow_the_state_machine() {
        let mut bar = configured(4, &[], None);

        assert_eq!(bar.select(1), Some(BarTransition::Appear { to: 1 }));
        assert_eq!(bar.select(1), None);
        assert_eq!(bar.select(3), Some(BarTransition::Slide { from: 1, to: 3 }));
        assert_eq!(bar.close(), Some(BarTransition::Disappear { from: 3 }));
        assert_eq!(bar.close(), None);
        assert_eq!(bar.current_index(), -1);
    }

    #[test]
    fn locked_and_out_of_range_requests_are_ignored() {
        let mut bar = configured(4, &[2], Some(0));

        assert_eq!(bar.select(2), None);
        assert_eq!(bar.select(4), None);
        assert_eq!(bar.select(usize::MAX), None);
        assert_eq!(bar.current_index(), 0);
    }

    #[test]
    fn widths_are_a_function_of_count_and_increase() {
        assert_eq!(
            bar_widths(4, 20.0),
            BarWidths {
                normal: 25.0,
                selected: 45.0
            }
        );
        assert_eq!(bar_widths(5, 0.0).selected, 20.0);
    }

    #[test]
    fn indicator_span_measures_settled_widths() {
        let widths = [25.0, 45.0, 25.0, 25.0];
        let span = indicator_span(&widths, 1).expect("span");
        assert!((span.left - 25.0 / 120.0 * 100.0).abs() < 1e-4);
        assert!((span.width - 45.0 / 120.0 * 100.0).abs() < 1e-4);

        assert_eq!(indicator_span(&widths, 4), None);
        assert_eq!(indicator_span(&[0.0, 0.0], 0), None);
    }
}
