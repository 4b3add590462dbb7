use std::collections::HashSet;

use super::{BottomBarConfig, FrontEndConfig, LevelCompleteConfig, PopupConfig, ToggleConfig};

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    NoButtons,
    DuplicateButtonLabel { label: String },
    UnknownLockedButton { label: String },
    DefaultIndexOutOfRange { index: i32, count: usize },
    NegativeValue { field: &'static str, value: f32 },
    AlphaOutOfRange { field: &'static str, value: f32 },
    ToggleTooNarrow { width: f32, height: f32 },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoButtons => write!(f, "bottom_bar.buttons is empty"),
            Self::DuplicateButtonLabel { label } => {
                write!(f, "bottom_bar.buttons has duplicate label '{label}'")
            }
            Self::UnknownLockedButton { label } => {
                write!(f, "bottom_bar.locked_buttons names unknown button '{label}'")
            }
            Self::DefaultIndexOutOfRange { index, count } => write!(
                f,
                "bottom_bar.default_selected_index {index} is outside -1..{count}"
            ),
            Self::NegativeValue { field, value } => write!(f, "{field} must be >= 0, got {value}"),
            Self::AlphaOutOfRange { field, value } => {
                write!(f, "{field} must be within 0..=1, got {value}")
            }
            Self::ToggleTooNarrow { width, height } => write!(
                f,
                "toggle width {width} must be at least its height {height}"
            ),
        }
    }
}

impl std::error::Error for ConfigValidationError {}

impl ConfigValidationError {
    /// Problems the bar resolves on its own at runtime: an empty button list
    /// leaves it inert, an unusable default leaves nothing selected.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::NoButtons | Self::DefaultIndexOutOfRange { .. }
        )
    }
}

pub fn validate_config(config: &FrontEndConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_bottom_bar(&config.bottom_bar, &mut errors);
    validate_popup(&config.popup, &mut errors);
    validate_level_complete(&config.level_complete, &mut errors);
    validate_toggle(&config.toggle, &mut errors);
    errors
}

fn validate_bottom_bar(bar: &BottomBarConfig, errors: &mut Vec<ConfigValidationError>) {
    if bar.buttons.is_empty() {
        errors.push(ConfigValidationError::NoButtons);
    }

    let mut labels = HashSet::new();
    for button in &bar.buttons {
        if !labels.insert(button.label.as_str()) {
            errors.push(ConfigValidationError::DuplicateButtonLabel {
                label: button.label.clone(),
            });
        }
    }
    for locked in &bar.locked_buttons {
        if !labels.contains(locked.as_str()) {
            errors.push(ConfigValidationError::UnknownLockedButton {
                label: locked.clone(),
            });
        }
    }

    let count = bar.buttons.len();
    if bar.default_selected_index < -1
        || bar.default_index().is_some_and(|index| index >= count)
    {
        errors.push(ConfigValidationError::DefaultIndexOutOfRange {
            index: bar.default_selected_index,
            count,
        });
    }

    non_negative(
        "bottom_bar.selected_width_increase",
        bar.selected_width_increase,
        errors,
    );
    non_negative(
        "bottom_bar.width_tween_duration",
        bar.width_tween_duration,
        errors,
    );
}

fn validate_popup(popup: &PopupConfig, errors: &mut Vec<ConfigValidationError>) {
    non_negative("popup.slide_duration", popup.slide_duration, errors);
    non_negative("popup.panel_height", popup.panel_height, errors);
    unit_alpha("popup.dim_alpha", popup.dim_alpha, errors);
}

fn validate_level_complete(screen: &LevelCompleteConfig, errors: &mut Vec<ConfigValidationError>) {
    unit_alpha("level_complete.canvas_alpha", screen.canvas_alpha, errors);

    let timings = &screen.timings;
    for (field, value) in [
        ("level_complete.fade", timings.fade),
        ("level_complete.title_pop", timings.title_pop),
        ("level_complete.star_pop", timings.star_pop),
        ("level_complete.star_vfx_delay", timings.star_vfx_delay),
        ("level_complete.reward_pop", timings.reward_pop),
        ("level_complete.reward_delay", timings.reward_delay),
        ("level_complete.reward_fade", timings.reward_fade),
        ("level_complete.bottom_pop", timings.bottom_pop),
        ("level_complete.delay_between_layers", timings.delay_between_layers),
        (
            "level_complete.bottom_button_extra_delay",
            timings.bottom_button_extra_delay,
        ),
    ] {
        non_negative(field, value, errors);
    }
}

fn validate_toggle(toggle: &ToggleConfig, errors: &mut Vec<ConfigValidationError>) {
    non_negative("toggle.animation_duration", toggle.animation_duration, errors);
    if toggle.width < toggle.height {
        errors.push(ConfigValidationError::ToggleTooNarrow {
            width: toggle.width,
            height: toggle.height,
        });
    }
}

fn non_negative(field: &'static str, value: f32, errors: &mut Vec<ConfigValidationError>) {
    if value < 0.0 || value.is_nan() {
        errors.push(ConfigValidationError::NegativeValue { field, value });
    }
}

fn unit_alpha(field: &'static str, value: f32, errors: &mut Vec<ConfigValidationError>) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(ConfigValidationError::AlphaOutOfRange { field, value });
    }
}
