//! Front-end widget configuration.
//!
//! The default document is embedded at build time and parsed once. A parse or
//! validation failure is logged and the built-in defaults are used instead.
//! Bar problems the bar handles itself (no buttons, unusable default index)
//! are only logged.
use bevy::prelude::*;
use enum_map::enum_map;
use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::systems::{
    tween::Ease,
    ui::{
        bottom_bar::{BarButtonSpec, BarStyle, BottomBarSpec, ButtonVisual},
        level_complete::RevealTimings,
    },
};

mod validate;

pub use validate::{validate_config, ConfigValidationError};

const FRONT_END_JSON: &str = include_str!("./front_end.json");

static FRONT_END_CONFIG: Lazy<Result<FrontEndConfig, ConfigError>> =
    Lazy::new(|| load_config(FRONT_END_JSON));

pub struct ConfigPlugin;
impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        let config = match FRONT_END_CONFIG.as_ref() {
            Ok(config) => config.clone(),
            Err(error) => {
                error!("Front-end config rejected, using defaults: {error}");
                if let ConfigError::Validation(errors) = error {
                    for validation_error in errors {
                        warn!("  {validation_error}");
                    }
                }
                FrontEndConfig::default()
            }
        };
        app.insert_resource(config);
    }
}

#[derive(Debug, Clone)]
pub enum ConfigError {
    Parse(String),
    Validation(Vec<ConfigValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "{message}"),
            Self::Validation(errors) => {
                write!(f, "front-end config failed validation with {} error(s)", errors.len())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn load_config(json: &str) -> Result<FrontEndConfig, ConfigError> {
    let config: FrontEndConfig = serde_json::from_str(json).map_err(|error| {
        ConfigError::Parse(format!("failed to parse front-end config: {error}"))
    })?;

    let (fatal, advisory): (Vec<_>, Vec<_>) = validate_config(&config)
        .into_iter()
        .partition(ConfigValidationError::is_fatal);
    for warning in &advisory {
        warn!("Front-end config: {warning}");
    }
    if !fatal.is_empty() {
        return Err(ConfigError::Validation(fatal));
    }

    Ok(config)
}

/// A color written as a `#RRGGBB` / `#RRGGBBAA` hex string.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct HexColor(pub Color);

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Srgba::hex(&value)
            .map(|srgba| HexColor(srgba.into()))
            .map_err(|error| format!("invalid hex color '{value}': {error}"))
    }
}

impl From<Color> for HexColor {
    fn from(color: Color) -> Self {
        HexColor(color)
    }
}

#[derive(Resource, Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct FrontEndConfig {
    pub bottom_bar: BottomBarConfig,
    pub popup: PopupConfig,
    pub level_complete: LevelCompleteConfig,
    pub toggle: ToggleConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BarButtonConfig {
    pub label: String,
    #[serde(default)]
    pub callback: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BottomBarConfig {
    pub buttons: Vec<BarButtonConfig>,
    /// Labels of buttons that can never be selected.
    pub locked_buttons: Vec<String>,
    /// `-1` starts with nothing selected.
    pub default_selected_index: i32,
    pub selected_icon_color: HexColor,
    pub unselected_icon_color: HexColor,
    pub selected_text_color: HexColor,
    pub unselected_text_color: HexColor,
    pub selected_width_increase: f32,
    pub width_tween_duration: f32,
    pub background: HexColor,
    pub indicator_color: HexColor,
}

impl Default for BottomBarConfig {
    fn default() -> Self {
        let style = BarStyle::default();
        let button = |label: &str, callback: &str| BarButtonConfig {
            label: label.to_owned(),
            callback: callback.to_owned(),
        };
        Self {
            buttons: vec![
                button("Events", "ActivateDefault"),
                button("Shop", "ActivateShop"),
                button("Home", "ActivateHome"),
                button("Story", "ActivateStory"),
                button("Settings", "ActivateSettings"),
            ],
            locked_buttons: Vec::new(),
            default_selected_index: -1,
            selected_icon_color: style.icon_colors[ButtonVisual::Selected].into(),
            unselected_icon_color: style.icon_colors[ButtonVisual::Unselected].into(),
            selected_text_color: style.label_colors[ButtonVisual::Selected].into(),
            unselected_text_color: style.label_colors[ButtonVisual::Unselected].into(),
            selected_width_increase: style.selected_width_increase,
            width_tween_duration: style.width_tween_duration,
            background: Color::srgb(0.1, 0.1, 0.12).into(),
            indicator_color: Color::srgb(0.2, 0.22, 0.28).into(),
        }
    }
}

impl BottomBarConfig {
    pub fn default_index(&self) -> Option<usize> {
        usize::try_from(self.default_selected_index).ok()
    }

    pub fn is_locked(&self, label: &str) -> bool {
        self.locked_buttons.iter().any(|locked| locked == label)
    }

    pub fn style(&self) -> BarStyle {
        BarStyle {
            icon_colors: enum_map! {
                ButtonVisual::Selected => self.selected_icon_color.0,
                ButtonVisual::Unselected => self.unselected_icon_color.0,
            },
            label_colors: enum_map! {
                ButtonVisual::Selected => self.selected_text_color.0,
                ButtonVisual::Unselected => self.unselected_text_color.0,
            },
            selected_width_increase: self.selected_width_increase,
            width_tween_duration: self.width_tween_duration,
        }
    }

    pub fn to_spec(&self) -> BottomBarSpec {
        BottomBarSpec {
            buttons: self
                .buttons
                .iter()
                .map(|button| BarButtonSpec {
                    label: button.label.clone(),
                    callback: button.callback.clone(),
                    locked: self.is_locked(&button.label),
                })
                .collect(),
            default_index: self.default_index(),
            style: self.style(),
            background: self.background.0,
            indicator_color: self.indicator_color.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    pub slide_duration: f32,
    pub dim_alpha: f32,
    pub panel_height: f32,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            slide_duration: 0.25,
            dim_alpha: 0.6,
            panel_height: 320.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LevelCompleteConfig {
    pub canvas_alpha: f32,
    pub reward_count: usize,
    #[serde(flatten)]
    pub timings: RevealTimings,
}

impl Default for LevelCompleteConfig {
    fn default() -> Self {
        Self {
            canvas_alpha: 0.85,
            reward_count: 3,
            timings: RevealTimings::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ToggleConfig {
    pub width: f32,
    pub height: f32,
    pub start_on: bool,
    pub animation_duration: f32,
    pub ease: Ease,
    pub recolor_background: bool,
    pub recolor_handle: bool,
    pub background_off: HexColor,
    pub background_on: HexColor,
    pub handle_off: HexColor,
    pub handle_on: HexColor,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self {
            width: 80.0,
            height: 40.0,
            start_on: false,
            animation_duration: 0.5,
            ease: Ease::SmoothStep,
            recolor_background: true,
            recolor_handle: false,
            background_off: Color::srgb(0.35, 0.37, 0.42).into(),
            background_on: Color::srgb(0.2, 0.77, 0.42).into(),
            handle_off: Color::WHITE.into(),
            handle_on: Color::WHITE.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::ui::bottom_bar::{BarButton, BottomBar};

    #[test]
    fn embedded_config_loads_and_validates() {
        let config = load_config(FRONT_END_JSON).expect("embedded config should be valid");

        assert_eq!(config.bottom_bar.buttons.len(), 5);
        assert_eq!(config.bottom_bar.default_index(), Some(2));
        assert!(config.bottom_bar.is_locked("Story"));
        assert_eq!(config.toggle.ease, Ease::SmoothStep);
        assert_eq!(config.level_complete.timings, RevealTimings::default());
    }

    #[test]
    fn bar_conversion_marks_locked_labels() {
        let config = load_config(FRONT_END_JSON).expect("embedded config should be valid");
        let spec = config.bottom_bar.to_spec();

        let locked: Vec<&str> = spec
            .buttons
            .iter()
            .filter(|button| button.locked)
            .map(|button| button.label.as_str())
            .collect();
        assert_eq!(locked, vec!["Story"]);
        assert_eq!(
            spec.style.icon_colors[ButtonVisual::Selected],
            Color::from(Srgba::hex("#3D7BFF").expect("hex"))
        );
    }

    #[test]
    fn negative_default_index_means_nothing_selected() {
        let config: FrontEndConfig =
            serde_json::from_str(r#"{ "bottom_bar": { "default_selected_index": -1 } }"#)
                .expect("partial config");
        assert_eq!(config.bottom_bar.default_index(), None);
        assert_eq!(config.bottom_bar.buttons.len(), 5);
    }

    #[test]
    fn bad_hex_color_is_a_parse_error() {
        let error = load_config(r##"{ "bottom_bar": { "background": "#zz" } }"##).unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
        assert!(error.to_string().contains("#zz"));
    }

    #[test]
    fn out_of_range_default_keeps_the_rest_of_the_config() {
        let config = load_config(
            r#"{ "bottom_bar": {
                "buttons": [{ "label": "A" }, { "label": "B" }],
                "default_selected_index": 7,
                "selected_width_increase": 33.0
            } }"#,
        )
        .expect("unusable default index is not fatal");

        let labels: Vec<&str> = config
            .bottom_bar
            .buttons
            .iter()
            .map(|button| button.label.as_str())
            .collect();
        assert_eq!(labels, vec!["A", "B"]);
        assert_eq!(config.bottom_bar.selected_width_increase, 33.0);

        let mut bar = BottomBar::new(config.bottom_bar.style());
        let buttons = config.bottom_bar.to_spec().buttons.into_iter().map(|button| BarButton {
            label: button.label,
            callback: button.callback,
            locked: button.locked,
            ..BarButton::new(Entity::PLACEHOLDER, Entity::PLACEHOLDER)
        });
        assert!(bar.configure(buttons, config.bottom_bar.default_index()).is_ok());
        assert_eq!(bar.current_index(), -1);
    }

    #[test]
    fn empty_button_list_is_kept_for_an_inert_bar() {
        let config = load_config(r#"{ "bottom_bar": { "buttons": [], "default_selected_index": -1 } }"#)
            .expect("empty bar is not fatal");
        assert!(config.bottom_bar.buttons.is_empty());
    }

    #[test]
    fn validation_failures_are_collected() {
        let error = load_config(r#"{ "popup": { "dim_alpha": 1.5, "slide_duration": -1.0 } }"#)
            .unwrap_err();
        let ConfigError::Validation(errors) = error else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 2);
    }
}
