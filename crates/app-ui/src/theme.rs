//! Theme system
//!
//! Two palettes, light and dark, with the dark one as the default. The
//! primary accent is green throughout; components look colors up here
//! instead of hardcoding them.

use serde::{Deserialize, Serialize};

/// A color represented as an RGB hex string (e.g., "#FFFFFF")
pub type Color = String;

/// Available theme names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    /// Bright theme with white background
    Light,
    /// Dark theme with near-black background
    #[default]
    Dark,
}

/// Color palette for a theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Main background color
    pub background: Color,
    /// Elevated surface color (cards, inputs, dialogs)
    pub surface: Color,
    /// Primary text color
    pub text: Color,
    /// Dimmed/secondary text color
    pub text_dimmed: Color,
    /// Border color
    pub border: Color,
    /// Primary accent (green)
    pub primary: Color,
    /// Darker primary, used for hover states
    pub primary_hover: Color,
    /// Success color
    pub success: Color,
    /// Error/destructive color
    pub error: Color,
}

/// A complete theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Theme name
    pub name: ThemeName,
    /// Color palette
    pub palette: Palette,
}

impl Theme {
    /// Whether this is a dark theme
    pub fn is_dark(&self) -> bool {
        self.name == ThemeName::Dark
    }
}

impl Default for Theme {
    fn default() -> Self {
        get_theme(ThemeName::default())
    }
}

/// Get the theme for a given name
pub fn get_theme(name: ThemeName) -> Theme {
    match name {
        ThemeName::Light => Theme {
            name,
            palette: Palette {
                background: "#FFFFFF".to_string(),
                surface: "#F1F3F5".to_string(),
                text: "#212529".to_string(),
                text_dimmed: "#868E96".to_string(),
                border: "#DEE2E6".to_string(),
                primary: "#40C057".to_string(),
                primary_hover: "#37B24D".to_string(),
                success: "#40C057".to_string(),
                error: "#FA5252".to_string(),
            },
        },
        ThemeName::Dark => Theme {
            name,
            palette: Palette {
                background: "#1A1B1E".to_string(),
                surface: "#25262B".to_string(),
                text: "#C1C2C5".to_string(),
                text_dimmed: "#909296".to_string(),
                border: "#373A40".to_string(),
                primary: "#40C057".to_string(),
                primary_hover: "#37B24D".to_string(),
                success: "#40C057".to_string(),
                error: "#FA5252".to_string(),
            },
        },
    }
}

/// Mutable theme selection for the running app
#[derive(Debug, Clone)]
pub struct ThemeState {
    current: ThemeName,
}

impl ThemeState {
    /// Create theme state with the default (dark) theme
    pub fn new() -> Self {
        Self {
            current: ThemeName::default(),
        }
    }

    /// The active theme
    pub fn theme(&self) -> Theme {
        get_theme(self.current)
    }

    /// Switch themes
    pub fn set(&mut self, name: ThemeName) {
        self.current = name;
    }
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_is_dark_with_green_primary() {
        let theme = Theme::default();
        assert!(theme.is_dark());
        assert_eq!(theme.palette.primary, "#40C057");
    }

    #[test]
    fn test_theme_switching() {
        let mut state = ThemeState::new();
        assert!(state.theme().is_dark());

        state.set(ThemeName::Light);
        assert!(!state.theme().is_dark());
        assert_eq!(state.theme().palette.background, "#FFFFFF");
    }
}
