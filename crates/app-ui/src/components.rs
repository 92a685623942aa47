//! UI component library
//!
//! Components are serializable structs with builder APIs. Each one can
//! compute its concrete colors from a [`Theme`], so the rendering layer
//! never needs to know the palette.

use serde::{Deserialize, Serialize};

use crate::theme::{Color, Theme};

// =============================================================================
// Button
// =============================================================================

/// Button style variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    /// Solid primary background
    #[default]
    Filled,
    /// Transparent with a border
    Outline,
    /// Transparent, text only
    Subtle,
    /// Destructive action
    Danger,
}

/// Button component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    /// Button label
    pub label: String,
    /// Style variant
    #[serde(default)]
    pub variant: ButtonVariant,
    /// Whether the button is disabled
    #[serde(default)]
    pub disabled: bool,
    /// Whether the button shows a loading indicator
    #[serde(default)]
    pub loading: bool,
}

/// Computed button colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonStyles {
    /// Background color
    pub background: Color,
    /// Background color when hovered
    pub background_hover: Color,
    /// Label color
    pub text: Color,
}

impl Button {
    /// Create a new button
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            variant: ButtonVariant::default(),
            disabled: false,
            loading: false,
        }
    }

    /// Set the variant
    pub fn variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the disabled state
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the loading state
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Compute concrete colors from the theme
    pub fn computed_styles(&self, theme: &Theme) -> ButtonStyles {
        let p = &theme.palette;
        match self.variant {
            ButtonVariant::Filled => ButtonStyles {
                background: p.primary.clone(),
                background_hover: p.primary_hover.clone(),
                text: "#FFFFFF".to_string(),
            },
            ButtonVariant::Outline => ButtonStyles {
                background: p.background.clone(),
                background_hover: p.surface.clone(),
                text: p.primary.clone(),
            },
            ButtonVariant::Subtle => ButtonStyles {
                background: p.background.clone(),
                background_hover: p.surface.clone(),
                text: p.text.clone(),
            },
            ButtonVariant::Danger => ButtonStyles {
                background: p.error.clone(),
                background_hover: p.error.clone(),
                text: "#FFFFFF".to_string(),
            },
        }
    }
}

// =============================================================================
// TextInput
// =============================================================================

/// Input content kinds, for keyboard/autofill hints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Plain text
    #[default]
    Text,
    /// Email address
    Email,
    /// Password (masked)
    Password,
}

/// Text input component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextInput {
    /// Field label
    pub label: String,
    /// Current value
    #[serde(default)]
    pub value: String,
    /// Placeholder text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Content kind
    #[serde(default)]
    pub kind: InputKind,
    /// Whether the field is required
    #[serde(default)]
    pub required: bool,
    /// Validation error to display, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TextInput {
    /// Create a new text input
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: String::new(),
            placeholder: None,
            kind: InputKind::default(),
            required: false,
            error: None,
        }
    }

    /// Set the value
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the placeholder
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Set the content kind
    pub fn kind(mut self, kind: InputKind) -> Self {
        self.kind = kind;
        self
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a validation error
    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Border color from the theme, red when the field carries an error
    pub fn border_color(&self, theme: &Theme) -> Color {
        if self.error.is_some() {
            theme.palette.error.clone()
        } else {
            theme.palette.border.clone()
        }
    }
}

// =============================================================================
// Checkbox
// =============================================================================

/// Checkbox component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkbox {
    /// Whether the box is checked
    pub checked: bool,
    /// Optional label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Checkbox {
    /// Create a new checkbox
    pub fn new(checked: bool) -> Self {
        Self {
            checked,
            label: None,
        }
    }

    /// Set the label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Fill color from the theme
    pub fn fill_color(&self, theme: &Theme) -> Color {
        if self.checked {
            theme.palette.primary.clone()
        } else {
            theme.palette.surface.clone()
        }
    }
}

// =============================================================================
// Text
// =============================================================================

/// Text emphasis variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextVariant {
    /// Body text
    #[default]
    Body,
    /// Page/section title
    Title,
    /// Secondary, dimmed text
    Dimmed,
    /// Struck-through text (completed todos)
    Strikethrough,
}

/// Text component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// Text content
    pub content: String,
    /// Emphasis variant
    #[serde(default)]
    pub variant: TextVariant,
}

impl Text {
    /// Create body text
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            variant: TextVariant::default(),
        }
    }

    /// Set the variant
    pub fn variant(mut self, variant: TextVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Text color from the theme
    pub fn color(&self, theme: &Theme) -> Color {
        match self.variant {
            TextVariant::Dimmed | TextVariant::Strikethrough => {
                theme.palette.text_dimmed.clone()
            }
            _ => theme.palette.text.clone(),
        }
    }
}

// =============================================================================
// Badge
// =============================================================================

/// Badge colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    /// Neutral gray
    #[default]
    Gray,
    /// Positive green
    Green,
    /// Negative red
    Red,
}

/// Badge component, used for the header health indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    /// Badge label
    pub label: String,
    /// Badge color
    #[serde(default)]
    pub color: BadgeColor,
}

impl Badge {
    /// Create a new badge
    pub fn new(label: impl Into<String>, color: BadgeColor) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }

    /// Background color from the theme
    pub fn background(&self, theme: &Theme) -> Color {
        match self.color {
            BadgeColor::Gray => theme.palette.surface.clone(),
            BadgeColor::Green => theme.palette.success.clone(),
            BadgeColor::Red => theme.palette.error.clone(),
        }
    }
}
