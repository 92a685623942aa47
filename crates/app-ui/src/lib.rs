//! View models for Taskdeck
//!
//! UI as data: components are serializable structs with builder APIs whose
//! styling is computed from the active theme, and screens are state machines
//! that render component trees and delegate behavior to the domain services.
//! Nothing in this crate draws pixels; a frontend renders the serialized
//! output.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod components;
pub mod notifications;
pub mod screens;
pub mod theme;

pub use components::{Badge, BadgeColor, Button, ButtonVariant, Checkbox, Text, TextInput};
pub use notifications::{Notification, NotificationColor, NotificationQueue};
pub use screens::{AuthMode, AuthScreen, Header, TodoListScreen};
pub use theme::{Theme, ThemeName};
