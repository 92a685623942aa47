//! Screen view models
//!
//! Each screen is a state machine: it holds field/render state, delegates
//! behavior to the domain services, and reports outcomes through the
//! notification queue. `render()` methods produce component trees.

use serde::{Deserialize, Serialize};
use todo_client::todos::Todo;

use app_core::auth::AuthService;
use app_core::health::{HealthService, HealthStatus};
use app_core::todos::TodoService;

use crate::components::{Badge, BadgeColor, Button, Checkbox, Text, TextInput, TextVariant};
use crate::components::{ButtonVariant, InputKind};
use crate::notifications::NotificationQueue;

// =============================================================================
// Header
// =============================================================================

/// Header with the app title and a backend health badge
pub struct Header {
    health: HealthService,
    status: Option<HealthStatus>,
}

impl Header {
    /// Create a new header
    pub fn new(health: HealthService) -> Self {
        Self {
            health,
            status: None,
        }
    }

    /// Poll the backend and update the badge
    pub async fn refresh(&mut self) {
        self.status = Some(self.health.status().await);
    }

    /// Last observed health, if any poll has completed
    pub fn status(&self) -> Option<HealthStatus> {
        self.status
    }

    /// The health badge; gray "checking" until the first poll resolves
    pub fn badge(&self) -> Badge {
        match self.status {
            None => Badge::new("API: checking", BadgeColor::Gray),
            Some(HealthStatus::Healthy) => Badge::new("API: OK", BadgeColor::Green),
            Some(HealthStatus::Unhealthy) => Badge::new("API: degraded", BadgeColor::Red),
            Some(HealthStatus::Unreachable) => Badge::new("API: down", BadgeColor::Red),
        }
    }

    /// The header title
    pub fn title(&self) -> Text {
        Text::new("Taskdeck").variant(TextVariant::Title)
    }
}

// =============================================================================
// Auth screen
// =============================================================================

/// Which auth form is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Sign in to an existing account
    #[default]
    Login,
    /// Create a new account
    Signup,
}

/// Field state for the login form
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    /// Email field value
    pub email: String,
    /// Password field value
    pub password: String,
    /// Field-level validation error for email
    pub email_error: Option<String>,
    /// Field-level validation error for password
    pub password_error: Option<String>,
}

impl LoginForm {
    /// Validate the form, populating field errors
    ///
    /// Returns true when submission may proceed.
    pub fn validate(&mut self) -> bool {
        self.email_error = if self.email.trim().is_empty() {
            Some("Email is required".to_string())
        } else {
            None
        };
        self.password_error = if self.password.is_empty() {
            Some("Password is required".to_string())
        } else {
            None
        };
        self.email_error.is_none() && self.password_error.is_none()
    }

    /// Render the form inputs
    pub fn render(&self) -> Vec<TextInput> {
        let mut email = TextInput::new("Email")
            .value(&self.email)
            .kind(InputKind::Email)
            .required();
        if let Some(e) = &self.email_error {
            email = email.error(e);
        }

        let mut password = TextInput::new("Password")
            .value(&self.password)
            .kind(InputKind::Password)
            .required();
        if let Some(e) = &self.password_error {
            password = password.error(e);
        }

        vec![email, password]
    }
}

/// Field state for the signup form
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    /// Email field value
    pub email: String,
    /// Password field value
    pub password: String,
    /// Password confirmation field value
    pub confirm: String,
    /// Field-level validation error for email
    pub email_error: Option<String>,
    /// Field-level validation error for password
    pub password_error: Option<String>,
    /// Field-level validation error for the confirmation
    pub confirm_error: Option<String>,
}

impl SignupForm {
    /// Validate the form, populating field errors
    ///
    /// Returns true when submission may proceed. The same rules the service
    /// enforces, surfaced per-field so the user sees them before submitting.
    pub fn validate(&mut self) -> bool {
        self.email_error = if self.email.trim().is_empty() {
            Some("Email is required".to_string())
        } else {
            None
        };
        self.password_error = if self.password.len() < app_core::auth::MIN_PASSWORD_LENGTH {
            Some(format!(
                "Password must be at least {} characters",
                app_core::auth::MIN_PASSWORD_LENGTH
            ))
        } else {
            None
        };
        self.confirm_error = if self.password != self.confirm {
            Some("Passwords do not match".to_string())
        } else {
            None
        };

        self.email_error.is_none() && self.password_error.is_none() && self.confirm_error.is_none()
    }
}

/// The unauthenticated root screen: login/signup forms with a mode toggle
pub struct AuthScreen {
    auth: AuthService,
    /// Active form
    pub mode: AuthMode,
    /// Login form state
    pub login_form: LoginForm,
    /// Signup form state
    pub signup_form: SignupForm,
    submitting: bool,
}

impl AuthScreen {
    /// Create a new auth screen showing the login form
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth,
            mode: AuthMode::default(),
            login_form: LoginForm::default(),
            signup_form: SignupForm::default(),
            submitting: false,
        }
    }

    /// Switch between login and signup
    pub fn set_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
    }

    /// Whether a submission is in flight
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Submit the active form
    ///
    /// Invalid forms never reach the service; validation errors land on the
    /// fields. Service failures become error notifications, the form keeps
    /// its values. Returns true when the user is signed in afterwards.
    pub async fn submit(&mut self, notifications: &mut NotificationQueue) -> bool {
        let result = match self.mode {
            AuthMode::Login => {
                if !self.login_form.validate() {
                    return false;
                }
                self.submitting = true;
                self.auth
                    .login(&self.login_form.email, &self.login_form.password)
                    .await
            }
            AuthMode::Signup => {
                if !self.signup_form.validate() {
                    return false;
                }
                self.submitting = true;
                self.auth
                    .signup(
                        &self.signup_form.email,
                        &self.signup_form.password,
                        &self.signup_form.confirm,
                    )
                    .await
            }
        };
        self.submitting = false;

        match result {
            Ok(user) => {
                notifications.notify_success("Signed in", user.email);
                true
            }
            Err(error) => {
                let title = match self.mode {
                    AuthMode::Login => "Login failed",
                    AuthMode::Signup => "Signup failed",
                };
                notifications.notify_error(title, error.to_string());
                false
            }
        }
    }

    /// The submit button for the active form
    pub fn submit_button(&self) -> Button {
        let label = match self.mode {
            AuthMode::Login => "Sign in",
            AuthMode::Signup => "Create account",
        };
        Button::new(label).loading(self.submitting)
    }
}

// =============================================================================
// Todo list screen
// =============================================================================

/// Render state of the todo list
#[derive(Debug, Clone, PartialEq)]
pub enum TodoListState {
    /// First load has not resolved
    Loading,
    /// Load failed
    Failed(String),
    /// Todos loaded
    Ready(Vec<Todo>),
}

/// Edit dialog state
#[derive(Debug, Clone, PartialEq)]
pub struct EditDialog {
    /// Id of the todo being edited
    pub todo_id: String,
    /// Title being edited
    pub title: String,
}

/// One rendered todo row
#[derive(Debug, Clone, PartialEq)]
pub struct TodoRow {
    /// Todo id
    pub id: String,
    /// Completion checkbox
    pub checkbox: Checkbox,
    /// Title text, struck through when completed
    pub title: Text,
    /// Edit button
    pub edit_button: Button,
    /// Delete button
    pub delete_button: Button,
}

/// The authenticated root screen: draft input plus the todo list
pub struct TodoListScreen {
    todos: TodoService,
    state: TodoListState,
    draft: String,
    edit_dialog: Option<EditDialog>,
}

impl TodoListScreen {
    /// Create a new todo list screen
    pub fn new(todos: TodoService) -> Self {
        Self {
            todos,
            state: TodoListState::Loading,
            draft: String::new(),
            edit_dialog: None,
        }
    }

    /// Current render state
    pub fn state(&self) -> &TodoListState {
        &self.state
    }

    /// Current draft title
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Update the draft title as the user types
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Load (or reload) the list
    pub async fn refresh(&mut self) {
        self.state = match self.todos.list().await {
            Ok(todos) => TodoListState::Ready(todos),
            Err(error) => {
                tracing::warn!(error = %error, "todo list load failed");
                TodoListState::Failed(error.to_string())
            }
        };
    }

    /// Submit the draft as a new todo
    ///
    /// A draft that is blank after trimming is ignored: no request, no
    /// notification, draft untouched. On success the draft is cleared and
    /// the list reloaded; on failure the draft is kept so the user can retry.
    pub async fn submit_draft(&mut self, notifications: &mut NotificationQueue) {
        if self.draft.trim().is_empty() {
            return;
        }

        match self.todos.create(&self.draft).await {
            Ok(todo) => {
                notifications.notify_success("Todo created", todo.title);
                self.draft.clear();
                self.refresh().await;
            }
            Err(error) => {
                notifications.notify_error("Failed to create todo", error.to_string());
            }
        }
    }

    /// Toggle a todo's completed flag
    pub async fn toggle(&mut self, id: &str, completed: bool, notifications: &mut NotificationQueue) {
        match self.todos.set_completed(id, completed).await {
            Ok(todo) => {
                notifications.notify_success("Todo updated", todo.title);
                self.refresh().await;
            }
            Err(error) => {
                notifications.notify_error("Failed to update todo", error.to_string());
            }
        }
    }

    /// Delete a todo
    pub async fn delete(&mut self, id: &str, notifications: &mut NotificationQueue) {
        match self.todos.delete(id).await {
            Ok(()) => {
                notifications.notify_success("Todo deleted", "");
                self.refresh().await;
            }
            Err(error) => {
                notifications.notify_error("Failed to delete todo", error.to_string());
            }
        }
    }

    /// Open the edit dialog for a todo
    pub fn open_edit(&mut self, id: &str, current_title: &str) {
        self.edit_dialog = Some(EditDialog {
            todo_id: id.to_string(),
            title: current_title.to_string(),
        });
    }

    /// The open edit dialog, if any
    pub fn edit_dialog(&self) -> Option<&EditDialog> {
        self.edit_dialog.as_ref()
    }

    /// Update the title in the open edit dialog
    pub fn set_edit_title(&mut self, title: impl Into<String>) {
        if let Some(dialog) = &mut self.edit_dialog {
            dialog.title = title.into();
        }
    }

    /// Close the edit dialog without saving
    pub fn cancel_edit(&mut self) {
        self.edit_dialog = None;
    }

    /// Save the edit dialog's title
    pub async fn save_edit(&mut self, notifications: &mut NotificationQueue) {
        let Some(dialog) = self.edit_dialog.take() else {
            return;
        };

        match self.todos.rename(&dialog.todo_id, &dialog.title).await {
            Ok(_) => {
                notifications.notify_success("Todo updated", dialog.title);
                self.refresh().await;
            }
            Err(error) => {
                // Keep the dialog open so the user can fix the title
                notifications.notify_error("Failed to update todo", error.to_string());
                self.edit_dialog = Some(dialog);
            }
        }
    }

    /// The draft input field
    pub fn draft_input(&self) -> TextInput {
        TextInput::new("New todo")
            .value(&self.draft)
            .placeholder("What needs doing?")
    }

    /// Render the loaded todos as rows
    ///
    /// Empty while loading or failed; the caller renders those states.
    pub fn rows(&self) -> Vec<TodoRow> {
        let TodoListState::Ready(todos) = &self.state else {
            return Vec::new();
        };

        todos
            .iter()
            .map(|todo| {
                let variant = if todo.completed {
                    TextVariant::Strikethrough
                } else {
                    TextVariant::Body
                };
                TodoRow {
                    id: todo.id.clone(),
                    checkbox: Checkbox::new(todo.completed),
                    title: Text::new(&todo.title).variant(variant),
                    edit_button: Button::new("Edit").variant(ButtonVariant::Subtle),
                    delete_button: Button::new("Delete").variant(ButtonVariant::Danger),
                }
            })
            .collect()
    }
}
