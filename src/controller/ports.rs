//! Collaborators the list view talks to besides the backend.
//!
//! Every port is driven from the controller task only, so implementations do
//! not need interior synchronization beyond `Send`.

/// Severity of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Toast notifications.
pub trait Notifier: Send + 'static {
    fn notify(&mut self, message: &str, kind: NotificationKind);
}

/// Title and message shown by the delete confirmation dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    pub title: String,
    pub message: String,
}

/// Modal confirmation dialog.
///
/// Focus trapping and Escape-to-cancel are up to the implementation; the user's
/// decision is reported back through the controller handle.
pub trait ConfirmationDialog: Send + 'static {
    fn open(&mut self, prompt: ConfirmationPrompt);
    /// Disables the dialog buttons while the delete call is in flight.
    fn set_loading(&mut self, loading: bool);
    fn close(&mut self);
}

/// Query string of the list page.
pub trait UrlStateStore: Send + 'static {
    /// Current query string, with or without the leading `?`.
    fn current(&self) -> String;
    /// Replaces the current history entry's query string.
    fn replace(&mut self, query: &str);
}

/// Search input of the list page.
pub trait SearchField: Send + 'static {
    fn focus(&mut self);
}

/// Bundle of the view-side ports handed to the controller.
pub struct ViewPorts {
    pub notifier: Box<dyn Notifier>,
    pub dialog: Box<dyn ConfirmationDialog>,
    pub url: Box<dyn UrlStateStore>,
    pub search_field: Box<dyn SearchField>,
}
