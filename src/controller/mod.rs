//! Customer list page controller.
//!
//! [`ListViewController`] runs as a tokio task and is the only writer of
//! [`ListViewState`]. User actions reach it through a cloneable
//! [`ListViewHandle`]; renderers observe the state through a `watch` channel
//! and never mutate it.
//!
//! Fetches carry a sequence number and only the response to the latest request
//! is applied, so the visible page and the URL always belong to the last
//! action even when responses arrive out of order.

use std::time::Duration;

use thiserror::Error;

pub mod debounce;
mod handle;
mod list_view;
pub mod ports;
pub mod state;

pub use handle::ListViewHandle;
pub use list_view::ListViewController;
pub use ports::{
    ConfirmationDialog, ConfirmationPrompt, NotificationKind, Notifier, SearchField,
    UrlStateStore, ViewPorts,
};
pub use state::{ListViewState, LoadPhase, PendingDeletion};

/// Quiet period after the last keystroke before a typed search is committed.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

pub const EMPTY_SEARCH_MESSAGE: &str = "Ingrese un término de búsqueda";
pub const DELETE_SUCCESS_MESSAGE: &str = "Cliente eliminado correctamente";
pub const DELETE_ERROR_MESSAGE: &str = "Error al eliminar cliente";
pub const DELETE_DIALOG_TITLE: &str = "Eliminar cliente";

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ControllerError {
    /// Explicit search submitted with a blank input.
    #[error("search term cannot be empty")]
    EmptySearch,

    #[error("list view controller has stopped")]
    Closed,
}

pub type ControllerResult<T> = Result<T, ControllerError>;

#[derive(Debug, Clone)]
pub struct ListViewConfig {
    pub search_debounce: Duration,
}

impl Default for ListViewConfig {
    fn default() -> Self {
        Self {
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}
