//! Observable state of the customer list page.

use crate::domain::client::{ClientListQuery, ClientPage};
use crate::domain::types::ClientId;

/// Progress of the most recent list fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPhase {
    /// Nothing requested yet.
    #[default]
    Idle,
    Loading,
    Loaded,
    /// The last fetch failed; the previous page, if any, is still shown.
    Failed,
}

/// Customer staged for deletion, awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    pub client_id: ClientId,
    pub client_name: String,
}

/// Snapshot published to renderers after every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListViewState {
    /// Query the visible page belongs to.
    pub query: ClientListQuery,
    /// Query of the fetch in flight, or of the last failed one until it is
    /// retried or superseded.
    pub requested: Option<ClientListQuery>,
    /// Text currently typed in the search input.
    pub search_input: String,
    /// Last successfully fetched page.
    pub page: Option<ClientPage>,
    pub phase: LoadPhase,
    /// Inline error shown above the table with a retry action.
    pub error: Option<String>,
    pub pending_deletion: Option<PendingDeletion>,
    /// Row whose delete call is in flight.
    pub deleting: Option<ClientId>,
}

impl ListViewState {
    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    /// Returns `true` when no fetch and no delete call is in flight.
    pub fn is_settled(&self) -> bool {
        !self.is_loading() && self.deleting.is_none()
    }

    pub fn is_deleting(&self, id: ClientId) -> bool {
        self.deleting == Some(id)
    }

    /// Page number of the rows currently shown.
    pub fn current_page(&self) -> usize {
        self.query.page
    }

    /// Newest query the user asked for, whether or not it has loaded yet.
    pub fn latest_query(&self) -> &ClientListQuery {
        self.requested.as_ref().unwrap_or(&self.query)
    }

    pub fn last_page(&self) -> Option<usize> {
        self.page.as_ref().map(ClientPage::last_page)
    }
}
