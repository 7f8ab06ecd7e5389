use tokio::sync::{mpsc, oneshot, watch};

use crate::controller::list_view::{Command, Envelope};
use crate::controller::state::ListViewState;
use crate::controller::{ControllerError, ControllerResult};
use crate::domain::types::{ClientId, PerPage};

/// Sender side of the list view controller.
///
/// Every action resolves once the controller has applied the transition, not
/// when the fetch it triggered completes; use [`ListViewHandle::settled`] to
/// wait for the backend.
#[derive(Clone)]
pub struct ListViewHandle {
    commands: mpsc::Sender<Envelope>,
    state: watch::Receiver<ListViewState>,
}

impl ListViewHandle {
    pub(crate) fn new(
        commands: mpsc::Sender<Envelope>,
        state: watch::Receiver<ListViewState>,
    ) -> Self {
        Self { commands, state }
    }

    async fn send(&self, command: Command) -> ControllerResult<()> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send((command, reply))
            .await
            .map_err(|_| ControllerError::Closed)?;
        response.await.map_err(|_| ControllerError::Closed)?
    }

    /// Reads the URL parameters and loads the first page without debouncing.
    pub async fn initialize(&self) -> ControllerResult<()> {
        self.send(Command::Initialize).await
    }

    /// Echoes typed text and restarts the search debounce timer.
    pub async fn set_search_text(&self, text: impl Into<String>) -> ControllerResult<()> {
        self.send(Command::SetSearchText(text.into())).await
    }

    /// Commits the typed search immediately.
    ///
    /// Fails with [`ControllerError::EmptySearch`] for a blank input.
    pub async fn submit_search(&self) -> ControllerResult<()> {
        self.send(Command::SubmitSearch).await
    }

    /// Drops the search term and reloads the unfiltered first page.
    pub async fn clear_search(&self) -> ControllerResult<()> {
        self.send(Command::ClearSearch).await
    }

    pub async fn go_to_page(&self, page: usize) -> ControllerResult<()> {
        self.send(Command::GoToPage(page)).await
    }

    pub async fn set_per_page(&self, per_page: PerPage) -> ControllerResult<()> {
        self.send(Command::SetPerPage(per_page)).await
    }

    /// Re-runs the fetch for the current query after a failure.
    pub async fn retry(&self) -> ControllerResult<()> {
        self.send(Command::Retry).await
    }

    pub async fn request_delete(
        &self,
        client_id: ClientId,
        client_name: impl Into<String>,
    ) -> ControllerResult<()> {
        self.send(Command::RequestDelete {
            client_id,
            client_name: client_name.into(),
        })
        .await
    }

    pub async fn cancel_delete(&self) -> ControllerResult<()> {
        self.send(Command::CancelDelete).await
    }

    pub async fn confirm_delete(&self) -> ControllerResult<()> {
        self.send(Command::ConfirmDelete).await
    }

    /// Latest published state.
    pub fn state(&self) -> ListViewState {
        self.state.borrow().clone()
    }

    /// Receiver for renderers that want to react to every change.
    pub fn subscribe(&self) -> watch::Receiver<ListViewState> {
        self.state.clone()
    }

    /// Waits until no fetch and no delete call is in flight.
    pub async fn settled(&self) -> ControllerResult<ListViewState> {
        let mut state = self.state.clone();
        let settled = state
            .wait_for(ListViewState::is_settled)
            .await
            .map_err(|_| ControllerError::Closed)?;
        Ok(settled.clone())
    }
}
